use lode_crypto::{Signature, SigningKey, VerifyingKey};
use lode_types::Address;

/// The user's in-process wallet: an ed25519 key pair and its derived
/// address.
pub struct Wallet {
    key: SigningKey,
    address: Address,
}

impl Wallet {
    /// Generate a fresh wallet.
    pub fn generate() -> Self {
        let key = SigningKey::generate();
        let address = key.verifying_key().to_address();
        Self { key, address }
    }

    /// Restore a wallet from a 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let key = SigningKey::from_bytes(seed);
        let address = key.verifying_key().to_address();
        Self { key, address }
    }

    /// The wallet's address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The wallet's public key.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }

    /// Sign an arbitrary message.
    ///
    /// The reveal flow signs a human-readable intent string with this
    /// before requesting decryption. Nothing checks the signature; it
    /// exists so the wallet prompt has something real to show.
    pub fn sign_message(&self, message: &[u8]) -> Signature {
        self.key.sign(message)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_stable_for_a_seed() {
        let w1 = Wallet::from_seed([7; 32]);
        let w2 = Wallet::from_seed([7; 32]);
        assert_eq!(w1.address(), w2.address());
    }

    #[test]
    fn distinct_wallets_get_distinct_addresses() {
        assert_ne!(Wallet::generate().address(), Wallet::generate().address());
    }

    #[test]
    fn signed_message_verifies_against_own_key() {
        let wallet = Wallet::generate();
        let sig = wallet.sign_message(b"reveal pair for batch#1");
        wallet
            .verifying_key()
            .verify(b"reveal pair for batch#1", &sig)
            .unwrap();
    }

    #[test]
    fn debug_does_not_leak_the_key() {
        let wallet = Wallet::from_seed([9; 32]);
        let rendered = format!("{wallet:?}");
        assert!(rendered.contains("address"));
        assert!(!rendered.to_lowercase().contains("key"));
    }
}
