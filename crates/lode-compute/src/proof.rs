use serde::{Deserialize, Serialize};

use lode_crypto::{ContentHasher, Signature};
use lode_types::RequestId;

/// Proof attached to a decryption callback.
///
/// An ed25519 signature by the compute service over the domain-tagged
/// digest of (request id, cleartext). Binding the request id prevents a
/// valid proof for one request from being replayed against another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionProof {
    pub signature: Signature,
}

/// The message the service signs: a domain-separated digest of the
/// request id and the cleartext bytes.
pub fn proof_message(request: &RequestId, cleartext: &[u8]) -> [u8; 32] {
    let mut data = Vec::with_capacity(16 + cleartext.len());
    data.extend_from_slice(request.as_uuid().as_bytes());
    data.extend_from_slice(cleartext);
    ContentHasher::PROOF.hash(&data)
}
