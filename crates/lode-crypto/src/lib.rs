//! Cryptographic primitives for the Lode ledger.
//!
//! Two concerns live here: domain-separated BLAKE3 hashing (addresses,
//! handles, state digests, event ids) and ed25519 signatures (the
//! compute service's decryption proofs, the client's intent signing).

pub mod hasher;
pub mod signer;

pub use hasher::{state_digest, ContentHasher, HasherError};
pub use signer::{Signature, SignatureError, SigningKey, VerifyingKey};
