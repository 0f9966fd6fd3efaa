//! Front-end flows for the Lode demos.
//!
//! This crate is the glue a UI would sit on top of: a [`Wallet`] holding
//! the user's signing key, a [`StatusBanner`] mirroring the transient
//! feedback the demo pages show, and a [`Workbench`] wiring the record
//! store, the batch ledger, and the decryption oracle together.

pub mod banner;
pub mod error;
pub mod wallet;
pub mod workbench;

pub use banner::StatusBanner;
pub use error::{ClientError, ClientResult};
pub use wallet::Wallet;
pub use workbench::Workbench;
