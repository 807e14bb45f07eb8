//! Transaction authority implementations.
//!
//! Available implementations:
//! - `local`: in-process private key signer

pub mod local;
