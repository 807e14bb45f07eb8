//! Chain connector implementations.
//!
//! Available implementations:
//! - `evm`: JSON-RPC connector for EVM chains built on alloy

pub mod evm;
