//! EVM chain connectors.

mod alloy;

pub use self::alloy::AlloyConnector;
