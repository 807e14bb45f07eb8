//! Contract bindings for the rollup bridge.
//!
//! This crate holds the transaction pipeline on top of the connector,
//! authority and receipt waiter: the event schema registry and decoder, the
//! `Transactor` call wrapper, the `ViewCaller` read-only wrapper and the
//! typed per-contract wrappers built from them.

pub mod abi;
pub mod arb_factory;
pub mod call;
pub mod challenge_tester;
pub mod events;
pub mod view;

pub use arb_factory::{ArbFactory, ArbFactoryWatcher, CreateRollup};
pub use call::{LogExpectation, Operation, Transactor};
pub use challenge_tester::{ChallengeTester, StartChallenge};
pub use events::{decode, ContractKind, DecodedEvent, EventSchema};
pub use view::ViewCaller;
