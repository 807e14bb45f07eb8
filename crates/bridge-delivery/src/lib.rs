//! Receipt waiting for submitted transactions.
//!
//! Once a transaction has been broadcast, the `ReceiptWaiter` polls the chain
//! connector until the ledger produces a receipt, the sender's nonce is
//! consumed by some other transaction, or the caller's cancellation token
//! fires. Polling backs off exponentially between attempts and every sleep and
//! in-flight query is raced against the token, so a cancelled wait returns by
//! the next suspension point.

pub mod types;
pub mod waiter;

pub use types::WaiterConfig;
pub use waiter::ReceiptWaiter;
