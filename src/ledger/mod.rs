pub mod error;
pub mod ledger;

pub use error::{LedgerError, LedgerErrorKind};
pub use ledger::ActionLedger;
