pub mod filter;
pub mod ledger;

// Re-export handler functions
pub use filter::*;
pub use ledger::*;
