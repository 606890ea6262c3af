// Library surface for the `jin` binary and the integration tests.
pub mod agent;
pub mod arena;
pub mod cli;
pub mod config;
pub mod discussion;
pub mod ledger;
pub mod logging;
pub mod phase;
pub mod resolution;
pub mod roster;
pub mod types;
