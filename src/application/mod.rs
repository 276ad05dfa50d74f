// Application layer - the ledger's public operations.
// Every validation runs here, before anything reaches the repository.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
