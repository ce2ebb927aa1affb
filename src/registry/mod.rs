mod ledger;

pub use ledger::{Ledger, Stored, Txn};

/// A type that can be stored in one of the ledger's registries.
pub trait Record: Clone {
    /// The entity kind, used in diagnostics and error messages.
    const KIND: &'static str;

    /// The unique registry key.
    fn key(&self) -> &str;
}
