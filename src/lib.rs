//! Transaction-processing core for a ledger-backed e-voting system.
//!
//! Elections, members and votes live in typed registries on a shared
//! [`registry::Ledger`]. The engines in [`engine`] validate and apply
//! transactions against them: every operation observes one consistent
//! snapshot, commits all of its writes together or not at all, and
//! notifies external observers through an [`emitter::EventSink`] only
//! after it has committed.

pub mod emitter;
pub mod engine;
pub mod error;
pub mod model;
pub mod registry;

pub use emitter::EventSink;
pub use engine::{submit, Outcome, Transaction};
pub use error::{Error, Result};
pub use registry::Ledger;
