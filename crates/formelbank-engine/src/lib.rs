//! Shared engine protocol for the formula workbench.
//!
//! Defines the slot naming scheme, the error taxonomy for engine calls, the
//! wire payload types, and the `FormulaEngine` trait that clients implement.
//! Everything behind the remote-call boundary (parsing, truth tables,
//! equivalence) lives on the engine side; this crate only names the contract.

pub mod engine;
pub mod error;
pub mod name;
pub mod wire;

pub use engine::FormulaEngine;
pub use error::{EngineError, EngineResult};
pub use name::SlotName;
