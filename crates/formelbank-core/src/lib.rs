//! Formula workspace state model.
//!
//! Owns everything with real state and ordering concerns: the per-slot
//! editing/validation state machine, the identity-keyed selection over a
//! growable slot collection, the batch-command controller guarding the
//! single shared result, and the workspace coordinator that turns user
//! actions into engine calls and engine completions back into state.
//! Engine calls run as spawned tasks; completions come home through one
//! mpsc channel and are applied on the UI thread behind staleness guards.

pub mod batch;
pub mod event;
pub mod selection;
pub mod slot;
pub mod workspace;

pub use batch::{
    BatchCommandController, BatchKind, BatchResult, ClipboardSink, GUIDANCE_SELECT_ONE,
    GUIDANCE_SELECT_TWO,
};
pub use event::EngineEvent;
pub use selection::WorkspaceSelection;
pub use slot::{FormulaSlot, NotationMode, SlotStatus};
pub use workspace::Workspace;
