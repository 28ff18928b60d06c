use formelbank_engine::{EngineResult, SlotName};

use crate::batch::BatchKind;
use crate::slot::NotationMode;

/// Completion of one engine round trip, delivered back to the UI thread
/// through the workspace channel. Each carries the generation it was
/// issued under; the staleness guards decide whether it still applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Validated {
        name: SlotName,
        generation: u64,
        outcome: EngineResult<()>,
    },
    Rendered {
        name: SlotName,
        generation: u64,
        outcome: EngineResult<String>,
    },
    Fetched {
        name: SlotName,
        generation: u64,
        mode: NotationMode,
        outcome: EngineResult<String>,
    },
    BatchCompleted {
        generation: u64,
        kind: BatchKind,
        outcome: EngineResult<String>,
    },
}
