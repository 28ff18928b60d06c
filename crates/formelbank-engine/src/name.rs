use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of one formula slot. Assigned once at slot creation
/// (`phi0`, `phi1`, ...) and never reused while the slot exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotName(String);

impl SlotName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name the workspace assigns to the slot at creation index `index`.
    pub fn for_index(index: u64) -> Self {
        Self(format!("phi{index}"))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
