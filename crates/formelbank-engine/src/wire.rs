use serde::{Deserialize, Serialize};

use crate::name::SlotName;

/// Remote operation names, verbatim as the engine exposes them.
pub const OP_RENDER_FORMULA: &str = "renderFormula";
pub const OP_CHECK_FORMEL: &str = "check_formel";
pub const OP_GET_FORMEL: &str = "getFormel";
pub const OP_TRUTH_TABLE: &str = "get_wahrheitstabelle_cmd";
pub const OP_EQUIVALENCE: &str = "is_aequivalent";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderFormulaRequest {
    pub name: SlotName,
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckFormelRequest {
    pub name: SlotName,
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetFormelRequest {
    pub name: SlotName,
    pub is_utf: bool,
}

/// Payload shared by both batch operations; `namen` carries the selected
/// slot names in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchNamesRequest {
    pub namen: Vec<SlotName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOkResponse {
    #[serde(default)]
    pub ok: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineErrorResponse {
    pub error: String,
}
