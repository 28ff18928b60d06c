use async_trait::async_trait;

use crate::error::EngineResult;
use crate::name::SlotName;

/// Typed facade over the remote engine. Each call is a single fallible
/// round trip; callers own retry and staleness policy.
#[async_trait]
pub trait FormulaEngine: Send + Sync {
    /// Parse and normalize `input` under `name`. A success also makes
    /// subsequent `fetch_formula` calls valid for that name.
    async fn render_formula(&self, name: &SlotName, input: &str) -> EngineResult<String>;

    /// Parse-only check. Does not touch engine-side render state.
    async fn validate_formula(&self, name: &SlotName, input: &str) -> EngineResult<()>;

    /// Retrieve the last rendered formula in the requested notation.
    /// Fails with `FetchUnavailable` without a prior successful render.
    async fn fetch_formula(&self, name: &SlotName, symbolic: bool) -> EngineResult<String>;

    /// Truth table over the given names; the engine decides the layout.
    /// Callers guarantee at least one name, the client only forwards.
    async fn truth_table(&self, names: &[SlotName]) -> EngineResult<String>;

    /// Equivalence check over the given names; callers guarantee at least
    /// two names.
    async fn check_equivalence(&self, names: &[SlotName]) -> EngineResult<String>;

    async fn health_check(&self) -> EngineResult<()>;
}
