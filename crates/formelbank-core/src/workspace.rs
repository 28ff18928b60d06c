use std::collections::HashMap;
use std::sync::Arc;

use formelbank_engine::{FormulaEngine, SlotName};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::batch::{BatchCommandController, BatchKind, BatchLaunch, BatchResult, ClipboardSink};
use crate::event::EngineEvent;
use crate::selection::WorkspaceSelection;
use crate::slot::{FormulaSlot, NotationMode};

const ENGINE_EVENT_CHANNEL_CAPACITY: usize = 32;

/// Top-level coordinator. Owns the slots, the selection, and the batch
/// controller; turns user actions into spawned engine calls and applies
/// their completions on the UI thread via `tick_engine_events_and_report`.
pub struct Workspace {
    engine: Arc<dyn FormulaEngine>,
    slots: HashMap<SlotName, FormulaSlot>,
    selection: WorkspaceSelection,
    batch: BatchCommandController,
    clipboard: Option<Arc<dyn ClipboardSink>>,
    events_tx: mpsc::Sender<EngineEvent>,
    events_rx: mpsc::Receiver<EngineEvent>,
}

impl Workspace {
    /// A fresh workspace holds exactly one slot, `phi0`.
    pub fn new(engine: Arc<dyn FormulaEngine>) -> Self {
        let (events_tx, events_rx) = mpsc::channel(ENGINE_EVENT_CHANNEL_CAPACITY);
        let mut workspace = Self {
            engine,
            slots: HashMap::new(),
            selection: WorkspaceSelection::default(),
            batch: BatchCommandController::default(),
            clipboard: None,
            events_tx,
            events_rx,
        };
        workspace.add_slot();
        workspace
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn ClipboardSink>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn add_slot(&mut self) -> SlotName {
        let name = self.selection.add_slot();
        self.slots
            .insert(name.clone(), FormulaSlot::new(name.clone()));
        name
    }

    pub fn slot(&self, name: &SlotName) -> Option<&FormulaSlot> {
        self.slots.get(name)
    }

    /// Slot identities in creation order, for display.
    pub fn slot_names(&self) -> &[SlotName] {
        self.selection.names()
    }

    pub fn slot_count(&self) -> usize {
        self.selection.len()
    }

    pub fn is_selected(&self, name: &SlotName) -> bool {
        self.selection.is_selected(name)
    }

    pub fn batch_result(&self) -> &BatchResult {
        self.batch.result()
    }

    /// Text edit: the slot drops its verdict synchronously, then the
    /// validate call for the new text is issued.
    pub fn edit_slot(&mut self, name: &SlotName, text: impl Into<String>) {
        let Some(slot) = self.slots.get_mut(name) else {
            return;
        };
        let generation = slot.begin_edit(text);
        slot.mark_checking();
        let input = slot.input().to_owned();
        self.spawn_validate(name.clone(), input, generation);
    }

    /// Focus loss: render the current text regardless of status. A
    /// successful render turns the slot Valid and triggers the fetch for
    /// the active notation (applied in the tick handler).
    pub fn blur_slot(&mut self, name: &SlotName) {
        let Some(slot) = self.slots.get_mut(name) else {
            return;
        };
        let generation = slot.begin_blur();
        let input = slot.input().to_owned();
        self.spawn_render(name.clone(), input, generation);
    }

    /// Notation toggle: the label flips immediately; a slot that is not
    /// Valid is rendered first so there is something to fetch.
    pub fn toggle_notation(&mut self, name: &SlotName) {
        let Some(slot) = self.slots.get_mut(name) else {
            return;
        };
        let (mode, generation) = slot.begin_mode_toggle();
        if slot.status().is_valid() {
            self.spawn_fetch(name.clone(), mode, generation);
        } else {
            let input = slot.input().to_owned();
            self.spawn_render(name.clone(), input, generation);
        }
    }

    pub fn toggle_selection(&mut self, name: &SlotName) -> bool {
        self.selection.toggle(name)
    }

    pub fn request_truth_table(&mut self) {
        let names = self.selection.selected_names();
        if let BatchLaunch::Issue { generation } = self.batch.begin_truth_table(names.len()) {
            self.spawn_batch(BatchKind::Table, names, generation);
        }
    }

    pub fn request_equivalence(&mut self) {
        let names = self.selection.selected_names();
        if let BatchLaunch::Issue { generation } = self.batch.begin_equivalence(names.len()) {
            self.spawn_batch(BatchKind::Equivalence, names, generation);
        }
    }

    pub fn show_help(&mut self) {
        self.batch.show_help();
    }

    pub fn copy_result(&self) -> bool {
        match self.clipboard.as_deref() {
            Some(clipboard) => self.batch.copy_result(clipboard),
            None => false,
        }
    }

    /// Drains engine completions and applies them behind the staleness
    /// guards. Returns whether anything observable changed.
    pub fn tick_engine_events_and_report(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.events_rx.try_recv() {
                Ok(event) => changed |= self.apply_engine_event(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    /// Applies one completion. Stale completions are discarded with no
    /// state mutation; that is the only silent failure path.
    pub fn apply_engine_event(&mut self, event: EngineEvent) -> bool {
        match event {
            EngineEvent::Validated {
                name,
                generation,
                outcome,
            } => {
                let Some(slot) = self.slots.get_mut(&name) else {
                    return false;
                };
                let applied = slot.apply_validation(generation, &outcome);
                if !applied {
                    tracing::debug!(%name, generation, "discarding stale validation");
                }
                applied
            }
            EngineEvent::Rendered {
                name,
                generation,
                outcome,
            } => {
                let Some(slot) = self.slots.get_mut(&name) else {
                    return false;
                };
                match outcome {
                    Ok(_) => {
                        if !slot.apply_render_success(generation) {
                            tracing::debug!(%name, generation, "discarding stale render");
                            return false;
                        }
                        let mode = slot.mode();
                        self.spawn_fetch(name, mode, generation);
                        true
                    }
                    Err(error) => {
                        let applied = slot.apply_render_failure(generation, &error);
                        if !applied {
                            tracing::debug!(%name, generation, "discarding stale render failure");
                        }
                        applied
                    }
                }
            }
            EngineEvent::Fetched {
                name,
                generation,
                mode,
                outcome,
            } => {
                let Some(slot) = self.slots.get_mut(&name) else {
                    return false;
                };
                let applied = slot.apply_fetch(generation, mode, &outcome);
                if !applied {
                    tracing::debug!(%name, generation, "discarding stale fetch");
                }
                applied
            }
            EngineEvent::BatchCompleted {
                generation,
                kind,
                outcome,
            } => {
                let applied = self.batch.apply_completion(generation, kind, &outcome);
                if !applied {
                    tracing::debug!(generation, "discarding stale batch completion");
                }
                applied
            }
        }
    }

    fn spawn_validate(&self, name: SlotName, input: String, generation: u64) {
        let engine = Arc::clone(&self.engine);
        let sender = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = engine.validate_formula(&name, &input).await;
            let _ = sender
                .send(EngineEvent::Validated {
                    name,
                    generation,
                    outcome,
                })
                .await;
        });
    }

    fn spawn_render(&self, name: SlotName, input: String, generation: u64) {
        let engine = Arc::clone(&self.engine);
        let sender = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = engine.render_formula(&name, &input).await;
            let _ = sender
                .send(EngineEvent::Rendered {
                    name,
                    generation,
                    outcome,
                })
                .await;
        });
    }

    fn spawn_fetch(&self, name: SlotName, mode: NotationMode, generation: u64) {
        let engine = Arc::clone(&self.engine);
        let sender = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = engine.fetch_formula(&name, mode.is_symbolic()).await;
            let _ = sender
                .send(EngineEvent::Fetched {
                    name,
                    generation,
                    mode,
                    outcome,
                })
                .await;
        });
    }

    fn spawn_batch(&self, kind: BatchKind, names: Vec<SlotName>, generation: u64) {
        let engine = Arc::clone(&self.engine);
        let sender = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = match kind {
                BatchKind::Equivalence => engine.check_equivalence(&names).await,
                _ => engine.truth_table(&names).await,
            };
            let _ = sender
                .send(EngineEvent::BatchCompleted {
                    generation,
                    kind,
                    outcome,
                })
                .await;
        });
    }
}
