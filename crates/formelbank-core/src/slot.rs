use formelbank_engine::{EngineError, SlotName};

/// Validation status of one slot. `Checking` is entered when the validate
/// call is actually issued; a bare edit leaves the slot `Unchecked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotStatus {
    #[default]
    Unchecked,
    Checking,
    Valid,
    Invalid,
}

impl SlotStatus {
    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotationMode {
    #[default]
    Ascii,
    Symbolic,
}

impl NotationMode {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascii => Self::Symbolic,
            Self::Symbolic => Self::Ascii,
        }
    }

    pub fn is_symbolic(self) -> bool {
        matches!(self, Self::Symbolic)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ascii => "ASCII",
            Self::Symbolic => "UTF",
        }
    }
}

/// State machine for one editable formula.
///
/// Every user action that issues an engine call bumps `generation`; a
/// completion is applied only while its generation is still current. An
/// old slow response therefore can never clobber state produced by a newer
/// action, and a rendering obtained under an earlier text can never be
/// displayed for an edited, unrevalidated one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaSlot {
    name: SlotName,
    input: String,
    status: SlotStatus,
    mode: NotationMode,
    display: Option<String>,
    inline_error: Option<String>,
    generation: u64,
}

impl FormulaSlot {
    pub fn new(name: SlotName) -> Self {
        Self {
            name,
            input: String::new(),
            status: SlotStatus::Unchecked,
            mode: NotationMode::Ascii,
            display: None,
            inline_error: None,
            generation: 0,
        }
    }

    pub fn name(&self) -> &SlotName {
        &self.name
    }

    pub fn input(&self) -> &str {
        self.input.as_str()
    }

    pub fn status(&self) -> SlotStatus {
        self.status
    }

    pub fn mode(&self) -> NotationMode {
        self.mode
    }

    /// Last successfully fetched text for the current mode. May lag
    /// `input` until a render plus fetch completes.
    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn inline_error(&self) -> Option<&str> {
        self.inline_error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Text edit. Drops any prior OK/error verdict synchronously and
    /// supersedes every in-flight call for this slot.
    pub fn begin_edit(&mut self, text: impl Into<String>) -> u64 {
        self.input = text.into();
        self.status = SlotStatus::Unchecked;
        self.inline_error = None;
        self.generation += 1;
        self.generation
    }

    /// Entered when the validate call for the current text is issued.
    pub fn mark_checking(&mut self) {
        if self.status == SlotStatus::Unchecked {
            self.status = SlotStatus::Checking;
        }
    }

    /// Focus loss. The render call issued for it supersedes anything in
    /// flight; current status is kept until the render completes.
    pub fn begin_blur(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Notation toggle. The mode flag flips immediately so the label
    /// matches user intent even if the follow-up fetch fails.
    pub fn begin_mode_toggle(&mut self) -> (NotationMode, u64) {
        self.mode = self.mode.flipped();
        self.generation += 1;
        (self.mode, self.generation)
    }

    pub fn apply_validation(
        &mut self,
        generation: u64,
        outcome: &Result<(), EngineError>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        match outcome {
            Ok(()) => {
                self.status = SlotStatus::Valid;
                self.inline_error = None;
            }
            Err(error) => {
                self.status = SlotStatus::Invalid;
                self.inline_error = Some(error.message().to_owned());
            }
        }
        true
    }

    pub fn apply_render_success(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.status = SlotStatus::Valid;
        self.inline_error = None;
        true
    }

    /// Failed render: the slot turns Invalid and the displayed text is
    /// left untouched. A failed render is never shown.
    pub fn apply_render_failure(&mut self, generation: u64, error: &EngineError) -> bool {
        if generation != self.generation {
            return false;
        }
        self.status = SlotStatus::Invalid;
        self.inline_error = Some(error.message().to_owned());
        true
    }

    /// Fetched text lands only while both the generation and the notation
    /// mode it was requested under are still current. On failure the last
    /// successfully fetched text stays.
    pub fn apply_fetch(
        &mut self,
        generation: u64,
        mode: NotationMode,
        outcome: &Result<String, EngineError>,
    ) -> bool {
        if generation != self.generation || mode != self.mode {
            return false;
        }
        match outcome {
            Ok(text) => {
                self.input = text.clone();
                self.display = Some(text.clone());
                self.inline_error = None;
            }
            Err(error) => {
                self.inline_error = Some(error.message().to_owned());
            }
        }
        true
    }
}
