use formelbank_engine::EngineResult;

pub const GUIDANCE_SELECT_ONE: &str = "Bitte wähle mindestens eine Formel aus";
pub const GUIDANCE_SELECT_TWO: &str = "Bitte wähle mindestens zwei Formeln aus";

const HELP_TEXT: &str = "Gebe deine Formeln in die Textfelder ein. \n\
Zum einfacheren Eingeben gibt es ein Mapping zu Ascii Charakteren. \n \
t = top \n f = bottom \n & = and \n | = or \n\n\
Um eine neue Formel hinzuzufügen drücke + \n\
Um eine Wahrheitstabelle auszugeben drücke F2. \n\
Um zu prüfen ob Formeln äquivalent sind, drücke F3.";

/// The command kind that produced the current shared result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchKind {
    #[default]
    None,
    Table,
    Equivalence,
    Error,
    Help,
}

/// The single workspace-wide result display. Empty text means no result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchResult {
    kind: BatchKind,
    text: String,
}

impl BatchResult {
    pub fn kind(&self) -> BatchKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Destination for the copy operation; the terminal front end supplies the
/// system clipboard, tests supply a recorder.
pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), String>;
}

/// Decision produced by starting a batch command: either the engine call
/// to issue (tagged with the generation that must still be current when
/// its response lands) or nothing because guidance was substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchLaunch {
    Issue { generation: u64 },
    GuidanceShown,
}

/// Guards the shared result. Every command, including guidance and help,
/// bumps the generation so that an older in-flight response can never
/// overwrite what a newer command produced.
#[derive(Debug, Default)]
pub struct BatchCommandController {
    result: BatchResult,
    generation: u64,
}

impl BatchCommandController {
    pub fn result(&self) -> &BatchResult {
        &self.result
    }

    /// Truth table over `selected_count` formulas. Below one, guidance is
    /// substituted and no engine call may be made.
    pub fn begin_truth_table(&mut self, selected_count: usize) -> BatchLaunch {
        self.generation += 1;
        if selected_count == 0 {
            self.result = BatchResult {
                kind: BatchKind::Error,
                text: GUIDANCE_SELECT_ONE.to_owned(),
            };
            return BatchLaunch::GuidanceShown;
        }
        BatchLaunch::Issue {
            generation: self.generation,
        }
    }

    /// Equivalence over `selected_count` formulas; needs at least two.
    pub fn begin_equivalence(&mut self, selected_count: usize) -> BatchLaunch {
        self.generation += 1;
        if selected_count < 2 {
            self.result = BatchResult {
                kind: BatchKind::Error,
                text: GUIDANCE_SELECT_TWO.to_owned(),
            };
            return BatchLaunch::GuidanceShown;
        }
        BatchLaunch::Issue {
            generation: self.generation,
        }
    }

    /// Static instructional text; no engine call.
    pub fn show_help(&mut self) {
        self.generation += 1;
        self.result = BatchResult {
            kind: BatchKind::Help,
            text: HELP_TEXT.to_owned(),
        };
    }

    /// Applies a batch completion unless a newer command has started since
    /// it was issued.
    pub fn apply_completion(
        &mut self,
        generation: u64,
        kind: BatchKind,
        outcome: &EngineResult<String>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.result = match outcome {
            Ok(text) => BatchResult {
                kind,
                text: text.clone(),
            },
            Err(error) => BatchResult {
                kind: BatchKind::Error,
                text: error.message().to_owned(),
            },
        };
        true
    }

    /// Copies the current result text to the sink; no-op while empty.
    pub fn copy_result(&self, sink: &dyn ClipboardSink) -> bool {
        if self.result.is_empty() {
            return false;
        }
        match sink.set_text(self.result.text()) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(%error, "failed to copy result to clipboard");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use formelbank_engine::EngineError;

    use super::{
        BatchCommandController, BatchKind, BatchLaunch, ClipboardSink, GUIDANCE_SELECT_ONE,
        GUIDANCE_SELECT_TWO,
    };

    #[derive(Default)]
    struct RecordingClipboard {
        texts: Mutex<Vec<String>>,
    }

    impl ClipboardSink for RecordingClipboard {
        fn set_text(&self, text: &str) -> Result<(), String> {
            self.texts.lock().expect("clipboard lock").push(text.to_owned());
            Ok(())
        }
    }

    #[test]
    fn empty_selection_substitutes_guidance_without_engine_call() {
        let mut controller = BatchCommandController::default();
        assert_eq!(
            controller.begin_truth_table(0),
            BatchLaunch::GuidanceShown
        );
        assert_eq!(controller.result().kind(), BatchKind::Error);
        assert_eq!(controller.result().text(), GUIDANCE_SELECT_ONE);
    }

    #[test]
    fn single_selection_equivalence_substitutes_guidance() {
        let mut controller = BatchCommandController::default();
        assert_eq!(controller.begin_equivalence(1), BatchLaunch::GuidanceShown);
        assert_eq!(controller.result().text(), GUIDANCE_SELECT_TWO);
    }

    #[test]
    fn completion_for_the_current_command_lands() {
        let mut controller = BatchCommandController::default();
        let BatchLaunch::Issue { generation } = controller.begin_truth_table(2) else {
            panic!("two selected formulas must issue a call");
        };
        assert!(controller.apply_completion(
            generation,
            BatchKind::Table,
            &Ok("| p | q |".to_owned()),
        ));
        assert_eq!(controller.result().kind(), BatchKind::Table);
        assert_eq!(controller.result().text(), "| p | q |");
    }

    #[test]
    fn superseded_completion_is_discarded() {
        let mut controller = BatchCommandController::default();
        let BatchLaunch::Issue { generation: stale } = controller.begin_truth_table(1) else {
            panic!("one selected formula must issue a table call");
        };
        let BatchLaunch::Issue { generation: current } = controller.begin_equivalence(2) else {
            panic!("two selected formulas must issue an equivalence call");
        };

        assert!(controller.apply_completion(
            current,
            BatchKind::Equivalence,
            &Ok("äquivalent".to_owned()),
        ));
        assert!(!controller.apply_completion(
            stale,
            BatchKind::Table,
            &Ok("| p |".to_owned()),
        ));
        assert_eq!(controller.result().kind(), BatchKind::Equivalence);
        assert_eq!(controller.result().text(), "äquivalent");
    }

    #[test]
    fn guidance_supersedes_an_in_flight_command() {
        let mut controller = BatchCommandController::default();
        let BatchLaunch::Issue { generation } = controller.begin_truth_table(1) else {
            panic!("one selected formula must issue a table call");
        };
        assert_eq!(controller.begin_equivalence(0), BatchLaunch::GuidanceShown);

        assert!(!controller.apply_completion(generation, BatchKind::Table, &Ok("| p |".to_owned())));
        assert_eq!(controller.result().text(), GUIDANCE_SELECT_TWO);
    }

    #[test]
    fn engine_failure_surfaces_the_message_verbatim() {
        let mut controller = BatchCommandController::default();
        let BatchLaunch::Issue { generation } = controller.begin_equivalence(2) else {
            panic!("two selected formulas must issue an equivalence call");
        };
        assert!(controller.apply_completion(
            generation,
            BatchKind::Equivalence,
            &Err(EngineError::Engine("unbekannte Formel phi7".to_owned())),
        ));
        assert_eq!(controller.result().kind(), BatchKind::Error);
        assert_eq!(controller.result().text(), "unbekannte Formel phi7");
    }

    #[test]
    fn help_needs_no_engine_and_supersedes_in_flight_results() {
        let mut controller = BatchCommandController::default();
        let BatchLaunch::Issue { generation } = controller.begin_truth_table(1) else {
            panic!("one selected formula must issue a table call");
        };
        controller.show_help();
        assert_eq!(controller.result().kind(), BatchKind::Help);
        assert!(controller.result().text().contains("t = top"));
        assert!(!controller.apply_completion(generation, BatchKind::Table, &Ok(String::new())));
    }

    #[test]
    fn copy_is_a_no_op_while_the_result_is_empty() {
        let controller = BatchCommandController::default();
        let clipboard = RecordingClipboard::default();
        assert!(!controller.copy_result(&clipboard));
        assert!(clipboard.texts.lock().expect("clipboard lock").is_empty());
    }

    #[test]
    fn copy_forwards_the_result_text() {
        let mut controller = BatchCommandController::default();
        controller.show_help();
        let clipboard = RecordingClipboard::default();
        assert!(controller.copy_result(&clipboard));
        let texts = clipboard.texts.lock().expect("clipboard lock");
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("f = bottom"));
    }
}
