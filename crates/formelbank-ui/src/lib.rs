//! Terminal front end for the formula workspace.
//!
//! Presentation only: the workspace owns all state; this crate draws it,
//! routes key presses into workspace operations, and supplies the system
//! clipboard behind the `ClipboardSink` seam. Printable keys, space
//! included, always edit the focused slot; commands live on function keys
//! so formula text never collides with them.

use std::io::{self, Stdout};
use std::sync::Mutex;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use formelbank_core::{ClipboardSink, Workspace};
use formelbank_engine::SlotName;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

mod render;

use render::render_workspace;

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// System clipboard behind the core's `ClipboardSink` seam. Construction
/// failure (headless hosts) is kept and reported per copy attempt.
pub struct SystemClipboard {
    inner: Mutex<Option<arboard::Clipboard>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(arboard::Clipboard::new().ok()),
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), String> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| "clipboard lock poisoned".to_owned())?;
        match guard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_owned())
                .map_err(|error| error.to_string()),
            None => Err("system clipboard unavailable".to_owned()),
        }
    }
}

#[derive(Debug, Default)]
pub struct UiShellState {
    focused: usize,
}

impl UiShellState {
    pub fn focused_name(&self, workspace: &Workspace) -> Option<SlotName> {
        workspace.slot_names().get(self.focused).cloned()
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }
}

pub struct Ui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Ui {
    pub fn init() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    pub fn run(&mut self, workspace: &mut Workspace) -> io::Result<()> {
        let mut shell = UiShellState::default();
        let mut force_draw = true;
        loop {
            let changed = workspace.tick_engine_events_and_report();
            if force_draw || changed {
                self.terminal
                    .draw(|frame| render_workspace(frame, workspace, &shell))?;
            }
            force_draw = false;

            if event::poll(POLL_TIMEOUT)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if handle_key_press(workspace, &mut shell, key) {
                            break;
                        }
                        force_draw = true;
                    }
                }
            }
        }
        Ok(())
    }
}

impl Drop for Ui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(LeaveAlternateScreen);
    }
}

/// Routes one key press into the workspace. Returns true on quit.
pub fn handle_key_press(
    workspace: &mut Workspace,
    shell: &mut UiShellState,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }
    match key.code {
        KeyCode::Esc => return true,
        KeyCode::Char('+') => {
            workspace.add_slot();
        }
        KeyCode::Char(character) => {
            if let Some(name) = shell.focused_name(workspace) {
                if let Some(slot) = workspace.slot(&name) {
                    let mut text = slot.input().to_owned();
                    text.push(character);
                    workspace.edit_slot(&name, text);
                }
            }
        }
        KeyCode::Backspace => {
            if let Some(name) = shell.focused_name(workspace) {
                if let Some(slot) = workspace.slot(&name) {
                    let mut text = slot.input().to_owned();
                    if text.pop().is_some() {
                        workspace.edit_slot(&name, text);
                    }
                }
            }
        }
        KeyCode::Enter => {
            if let Some(name) = shell.focused_name(workspace) {
                workspace.blur_slot(&name);
            }
        }
        KeyCode::Up => move_focus(workspace, shell, -1),
        KeyCode::Down => move_focus(workspace, shell, 1),
        KeyCode::Tab => {
            if let Some(name) = shell.focused_name(workspace) {
                workspace.toggle_notation(&name);
            }
        }
        KeyCode::F(1) => workspace.show_help(),
        KeyCode::F(2) => workspace.request_truth_table(),
        KeyCode::F(3) => workspace.request_equivalence(),
        KeyCode::F(4) => {
            workspace.copy_result();
        }
        KeyCode::F(5) => {
            if let Some(name) = shell.focused_name(workspace) {
                workspace.toggle_selection(&name);
            }
        }
        _ => {}
    }
    false
}

/// Moving focus away from a slot is its focus loss and triggers the
/// render step for its current text.
fn move_focus(workspace: &mut Workspace, shell: &mut UiShellState, delta: isize) {
    let count = workspace.slot_count();
    if count == 0 {
        return;
    }
    let target = shell.focused.saturating_add_signed(delta).min(count - 1);
    if target == shell.focused {
        return;
    }
    if let Some(name) = shell.focused_name(workspace) {
        workspace.blur_slot(&name);
    }
    shell.focused = target;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use formelbank_core::{BatchKind, SlotStatus, Workspace, GUIDANCE_SELECT_ONE};
    use formelbank_engine::{EngineResult, FormulaEngine, SlotName};

    use super::{handle_key_press, UiShellState};

    struct IdleEngine;

    #[async_trait]
    impl FormulaEngine for IdleEngine {
        async fn render_formula(&self, _name: &SlotName, input: &str) -> EngineResult<String> {
            Ok(input.to_owned())
        }

        async fn validate_formula(&self, _name: &SlotName, _input: &str) -> EngineResult<()> {
            Ok(())
        }

        async fn fetch_formula(&self, _name: &SlotName, _symbolic: bool) -> EngineResult<String> {
            Ok(String::new())
        }

        async fn truth_table(&self, _names: &[SlotName]) -> EngineResult<String> {
            Ok(String::new())
        }

        async fn check_equivalence(&self, _names: &[SlotName]) -> EngineResult<String> {
            Ok(String::new())
        }

        async fn health_check(&self) -> EngineResult<()> {
            Ok(())
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn printable_keys_including_space_edit_the_focused_slot() {
        let mut workspace = Workspace::new(Arc::new(IdleEngine));
        let mut shell = UiShellState::default();
        for character in "p & q".chars() {
            assert!(!handle_key_press(
                &mut workspace,
                &mut shell,
                press(KeyCode::Char(character)),
            ));
        }
        let phi0 = SlotName::new("phi0");
        let slot = workspace.slot(&phi0).expect("slot phi0");
        assert_eq!(slot.input(), "p & q");
        assert_eq!(slot.status(), SlotStatus::Checking);
    }

    #[tokio::test]
    async fn backspace_on_an_empty_slot_does_not_revalidate() {
        let mut workspace = Workspace::new(Arc::new(IdleEngine));
        let mut shell = UiShellState::default();
        let phi0 = SlotName::new("phi0");
        let before = workspace.slot(&phi0).expect("slot phi0").generation();
        handle_key_press(&mut workspace, &mut shell, press(KeyCode::Backspace));
        assert_eq!(
            workspace.slot(&phi0).expect("slot phi0").generation(),
            before
        );
    }

    #[tokio::test]
    async fn plus_adds_a_slot_and_f5_selects_the_focused_one() {
        let mut workspace = Workspace::new(Arc::new(IdleEngine));
        let mut shell = UiShellState::default();
        handle_key_press(&mut workspace, &mut shell, press(KeyCode::Char('+')));
        assert_eq!(workspace.slot_count(), 2);

        handle_key_press(&mut workspace, &mut shell, press(KeyCode::F(5)));
        assert!(workspace.is_selected(&SlotName::new("phi0")));
        assert!(!workspace.is_selected(&SlotName::new("phi1")));
    }

    #[tokio::test]
    async fn moving_focus_down_stops_at_the_last_slot() {
        let mut workspace = Workspace::new(Arc::new(IdleEngine));
        let mut shell = UiShellState::default();
        handle_key_press(&mut workspace, &mut shell, press(KeyCode::Char('+')));
        handle_key_press(&mut workspace, &mut shell, press(KeyCode::Down));
        assert_eq!(shell.focused_index(), 1);
        handle_key_press(&mut workspace, &mut shell, press(KeyCode::Down));
        assert_eq!(shell.focused_index(), 1);
        handle_key_press(&mut workspace, &mut shell, press(KeyCode::Up));
        assert_eq!(shell.focused_index(), 0);
    }

    #[tokio::test]
    async fn table_without_selection_shows_guidance() {
        let mut workspace = Workspace::new(Arc::new(IdleEngine));
        let mut shell = UiShellState::default();
        handle_key_press(&mut workspace, &mut shell, press(KeyCode::F(2)));
        assert_eq!(workspace.batch_result().text(), GUIDANCE_SELECT_ONE);
    }

    #[tokio::test]
    async fn f1_shows_help_and_esc_quits() {
        let mut workspace = Workspace::new(Arc::new(IdleEngine));
        let mut shell = UiShellState::default();
        handle_key_press(&mut workspace, &mut shell, press(KeyCode::F(1)));
        assert_eq!(workspace.batch_result().kind(), BatchKind::Help);
        assert!(handle_key_press(
            &mut workspace,
            &mut shell,
            press(KeyCode::Esc)
        ));
    }

    #[tokio::test]
    async fn ctrl_c_quits() {
        let mut workspace = Workspace::new(Arc::new(IdleEngine));
        let mut shell = UiShellState::default();
        assert!(handle_key_press(
            &mut workspace,
            &mut shell,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ));
    }
}
