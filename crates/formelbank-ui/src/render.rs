use formelbank_core::{BatchKind, FormulaSlot, SlotStatus, Workspace};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::UiShellState;

const FOOTER_HELP: &str =
    "F1 hilfe | F2 tabelle | F3 äquivalenz | F4 kopieren | F5 auswahl | Tab notation | + neue formel | Esc beenden";

pub(crate) fn render_workspace(frame: &mut Frame<'_>, workspace: &Workspace, shell: &UiShellState) {
    let area = frame.area();
    let result = workspace.batch_result();

    if result.is_empty() {
        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(3)]);
        let [slots_area, footer_area] = layout.areas(area);
        render_slots(frame, workspace, shell, slots_area);
        render_footer(frame, footer_area);
    } else {
        let result_height = result_pane_height(result.text(), area.height);
        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(result_height),
            Constraint::Length(3),
        ]);
        let [slots_area, result_area, footer_area] = layout.areas(area);
        render_slots(frame, workspace, shell, slots_area);
        render_result(frame, workspace, result_area);
        render_footer(frame, footer_area);
    }
}

fn render_slots(frame: &mut Frame<'_>, workspace: &Workspace, shell: &UiShellState, area: Rect) {
    let mut lines = Vec::with_capacity(workspace.slot_count());
    for (index, name) in workspace.slot_names().iter().enumerate() {
        if let Some(slot) = workspace.slot(name) {
            lines.push(slot_line(
                slot,
                workspace.is_selected(name),
                index == shell.focused_index(),
            ));
        }
    }
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(Block::default().title("formeln").borders(Borders::ALL)),
        area,
    );
}

fn render_result(frame: &mut Frame<'_>, workspace: &Workspace, area: Rect) {
    let result = workspace.batch_result();
    let title = result_title(result.kind());
    frame.render_widget(
        Paragraph::new(result.text().to_owned())
            .wrap(Wrap { trim: false })
            .block(Block::default().title(title).borders(Borders::ALL)),
        area,
    );
}

fn render_footer(frame: &mut Frame<'_>, area: Rect) {
    frame.render_widget(
        Paragraph::new(FOOTER_HELP)
            .block(Block::default().title("formelbank").borders(Borders::ALL)),
        area,
    );
}

fn result_title(kind: BatchKind) -> &'static str {
    match kind {
        BatchKind::Table => "tabelle",
        BatchKind::Equivalence => "äquivalenz",
        BatchKind::Help => "hilfe",
        BatchKind::Error => "fehler",
        BatchKind::None => "ergebnis",
    }
}

fn result_pane_height(text: &str, total_height: u16) -> u16 {
    let content_lines = text.lines().count().max(1) as u16;
    (content_lines + 2).min(total_height / 2)
}

pub(crate) fn slot_line(slot: &FormulaSlot, selected: bool, focused: bool) -> Line<'static> {
    let mut spans = vec![
        Span::raw(if selected { "[x] " } else { "[ ] " }),
        Span::styled(
            format!("{} ", slot.name()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(slot.input().to_owned()),
    ];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(Color::LightBlue)));
    }
    spans.push(Span::styled(
        format!("  [{}] ", slot.mode().label()),
        Style::default().fg(Color::DarkGray),
    ));
    match slot.status() {
        SlotStatus::Valid => {
            spans.push(Span::styled("OK", Style::default().fg(Color::Green)));
        }
        SlotStatus::Invalid => {
            spans.push(Span::styled("Fehler", Style::default().fg(Color::Red)));
        }
        SlotStatus::Checking => {
            spans.push(Span::styled("...", Style::default().fg(Color::DarkGray)));
        }
        SlotStatus::Unchecked => {}
    }
    if let Some(message) = slot.inline_error() {
        spans.push(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let mut line = Line::from(spans);
    if focused {
        line.style = Style::default().add_modifier(Modifier::BOLD);
    }
    line
}

#[cfg(test)]
mod tests {
    use formelbank_core::FormulaSlot;
    use formelbank_engine::{EngineError, SlotName};

    use super::{result_pane_height, slot_line};

    fn line_text(line: &ratatui::text::Line<'_>) -> String {
        line.spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn valid_slot_shows_ok_and_suppresses_fehler() {
        let mut slot = FormulaSlot::new(SlotName::new("phi0"));
        let generation = slot.begin_edit("p & q");
        assert!(slot.apply_validation(generation, &Ok(())));

        let text = line_text(&slot_line(&slot, true, false));
        assert!(text.starts_with("[x] phi0 p & q"));
        assert!(text.contains("[ASCII]"));
        assert!(text.contains("OK"));
        assert!(!text.contains("Fehler"));
    }

    #[test]
    fn invalid_slot_shows_fehler_with_the_engine_message() {
        let mut slot = FormulaSlot::new(SlotName::new("phi1"));
        let generation = slot.begin_edit("p &&");
        assert!(slot.apply_validation(
            generation,
            &Err(EngineError::Parse("unexpected token".to_owned())),
        ));

        let text = line_text(&slot_line(&slot, false, true));
        assert!(text.contains("Fehler"));
        assert!(text.contains("unexpected token"));
        assert!(!text.contains("OK"));
    }

    #[test]
    fn result_pane_height_is_capped_to_half_the_screen() {
        assert_eq!(result_pane_height("eine zeile", 40), 3);
        let tall = "zeile\n".repeat(50);
        assert_eq!(result_pane_height(tall.as_str(), 40), 20);
    }
}
