//! Pure rendering: LCD contents in, ratatui widgets out.
//!
//! The only effect is `Frame::render_widget()`, which writes to the
//! terminal buffer.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::display::{LcdBuffer, Row};

use super::theme;

/// Draw the panel centered in `frame`, with key hints underneath.
pub fn render(lcd: &LcdBuffer, frame: &mut Frame) {
    let [panel, help] = layout(frame.area(), lcd.columns());
    frame.render_widget(render_panel(lcd), panel);
    frame.render_widget(render_help(), help);
}

/// Panel (2 rows + bezel) above a full-width hint line, centered.
fn layout(area: Rect, columns: u16) -> [Rect; 2] {
    let [panel_row, help] = Layout::vertical([Constraint::Length(4), Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(area);
    let [panel] = Layout::horizontal([Constraint::Length(columns.saturating_add(2))])
        .flex(Flex::Center)
        .areas(panel_row);
    [panel, help]
}

fn render_panel(lcd: &LcdBuffer) -> Paragraph<'static> {
    let lines: Vec<Line> = [Row::Top, Row::Bottom]
        .into_iter()
        .map(|row| Line::from(Span::styled(lcd.padded_row(row), theme::STYLE_LCD)))
        .collect();

    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::STYLE_BEZEL)
            .title(Span::styled(" cpi ", theme::STYLE_TITLE)),
    )
}

fn render_help() -> Paragraph<'static> {
    let hint = |key: &'static str, label: &'static str| {
        [
            Span::styled(key, theme::STYLE_KEY),
            Span::styled(label, theme::STYLE_HELP),
        ]
    };
    let spans: Vec<Span> = [
        hint("s", " tap "),
        hint("d", " dbl "),
        hint("l", " long "),
        hint("q", " quit"),
    ]
    .into_iter()
    .flatten()
    .collect();
    Paragraph::new(Line::from(spans)).centered()
}

// ============================================================================
// TESTS
// ============================================================================
