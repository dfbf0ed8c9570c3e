//! Screen layout: query box, result table and status bar.

use crate::state::{AppState, ControllerMode};
use crate::view::constants::{
    KEY_HINTS, QUERY_INPUT_HEIGHT, STATUS_BAR_HEIGHT, TABLE_CHROME_HEIGHT,
};
use crate::view::query_input::QueryInputView;
use crate::view::result_table::render_result_table;
use crate::view::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, TableState},
    Frame,
};

/// Areas of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    /// Query box.
    pub query: Rect,
    /// Result table, takes the remaining height.
    pub table: Rect,
    /// Status message and key hints.
    pub status: Rect,
}

/// Split the frame vertically: query box, table (flexible), status bar.
pub fn calculate_areas(frame_area: Rect) -> ScreenAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(QUERY_INPUT_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(frame_area);

    ScreenAreas {
        query: chunks[0],
        table: chunks[1],
        status: chunks[2],
    }
}

/// Rows visible in the table body for a frame of this size. Never zero.
pub fn table_page_size(frame_area: Rect) -> usize {
    let table = calculate_areas(frame_area).table;
    usize::from(table.height.saturating_sub(TABLE_CHROME_HEIGHT).max(1))
}

fn query_title(state: &AppState) -> &'static str {
    match state.mode {
        ControllerMode::Searching => "Search (running...)",
        ControllerMode::Idle | ControllerMode::Browsing => "Search",
    }
}

/// Render the whole screen.
pub fn render_layout(
    frame: &mut Frame,
    state: &AppState,
    theme: &Theme,
    table_state: &mut TableState,
) {
    let areas = calculate_areas(frame.area());

    frame.render_widget(
        QueryInputView::new(&state.query, theme, query_title(state)),
        areas.query,
    );
    render_result_table(frame, areas.table, &state.table, theme, table_state);
    render_status_bar(frame, areas.status, state, theme);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let message = match &state.status {
        Some(status) => Line::from(Span::styled(
            status.text.as_str(),
            theme.status_message(status.kind),
        )),
        None => Line::default(),
    };

    let mut hints = vec![Span::styled(KEY_HINTS, theme.hints)];
    if state.in_flight() > 0 {
        hints.push(Span::styled(
            format!("  [{} downloading]", state.in_flight()),
            theme.downloading,
        ));
    }

    frame.render_widget(Paragraph::new(vec![message, Line::from(hints)]), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(state: &AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let theme = Theme::default();
        let mut table_state = TableState::default();
        terminal
            .draw(|frame| render_layout(frame, state, &theme, &mut table_state))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn areas_stack_vertically() {
        let areas = calculate_areas(Rect::new(0, 0, 100, 30));
        assert_eq!(areas.query.height, QUERY_INPUT_HEIGHT);
        assert_eq!(areas.status.height, STATUS_BAR_HEIGHT);
        assert_eq!(areas.table.height, 30 - QUERY_INPUT_HEIGHT - STATUS_BAR_HEIGHT);
        assert_eq!(areas.table.y, QUERY_INPUT_HEIGHT);
    }

    #[test]
    fn page_size_excludes_chrome() {
        let size = table_page_size(Rect::new(0, 0, 100, 30));
        let body = 30 - QUERY_INPUT_HEIGHT - STATUS_BAR_HEIGHT - TABLE_CHROME_HEIGHT;
        assert_eq!(size, usize::from(body));
    }

    #[test]
    fn page_size_is_at_least_one() {
        assert_eq!(table_page_size(Rect::new(0, 0, 10, 3)), 1);
    }

    #[test]
    fn initial_screen_shows_hints_and_placeholder() {
        let screen = render(&AppState::new(250), 160, 20);
        assert!(screen.contains(KEY_HINTS));
        assert!(screen.contains("Query"));
        assert!(screen.contains("Authors"));
    }

    #[test]
    fn status_message_is_rendered() {
        let mut state = AppState::new(250);
        state.set_error("Type a query before searching");
        let screen = render(&state, 160, 20);
        assert!(screen.contains("Type a query before searching"));
    }
}
