//! Result table widget.

use crate::model::Row as ResultRow;
use crate::state::ResultTable;
use crate::view::constants::{
    AUTHOR_COLUMN_WIDTH, FILE_TYPE_COLUMN_WIDTH, LINK_COLUMN_WIDTH, STATUS_COLUMN_WIDTH,
    TITLE_COLUMN_WIDTH,
};
use crate::view::Theme;
use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

const HEADERS: [&str; 5] = ["Authors", "Title", "Filetype", "Link", "Status"];

fn column_widths() -> [Constraint; 5] {
    [
        Constraint::Length(AUTHOR_COLUMN_WIDTH),
        Constraint::Length(TITLE_COLUMN_WIDTH),
        Constraint::Length(FILE_TYPE_COLUMN_WIDTH),
        Constraint::Length(LINK_COLUMN_WIDTH),
        Constraint::Length(STATUS_COLUMN_WIDTH),
    ]
}

fn table_row<'a>(row: &'a ResultRow, theme: &Theme) -> Row<'a> {
    let status = row.status();
    Row::new(vec![
        Cell::from(row.author()),
        Cell::from(row.title()),
        Cell::from(row.file_type()),
        Cell::from(row.link_label()),
        Cell::from(Span::styled(status.label(), theme.transfer_status(status))),
    ])
}

/// Render `table` into `area`.
///
/// `state` keeps the scroll offset between frames; its selection is synced
/// from the table cursor before drawing.
pub fn render_result_table(
    frame: &mut Frame,
    area: Rect,
    table: &ResultTable,
    theme: &Theme,
    state: &mut TableState,
) {
    state.select(table.selected());

    let header = Row::new(HEADERS.map(Cell::from))
        .style(theme.header)
        .bottom_margin(1);
    let rows = table.rows().iter().map(|row| table_row(row, theme));

    let widget = Table::new(rows, column_widths())
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border),
        )
        .row_highlight_style(theme.selected_row);

    frame.render_stateful_widget(widget, area, state);
}
