//! Query box widget.

use crate::state::QueryInput;
use crate::view::constants::QUERY_PLACEHOLDER;
use crate::view::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

/// Renders the query with a block cursor, scrolled so the cursor stays
/// visible when the text is wider than the box. The top border carries a
/// `count/limit` length counter on the right.
pub struct QueryInputView<'a> {
    input: &'a QueryInput,
    theme: &'a Theme,
    title: &'a str,
}

impl<'a> QueryInputView<'a> {
    /// View of `input` inside a bordered box titled `title`.
    pub fn new(input: &'a QueryInput, theme: &'a Theme, title: &'a str) -> Self {
        Self {
            input,
            theme,
            title,
        }
    }
}

/// First char index to draw so that chars `start..cursor` plus the cursor
/// cell fit in `width` columns.
pub fn scroll_start(chars: &[char], cursor: usize, width: u16) -> usize {
    let budget = usize::from(width).saturating_sub(1);
    let mut used = 0;
    let mut start = cursor.min(chars.len());
    while start > 0 {
        let w = chars[start - 1].width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        start -= 1;
    }
    start
}

impl Widget for QueryInputView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border)
            .title(self.title)
            .title_top(
                Line::from(format!(
                    "{}/{}",
                    self.input.char_count(),
                    self.input.char_limit()
                ))
                .right_aligned(),
            );
        let inner_width = block.inner(area).width;

        let line = if self.input.is_empty() {
            Line::from(vec![
                Span::styled(" ", self.theme.cursor),
                Span::styled(QUERY_PLACEHOLDER, self.theme.placeholder),
            ])
        } else {
            let chars: Vec<char> = self.input.text().chars().collect();
            let cursor = self.input.cursor().min(chars.len());
            let start = scroll_start(&chars, cursor, inner_width);

            let before: String = chars[start..cursor].iter().collect();
            let under = chars
                .get(cursor)
                .map(|c| c.to_string())
                .unwrap_or_else(|| " ".to_string());
            let after: String = chars.iter().skip(cursor + 1).collect();

            Line::from(vec![
                Span::raw(before),
                Span::styled(under, self.theme.cursor),
                Span::raw(after),
            ])
        };

        Paragraph::new(line).block(block).render(area, buf);
    }
}
