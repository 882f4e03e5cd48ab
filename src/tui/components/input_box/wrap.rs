//! Row layout for the draft text.
//!
//! The draft is hard-wrapped by display width (no word breaking) so every
//! byte offset maps to exactly one (row, column) on screen. Rendering and
//! cursor placement both go through `layout_rows`, which keeps them in step.

use unicode_width::UnicodeWidthChar;

/// Borders (2) + horizontal padding (2)
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Rows shown before the box starts scrolling internally
pub(super) const MAX_VISIBLE_ROWS: u16 = 5;

/// Byte range of one visual row. Never includes the `'\n'` that ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Row {
    pub start: usize,
    pub end: usize,
}

/// Text width available inside the box.
pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Split `text` into rows of at most `width` columns. Always returns at least one row.
pub(super) fn layout_rows(text: &str, width: u16) -> Vec<Row> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        let mut row_start = line_start;
        let mut row_width = 0;
        for (offset, c) in line.char_indices() {
            let w = char_width(c);
            if row_width + w > width && row_width > 0 {
                rows.push(Row {
                    start: row_start,
                    end: line_start + offset,
                });
                row_start = line_start + offset;
                row_width = 0;
            }
            row_width += w;
        }
        let line_end = line_start + line.len();
        rows.push(Row {
            start: row_start,
            end: line_end,
        });
        // +1 skips the '\n' separator
        line_start = line_end + 1;
    }

    // A full last row leaves the end-of-text cursor nowhere to sit; give it a fresh row.
    if let Some(last) = rows.last().copied()
        && last.end > last.start
        && text[last.start..last.end].chars().map(char_width).sum::<usize>() >= width
    {
        rows.push(Row {
            start: last.end,
            end: last.end,
        });
    }

    rows
}

/// The (row, column) the cursor at byte offset `pos` is drawn at.
pub(super) fn cursor_row_col(text: &str, rows: &[Row], pos: usize) -> (usize, usize) {
    let row = rows.iter().rposition(|r| r.start <= pos).unwrap_or(0);
    let start = rows.get(row).map_or(0, |r| r.start);
    let end = pos.min(text.len()).max(start);
    let col = text[start..end].chars().map(char_width).sum();
    (row, col)
}

/// Byte offset in `row` closest to (not past) display column `col`.
pub(super) fn offset_at_column(text: &str, row: Row, col: usize) -> usize {
    let mut used = 0;
    for (offset, c) in text[row.start..row.end].char_indices() {
        let w = char_width(c);
        if used + w > col {
            return row.start + offset;
        }
        used += w;
    }
    row.end
}

/// Byte offset of the character boundary before `pos`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset of the character boundary after `pos`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}
