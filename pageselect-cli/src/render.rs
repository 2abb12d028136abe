//! Plain-text rendering of the table read model.

use std::fmt::Write;

use pageselect_lib::TableView;

const CELL_WIDTH: usize = 24;
const ID_WIDTH: usize = 8;

/// Renders the current page as a text table with checkbox and id columns.
pub fn render(view: &TableView<'_>, columns: &[String]) -> String {
    let mut out = String::new();

    let _ = write!(
        out,
        "Page {}/{} | {} items | {} selected",
        view.page,
        view.page_count,
        view.total_count,
        view.selected_total()
    );
    if view.carry_over() > 0 {
        let _ = write!(out, " | {} more on later pages", view.carry_over());
    }
    if view.is_loading {
        out.push_str(" | loading...");
    }
    out.push('\n');

    let _ = write!(out, "    {:<ID_WIDTH$}", "id");
    for column in columns {
        let _ = write!(out, " | {:<CELL_WIDTH$}", truncate(column, CELL_WIDTH));
    }
    out.push('\n');

    for item in view.items {
        let mark = if view.is_selected(&item.id) { "[x]" } else { "[ ]" };
        let id = truncate(&item.id.to_string(), ID_WIDTH);
        let _ = write!(out, "{} {:<ID_WIDTH$}", mark, id);
        for column in columns {
            let cell = item.field(column).replace(['\n', '\r'], " ");
            let _ = write!(out, " | {:<CELL_WIDTH$}", truncate(&cell, CELL_WIDTH));
        }
        out.push('\n');
    }

    if view.items.is_empty() && !view.is_loading {
        out.push_str("(no rows)\n");
    }

    if let Some(err) = view.last_error {
        let hint = if err.is_retryable() { " (try again)" } else { "" };
        let _ = writeln!(out, "error: {}{}", err, hint);
    }

    out
}

/// Cuts `text` to `width` characters, marking the cut with an ellipsis.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
