//! Text rendering of the editor state.

use std::fmt::Write;

use envpad::{EditorState, EnvironmentVariable};

use super::terminal::{Colorize, terminal_width};

const MAX_KEY_WIDTH: usize = 32;

/// Renders the row table followed by the error and status banners.
pub fn render(state: &EditorState) -> String {
    render_with_width(state, terminal_width().map(usize::from))
}

fn render_with_width(state: &EditorState, width: Option<usize>) -> String {
    let rows = state.variables();
    let index_width = rows.len().max(1).to_string().len();
    let key_width = rows
        .iter()
        .map(|row| row.key.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(3, MAX_KEY_WIDTH);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!("{:>index_width$}  {:<key_width$}  VALUE", "#", "KEY").dim()
    );

    for (index, row) in rows.iter().enumerate() {
        let number = format!("{:>index_width$}", index + 1);
        let key = fit(&row.key, key_width);
        let padded_key = format!("{key:<key_width$}");
        let used = index_width + key_width + 4;
        let value = width.map_or_else(
            || row.value.clone(),
            |w| fit(&row.value, w.saturating_sub(used).max(8)),
        );

        let _ = write!(out, "{}  ", number.dim());
        if is_blank(row) {
            let _ = write!(out, "{}", padded_key.dim());
        } else {
            let _ = write!(out, "{padded_key}  {value}");
        }
        if let Some(error) = state.row_error(row.id) {
            let _ = write!(out, "  {}", format!("! {error}").error());
        }
        out.push('\n');
    }

    if let Some(error) = state.error() {
        out.push('\n');
        for line in error.lines() {
            let _ = writeln!(out, "{}", line.warning());
        }
    }
    if let Some(status) = state.status() {
        out.push('\n');
        let _ = writeln!(out, "{}", status.success());
    }

    out
}

fn is_blank(row: &EnvironmentVariable) -> bool {
    row.key.is_empty() && row.value.is_empty()
}

/// Shortens `text` to at most `width` characters, marking the cut with `…`.
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(width.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}

#[cfg(test)]
mod tests {
    use envpad::{Config, Editor};

    use super::*;

    #[test]
    fn lists_rows_and_banners() {
        let mut editor = Editor::new(Config::default());
        editor.set_raw_text("FOO=bar\noops".to_string());
        let id = editor.state().variables()[1].id;
        editor.change_key(id, "BAD KEY".to_string()).unwrap();

        let output = render_with_width(editor.state(), None);
        let lines: Vec<_> = output.lines().collect();

        assert!(lines[0].contains("KEY") && lines[0].contains("VALUE"));
        assert!(lines[1].starts_with(" 1  FOO"));
        assert!(lines[1].ends_with("bar"));
        assert!(lines[2].contains("BAD KEY"));
        assert!(lines[2].contains("! Only letters, digits, and underscore allowed."));
        assert_eq!(lines.iter().filter(|l| l.contains("Warning: Line 2")).count(), 1);
    }

    #[test]
    fn long_values_are_shortened() {
        let mut editor = Editor::new(Config::default());
        editor.set_raw_text(format!("K={}", "x".repeat(200)));

        let output = render_with_width(editor.state(), Some(40));
        let first_row = output.lines().nth(1).unwrap();
        assert!(first_row.ends_with('…'));
        assert!(first_row.chars().count() <= 40);
    }

    #[test]
    fn fit_keeps_short_text() {
        assert_eq!(fit("abc", 3), "abc");
        assert_eq!(fit("abcd", 3), "ab…");
    }
}
