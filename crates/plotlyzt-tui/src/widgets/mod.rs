mod about;
mod contact;
mod features;
mod flow;
mod help;
mod hero;
mod navbar;
mod page;
mod splash;
mod status_bar;
mod use_cases;

pub use help::HelpWidget;
pub use navbar::NavbarWidget;
pub use page::PageWidget;
pub use splash::SplashWidget;
pub use status_bar::StatusBarWidget;

use ratatui::text::Line;
use unicode_width::UnicodeWidthStr;

/// Prepend blank rows so `content` sits vertically centred in `rows`
pub(crate) fn center_vertically(content: Vec<Line<'static>>, rows: usize) -> Vec<Line<'static>> {
    let pad = rows.saturating_sub(content.len()) / 2;
    let mut lines = vec![Line::default(); pad];
    lines.extend(content);
    lines
}

/// Pad or truncate `text` to exactly `width` display columns
pub(crate) fn fit_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

/// Centre `text` in `width` columns
pub(crate) fn center_text(text: &str, width: usize) -> String {
    let len = text.width().min(width);
    let left = (width - len) / 2;
    fit_width(&format!("{}{}", " ".repeat(left), text), width)
}

/// Greedy word wrap at `width` columns
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.width() + 1 + word.width() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Plot a trace into `height` text rows. `sample(col)` returns the height
/// of the trace at that column in `[0, 1]` (0 is the top row), or `None`
/// to leave the column empty.
pub(crate) fn plot_trace(
    width: usize,
    height: usize,
    sample: impl Fn(usize) -> Option<f64>,
) -> Vec<String> {
    let mut grid = vec![vec![' '; width]; height];
    if height == 0 {
        return Vec::new();
    }
    let mut prev: Option<usize> = None;
    for col in 0..width {
        let Some(y) = sample(col) else {
            prev = None;
            continue;
        };
        let row = (y.clamp(0.0, 1.0) * (height - 1) as f64).round() as usize;
        // Join steep segments with a vertical run
        if let Some(p) = prev {
            let (lo, hi) = if p < row { (p, row) } else { (row, p) };
            for r in lo..=hi {
                grid[r][col] = '│';
            }
        }
        grid[row][col] = '•';
        prev = Some(row);
    }
    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_width_pads_and_truncates() {
        assert_eq!(fit_width("abc", 5), "abc  ");
        assert_eq!(fit_width("abcdef", 4), "abcd");
    }

    #[test]
    fn test_center_text() {
        assert_eq!(center_text("ab", 6), "  ab  ");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert!(wrap("", 10).is_empty());
    }

    #[test]
    fn test_plot_flat_trace() {
        let rows = plot_trace(4, 3, |_| Some(0.5));
        assert_eq!(rows, vec!["    ", "••••", "    "]);
    }

    #[test]
    fn test_plot_leaves_missing_columns_blank() {
        let rows = plot_trace(3, 1, |col| (col < 2).then_some(0.0));
        assert_eq!(rows, vec!["•• "]);
    }
}
