//! Contribution calendar rendering.
//!
//! Produces styled text rather than drawing into a frame so the layout can
//! size its row from the text height.

use gittui_core::contrib::{ContributionGrid, IntensityLevel, CELL_WIDTH, WEEKS};
use gittui_core::format::truncate;
use gittui_core::{Contribution, Theme};
use ratatui::{
    style::{Style, Stylize},
    text::{Line, Span, Text},
};

use super::color;

/// Width of the weekday label gutter.
pub const DAY_LABEL_WIDTH: usize = 4;
/// Narrowest terminal that fits the full grid.
pub const MIN_WIDTH: usize = DAY_LABEL_WIDTH + WEEKS * CELL_WIDTH;

const TITLE: &str = "Contribution Activity";
const CELL_GLYPH: &str = "▄";
/// Sunday first; only Mon/Wed/Fri are labeled.
const DAY_LABELS: [&str; 7] = ["", "Mon", "", "Wed", "", "Fri", ""];

const FULL_WARNING: &str = "Increase terminal width to view contribution grid";
const SHORT_WARNING: &str = "Increase width for graph";
const TINY_WARNING: &str = "Terminal too narrow";
/// Narrowest box content that still gets the short warning.
const SHORT_WARNING_MIN: usize = 30;

/// Horizontal padding inside the warning box, per side.
const BOX_PAD_X: usize = 2;

/// Render the calendar for a terminal `width` columns wide.
///
/// Narrower than [`MIN_WIDTH`] gives a centered warning box instead.
pub fn render_calendar(contributions: &[Contribution], width: u16, theme: &Theme) -> Text<'static> {
    if usize::from(width) < MIN_WIDTH {
        return warning_box(width, theme);
    }

    let grid = ContributionGrid::build(contributions);
    let label_style = Style::default().fg(color(theme.gray));
    let gutter = " ".repeat(DAY_LABEL_WIDTH);

    let mut lines = Vec::with_capacity(4 + DAY_LABELS.len());
    lines.push(Line::from(Span::styled(
        TITLE,
        Style::default().fg(color(theme.blue)).bold(),
    )));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        format!("{}{}", gutter, grid.month_labels()),
        label_style,
    )));

    for (day, label) in DAY_LABELS.iter().enumerate() {
        let mut spans = Vec::with_capacity(WEEKS + 1);
        spans.push(Span::styled(
            format!("{:<width$}", label, width = DAY_LABEL_WIDTH),
            label_style,
        ));
        for week in 0..WEEKS {
            spans.push(cell(theme, grid.level(day, week)));
        }
        lines.push(Line::from(spans));
    }

    let mut legend = vec![Span::raw(gutter), Span::styled("Less ", label_style)];
    legend.extend(IntensityLevel::ALL.iter().map(|&level| cell(theme, level)));
    legend.push(Span::styled("More", label_style));
    lines.push(Line::from(legend));

    Text::from(lines)
}

fn cell(theme: &Theme, level: IntensityLevel) -> Span<'static> {
    Span::styled(
        format!("{} ", CELL_GLYPH),
        Style::default().fg(color(theme.level_color(level))),
    )
}

/// Message and optional detail for a terminal too narrow for the grid.
///
/// The box content area is `width - 4`. The detail line is only shown
/// alongside the full message.
pub fn width_warning(width: u16) -> (&'static str, Option<String>) {
    let content = usize::from(width).saturating_sub(4);
    if content >= FULL_WARNING.len() {
        (
            FULL_WARNING,
            Some(format!("Need {} columns, have {}", MIN_WIDTH, width)),
        )
    } else if content >= SHORT_WARNING_MIN {
        (SHORT_WARNING, None)
    } else {
        (TINY_WARNING, None)
    }
}

/// Rounded box holding the width warning, centered in `width` columns.
fn warning_box(width: u16, theme: &Theme) -> Text<'static> {
    let (message, detail) = width_warning(width);
    let width = usize::from(width);

    // Border plus padding on both sides
    let max_text = width.saturating_sub(2 + 2 * BOX_PAD_X);
    let message = truncate(message, max_text);
    let detail = detail.map(|d| truncate(&d, max_text));

    let text_width = message
        .chars()
        .count()
        .max(detail.as_ref().map_or(0, |d| d.chars().count()));
    let inner = text_width + 2 * BOX_PAD_X;
    let margin = " ".repeat(width.saturating_sub(inner + 2) / 2);

    let border = Style::default().fg(color(theme.blue));
    let edge = |left: &str, fill: &str, right: &str| {
        Line::from(vec![
            Span::raw(margin.clone()),
            Span::styled(format!("{}{}{}", left, fill.repeat(inner), right), border),
        ])
    };
    let row = |text: String, style: Style| {
        let len = text.chars().count();
        let left = BOX_PAD_X + (text_width - len) / 2;
        let right = inner - left - len;
        Line::from(vec![
            Span::raw(margin.clone()),
            Span::styled("│", border),
            Span::raw(" ".repeat(left)),
            Span::styled(text, style),
            Span::raw(" ".repeat(right)),
            Span::styled("│", border),
        ])
    };

    let mut lines = vec![edge("╭", "─", "╮"), edge("│", " ", "│")];
    lines.push(row(message, Style::default().fg(color(theme.gray)).bold()));
    if let Some(detail) = detail {
        lines.push(edge("│", " ", "│"));
        lines.push(row(detail, Style::default().fg(color(theme.subtle))));
    }
    lines.push(edge("│", " ", "│"));
    lines.push(edge("╰", "─", "╯"));

    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn contents(text: &Text) -> String {
        text.lines.iter().map(plain).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_min_width() {
        assert_eq!(MIN_WIDTH, 108);
    }

    #[test]
    fn test_width_warning_tiers() {
        let (message, detail) = width_warning(80);
        assert_eq!(message, FULL_WARNING);
        assert_eq!(detail.as_deref(), Some("Need 108 columns, have 80"));

        // 49 content columns is exactly the full message
        assert_eq!(width_warning(53).0, FULL_WARNING);
        assert_eq!(width_warning(52), (SHORT_WARNING, None));
        assert_eq!(width_warning(34), (SHORT_WARNING, None));
        assert_eq!(width_warning(33), (TINY_WARNING, None));
        assert_eq!(width_warning(0), (TINY_WARNING, None));
    }

    #[test]
    fn test_narrow_terminal_shows_warning_box() {
        let theme = Theme::github_dark();
        let text = render_calendar(&[], 80, theme);
        let rendered = contents(&text);

        assert!(rendered.contains(FULL_WARNING));
        assert!(rendered.contains("Need 108 columns, have 80"));
        assert!(!rendered.contains(TITLE));
        assert!(plain(&text.lines[0]).trim_start().starts_with('╭'));
        assert!(plain(text.lines.last().unwrap()).trim_start().starts_with('╰'));
    }

    #[test]
    fn test_warning_box_spaces_message_and_detail() {
        let theme = Theme::github_dark();
        let text = render_calendar(&[], 80, theme);
        let rows: Vec<String> = text.lines.iter().map(plain).collect();

        // Top, padding, message, spacer, detail, padding, bottom
        assert_eq!(rows.len(), 7);
        assert!(rows[2].contains(FULL_WARNING));
        assert_eq!(rows[3].trim(), rows[1].trim());
        assert!(rows[3].trim_matches(|c| c == ' ' || c == '│').is_empty());
        assert!(rows[4].contains("Need 108 columns, have 80"));

        // Without a detail there is no spacer
        let text = render_calendar(&[], 40, theme);
        assert_eq!(text.lines.len(), 5);
    }

    #[test]
    fn test_warning_box_never_overflows() {
        let theme = Theme::github_dark();
        for width in [107u16, 80, 52, 40, 30, 12, 3] {
            let text = render_calendar(&[], width, theme);
            for line in &text.lines {
                assert!(
                    line.width() <= usize::from(width.max(6)),
                    "width {}: {:?} is {} wide",
                    width,
                    plain(line),
                    line.width()
                );
            }
        }
        assert!(contents(&render_calendar(&[], 40, theme)).contains(SHORT_WARNING));
        assert!(contents(&render_calendar(&[], 30, theme)).contains(TINY_WARNING));
    }

    #[test]
    fn test_full_calendar_layout() {
        let theme = Theme::github_dark();
        let contributions = vec![Contribution::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            3,
        )];
        let text = render_calendar(&contributions, 108, theme);

        // Title, blank, months, 7 days, legend
        assert_eq!(text.lines.len(), 11);
        assert_eq!(plain(&text.lines[0]), TITLE);
        // Dec 31 and Jan 7 stamps overlap
        assert!(plain(&text.lines[2]).starts_with("    DeJan"));

        for (i, label) in DAY_LABELS.iter().enumerate() {
            let row = &text.lines[3 + i];
            assert_eq!(row.width(), MIN_WIDTH);
            assert_eq!(plain(row).get(..4).unwrap().trim_end(), *label);
        }

        let legend = plain(&text.lines[10]);
        assert!(legend.starts_with("    Less "));
        assert!(legend.ends_with("More"));
        assert_eq!(legend.matches(CELL_GLYPH).count(), 5);
    }

    #[test]
    fn test_cells_use_level_colors() {
        let theme = Theme::github_dark();
        // 2023-12-31 is a Sunday, so it anchors the grid
        let contributions = vec![
            Contribution::new(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(), 12),
            Contribution::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 2),
        ];
        let text = render_calendar(&contributions, 120, theme);

        let sunday = &text.lines[3];
        let monday = &text.lines[4];
        assert_eq!(
            sunday.spans[1].style.fg,
            Some(color(theme.level_color(IntensityLevel::Highest)))
        );
        assert_eq!(
            monday.spans[1].style.fg,
            Some(color(theme.level_color(IntensityLevel::Low)))
        );
        assert_eq!(
            monday.spans[2].style.fg,
            Some(color(theme.level_color(IntensityLevel::None)))
        );
    }
}
