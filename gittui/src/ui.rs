//! UI rendering for the TUI.

mod calendar;

use chrono::Utc;
use gittui_core::format::{format_count, format_relative_time_at, truncate};
use gittui_core::{PullRequest, PullRequestStatus, Rgb, Theme};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
    Frame,
};

use crate::app::App;

/// Rows inside each stats panel.
const STATS_ROWS: u16 = 5;
/// Entries listed in the language and repository panels.
const PANEL_ENTRIES: usize = 3;
/// Width of a language share bar.
const BAR_WIDTH: usize = 10;
/// Pull requests listed in their panel.
const PULL_REQUEST_ENTRIES: usize = 5;

/// Convert a theme color for ratatui.
fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let theme = app.theme();
    let area = frame.area();

    // Paint the theme background under everything
    frame.render_widget(
        Block::default().style(
            Style::default()
                .bg(color(theme.background))
                .fg(color(theme.foreground)),
        ),
        area,
    );

    if let Some(error) = &app.error {
        render_error(frame, error, theme, area);
    } else if app.loading.is_loading() {
        render_loading(frame, app, theme, area);
    } else {
        render_dashboard(frame, app, theme, area);
    }
}

fn render_loading(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let message = format!("Loading {}...", app.loading.pending_labels().join(", "));
    let lines = vec![
        Line::from(Span::styled(message, Style::default().fg(color(theme.blue)).bold())),
        Line::raw(""),
        Line::from(Span::styled("q: quit", Style::default().fg(color(theme.subtle)))),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        centered_rows(area, 3),
    );
}

fn render_error(frame: &mut Frame, error: &str, theme: &Theme, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(color(theme.red)).bold(),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "r: retry | q: quit",
            Style::default().fg(color(theme.subtle)),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        centered_rows(area, 3),
    );
}

/// A band of `height` rows in the vertical middle of `area`.
fn centered_rows(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    }
}

fn render_dashboard(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let header = header_lines(app, theme);
    let calendar = calendar::render_calendar(&app.contributions, area.width, theme);

    let chunks = Layout::vertical([
        Constraint::Length(header.len() as u16 + 1), // Header + rule
        Constraint::Length(calendar.height() as u16 + 1), // Calendar + spacing
        Constraint::Length(STATS_ROWS + 2),          // Stats panels
        Constraint::Min(3),                          // Pull requests + activity
        Constraint::Length(1),                       // Status bar
    ])
    .split(area);

    let header_block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(color(theme.subtle)));
    frame.render_widget(Paragraph::new(header).block(header_block), chunks[0]);

    frame.render_widget(
        Paragraph::new(calendar).block(Block::default().padding(Padding::top(1))),
        chunks[1],
    );

    render_stats_row(frame, app, theme, chunks[2]);

    let columns = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);
    render_pull_requests(frame, app, theme, columns[0]);
    render_activity(frame, app, theme, columns[1]);

    render_status_bar(frame, app, theme, chunks[4]);
}

fn header_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    let label = Style::default().fg(color(theme.gray));
    let value = Style::default().fg(color(theme.green)).bold();

    let Some(profile) = &app.profile else {
        let login = app.login.clone().unwrap_or_default();
        return vec![Line::from(Span::styled(
            format!("@{}", login),
            Style::default().fg(color(theme.blue)).bold(),
        ))];
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            profile.display_name().to_string(),
            Style::default().fg(color(theme.blue)).bold(),
        ),
        Span::styled(format!("  @{}", profile.login), label),
    ])];

    if let Some(bio) = profile.bio.as_deref().filter(|b| !b.trim().is_empty()) {
        lines.push(Line::from(Span::styled(
            bio.trim().to_string(),
            Style::default().fg(color(theme.foreground)),
        )));
    }

    let mut place = Vec::new();
    if let Some(location) = &profile.location {
        place.push(Span::styled("Location ", label));
        place.push(Span::styled(
            format!("{}  ", location),
            Style::default().fg(color(theme.foreground)),
        ));
    }
    if let Some(company) = &profile.company {
        place.push(Span::styled("Company ", label));
        place.push(Span::styled(
            company.clone(),
            Style::default().fg(color(theme.foreground)),
        ));
    }
    if !place.is_empty() {
        lines.push(Line::from(place));
    }

    lines.push(Line::from(vec![
        Span::styled("Repos ", label),
        Span::styled(format_count(profile.repo_count()), value),
        Span::styled("  Gists ", label),
        Span::styled(format_count(profile.public_gists), value),
        Span::styled("  Followers ", label),
        Span::styled(format_count(profile.followers), value),
        Span::styled("  Following ", label),
        Span::styled(format_count(profile.following), value),
        Span::styled(
            format!("  {}", profile.member_since()),
            Style::default().fg(color(theme.subtle)),
        ),
    ]));

    lines
}

/// Rounded panel with a themed title.
fn panel(title: &str, theme: &Theme) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(color(theme.blue)).bold(),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color(theme.subtle)))
}

fn render_stats_row(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    // Panels line up under the calendar rather than stretching past it
    let area = Rect {
        width: area.width.min(calendar::MIN_WIDTH as u16),
        ..area
    };
    let columns = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(language_lines(app, theme)).block(panel("Top Languages", theme)),
        columns[0],
    );
    frame.render_widget(
        Paragraph::new(contribution_lines(app, theme)).block(panel("Contribution Stats", theme)),
        columns[1],
    );
    let name_width = columns[2].width.saturating_sub(14) as usize;
    frame.render_widget(
        Paragraph::new(repository_lines(app, theme, name_width))
            .block(panel("Top Repositories", theme)),
        columns[2],
    );
}

fn language_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    if app.languages.is_empty() {
        return vec![Line::from(Span::styled(
            "No language data",
            Style::default().fg(color(theme.subtle)),
        ))];
    }

    app.languages
        .iter()
        .take(PANEL_ENTRIES)
        .map(|language| {
            let filled = ((language.percentage * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
            Line::from(vec![
                Span::styled(
                    format!("{:<12}", truncate(&language.name, 11)),
                    Style::default().fg(color(language.color)),
                ),
                Span::styled("█".repeat(filled), Style::default().fg(color(language.color))),
                Span::styled(
                    "░".repeat(BAR_WIDTH - filled),
                    Style::default().fg(color(theme.subtle)),
                ),
                Span::styled(
                    format!(" {:.1}%", language.percentage * 100.0),
                    Style::default().fg(color(theme.gray)),
                ),
            ])
        })
        .collect()
}

fn contribution_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    let label = Style::default().fg(color(theme.gray));
    let value = Style::default().fg(color(theme.green)).bold();
    let stat = |name: String, shown: String| {
        Line::from(vec![
            Span::styled(format!("{}: ", name), label),
            Span::styled(shown, value),
        ])
    };

    let mut lines = if app.contributions.is_empty() {
        vec![Line::from(Span::styled(
            "No contribution data",
            Style::default().fg(color(theme.subtle)),
        ))]
    } else {
        vec![
            stat("Total Contributions".to_string(), app.stats.total.to_string()),
            stat(
                "Current Streak".to_string(),
                format!("{} days", app.streaks.current),
            ),
            stat(
                "Longest Streak".to_string(),
                format!("{} days", app.streaks.longest),
            ),
        ]
    };

    lines.push(stat(
        app.granularity.label().to_string(),
        format!("{:.2}", app.push_rate()),
    ));
    lines.push(stat(
        format!("Peak Hour ({})", app.window.display_name()),
        app.peak_hour().label,
    ));
    lines
}

fn repository_lines(app: &App, theme: &Theme, name_width: usize) -> Vec<Line<'static>> {
    if app.top_repos.is_empty() {
        return vec![Line::from(Span::styled(
            "No repositories",
            Style::default().fg(color(theme.subtle)),
        ))];
    }

    app.top_repos
        .iter()
        .take(PANEL_ENTRIES)
        .map(|repo| {
            let mut spans = vec![
                Span::styled(
                    format!("★ {:<5} ", format_count(repo.stars)),
                    Style::default().fg(color(theme.yellow)),
                ),
                Span::styled(
                    truncate(&repo.name, name_width),
                    Style::default().fg(color(theme.foreground)).bold(),
                ),
            ];
            if let Some(language) = &repo.language {
                spans.push(Span::styled(
                    format!(" {}", language),
                    Style::default().fg(color(theme.subtle)),
                ));
            }
            Line::from(spans)
        })
        .collect()
}

fn render_pull_requests(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let block = panel(&pull_request_title(&app.pull_requests), theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Icon and space ahead of the title
    let title_width = inner.width.saturating_sub(2) as usize;
    frame.render_widget(
        Paragraph::new(pull_request_lines(&app.pull_requests, theme, title_width)),
        inner,
    );
}

/// Panel title; the list holds either open or recently closed PRs.
fn pull_request_title(pull_requests: &[PullRequest]) -> String {
    match pull_requests.first() {
        Some(first) if first.is_open() => {
            format!("Pull Requests ({} open)", pull_requests.len())
        }
        Some(_) => "Pull Requests (recent closed)".to_string(),
        None => "Pull Requests".to_string(),
    }
}

fn status_color(status: PullRequestStatus, theme: &Theme) -> Rgb {
    match status {
        PullRequestStatus::Merged => theme.purple,
        PullRequestStatus::Closed | PullRequestStatus::ChangesRequested => theme.red,
        PullRequestStatus::Draft => theme.dark,
        PullRequestStatus::Approved => theme.green,
        PullRequestStatus::ReviewRequired => theme.yellow,
        PullRequestStatus::NoReviews => theme.gray,
    }
}

/// Two lines per pull request, separated by a blank line.
fn pull_request_lines(
    pull_requests: &[PullRequest],
    theme: &Theme,
    title_width: usize,
) -> Vec<Line<'static>> {
    if pull_requests.is_empty() {
        return vec![Line::from(Span::styled(
            "No pull requests",
            Style::default().fg(color(theme.gray)),
        ))];
    }

    let label = Style::default().fg(color(theme.gray));
    let mut lines = Vec::new();

    for (i, pr) in pull_requests.iter().take(PULL_REQUEST_ENTRIES).enumerate() {
        if i > 0 {
            lines.push(Line::raw(""));
        }

        let status = pr.status();
        let status_style = Style::default().fg(color(status_color(status, theme)));
        lines.push(Line::from(vec![
            Span::styled(status.icon(), status_style),
            Span::raw(" "),
            Span::styled(
                truncate(&pr.title, title_width),
                Style::default().fg(color(theme.foreground)),
            ),
        ]));

        let mut details = vec![Span::raw("  "), Span::styled(pr.repository.clone(), label)];
        if pr.approved_count > 0 {
            details.push(Span::styled(
                format!("  ✓ {} approved", pr.approved_count),
                Style::default().fg(color(theme.green)),
            ));
        }
        if pr.changes_count > 0 {
            details.push(Span::styled(
                format!("  ⚠ {} changes", pr.changes_count),
                status_style,
            ));
        }
        if pr.approved_count == 0 && pr.changes_count == 0 && pr.comment_count > 0 {
            details.push(Span::styled(
                format!("  💬 {} comments", pr.comment_count),
                label,
            ));
        }
        if pr.awaiting_review() {
            details.push(Span::styled(
                "  ⏳ awaiting review",
                Style::default().fg(color(theme.subtle)),
            ));
        }
        lines.push(Line::from(details));
    }

    lines
}

fn render_activity(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let block = panel("Recent Activity", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.events.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No recent activity",
                Style::default().fg(color(theme.subtle)),
            )),
            inner,
        );
        return;
    }

    let now = Utc::now();
    let lines: Vec<Line> = app
        .events
        .iter()
        .skip(app.activity_scroll)
        .take(inner.height as usize)
        .map(|event| {
            let mut spans = vec![
                Span::styled(
                    format!("{:>9}  ", format_relative_time_at(&event.timestamp, now)),
                    Style::default().fg(color(theme.subtle)),
                ),
                Span::styled(
                    format!("{} ", event.action),
                    Style::default().fg(color(theme.foreground)),
                ),
                Span::styled(
                    event.repository.clone(),
                    Style::default().fg(color(theme.blue)),
                ),
            ];
            if !event.is_public {
                spans.push(Span::styled(
                    " [private]",
                    Style::default().fg(color(theme.yellow)),
                ));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_status_bar(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let key = Style::default()
        .fg(color(theme.blue))
        .bg(color(theme.subtle))
        .bold();
    let text = Style::default().fg(color(theme.foreground));
    let value = Style::default().fg(color(theme.green)).bold();
    let separator = Span::styled(" | ", Style::default().fg(color(theme.gray)));

    let mut items: Vec<Vec<Span>> = vec![
        vec![Span::styled("q", key), Span::styled(": quit", text)],
        vec![Span::styled("r", key), Span::styled(": refresh", text)],
        vec![
            Span::styled("g", key),
            Span::styled(": push stats ", text),
            Span::styled(format!("[{}]", app.granularity.label()), value),
        ],
        vec![
            Span::styled("w", key),
            Span::styled(": window ", text),
            Span::styled(format!("[{}]", app.window.display_name()), value),
        ],
        vec![
            Span::styled("t", key),
            Span::styled(": theme ", text),
            Span::styled(format!("[{}]", app.theme().name), value),
            Span::styled(format!(" ({} available)", app.themes.len()), text),
        ],
    ];
    if app.is_own_profile {
        let view = if app.public_only { "PUBLIC" } else { "ALL" };
        items.push(vec![
            Span::styled("p", key),
            Span::styled(": toggle view ", text),
            Span::styled(format!("[{}]", view), value),
        ]);
    }
    items.push(vec![
        Span::styled("↑↓", key),
        Span::styled(": scroll activity", text),
    ]);

    let mut spans = vec![Span::raw(" ")];
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            spans.push(separator.clone());
        }
        spans.extend(item);
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
