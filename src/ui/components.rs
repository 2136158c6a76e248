//! Shared UI components (status bar, banner, help modal, layout helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::users::{BannerKind, ListPhase};
use crate::app::{AppState, InputMode};

/// Render the bottom status bar with mode, list phase and paging hints.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let list = &app.users;
    let state = match &list.phase {
        ListPhase::Idle => "idle",
        ListPhase::Loading => "loading...",
        ListPhase::Loaded => "ready",
        ListPhase::Mutating => "saving...",
        ListPhase::ErrorShown(_) => "error (r: retry)",
    };
    let prev = if list.can_go_prev() { "← prev" } else { "" };
    let next = if list.can_go_next() { "next →" } else { "" };
    let msg = format!("mode: {mode}  state: {state}  page: {}  {prev}  {next}", list.page);
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Render the transient success/failure banner across the top of `area`.
pub fn render_banner(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(banner) = &app.users.banner else {
        return;
    };
    let (icon, color) = match banner.kind {
        BannerKind::Success => ("✔", app.theme.success),
        BannerKind::Failure => ("✖", app.theme.error),
    };
    let text = format!("{icon} {}   (Esc: OK)", banner.text);
    let width = (text.chars().count() as u16 + 4).min(area.width);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + 1,
        width,
        height: 3.min(area.height),
    };
    let p = Paragraph::new(text)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the help modal from the live keymap.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 70u16.min(area.width.saturating_sub(4)).max(40);
    let height = 22u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let entries = [
        ("Move up", KeyAction::MoveUp),
        ("Move down", KeyAction::MoveDown),
        ("Previous page", KeyAction::PrevPage),
        ("Next page", KeyAction::NextPage),
        ("Search", KeyAction::StartSearch),
        ("Edit user", KeyAction::EditSelection),
        ("Delete user", KeyAction::DeleteSelection),
        ("Reload page", KeyAction::Reload),
        ("Dismiss banner", KeyAction::DismissBanner),
        ("Logout", KeyAction::Logout),
        ("Help", KeyAction::OpenHelp),
        ("Quit", KeyAction::Quit),
    ];

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled("User list", Style::default().add_modifier(Modifier::BOLD))),
        Line::raw(""),
    ];
    for (label, action) in entries {
        let keys = app.keymap.keys_for(action).join(", ");
        lines.push(Line::from(vec![
            Span::raw(format!("  {label:>16} │ ")),
            Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Search / edit", Style::default().add_modifier(Modifier::BOLD))));
    lines.push(Line::raw("  Type to filter by name or email; Enter keeps it, Esc clears it."));
    lines.push(Line::raw("  In the edit form: Tab/Up/Down switch field, Enter saves, Esc cancels."));
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("Close help: "),
        Span::styled("Esc / Enter", Style::default().add_modifier(Modifier::ITALIC)),
    ]));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
