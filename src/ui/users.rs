use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use crate::app::edit::{EditField, EditPhase, MSG_EDIT_SAVED};
use crate::app::{AppState, ModalState};
use crate::ui::components::centered_rect;

pub fn render_users_table(f: &mut Frame, area: Rect, app: &AppState) {
    let list = &app.users;
    let title = match list.load_error() {
        Some(err) if !list.visible.is_empty() => format!("Users (page {})  {err} (r: retry)", list.page),
        _ => format!("Users (page {})", list.page),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if list.visible.is_empty() {
        let p = Paragraph::new(format!("\n{}", list.empty_message()))
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.text).add_modifier(Modifier::BOLD))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let rows_per_page = (area.height.saturating_sub(3) as usize).max(1);
    let start = (list.selected / rows_per_page) * rows_per_page;
    let end = (start + rows_per_page).min(list.visible.len());
    let slice = &list.visible[start..end];

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let style = if start + i == list.selected {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.to_string()),
            Cell::from(u.full_name()),
            Cell::from(u.email.clone()),
            Cell::from(u.avatar.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Length(24),
        Constraint::Percentage(40),
        Constraint::Percentage(60),
    ];
    let header = Row::new(vec!["ID", "NAME", "EMAIL", "AVATAR"]).style(
        Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_user_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    match state {
        ModalState::EditUser(form) => {
            let rect = centered_rect(60, 12, area);
            let mut lines: Vec<Line> = Vec::new();
            if let Some(err) = &form.error {
                lines.push(Line::from(Span::styled(err.clone(), Style::default().fg(app.theme.error))));
                lines.push(Line::raw(""));
            }
            match form.phase {
                EditPhase::Saved { .. } => {
                    lines.push(Line::from(Span::styled(
                        format!("✔ {MSG_EDIT_SAVED}"),
                        Style::default().fg(app.theme.success).add_modifier(Modifier::BOLD),
                    )));
                }
                EditPhase::Editing | EditPhase::Saving => {
                    for field in [EditField::FirstName, EditField::LastName, EditField::Email] {
                        let focused = field == form.focus && form.is_editable();
                        let marker = if focused { "▶ " } else { "  " };
                        lines.push(Line::from(vec![
                            Span::raw(marker),
                            Span::styled(
                                format!("{:<12}", field.label()),
                                Style::default().add_modifier(Modifier::BOLD),
                            ),
                            Span::raw(form.value(field).to_string()),
                        ]));
                    }
                    lines.push(Line::raw(""));
                    let footer = if form.phase == EditPhase::Saving {
                        "Updating..."
                    } else {
                        "Enter: update  Esc: cancel  Tab: next field"
                    };
                    lines.push(Line::from(Span::styled(
                        footer,
                        Style::default().add_modifier(Modifier::ITALIC),
                    )));
                }
            }
            let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
                Block::default()
                    .title("Edit User")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
            f.render_widget(Clear, rect);
            f.render_widget(p, rect);
        }
        ModalState::DeleteConfirm { user_id, name, selected } => {
            let rect = centered_rect(50, 7, area);
            let yes = if *selected == 0 { "[Yes]" } else { " Yes " };
            let no = if *selected == 1 { "[No]" } else { " No  " };
            let body = format!("Delete user '{name}' (id {user_id})?\n\n  {yes}    {no}");
            let p = Paragraph::new(body).block(
                Block::default()
                    .title("Confirm delete")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
            f.render_widget(Clear, rect);
            f.render_widget(p, rect);
        }
        ModalState::Help { .. } => { /* routed to components */ }
    }
}
