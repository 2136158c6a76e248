use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::AppState;
use crate::app::login::{LoginField, LoginPhase};
use crate::ui::components::centered_rect;

pub fn render_login(f: &mut Frame, area: Rect, app: &AppState) {
    let login = &app.login;
    let rect = centered_rect(60, 13, area);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled("Welcome Back!", bold.fg(app.theme.title))),
        Line::from(Span::styled(
            "Please login to continue",
            Style::default().fg(app.theme.muted),
        )),
        Line::raw(""),
    ];

    match &login.phase {
        LoginPhase::Submitting => {
            lines.push(Line::from(Span::styled("Logging in...", bold.fg(app.theme.title))));
        }
        LoginPhase::Success { .. } => {
            lines.push(Line::from(Span::styled("Login successful!", bold.fg(app.theme.success))));
            lines.push(Line::from(Span::styled(
                "Redirecting...",
                Style::default().fg(app.theme.muted),
            )));
        }
        LoginPhase::Form | LoginPhase::Error(_) => {
            let field = |label: &str, value: String, focused: bool| {
                let marker = if focused { "▶ " } else { "  " };
                let style = if focused {
                    Style::default().fg(app.theme.highlight_fg)
                } else {
                    Style::default().fg(app.theme.text)
                };
                Line::from(vec![
                    Span::raw(marker.to_string()),
                    Span::styled(format!("{label:<10}"), bold),
                    Span::styled(value, style),
                ])
            };
            lines.push(field("Email", login.email.clone(), login.focus == LoginField::Email));
            lines.push(field(
                "Password",
                "*".repeat(login.password.chars().count()),
                login.focus == LoginField::Password,
            ));
            lines.push(Line::raw(""));
            if let Some(err) = login.error_message() {
                lines.push(Line::from(Span::styled(err.to_string(), bold.fg(app.theme.error))));
                lines.push(Line::raw(""));
            }
            lines.push(Line::from(Span::styled(
                "Enter: login  Tab: switch field  Esc: quit",
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Login")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
