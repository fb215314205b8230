//! Small presentational pieces shared by the dashboard screens.

use chrono::{DateTime, Local, TimeZone, Utc};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use triage_models::TicketStatus;

/// Date format used for every timestamp on screen, e.g. `04.05.2023, 12:00:00`.
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

pub fn badge(text: &str, blink: bool) -> Span<'static> {
    let mut style = Style::default().fg(Color::Black).bg(Color::Gray);
    if blink {
        style = style
            .bg(Color::Red)
            .add_modifier(Modifier::SLOW_BLINK | Modifier::BOLD);
    }
    Span::styled(format!(" {text} "), style)
}

pub fn bot_badge(is_bot: bool) -> Span<'static> {
    if is_bot {
        badge("BOT", true)
    } else {
        badge("NOT BOT", false)
    }
}

pub fn attachment_badge() -> Span<'static> {
    badge("ATTACHMENT", false)
}

pub fn status_color(status: TicketStatus) -> Color {
    match status {
        TicketStatus::Open => Color::Yellow,
        TicketStatus::Resolved => Color::Green,
        TicketStatus::Deleted => Color::Red,
    }
}

pub fn status_chip(status: TicketStatus) -> Span<'static> {
    Span::styled(
        format!(" {} ", status.label()),
        Style::default()
            .fg(Color::Black)
            .bg(status_color(status))
            .add_modifier(Modifier::BOLD),
    )
}

/// Tab title with the number of tickets in that status.
pub fn tab_label(status: TicketStatus, count: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(status.label(), Style::default().fg(status_color(status))),
        Span::raw(format!(" ({count})")),
    ])
}

/// A key-bound action. Disabled buttons are dimmed and crossed out.
pub fn button(key: &str, label: &str, enabled: bool) -> Span<'static> {
    let style = if enabled {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    };
    Span::styled(format!("[{key}] {label}"), style)
}

pub fn loading(block: Block<'_>) -> Paragraph<'_> {
    Paragraph::new(Line::from(Span::styled(
        "Loading...",
        Style::default().add_modifier(Modifier::ITALIC),
    )))
    .alignment(Alignment::Center)
    .block(block)
}

pub fn no_results(block: Block<'_>) -> Paragraph<'_> {
    Paragraph::new(vec![
        Line::from(Span::styled(
            "No Results",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("Please change the tab to see tickets."),
    ])
    .alignment(Alignment::Center)
    .block(block)
}

pub fn panel(title: &str) -> Block<'_> {
    Block::default().borders(Borders::ALL).title(title)
}

/// Render `ts` in the local time zone.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    format_timestamp_in(ts, &Local)
}

pub fn format_timestamp_in<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string()
}
