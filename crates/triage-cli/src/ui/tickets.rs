use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};
use triage_models::{Message, Ticket, TicketStatus};

use crate::row::{Mutation, TicketRow};
use crate::ui::components::{
    attachment_badge, bot_badge, button, format_timestamp, loading, no_results, panel,
    status_chip, tab_label,
};
use crate::view::TicketsView;

const INDENT: &str = "    ";
const CONTEXT_INDENT: &str = "        ";

const HELP: &str =
    "q quit | Tab/1-3 tab | ↑↓ select | ←→ page | Enter context | r resolve | d delete | F5 reload";

pub fn render(f: &mut Frame, view: &TicketsView, list_state: &mut ListState, notice: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, view, chunks[0]);
    render_body(f, view, list_state, chunks[1]);
    f.render_widget(Paragraph::new(pagination(view)), chunks[2]);

    let status = match notice {
        Some(msg) => Line::from(Span::styled(
            msg.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(HELP, Style::default().fg(Color::DarkGray))),
    };
    f.render_widget(Paragraph::new(status), chunks[3]);
}

fn render_header(f: &mut Frame, view: &TicketsView, area: Rect) {
    let counts = view.counts();
    let location = view.location();
    let titles: Vec<Line> = TicketStatus::ALL
        .iter()
        .map(|s| tab_label(*s, counts.get(*s)))
        .collect();
    let selected = TicketStatus::ALL
        .iter()
        .position(|s| *s == location.tab)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Ticket Triage ")
                .title_top(Line::from(format!(" {location} ")).right_aligned()),
        );
    f.render_widget(tabs, area);
}

fn render_body(f: &mut Frame, view: &TicketsView, list_state: &mut ListState, area: Rect) {
    let location = view.location();
    let title = format!(
        " {} tickets, page {}/{} ",
        location.tab.label(),
        location.page,
        view.page_count().max(1)
    );
    let block = panel(&title);

    if !view.is_loaded() {
        f.render_widget(loading(block), area);
        return;
    }
    if view.tickets().is_empty() {
        f.render_widget(no_results(block), area);
        return;
    }

    let items: Vec<ListItem> = view
        .tickets()
        .iter()
        .map(|t| ListItem::new(ticket_lines(t, view.row(&t.id))))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)))
        .highlight_symbol(">> ");

    list_state.select(Some(view.selected()));
    f.render_stateful_widget(list, area, list_state);
}

/// The lines of one ticket entry.
fn ticket_lines(ticket: &Ticket, row: Option<&TicketRow>) -> Vec<Line<'static>> {
    let message = row.and_then(|r| r.message(ticket)).or(ticket.message.as_ref());

    let mut head = vec![
        status_chip(ticket.status),
        Span::raw(" "),
        Span::styled(
            format!("#{}", ticket.id),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(m) = message {
        head.push(Span::raw("  "));
        head.push(Span::styled(
            m.author.nickname.clone(),
            Style::default().fg(Color::Cyan),
        ));
        head.push(Span::raw(" "));
        head.push(bot_badge(m.author.is_bot));
        if m.has_attachment {
            head.push(Span::raw(" "));
            head.push(attachment_badge());
        }
    }
    let mut lines = vec![Line::from(head)];

    let mut times = vec![Span::raw(INDENT)];
    if let Some(m) = message {
        times.push(Span::raw(format!(
            "Created {}  ",
            format_timestamp(&m.timestamp_insert)
        )));
    }
    times.push(Span::raw(format!(
        "Status changed {}",
        format_timestamp(&ticket.status_changed_at())
    )));
    if let Some(by) = &ticket.resolved_by {
        times.push(Span::raw(format!(" by {by}")));
    }
    lines.push(Line::from(times).style(Style::default().fg(Color::Gray)));

    match message {
        Some(m) => {
            lines.extend(
                m.content
                    .lines()
                    .map(|l| Line::from(format!("{INDENT}{l}"))),
            );
            lines.push(Line::from(vec![
                Span::raw(INDENT),
                Span::styled(
                    m.msg_url.clone(),
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::UNDERLINED),
                ),
            ]));
        }
        None => lines.push(Line::from(format!("{INDENT}Loading message..."))),
    }

    lines.push(actions_line(ticket, row));

    if row.is_some_and(TicketRow::is_shown) {
        lines.extend(context_lines(row));
    }
    lines.push(Line::default());
    lines
}

fn actions_line(ticket: &Ticket, row: Option<&TicketRow>) -> Line<'static> {
    let mut spans = vec![Span::raw(INDENT)];
    match row.and_then(TicketRow::pending) {
        Some(pending) => spans.push(Span::styled(
            format!("{}...", capitalize(pending.verb())),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        )),
        None => {
            spans.push(button(
                "r",
                "Resolve",
                TicketRow::can_apply(ticket, Mutation::Resolve),
            ));
            spans.push(Span::raw("  "));
            spans.push(button(
                "d",
                "Delete",
                TicketRow::can_apply(ticket, Mutation::Delete),
            ));
        }
    }
    let shown = row.is_some_and(TicketRow::is_shown);
    let label = format!(
        "{} context ({})",
        if shown { "Hide" } else { "Show" },
        ticket.context_messages.len()
    );
    spans.push(Span::raw("  "));
    spans.push(button("Enter", &label, true));
    Line::from(spans)
}

fn context_lines(row: Option<&TicketRow>) -> Vec<Line<'static>> {
    let Some(row) = row else {
        return Vec::new();
    };
    if row.is_loading_context() {
        return vec![Line::from(format!("{CONTEXT_INDENT}Loading..."))];
    }
    if row.context_messages().is_empty() {
        return vec![Line::from(Span::styled(
            format!("{CONTEXT_INDENT}No context messages"),
            Style::default().fg(Color::DarkGray),
        ))];
    }
    row.context_messages()
        .iter()
        .enumerate()
        .map(|(i, m)| context_line(i + 1, m))
        .collect()
}

fn context_line(index: usize, message: &Message) -> Line<'static> {
    let mut spans = vec![Span::raw(format!(
        "{CONTEXT_INDENT}{index}. {}",
        message.content.replace('\n', " ")
    ))];
    if message.has_attachment {
        spans.push(Span::raw(" "));
        spans.push(attachment_badge());
    }
    spans.push(Span::raw(format!(", by {} ", message.author.nickname)));
    spans.push(bot_badge(message.author.is_bot));
    Line::from(spans)
}

fn pagination(view: &TicketsView) -> Line<'static> {
    let current = view.location().page;
    let mut spans = vec![
        button("←", "Previous", view.has_previous_page()),
        Span::raw(" "),
    ];
    for page in 1..=view.page_count() {
        let style = if page == current {
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {page} "), style));
    }
    spans.push(Span::raw(" "));
    spans.push(button("→", "Next", view.has_next_page()));
    Line::from(spans)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
