//! One-shot subcommands for scripting against the backend.

use clap::Subcommand;
use triage_models::{
    page_count, DashboardLocation, Ticket, TicketCounts, TicketId, TicketStatus, PAGE_SIZE,
};
use triage_sdk::TriageClient;

use crate::row::Mutation;
use crate::ui::components::format_timestamp;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive dashboard (the default)
    Tui,
    /// Check that the backend is reachable
    Health,
    /// Print the number of tickets per status
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print one page of tickets
    List {
        /// Status to list (open, resolved, deleted)
        #[arg(long, default_value = "open")]
        status: TicketStatus,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Mark a ticket resolved
    Resolve { id: TicketId },
    /// Soft-delete a ticket
    Delete { id: TicketId },
}

pub async fn run(command: Commands, client: &TriageClient) -> anyhow::Result<()> {
    match command {
        Commands::Tui => anyhow::bail!("the dashboard is not a one-shot command"),
        Commands::Health => {
            client.health().await?;
            println!("backend at {} is healthy", client.base_url());
        }
        Commands::Stats { json } => {
            let counts = client.get_statistics().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
            } else {
                print!("{}", format_counts(&counts));
            }
        }
        Commands::List { status, page, json } => {
            let location = DashboardLocation::new(status, page.max(1));
            let listing = client
                .get_tickets(location.skip(PAGE_SIZE), PAGE_SIZE, status)
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
                return Ok(());
            }
            for ticket in &listing.tickets {
                println!("{}", format_ticket(ticket));
            }
            println!(
                "{location}: {} of {} {status} tickets, page {}/{}",
                listing.tickets.len(),
                listing.total_tickets.get(status),
                location.page,
                page_count(listing.total_tickets.get(status), PAGE_SIZE).max(1)
            );
        }
        Commands::Resolve { id } => mutate(client, &id, Mutation::Resolve).await?,
        Commands::Delete { id } => mutate(client, &id, Mutation::Delete).await?,
    }
    Ok(())
}

/// Apply `mutation` unless the ticket already has the target status.
async fn mutate(client: &TriageClient, id: &TicketId, mutation: Mutation) -> anyhow::Result<()> {
    let ticket = client.get_ticket(id).await?;
    if ticket.is(mutation.target()) {
        println!("ticket {id} is already {}", ticket.status);
        return Ok(());
    }
    match mutation {
        Mutation::Resolve => client.resolve_ticket_by_id(id).await?,
        Mutation::Delete => client.delete_ticket_by_id(id).await?,
    }
    println!("ticket {id} {}", mutation.target());
    Ok(())
}

fn format_counts(counts: &TicketCounts) -> String {
    TicketStatus::ALL
        .iter()
        .map(|s| format!("{:<9}{}\n", format!("{s}:"), counts.get(*s)))
        .collect()
}

fn format_ticket(ticket: &Ticket) -> String {
    let summary = match &ticket.message {
        Some(m) => format!(
            "{}: {}",
            m.author.nickname,
            m.content.lines().next().unwrap_or_default()
        ),
        None => ticket.msg_id.to_string(),
    };
    format!(
        "{}\t{}\t{}\t{summary}",
        ticket.id,
        ticket.status,
        format_timestamp(&ticket.timestamp)
    )
}
