use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{widgets::ListState, Frame};
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;
use triage_models::{DashboardLocation, TicketStatus};
use triage_sdk::TicketApi;

use crate::config::AppConfig;
use crate::executor;
use crate::row::Mutation;
use crate::tui::{self, Action, EventHandler};
use crate::ui;
use crate::view::{Command, TicketsView};

/// How long a notice stays on the status line.
const NOTICE_TTL: Duration = Duration::from_secs(5);

pub trait AppController {
    fn update(&mut self, action: Action);
    fn render(&mut self, f: &mut Frame);
    fn should_quit(&self) -> bool;
}

pub struct DashboardApp {
    view: TicketsView,
    api: Arc<dyn TicketApi>,
    tx: UnboundedSender<Action>,
    should_quit: bool,
    notification: Option<(String, Instant)>,
    list_state: ListState,
}

impl DashboardApp {
    pub fn new(requested: Option<&str>, api: Arc<dyn TicketApi>, tx: UnboundedSender<Action>) -> Self {
        let (view, commands) = TicketsView::new(requested);
        let app = Self {
            view,
            api,
            tx,
            should_quit: false,
            notification: None,
            list_state: ListState::default(),
        };
        app.dispatch(commands);
        app
    }

    /// Where the dashboard currently is, for resuming later.
    pub fn location(&self) -> DashboardLocation {
        self.view.location()
    }

    fn dispatch(&self, commands: Vec<Command>) {
        for command in commands {
            executor::spawn(self.api.clone(), command, self.tx.clone());
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let selected = self.view.selected();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                Vec::new()
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                Vec::new()
            }
            KeyCode::Tab => self.view.select_tab(self.view.location().tab.next()),
            KeyCode::BackTab => self.view.select_tab(self.view.location().tab.previous()),
            KeyCode::Char('1') => self.view.select_tab(TicketStatus::Open),
            KeyCode::Char('2') => self.view.select_tab(TicketStatus::Resolved),
            KeyCode::Char('3') => self.view.select_tab(TicketStatus::Deleted),
            KeyCode::Down | KeyCode::Char('j') => {
                self.view.select_next();
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.view.select_previous();
                Vec::new()
            }
            KeyCode::Right | KeyCode::Char('l' | 'n') => self.view.next_page(),
            KeyCode::Left | KeyCode::Char('h' | 'p') => self.view.previous_page(),
            KeyCode::Home => self.view.first_page(),
            KeyCode::End => self.view.last_page(),
            KeyCode::Enter | KeyCode::Char(' ') => self.view.toggle_context(selected),
            KeyCode::Char('r') => self.view.request_mutation(selected, Mutation::Resolve),
            KeyCode::Char('d') => self.view.request_mutation(selected, Mutation::Delete),
            KeyCode::F(5) => self.view.reload(),
            _ => Vec::new(),
        }
    }
}

impl AppController for DashboardApp {
    fn update(&mut self, action: Action) {
        let commands = match action {
            Action::Key(key) => self.handle_key(key),
            Action::Backend(event) => self.view.apply(event),
            Action::Tick | Action::Resize => Vec::new(),
        };
        self.dispatch(commands);

        if let Some(notice) = self.view.take_notice() {
            self.notification = Some((notice, Instant::now()));
        }
        if let Some((_, time)) = &self.notification {
            if time.elapsed() > NOTICE_TTL {
                self.notification = None;
            }
        }
    }

    fn render(&mut self, f: &mut Frame) {
        let notice = self.notification.as_ref().map(|(msg, _)| msg.as_str());
        ui::tickets::render(f, &self.view, &mut self.list_state, notice);
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Run the dashboard until the user quits. Returns the final location.
pub async fn run(config: &AppConfig, api: Arc<dyn TicketApi>) -> anyhow::Result<DashboardLocation> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = event_loop(&mut terminal, config, api).await;
    tui::restore()?;
    result
}

async fn event_loop(
    terminal: &mut tui::Tui,
    config: &AppConfig,
    api: Arc<dyn TicketApi>,
) -> anyhow::Result<DashboardLocation> {
    let mut events = EventHandler::new(config.tick_rate);
    let mut app = DashboardApp::new(config.location.as_deref(), api, events.get_sender());
    info!(backend = %config.backend_url, "dashboard started");

    loop {
        terminal.draw(|f| app.render(f))?;
        match events.next_async().await {
            Some(action) => app.update(action),
            None => break,
        }
        if app.should_quit() {
            break;
        }
    }
    Ok(app.location())
}
