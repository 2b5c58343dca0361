use anyhow::Result;
use ratatui::{
    crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    DefaultTerminal, Frame,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time;
use tracing::debug;

use dealdeck_core::catalog::{stores, CatalogPipeline, SortKey};
use dealdeck_core::gateway::CheapSharkGateway;
use dealdeck_core::view::ChannelView;

use super::events::AppEvent;
use super::state::{Action, BrowserState};
use super::theme::Theme;
use crate::deals_cli::Settings;

type Pipeline = CatalogPipeline<CheapSharkGateway, ChannelView<AppEvent>>;

const TICK_RATE: Duration = Duration::from_millis(50);
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Main application struct
pub struct App {
    pipeline: Arc<Pipeline>,
    state: BrowserState,
    /// Whether the app should quit
    should_quit: bool,
    theme: Theme,
    event_tx: UnboundedSender<AppEvent>,
    event_rx: Option<UnboundedReceiver<AppEvent>>,
    /// Last time Ctrl+C was pressed
    last_ctrl_c: Option<Instant>,
}

impl App {
    pub fn new(settings: &Settings) -> Result<Self> {
        let (event_tx, event_rx) = unbounded_channel();
        let pipeline = settings.pipeline(ChannelView::new(event_tx.clone()))?;

        Ok(Self {
            pipeline: Arc::new(pipeline),
            state: BrowserState::default(),
            should_quit: false,
            theme: Theme::default(),
            event_tx,
            event_rx: Some(event_rx),
            last_ctrl_c: None,
        })
    }

    /// Run the application
    pub async fn run(mut self) -> Result<()> {
        let Some(mut event_rx) = self.event_rx.take() else {
            return Ok(());
        };

        let mut terminal = ratatui::init();
        terminal.clear()?;

        // Terminal reads block, keep them off the runtime thread
        let input_tx = self.event_tx.clone();
        tokio::task::spawn_blocking(move || read_input(input_tx));

        self.dispatch_load_initial();

        let result = self.main_loop(&mut terminal, &mut event_rx).await;

        ratatui::restore();
        result
    }

    async fn main_loop(
        &mut self,
        terminal: &mut DefaultTerminal,
        event_rx: &mut UnboundedReceiver<AppEvent>,
    ) -> Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame))?;

            match time::timeout(TICK_RATE, event_rx.recv()).await {
                Ok(Some(event)) => self.handle_event(event),
                Ok(None) => break,
                Err(_) => self.handle_event(AppEvent::Tick),
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let criteria = self.pipeline.criteria();
        super::screens::browse::render(frame, &self.state, &criteria, &self.theme);
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key)
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                // Exit on double press
                let now = Instant::now();
                if let Some(last) = self.last_ctrl_c {
                    if now.duration_since(last).as_millis() < 1000 {
                        self.should_quit = true;
                    }
                }
                self.last_ctrl_c = Some(now);
            }
            AppEvent::Key(key) => {
                if let Some(action) = self.state.handle_key(key) {
                    self.dispatch(action);
                }
            }
            AppEvent::Resize(width, height) => {
                debug!("Terminal resized to {}x{}", width, height);
            }
            AppEvent::View(event) => self.state.apply(event),
            AppEvent::Tick => self.state.tick(),
        }
    }

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::Search(term) => {
                let pipeline = self.pipeline.clone();
                tokio::spawn(async move {
                    pipeline.search(&term).await;
                });
            }
            Action::OpenDetail(game_id) => {
                let pipeline = self.pipeline.clone();
                tokio::spawn(async move {
                    // Failures surface as an alert through the view
                    let _ = pipeline.fetch_detail(&game_id).await;
                });
            }
            Action::CycleStore => {
                let current = self.pipeline.criteria().store_filter;
                let next = stores::cycle_store(current.as_deref());
                self.pipeline.set_store_filter(next.map(str::to_string));
            }
            Action::CycleSort => {
                let next = SortKey::cycle(self.pipeline.criteria().sort_key);
                self.pipeline.set_sort(next);
            }
            Action::Quit => self.should_quit = true,
        }
    }

    fn dispatch_load_initial(&self) {
        let pipeline = self.pipeline.clone();
        tokio::spawn(async move {
            pipeline.load_initial().await;
        });
    }
}

/// Forward terminal input until the app drops its receiver
fn read_input(tx: UnboundedSender<AppEvent>) {
    while !tx.is_closed() {
        match event::poll(INPUT_POLL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(_) => break,
        }

        let sent = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => tx.send(AppEvent::Key(key)),
            Ok(Event::Resize(width, height)) => tx.send(AppEvent::Resize(width, height)),
            Ok(_) => Ok(()),
            Err(_) => break,
        };

        if sent.is_err() {
            break;
        }
    }
}
