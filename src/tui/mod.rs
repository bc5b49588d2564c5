//! Terminal user interface
//!
//! The app loop multiplexes three sources with `tokio::select!`: keyboard
//! events, completions from spawned backend tasks, and a coarse tick that
//! drives time-based panel transitions. All state changes happen on this
//! loop; spawned tasks only ever report back over the channel.

mod ui;

use crate::api::learning::ChartKind;
use crate::error::Result;
use crate::panels::upload::UploadRequest;
use crate::panels::{
    files::FilesPanel, learning::LearningPanel, market::MarketPanel, query::QueryPanel,
    upload::UploadPanel, PanelMsg, UiReceiver, UiSender,
};
use crate::state::AppState;
use crate::storage::history::QueryHistory;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::time::{Duration, Instant};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Upload,
    Files,
    Query,
    Market,
    Learning,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Upload,
        Tab::Files,
        Tab::Query,
        Tab::Market,
        Tab::Learning,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Upload => "Upload",
            Tab::Files => "Files",
            Tab::Query => "Ask",
            Tab::Market => "Market",
            Tab::Learning => "Learning",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn next(&self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(&self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Plain characters are text on these tabs, not commands
    fn captures_text(&self) -> bool {
        matches!(self, Tab::Upload | Tab::Query)
    }
}

pub struct App {
    state: AppState,
    tx: UiSender,
    tab: Tab,
    upload: UploadPanel,
    files: FilesPanel,
    query: QueryPanel,
    market: MarketPanel,
    learning: LearningPanel,
    /// Startup probe result, shown in the header
    backend_note: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(state: AppState, tx: UiSender) -> App {
        let history = QueryHistory::load(state.store.clone(), state.config.history_limit);
        let upload = UploadPanel::new(state.config.done_display);
        App {
            state,
            tx,
            tab: Tab::Upload,
            upload,
            files: FilesPanel::new(),
            query: QueryPanel::new(history),
            market: MarketPanel::new(),
            learning: LearningPanel::new(),
            backend_note: None,
            should_quit: false,
        }
    }

    /// Fire the fetches every session starts with
    fn kick_off(&mut self) {
        self.spawn_ping();
        self.spawn_files_refresh();
        self.spawn_stats_refresh();
        self.spawn_market_history();
        // The first market poll arrives via the scheduler's immediate tick.
    }

    fn on_msg(&mut self, msg: PanelMsg) {
        match msg {
            PanelMsg::BackendProbed(result) => {
                self.backend_note = Some(match result {
                    Ok(message) => message,
                    Err(e) => e.user_message(),
                });
            }
            PanelMsg::UploadFinished(result) => {
                if self.upload.finish(result, Instant::now()) {
                    self.spawn_files_refresh();
                }
            }
            PanelMsg::FilesRefreshed(result) => self.files.apply_refresh(result),
            PanelMsg::FileDeleted(result) => {
                if self.files.apply_delete(result) {
                    self.spawn_files_refresh();
                }
            }
            PanelMsg::FileDownloaded { filename, result } => {
                self.files.apply_download(&filename, result)
            }
            PanelMsg::AnswerArrived { question, result } => self.query.finish(&question, result),
            PanelMsg::AnalyticsArrived(result) => self.query.apply_analytics(result),
            PanelMsg::MarketTick => {
                if let Some(generation) = self.market.begin_poll() {
                    self.spawn_market_poll(generation);
                }
            }
            PanelMsg::MarketUpdated { generation, result } => {
                self.market.apply_update(generation, result)
            }
            PanelMsg::HistoryArrived(result) => self.market.apply_history(result),
            PanelMsg::PredictionsArrived(result) => self.market.apply_predictions(result),
            PanelMsg::TrainingFinished(result) => self.market.apply_training(result),
            PanelMsg::StatsArrived(result) => self.learning.apply_stats(result),
            PanelMsg::ChartSaved { kind, result } => self.learning.apply_chart(kind, result),
        }
    }

    fn on_tick(&mut self, now: Instant) {
        self.upload.tick(now);
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('c') = key.code {
                self.should_quit = true;
                return;
            }
        }

        match key.code {
            KeyCode::Tab => {
                self.tab = self.tab.next();
                return;
            }
            KeyCode::BackTab => {
                self.tab = self.tab.prev();
                return;
            }
            KeyCode::Char('q') if !self.tab.captures_text() => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        match self.tab {
            Tab::Upload => self.on_upload_key(key),
            Tab::Files => self.on_files_key(key),
            Tab::Query => self.on_query_key(key),
            Tab::Market => self.on_market_key(key),
            Tab::Learning => self.on_learning_key(key),
        }
    }

    fn on_upload_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('y') = key.code {
                self.upload.toggle_source();
            }
            return;
        }
        match key.code {
            KeyCode::Enter => self.submit_upload(),
            KeyCode::Left => self.upload.prev_tag(),
            KeyCode::Right => self.upload.next_tag(),
            KeyCode::Backspace => self.upload.pop_char(),
            KeyCode::Char(c) => self.upload.push_char(c),
            _ => {}
        }
    }

    fn on_files_key(&mut self, key: KeyEvent) {
        // A pending delete owns the keyboard until resolved.
        if self.files.pending_delete.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Esc => self.files.cancel_delete(),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Up => self.files.select_prev(),
            KeyCode::Down => self.files.select_next(),
            KeyCode::Char('r') => self.spawn_files_refresh(),
            KeyCode::Char('d') | KeyCode::Delete => self.files.arm_delete(),
            KeyCode::Char('s') => self.download_selected(),
            _ => {}
        }
    }

    fn on_query_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('l') => self.query.clear_history(),
                KeyCode::Char('a') => {
                    if self.query.toggle_analytics() {
                        self.spawn_analytics();
                    }
                }
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Enter => self.submit_question(),
            KeyCode::Up => self.query.select_older(),
            KeyCode::Down => self.query.select_newer(),
            KeyCode::Esc if self.query.show_analytics => {
                self.query.toggle_analytics();
            }
            KeyCode::Backspace => self.query.pop_char(),
            KeyCode::Char(c) => self.query.push_char(c),
            _ => {}
        }
    }

    fn on_market_key(&mut self, key: KeyEvent) {
        match key.code {
            // Manual refresh obeys the same single-flight rule as the
            // scheduled poll; a press while one is pending does nothing.
            KeyCode::Char('r') => {
                if let Some(generation) = self.market.begin_poll() {
                    self.spawn_market_poll(generation);
                }
            }
            KeyCode::Char('h') => self.spawn_market_history(),
            KeyCode::Char('p') => self.spawn_predictions(),
            KeyCode::Char('t') => {
                if self.market.begin_train() {
                    self.spawn_training();
                }
            }
            _ => {}
        }
    }

    fn on_learning_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => self.spawn_stats_refresh(),
            KeyCode::Char('c') => self.fetch_chart(ChartKind::Concepts),
            KeyCode::Char('t') => self.fetch_chart(ChartKind::Timeline),
            _ => {}
        }
    }

    fn spawn_ping(&self) {
        let api = self.state.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.ping().await;
            let _ = tx.send(PanelMsg::BackendProbed(result));
        });
    }

    fn spawn_files_refresh(&mut self) {
        self.files.begin_refresh();
        let api = self.state.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.list_files().await;
            let _ = tx.send(PanelMsg::FilesRefreshed(result));
        });
    }

    fn submit_upload(&mut self) {
        let Some(request) = self.upload.submit() else {
            return;
        };
        let api = self.state.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match request {
                UploadRequest::File { path, tag } => api.upload_file(&path, tag).await,
                UploadRequest::Youtube { url, tag } => api.upload_youtube(&url, tag).await,
            };
            let _ = tx.send(PanelMsg::UploadFinished(result));
        });
    }

    fn confirm_delete(&mut self) {
        let Some(filename) = self.files.confirm_delete() else {
            return;
        };
        let api = self.state.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.delete_file(&filename).await;
            let _ = tx.send(PanelMsg::FileDeleted(result));
        });
    }

    fn download_selected(&mut self) {
        let Some(entry) = self.files.selected_file() else {
            return;
        };
        let filename = entry.filename.clone();
        let dest = self
            .files
            .download_dest(&self.state.downloads_dir(), &filename);
        let api = self.state.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api
                .download_file(&filename, &dest)
                .await
                .map(|_| dest.clone());
            let _ = tx.send(PanelMsg::FileDownloaded { filename, result });
        });
    }

    fn submit_question(&mut self) {
        let Some(question) = self.query.ask() else {
            return;
        };
        let api = self.state.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.ask(&question).await;
            let _ = tx.send(PanelMsg::AnswerArrived { question, result });
        });
    }

    fn spawn_analytics(&self) {
        let api = self.state.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.query_analytics().await;
            let _ = tx.send(PanelMsg::AnalyticsArrived(result));
        });
    }

    fn spawn_market_poll(&self, generation: u64) {
        let api = self.state.api.clone();
        let symbol = self.state.config.symbol.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // Status and quote are fetched together and applied as one unit.
            let result = tokio::try_join!(api.market_status(), api.live_quote(&symbol));
            let _ = tx.send(PanelMsg::MarketUpdated { generation, result });
        });
    }

    fn spawn_market_history(&self) {
        let api = self.state.api.clone();
        let symbol = self.state.config.symbol.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.market_history(&symbol, "1mo", "1h").await;
            let _ = tx.send(PanelMsg::HistoryArrived(result));
        });
    }

    fn spawn_predictions(&self) {
        let api = self.state.api.clone();
        let symbol = self.state.config.symbol.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.predict(&symbol, 5).await;
            let _ = tx.send(PanelMsg::PredictionsArrived(result));
        });
    }

    fn spawn_training(&self) {
        let api = self.state.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.train_model().await;
            let _ = tx.send(PanelMsg::TrainingFinished(result));
        });
    }

    fn spawn_stats_refresh(&mut self) {
        self.learning.begin_refresh();
        let api = self.state.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.learning_stats().await;
            let _ = tx.send(PanelMsg::StatsArrived(result));
        });
    }

    fn fetch_chart(&mut self, kind: ChartKind) {
        self.learning.begin_chart_fetch(kind);
        let dest = self
            .state
            .charts_dir()
            .join(format!("{}.png", kind.as_str()));
        let api = self.state.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api
                .save_learning_chart(kind, &dest)
                .await
                .map(|_| dest.clone());
            let _ = tx.send(PanelMsg::ChartSaved { kind, result });
        });
    }
}

/// Run the interface until the user quits
pub async fn run(state: AppState, tx: UiSender, rx: UiReceiver) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, state, tx, rx).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: AppState,
    tx: UiSender,
    mut rx: UiReceiver,
) -> Result<()> {
    let mut app = App::new(state, tx);
    app.kick_off();

    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(250));

    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => app.on_key(key),
                Some(Ok(_)) => {}
                Some(Err(e)) => warn!("Terminal event error: {}", e),
                None => break,
            },
            Some(msg) = rx.recv() => app.on_msg(msg),
            _ = tick.tick() => app.on_tick(Instant::now()),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
