use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc;
use tracker_core::{update, AppState, ControlTarget, Msg};
use tracker_engine::JobApi;
use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

use crate::commands::{parse_command, Command, HELP_TEXT};
use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::render::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Prompt-driven screen; transient messages expire.
    Interactive,
    /// Single action; messages stay so the final screen shows the outcome.
    OneShot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

enum Input {
    Line(Option<String>),
    Msg(Msg),
}

/// Owns the state and is the only place where `update` runs.
pub struct App<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
}

impl<W: Write> App<W> {
    pub fn new(api: Arc<dyn JobApi>, config: &AppConfig, mode: RunMode, out: W) -> Self {
        Self {
            state: AppState::with_date_format(config.date_format.clone()),
            runner: EffectRunner::new(api, config.message_ttl, mode == RunMode::Interactive),
            out,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, msg: Msg) {
        tracker_debug!("Dispatch {}", msg_name(&msg));
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Applies engine results until no backend call is outstanding.
    pub async fn run_until_idle(&mut self) {
        while self.runner.has_pending_requests() {
            match self.runner.next_msg().await {
                Some(msg) => self.dispatch(msg),
                None => break,
            }
        }
    }

    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        match parse_command(line) {
            None => Ok(Flow::Continue),
            Some(Err(err)) => {
                writeln!(self.out, "{err}")?;
                Ok(Flow::Continue)
            }
            Some(Ok(command)) => self.handle_command(command),
        }
    }

    pub fn handle_command(&mut self, command: Command) -> io::Result<Flow> {
        let msg = match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => {
                writeln!(self.out, "{HELP_TEXT}")?;
                return Ok(Flow::Continue);
            }
            Command::Refresh => Msg::RefreshRequested,
            Command::Scrape(company) => {
                if !self.ensure_enabled(ControlTarget::Scrape(company))? {
                    return Ok(Flow::Continue);
                }
                Msg::ScrapeClicked(company)
            }
            Command::Cleanup => {
                if !self.ensure_enabled(ControlTarget::Cleanup)? {
                    return Ok(Flow::Continue);
                }
                Msg::CleanupClicked
            }
        };
        self.dispatch(msg);
        Ok(Flow::Continue)
    }

    /// Disabled controls cannot be activated; say so instead.
    fn ensure_enabled(&mut self, target: ControlTarget) -> io::Result<bool> {
        let view = self.state.view();
        match view.control(target) {
            Some(control) if !control.enabled => {
                tracker_info!("Ignored {:?}: control is disabled", target);
                writeln!(self.out, "Busy: {} (wait for it to finish)", control.label)?;
                Ok(false)
            }
            _ => Ok(true),
        }
    }

    pub fn render(&mut self) -> io::Result<()> {
        let screen = render(&self.state.view());
        writeln!(self.out)?;
        write!(self.out, "{screen}")?;
        self.out.flush()
    }

    /// Renders only when something visible changed. Returns whether it did.
    pub fn render_if_dirty(&mut self) -> io::Result<bool> {
        if !self.state.consume_dirty() {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }
}

/// Interactive loop: initial page-load fetch, then prompt lines and engine
/// results in arrival order until `quit` or end of input.
pub async fn run_interactive<W: Write>(
    app: &mut App<W>,
    mut lines: mpsc::UnboundedReceiver<String>,
) -> io::Result<()> {
    app.dispatch(Msg::RefreshRequested);
    app.render_if_dirty()?;
    app.prompt()?;

    loop {
        let input = tokio::select! {
            line = lines.recv() => Input::Line(line),
            Some(msg) = app.runner.next_msg() => Input::Msg(msg),
        };
        match input {
            Input::Line(None) => {
                tracker_info!("Input closed");
                break;
            }
            Input::Line(Some(line)) => {
                if app.handle_line(&line)? == Flow::Quit {
                    break;
                }
                if !app.render_if_dirty()? {
                    app.prompt()?;
                    continue;
                }
            }
            Input::Msg(msg) => {
                app.dispatch(msg);
                if !app.render_if_dirty()? {
                    continue;
                }
            }
        }
        app.prompt()?;
    }
    Ok(())
}

/// Runs one action to completion and renders the final screen.
/// Returns `false` when the screen ends with an error.
pub async fn run_once<W: Write>(app: &mut App<W>, msg: Msg) -> io::Result<bool> {
    app.dispatch(msg);
    app.run_until_idle().await;
    app.render()?;
    Ok(app.state().error().is_none())
}

/// Reads stdin lines on a plain thread; blocking reads cannot be cancelled,
/// so they stay off the runtime.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracker_warn!("Failed to read stdin: {}", err);
                    break;
                }
            }
        }
    });
    rx
}

fn msg_name(msg: &Msg) -> &'static str {
    match msg {
        Msg::RefreshRequested => "RefreshRequested",
        Msg::ScrapeClicked(_) => "ScrapeClicked",
        Msg::CleanupClicked => "CleanupClicked",
        Msg::JobsLoaded { .. } => "JobsLoaded",
        Msg::ScrapeFinished { .. } => "ScrapeFinished",
        Msg::CleanupFinished(_) => "CleanupFinished",
        Msg::MessagesExpired { .. } => "MessagesExpired",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use serde_json::json;
    use tracker_core::{normalize_jobs_body, Company, Job, JobDefaults};
    use tracker_engine::{
        ApiError, ApiSettings, CleanupOutcome, FailureKind, ScrapeOutcome, DEFAULT_BASE_URL,
    };

    use super::*;

    /// Pops canned answers per endpoint and counts calls.
    #[derive(Default)]
    struct ScriptedApi {
        listings: Mutex<VecDeque<Result<Vec<Job>, ApiError>>>,
        scrapes: Mutex<VecDeque<Result<ScrapeOutcome, ApiError>>>,
        cleanups: Mutex<VecDeque<Result<CleanupOutcome, ApiError>>>,
        list_calls: AtomicUsize,
        scrape_calls: AtomicUsize,
    }

    impl ScriptedApi {
        fn with_listing(self, jobs: Vec<Job>) -> Self {
            self.listings.lock().unwrap().push_back(Ok(jobs));
            self
        }

        fn with_scrape(self, result: Result<ScrapeOutcome, ApiError>) -> Self {
            self.scrapes.lock().unwrap().push_back(result);
            self
        }

        fn with_cleanup(self, result: Result<CleanupOutcome, ApiError>) -> Self {
            self.cleanups.lock().unwrap().push_back(result);
            self
        }
    }

    fn unscripted() -> ApiError {
        ApiError {
            kind: FailureKind::Network,
            message: "unscripted call".to_string(),
        }
    }

    #[async_trait::async_trait]
    impl JobApi for ScriptedApi {
        async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.listings
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(unscripted()))
        }

        async fn scrape(&self, _company: Company) -> Result<ScrapeOutcome, ApiError> {
            self.scrape_calls.fetch_add(1, Ordering::SeqCst);
            self.scrapes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(unscripted()))
        }

        async fn cleanup(&self) -> Result<CleanupOutcome, ApiError> {
            self.cleanups
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(unscripted()))
        }
    }

    fn config() -> AppConfig {
        AppConfig::with_api(ApiSettings::new(DEFAULT_BASE_URL).unwrap())
    }

    fn sample_jobs() -> Vec<Job> {
        normalize_jobs_body(
            &json!({"jobs": [{"title": "Engineer", "company": "Acme", "job_id": "a-1",
                          "posted_date": "2024-07-04T09:00:00Z"}]}),
            &JobDefaults::default(),
        )
    }

    fn screen(app: &App<Vec<u8>>) -> String {
        String::from_utf8_lossy(&app.out).into_owned()
    }

    #[tokio::test]
    async fn cleanup_reports_count_and_refreshes_once() {
        colored::control::set_override(false);
        let api = Arc::new(
            ScriptedApi::default()
                .with_cleanup(Ok(CleanupOutcome {
                    deleted_count: 12,
                    cutoff_date: None,
                }))
                .with_listing(sample_jobs()),
        );
        let mut app = App::new(api.clone(), &config(), RunMode::OneShot, Vec::new());

        let ok = run_once(&mut app, Msg::CleanupClicked).await.unwrap();

        assert!(ok);
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.state().success(), Some("Cleaned up 12 old jobs"));
        let out = screen(&app);
        assert!(out.contains("Cleaned up 12 old jobs"));
        assert!(out.contains("Engineer  [Acme]"));
    }

    #[tokio::test]
    async fn failed_scrape_keeps_list_and_reports_reason() {
        colored::control::set_override(false);
        let api = Arc::new(
            ScriptedApi::default()
                .with_listing(sample_jobs())
                .with_scrape(Err(ApiError {
                    kind: FailureKind::HttpStatus(500),
                    message: "rate limited".to_string(),
                })),
        );
        let mut app = App::new(api.clone(), &config(), RunMode::OneShot, Vec::new());
        app.dispatch(Msg::RefreshRequested);
        app.run_until_idle().await;

        let ok = run_once(&mut app, Msg::ScrapeClicked(Company::Brex))
            .await
            .unwrap();

        assert!(!ok);
        assert_eq!(app.state().error(), Some("Scrape failed: rate limited"));
        assert_eq!(app.state().jobs(), sample_jobs().as_slice());
        assert!(!app.state().is_scraping(Company::Brex));
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
        assert!(screen(&app).contains("Scrape failed: rate limited"));
    }

    #[tokio::test]
    async fn busy_control_is_not_dispatched_again() {
        let api = Arc::new(
            ScriptedApi::default()
                .with_scrape(Ok(ScrapeOutcome { jobs_added: 2 }))
                .with_listing(Vec::new()),
        );
        let mut app = App::new(api.clone(), &config(), RunMode::OneShot, Vec::new());

        app.handle_command(Command::Scrape(Company::Microsoft)).unwrap();
        app.handle_command(Command::Scrape(Company::Microsoft)).unwrap();
        assert!(screen(&app).contains("Busy: Scraping..."));

        app.run_until_idle().await;
        assert_eq!(api.scrape_calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.state().success(), Some("Added 2 microsoft jobs"));
        assert!(!app.state().is_scraping(Company::Microsoft));
    }

    #[tokio::test]
    async fn scrape_stays_refused_while_its_refresh_is_pending() {
        let api = Arc::new(
            ScriptedApi::default()
                .with_scrape(Ok(ScrapeOutcome { jobs_added: 3 }))
                .with_listing(sample_jobs()),
        );
        let mut app = App::new(api.clone(), &config(), RunMode::OneShot, Vec::new());

        app.handle_command(Command::Scrape(Company::Microsoft)).unwrap();
        let finished = app.runner.next_msg().await.unwrap();
        assert!(matches!(finished, Msg::ScrapeFinished { .. }));
        app.dispatch(finished);
        assert!(app.state().is_loading());

        app.handle_command(Command::Scrape(Company::Microsoft)).unwrap();
        assert!(screen(&app).contains("Busy: Scraping..."));

        app.run_until_idle().await;
        assert_eq!(api.scrape_calls.load(Ordering::SeqCst), 1);
        assert!(!app.state().is_scraping(Company::Microsoft));
        assert_eq!(app.state().jobs(), sample_jobs().as_slice());
    }

    #[tokio::test]
    async fn interactive_session_loads_then_quits() {
        colored::control::set_override(false);
        let api = Arc::new(ScriptedApi::default().with_listing(sample_jobs()));
        let mut app = App::new(api, &config(), RunMode::Interactive, Vec::new());
        let (tx, rx) = mpsc::unbounded_channel();

        tx.send("help".to_string()).unwrap();
        tx.send("quit".to_string()).unwrap();
        run_interactive(&mut app, rx).await.unwrap();

        let out = screen(&app);
        assert!(out.contains("Tech Job Tracker"));
        assert!(out.contains("Loading jobs..."));
        assert!(out.contains("Commands:"));
    }

    #[tokio::test(start_paused = true)]
    async fn interactive_messages_expire() {
        let api = Arc::new(ScriptedApi::default());
        let mut app = App::new(api, &config(), RunMode::Interactive, Vec::new());

        app.dispatch(Msg::RefreshRequested);
        app.run_until_idle().await;
        assert_eq!(app.state().error(), Some("Fetch Error: unscripted call"));

        let started = tokio::time::Instant::now();
        let msg = app.runner.next_msg().await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(5));
        app.dispatch(msg);
        assert_eq!(app.state().error(), None);
    }
}
