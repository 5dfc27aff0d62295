//! matchgrid - terminal frontend for the match-3 grid engine
//!
//! Usage: `matchgrid [settings.toml]`. Without an argument the settings are
//! read from the platform config directory, falling back to defaults.

mod controls;
mod scene;
mod ui;

use controls::{Command, KeyBindings};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use matchgrid::{
    Board, Coord, FillOutcome, Settings, SwapGesture, SwapOutcome, SwapRequest,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use scene::ScenePresenter;
use std::{
    collections::HashSet,
    io::{self, stdout},
    path::PathBuf,
    sync::{Arc, mpsc},
    time::Duration,
};
use ui::{PieceStyle, View};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Results reported back from board tasks running on the runtime
enum BoardEvent {
    Filled(FillOutcome),
    Swapped(SwapRequest, SwapOutcome),
}

/// Frontend state
struct App {
    board: Board<ScenePresenter>,
    runtime: tokio::runtime::Handle,
    events_tx: mpsc::Sender<BoardEvent>,
    events_rx: mpsc::Receiver<BoardEvent>,
    bindings: KeyBindings,
    styles: Vec<PieceStyle>,
    gesture: SwapGesture,
    cursor: Coord,
    show_hints: bool,
    status: String,
    error: Option<String>,
}

/// Get the matchgrid temp directory, creating it if needed
fn matchgrid_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("matchgrid");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();
    let log_dir = matchgrid_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file, the terminal belongs to the UI
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "matchgrid=debug".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "matchgrid starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings_arg = std::env::args_os().nth(1).map(PathBuf::from);
    // Only a first run without a settings file writes one back
    let save_on_exit =
        settings_arg.is_none() && Settings::settings_path().is_some_and(|path| !path.exists());
    let settings = match settings_arg {
        Some(path) => match Settings::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Could not load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Settings::load(),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let presenter = Arc::new(ScenePresenter::new());
    let board = match Board::new(&settings, presenter) {
        Ok(board) => board,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut app = App::new(board, &settings, runtime.handle().clone());
    app.start_fill();

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;

    if save_on_exit {
        match settings.save() {
            Ok(path) => tracing::info!("Wrote default settings to {}", path.display()),
            Err(e) => eprintln!("Warning: Could not save settings: {}", e),
        }
    }

    if let Err(e) = &result {
        eprintln!("matchgrid stopped: {}", e);
    }
    tracing::info!("matchgrid shutting down");
    runtime.shutdown_timeout(Duration::from_millis(200));
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        app.drain_events();

        let sprites = app.board.presenter().sprites();
        let hints = app.show_hints.then(|| {
            app.board
                .legal_swaps()
                .iter()
                .flat_map(|pair| [pair.first(), pair.second()])
                .collect::<HashSet<_>>()
        });
        let view = View {
            level: app.board.level(),
            sprites: &sprites,
            styles: &app.styles,
            cursor: app.cursor,
            grabbed: app.gesture.grabbed(),
            hints,
            locked: app.board.is_locked(),
            legal_swaps: app.board.legal_swaps().len(),
            status: &app.status,
            error: app.error.as_deref(),
        };
        terminal.draw(|frame| ui::render(frame, &view))?;

        if !event::poll(FRAME_DURATION)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.error.take().is_some() {
                    continue;
                }
                match app.bindings.command(key) {
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::MoveCursor(dir)) => app.move_cursor(dir),
                    Some(Command::Select) => app.toggle_grab(),
                    Some(Command::ToggleHints) => app.show_hints = !app.show_hints,
                    None => {}
                }
            }
            Event::Mouse(mouse) => {
                let size = terminal.size()?;
                let area = Rect::new(0, 0, size.width, size.height);
                app.handle_mouse(mouse, area);
            }
            _ => {}
        }
    }
}

impl App {
    fn new(board: Board<ScenePresenter>, settings: &Settings, runtime: tokio::runtime::Handle) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        let level = board.level();
        let cursor = level
            .floor_cells()
            .next()
            .unwrap_or_else(|| Coord::new(0, 0));
        Self {
            board,
            runtime,
            events_tx,
            events_rx,
            bindings: KeyBindings::from_settings(&settings.keys),
            styles: PieceStyle::from_palette(&settings.palette),
            gesture: SwapGesture::new(),
            cursor,
            show_hints: false,
            status: "Filling...".to_string(),
            error: None,
        }
    }

    fn start_fill(&self) {
        let board = self.board.clone();
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let outcome = board.initial_fill().await;
            let _ = tx.send(BoardEvent::Filled(outcome));
        });
    }

    /// Fire a swap on the runtime. Overlapping requests are turned away by
    /// the board itself.
    fn request_swap(&self, request: SwapRequest) {
        let board = self.board.clone();
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let outcome = board.swap(request.from, request.to).await;
            let _ = tx.send(BoardEvent::Swapped(request, outcome));
        });
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                BoardEvent::Filled(FillOutcome::Filled { spawned, .. }) => {
                    self.status = format!("Filled {} cells", spawned);
                }
                BoardEvent::Filled(FillOutcome::Busy) => {
                    self.status = "Board busy".to_string();
                }
                BoardEvent::Filled(FillOutcome::Aborted(e)) => {
                    self.error = Some(e.to_string());
                }
                BoardEvent::Swapped(request, outcome) => {
                    self.status = match outcome {
                        SwapOutcome::Resolved { destroyed, .. } => {
                            format!("Matched {} pieces", destroyed.len())
                        }
                        SwapOutcome::Reverted => "No match".to_string(),
                        SwapOutcome::Rejected(reason) => reason.to_string(),
                        SwapOutcome::Busy => "Board busy".to_string(),
                        SwapOutcome::Aborted(e) => {
                            self.error = Some(format!("{} <-> {}: {}", request.from, request.to, e));
                            "Swap failed".to_string()
                        }
                    };
                }
            }
        }
    }

    fn move_cursor(&mut self, dir: matchgrid::Direction) {
        let next = self.cursor.offset(dir);
        if !self.board.level().contains(next) {
            return;
        }
        self.cursor = next;
        if let Some(request) = self.gesture.on_hover(next, self.board.is_locked()) {
            self.request_swap(request);
        }
    }

    /// Keyboard select grabs the cursor cell, or lets go of a grabbed one
    fn toggle_grab(&mut self) {
        if self.gesture.grabbed().is_some() {
            self.gesture.on_release();
        } else {
            self.gesture.on_select(self.cursor, self.board.is_locked());
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, area: Rect) {
        let Some(coord) = ui::cell_at(area, self.board.level(), mouse.column, mouse.row) else {
            if let MouseEventKind::Up(MouseButton::Left) = mouse.kind {
                self.gesture.on_release();
            }
            return;
        };
        let locked = self.board.is_locked();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.cursor = coord;
                self.gesture.on_select(coord, locked);
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                self.cursor = coord;
                if let Some(request) = self.gesture.on_hover(coord, locked) {
                    self.request_swap(request);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.gesture.on_release(),
            _ => {}
        }
    }
}
