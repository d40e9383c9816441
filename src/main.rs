pub mod clock;
pub mod frame_loop;
pub mod keystroke;
pub mod metrics;
pub mod mistakes;
pub mod particles;
pub mod persist;
pub mod prompts;
pub mod session;
pub mod ui;

use crate::frame_loop::{FrameClock, IntervalTickSource, TickSource};
use crate::particles::ParticleSystem;
use crate::persist::{merge_run, FileStatsStore, GamesPayload, StatsStore};
use crate::prompts::pick_prompt;
use crate::session::{Difficulty, Exercise, KeyOutcome, RunSummary};
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::mpsc,
    thread,
    time::Duration,
};

const TICK_RATE_MS: u64 = 33;
const BURST_PARTICLES: usize = 14;

/// typing practice with live metrics, combo scoring, and a local leaderboard
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Typing practice with live WPM/accuracy, combo-multiplied scoring, particle feedback, and a locally persisted leaderboard."
)]
pub struct Cli {
    /// number of seconds to run the exercise (unlimited if omitted)
    #[clap(short = 's', long)]
    number_of_secs: Option<u64>,

    /// custom prompt to type instead of a built-in one
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// difficulty tier, weights the leaderboard score
    #[clap(short = 'd', long, value_enum, default_value_t = CliDifficulty::Normal)]
    difficulty: CliDifficulty,

    /// game identifier used for stats and the leaderboard
    #[clap(short = 'g', long, default_value = "practice")]
    game_id: String,

    /// treat Space as submit when it does not match the prompt
    #[clap(long)]
    space_submit: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum CliDifficulty {
    Easy,
    Normal,
    Hard,
}

impl CliDifficulty {
    fn as_difficulty(&self) -> Difficulty {
        match self {
            CliDifficulty::Easy => Difficulty::Easy,
            CliDifficulty::Normal => Difficulty::Normal,
            CliDifficulty::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Typing,
    Results,
}

pub struct App {
    pub cli: Cli,
    pub exercise: Exercise,
    pub particles: ParticleSystem,
    pub frame_clock: FrameClock,
    pub state: AppState,
    pub last_run: Option<RunSummary>,
    pub payload: GamesPayload,
    store: Box<dyn StatsStore>,
}

impl App {
    fn new(cli: Cli) -> Self {
        Self::with_store(cli, Box::new(FileStatsStore::new()))
    }

    /// The store is injected so headless runs and tests can swap in an
    /// in-memory one; the payload is hydrated exactly once, here.
    fn with_store(cli: Cli, store: Box<dyn StatsStore>) -> Self {
        let payload = store.load().into_payload();
        let exercise = Self::build_exercise(&cli);
        let mut frame_clock = FrameClock::new();
        frame_clock.enable();

        Self {
            cli,
            exercise,
            particles: ParticleSystem::new(),
            frame_clock,
            state: AppState::Typing,
            last_run: None,
            payload,
            store,
        }
    }

    fn build_exercise(cli: &Cli) -> Exercise {
        let prompt = cli
            .prompt
            .clone()
            .unwrap_or_else(|| pick_prompt(&mut rand::thread_rng()).to_string());
        let exercise = Exercise::new(
            cli.game_id.clone(),
            cli.difficulty.as_difficulty(),
            &prompt,
            cli.number_of_secs.map(|s| s * 1000),
        );
        if cli.space_submit {
            exercise.with_space_submission()
        } else {
            exercise
        }
    }

    fn reset_exercise(&mut self, new_prompt: bool) {
        if new_prompt {
            self.cli.prompt = None;
            self.exercise = Self::build_exercise(&self.cli);
        } else {
            self.exercise.reset();
        }
        self.particles.clear();
        self.frame_clock.disable();
        self.frame_clock.enable();
        self.state = AppState::Typing;
    }

    /// Routes one key into the engine and spawns visual feedback.
    fn handle_typing_key(&mut self, label: &str, width: u16, height: u16) {
        let outcome = self.exercise.on_key(label, false);
        let snap = self.exercise.snapshot();
        let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
        match outcome {
            KeyOutcome::Correct => {
                // Hue walks with the combo so streaks shift color.
                let hue = 120.0 + (snap.combo as f64 * 8.0) % 240.0;
                self.particles.spawn_burst(cx, cy, hue, BURST_PARTICLES);
            }
            KeyOutcome::Incorrect => {
                self.particles.spawn_burst(cx, cy, 0.0, BURST_PARTICLES / 2);
            }
            _ => {}
        }
        if self.exercise.is_complete() {
            self.finish_run();
        }
    }

    fn finish_run(&mut self) {
        let run = self.exercise.finish();
        merge_run(&mut self.payload, &run);
        // Write-through after every mutation; a failed write never
        // interrupts the session.
        let _ = self.store.save(&self.payload);
        self.last_run = Some(run);
        self.state = AppState::Results;
    }

    fn on_tick(&mut self) {
        if let Some(frame) = self.frame_clock.tick() {
            self.particles.advance(frame.delta_ms as f64);
        }
        if self.state == AppState::Typing && self.exercise.is_complete() {
            self.finish_run();
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(cli);
    start_tui(&mut terminal, &mut app)?;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

#[derive(Debug)]
enum ExitType {
    Restart,
    New,
    Quit,
}

#[derive(Clone, Debug)]
enum TypelyEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let events = get_events();

    loop {
        let mut exit_type = ExitType::Quit;
        terminal.draw(|f| render(app, f))?;

        loop {
            match events.recv()? {
                TypelyEvent::Tick => {
                    app.on_tick();
                    if app.state == AppState::Typing || !app.particles.is_empty() {
                        terminal.draw(|f| render(app, f))?;
                    }
                }
                TypelyEvent::Resize => {
                    terminal.draw(|f| render(app, f))?;
                }
                TypelyEvent::Key(key) => {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break;
                    }

                    match app.state {
                        AppState::Typing => match key.code {
                            KeyCode::Esc => break,
                            KeyCode::Left => {
                                exit_type = ExitType::Restart;
                                break;
                            }
                            KeyCode::Right => {
                                exit_type = ExitType::New;
                                break;
                            }
                            code => {
                                if key.modifiers.contains(KeyModifiers::CONTROL)
                                    && code == KeyCode::Char('p')
                                {
                                    toggle_pause(app);
                                } else if let Some(label) = key_label(code) {
                                    let size = terminal.size().unwrap_or_default();
                                    app.handle_typing_key(&label, size.width, size.height);
                                }
                            }
                        },
                        AppState::Results => match key.code {
                            KeyCode::Esc => break,
                            KeyCode::Char('r') => {
                                exit_type = ExitType::Restart;
                                break;
                            }
                            KeyCode::Char('n') => {
                                exit_type = ExitType::New;
                                break;
                            }
                            _ => {}
                        },
                    }
                    terminal.draw(|f| render(app, f))?;
                }
            }
        }

        match exit_type {
            ExitType::Restart => app.reset_exercise(false),
            ExitType::New => app.reset_exercise(true),
            ExitType::Quit => break,
        }
    }

    Ok(())
}

fn toggle_pause(app: &mut App) {
    use crate::clock::SessionStatus;
    match app.exercise.status() {
        SessionStatus::Running => app.exercise.pause(),
        SessionStatus::Paused => app.exercise.resume(),
        SessionStatus::Idle => {}
    }
}

/// Maps a crossterm key code to the engine's raw key label. Keys with
/// no label are not typing input.
fn key_label(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Char(c) => Some(c.to_string()),
        KeyCode::Enter => Some("Enter".to_string()),
        KeyCode::Backspace => Some("Backspace".to_string()),
        KeyCode::Tab => Some("Tab".to_string()),
        _ => None,
    }
}

fn get_events() -> mpsc::Receiver<TypelyEvent> {
    let (tx, rx) = mpsc::channel();

    let ticks = IntervalTickSource::new(Duration::from_millis(TICK_RATE_MS));
    let tick_tx = tx.clone();
    thread::spawn(move || loop {
        match ticks.recv_timeout(Duration::from_secs(1)) {
            Ok(_) => {
                if tick_tx.send(TypelyEvent::Tick).is_err() {
                    break;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    });

    thread::spawn(move || loop {
        let evt = match event::read() {
            Ok(Event::Key(key)) => Some(TypelyEvent::Key(key)),
            Ok(Event::Resize(_, _)) => Some(TypelyEvent::Resize),
            Ok(_) => None,
            Err(_) => break,
        };

        if let Some(evt) = evt {
            if tx.send(evt).is_err() {
                break;
            }
        }
    });

    rx
}

fn render(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
