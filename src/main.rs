/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod store;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::grid::MAX_LEVEL;
use sim::attempt::Attempt;
use sim::event::AttemptEvent;
use store::cipher::XorCipher;
use store::leaderboard::Leaderboard;
use store::profile::PlayerProfile;
use store::progress::ProgressStore;
use store::session::SessionStore;
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(16);
const CLOCK_TICK: Duration = Duration::from_secs(1);

/// Seconds the win screen waits before advancing on its own.
const AUTO_NEXT_SECONDS: u32 = 5;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Login,
    Dashboard,
    Playing,
    Won,
    Lost,
}

/// Front-end state handed read-only to the renderer.
pub struct App {
    pub phase: Phase,
    /// Login prompt text buffer.
    pub input_buffer: String,
    pub profile: PlayerProfile,
    pub attempt: Option<Attempt>,
    /// Grid cell the cursor is on.
    pub cursor: usize,
    /// Source cell picked up, waiting for a target.
    pub selected: Option<usize>,
    pub board: Leaderboard,
    pub message: String,
    pub message_timer: u32,
    /// Win-screen countdown to the next level.
    pub auto_next: u32,
    /// Score gained by the last won attempt, for the win screen.
    pub last_delta: i64,
}

impl App {
    fn new(board: Leaderboard) -> Self {
        App {
            phase: Phase::Login,
            input_buffer: String::new(),
            profile: PlayerProfile::new(""),
            attempt: None,
            cursor: 0,
            selected: None,
            board,
            message: String::new(),
            message_timer: 0,
            auto_next: 0,
            last_delta: 0,
        }
    }

    fn set_message(&mut self, msg: &str, seconds: u32) {
        self.message = msg.to_string();
        self.message_timer = seconds;
    }
}

fn main() {
    let config = match GameConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            std::process::exit(1);
        }
    };
    let cipher = match XorCipher::new(&config.secret) {
        Ok(cipher) => cipher,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            std::process::exit(1);
        }
    };

    let mut store = ProgressStore::new(&config.data_dir, cipher.clone());
    let session = SessionStore::new(&config.data_dir, cipher);
    let board = Leaderboard::new(&mut store);

    let mut app = App::new(board);
    if let Some(identity) = session.current_identity() {
        // Valid session from a previous run: skip the login prompt.
        app.profile = store.load(&identity);
        app.phase = Phase::Dashboard;
    }

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut app, &store, &session, &mut renderer);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing TileShift!");
    println!("Total Score: {}", app.profile.total_score);
}

fn game_loop(
    app: &mut App,
    store: &ProgressStore,
    session: &SessionStore,
    renderer: &mut Renderer,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_input(app, store, session, &kb) {
            break;
        }

        // 1 Hz clock: the only wall-time suspension point. Everything
        // downstream sees an explicit tick.
        if last_tick.elapsed() >= CLOCK_TICK {
            tick_second(app, store);
            last_tick = Instant::now();
        }

        // Same-process store writes show up here, frame after write.
        app.board.refresh_if_changed(store);

        renderer.render(app)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// One second of game time: countdown, win-screen auto-advance,
/// message expiry.
fn tick_second(app: &mut App, store: &ProgressStore) {
    match app.phase {
        Phase::Playing => {
            let event = app.attempt.as_mut().and_then(|a| a.tick());
            if let Some(event) = event {
                process_event(app, store, event);
            }
        }
        Phase::Won => {
            app.auto_next = app.auto_next.saturating_sub(1);
            if app.auto_next == 0 {
                advance_level(app, store);
            }
        }
        _ => {}
    }

    if app.message_timer > 0 {
        app.message_timer -= 1;
        if app.message_timer == 0 {
            app.message.clear();
        }
    }
}

/// React to an attempt event: persist outcomes, switch phases.
fn process_event(app: &mut App, store: &ProgressStore, event: AttemptEvent) {
    match event {
        AttemptEvent::IncorrectMove { .. } => {
            app.set_message("Wrong spot: -10 seconds", 2);
        }
        AttemptEvent::CorrectPlacement { .. } => {}
        AttemptEvent::Won => {
            let delta = app.attempt.as_ref().map(|a| a.score_delta()).unwrap_or(0);
            app.last_delta = delta;
            app.profile = store.update_score(&app.profile, app.profile.total_score + delta);
            app.auto_next = AUTO_NEXT_SECONDS;
            app.phase = Phase::Won;
        }
        AttemptEvent::Lost => {
            app.profile = store.register_loss(&app.profile);
            if app.profile.loss_count == 0 {
                app.set_message("Third loss in a row: progress reset", 5);
            }
            app.phase = Phase::Lost;
        }
    }
}

fn start_attempt(app: &mut App) {
    let level = app.profile.level.min(MAX_LEVEL);
    app.attempt = Some(Attempt::new(level, &mut rand::thread_rng()));
    app.cursor = 0;
    app.selected = None;
    app.phase = Phase::Playing;
}

/// Leave the win screen for the next level (level-up is persisted and
/// resets the loss streak; level 11 replays itself).
fn advance_level(app: &mut App, store: &ProgressStore) {
    if app.profile.level < MAX_LEVEL {
        app.profile = store.increment_level(&app.profile);
    }
    start_attempt(app);
}

/// Abandon the running attempt, cancelling its countdown. The board
/// is rebuilt on entry to also pick up writes by other processes,
/// which the in-process change signal cannot see.
fn to_dashboard(app: &mut App, store: &ProgressStore) {
    app.attempt = None;
    app.selected = None;
    app.board.rebuild(store);
    app.phase = Phase::Dashboard;
}

const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];

fn handle_input(
    app: &mut App,
    store: &ProgressStore,
    session: &SessionStore,
    kb: &InputState,
) -> bool {
    let confirm = kb.any_pressed(KEYS_CONFIRM);
    let esc = kb.was_pressed(KeyCode::Esc);

    match app.phase {
        // ── Login ──
        Phase::Login => {
            for c in kb.typed_chars() {
                if !c.is_control() && app.input_buffer.len() < 40 {
                    app.input_buffer.push(c);
                }
            }
            if kb.was_pressed(KeyCode::Backspace) {
                app.input_buffer.pop();
            }
            if kb.was_pressed(KeyCode::Enter) {
                let identity = app.input_buffer.trim().to_string();
                if identity.is_empty() {
                    // Guest play: default profile, nothing on the board.
                    app.profile = PlayerProfile::new("");
                    app.set_message("Playing as guest: progress won't be ranked", 4);
                } else {
                    session.login(&identity);
                    app.profile = store.load(&identity);
                }
                app.input_buffer.clear();
                app.board.rebuild(store);
                app.phase = Phase::Dashboard;
            } else if esc {
                return true;
            }
        }

        // ── Dashboard ──
        Phase::Dashboard => {
            if confirm {
                start_attempt(app);
            } else if kb.any_pressed(&[KeyCode::Char('o'), KeyCode::Char('O')]) {
                session.logout();
                app.profile = PlayerProfile::new("");
                app.phase = Phase::Login;
            } else if esc || kb.any_pressed(&[KeyCode::Char('q'), KeyCode::Char('Q')]) {
                return true;
            }
        }

        // ── Playing ──
        Phase::Playing => {
            let side = match &app.attempt {
                Some(attempt) => attempt.grid.side(),
                None => return false,
            };
            let cells = side * side;

            if kb.was_pressed(KeyCode::Left) && app.cursor % side > 0 {
                app.cursor -= 1;
            }
            if kb.was_pressed(KeyCode::Right) && app.cursor % side + 1 < side {
                app.cursor += 1;
            }
            if kb.was_pressed(KeyCode::Up) && app.cursor >= side {
                app.cursor -= side;
            }
            if kb.was_pressed(KeyCode::Down) && app.cursor + side < cells {
                app.cursor += side;
            }

            if confirm {
                match app.selected.take() {
                    None => app.selected = Some(app.cursor),
                    Some(source) => {
                        let target = app.cursor;
                        let events = app
                            .attempt
                            .as_mut()
                            .map(|a| a.apply_move(source, target))
                            .unwrap_or_default();
                        for event in events {
                            process_event(app, store, event);
                        }
                    }
                }
            } else if kb.any_pressed(&[KeyCode::Char('r'), KeyCode::Char('R')]) {
                if let Some(attempt) = app.attempt.as_mut() {
                    attempt.restart(&mut rand::thread_rng());
                    app.selected = None;
                    app.cursor = 0;
                    app.set_message("Level restarted", 2);
                }
            } else if esc {
                if app.selected.is_some() {
                    app.selected = None;
                } else {
                    to_dashboard(app, store);
                }
            }
        }

        // ── Won ──
        Phase::Won => {
            if confirm {
                advance_level(app, store);
            } else if esc {
                to_dashboard(app, store);
            }
        }

        // ── Lost ──
        Phase::Lost => {
            if confirm || kb.any_pressed(&[KeyCode::Char('r'), KeyCode::Char('R')]) {
                start_attempt(app);
            } else if esc {
                to_dashboard(app, store);
            }
        }
    }

    false
}
