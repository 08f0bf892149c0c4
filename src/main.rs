//! Console front-end for racing chess.
//!
//! Reads coordinate moves (`e2e4`) and a few commands from stdin while the
//! match clock runs in the background. An optional AI plays one side from its
//! own thread; `--self-play` lets two AIs play each other.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use racing_chess::engines::evaluator::Evaluator;
use racing_chess::errors::RacingChessError;
use racing_chess::game_state::chess_types::{AiDifficulty, Color, MatchState};
use racing_chess::game_state::match_settings::{AiSettings, LayoutChoice, MatchSettings};
use racing_chess::match_control::match_controller::{LayoutSource, MatchController};
use racing_chess::match_control::match_session::MatchSession;
use racing_chess::utils::algebraic::{algebraic_to_position, position_to_algebraic};

#[derive(Parser, Debug)]
#[command(author, version, about = "Real-time racing chess in the terminal", long_about = None)]
struct Args {
    /// JSON settings file; the flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// White cooldown after each move, in seconds.
    #[arg(long)]
    white_cooldown: Option<f64>,

    /// Black cooldown after each move, in seconds.
    #[arg(long)]
    black_cooldown: Option<f64>,

    /// Tick period in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Placement descriptor, or "standard".
    #[arg(long)]
    layout: Option<String>,

    /// Enable the AI opponent at this difficulty.
    #[arg(long, value_enum)]
    ai: Option<DifficultyArg>,

    /// Side the AI plays.
    #[arg(long, value_enum, default_value_t = ColorArg::Black)]
    ai_color: ColorArg,

    /// Let two AIs play each other and print the board as they go.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    self_play: bool,

    /// Seed for reproducible AI choices.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl From<DifficultyArg> for AiDifficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => AiDifficulty::Easy,
            DifficultyArg::Medium => AiDifficulty::Medium,
            DifficultyArg::Hard => AiDifficulty::Hard,
            DifficultyArg::Expert => AiDifficulty::Expert,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ColorArg {
    White,
    Black,
}

impl From<ColorArg> for Color {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::White => Color::White,
            ColorArg::Black => Color::Black,
        }
    }
}

fn build_settings(args: &Args) -> Result<MatchSettings, RacingChessError> {
    let mut settings = match &args.config {
        Some(path) => MatchSettings::from_json_file(path)?,
        None => MatchSettings::default(),
    };

    if let Some(tick_ms) = args.tick_ms {
        settings.tick_period_ms = tick_ms.max(1);
    }
    if let Some(seconds) = args.white_cooldown {
        settings.white_cooldown_ticks =
            MatchSettings::cooldown_ticks_from_seconds(seconds, settings.tick_period_ms);
    }
    if let Some(seconds) = args.black_cooldown {
        settings.black_cooldown_ticks =
            MatchSettings::cooldown_ticks_from_seconds(seconds, settings.tick_period_ms);
    }
    if let Some(layout) = &args.layout {
        settings.layout = LayoutChoice::from_text(layout);
    }
    if let Some(difficulty) = args.ai {
        settings.ai = Some(AiSettings {
            difficulty: difficulty.into(),
            color: args.ai_color.into(),
        });
    }
    Ok(settings)
}

/// Play `evaluator`'s colour until the match ends or `stop` is raised.
fn spawn_ai_player(
    controller: Arc<MatchController>,
    mut evaluator: Evaluator,
    stop: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let period = controller.tick_period();
        while !stop.load(Ordering::Relaxed) {
            let snapshot = controller.snapshot();
            if snapshot.state.is_finished() {
                break;
            }
            if snapshot.state == MatchState::Active {
                if let Some(mv) = evaluator.best_move(&snapshot) {
                    controller.submit_move(mv.piece_id, mv.to);
                }
            }
            thread::sleep(period);
        }
    })
}

fn ai_for(settings: &AiSettings, seed: Option<u64>) -> Evaluator {
    match seed {
        Some(seed) => Evaluator::with_seed(settings.difficulty, settings.color, seed),
        None => Evaluator::new(settings.difficulty, settings.color),
    }
}

fn run_self_play(settings: MatchSettings, seed: Option<u64>) -> io::Result<()> {
    let difficulty = settings
        .ai
        .map_or(AiDifficulty::Medium, |ai| ai.difficulty);
    let session = MatchSession::new(MatchSettings {
        ai: None,
        ..settings
    });
    let stop = Arc::new(AtomicBool::new(false));

    let players: Vec<JoinHandle<()>> = [Color::White, Color::Black]
        .into_iter()
        .enumerate()
        .map(|(offset, color)| {
            let ai = ai_for(
                &AiSettings { difficulty, color },
                seed.map(|s| s.wrapping_add(offset as u64)),
            );
            spawn_ai_player(Arc::clone(session.controller()), ai, Arc::clone(&stop))
        })
        .collect();

    let mut stdout = io::stdout();
    while !session.is_game_over() {
        writeln!(stdout, "{}\n", session.render())?;
        stdout.flush()?;
        thread::sleep(Duration::from_millis(500));
    }
    stop.store(true, Ordering::Relaxed);
    for player in players {
        if player.join().is_err() {
            error!("ai player thread panicked");
        }
    }

    writeln!(stdout, "{}\n", session.render())?;
    writeln!(stdout, "winner: {:?}", session.winner())?;
    Ok(())
}

fn run_console(settings: MatchSettings, seed: Option<u64>) -> io::Result<()> {
    let ai_settings = settings.ai;
    let mut session = MatchSession::with_observer(settings, |state| {
        println!("match state: {state:?}");
    });
    if let LayoutSource::StandardFallback(err) = session.layout_source() {
        println!("layout rejected ({err}); playing the standard position");
    }

    let stop = Arc::new(AtomicBool::new(false));
    let ai_player = ai_settings.map(|ai| {
        info!(color = %ai.color, difficulty = ?ai.difficulty, "ai opponent enabled");
        spawn_ai_player(
            Arc::clone(session.controller()),
            ai_for(&ai, seed),
            Arc::clone(&stop),
        )
    });

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", session.render())?;
    writeln!(stdout, "type 'help' for commands")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        let should_quit = handle_command(&mut session, &line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            break;
        }
    }

    stop.store(true, Ordering::Relaxed);
    if let Some(handle) = ai_player {
        if handle.join().is_err() {
            error!("ai player thread panicked");
        }
    }
    Ok(())
}

fn handle_command(
    session: &mut MatchSession,
    line: &str,
    out: &mut impl Write,
) -> io::Result<bool> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(false);
    }

    let mut parts = trimmed.split_whitespace();
    let cmd = parts.next().unwrap_or_default();

    match cmd {
        "help" => {
            writeln!(out, "e2e4            move a piece")?;
            writeln!(out, "moves <square>  legal targets of a piece")?;
            writeln!(out, "board           show the board (* = cooling down)")?;
            writeln!(out, "layout          print the placement descriptor")?;
            writeln!(out, "pause | resume  stop or restart the clock")?;
            writeln!(out, "restart [desc]  new match, standard or given layout")?;
            writeln!(out, "quit")?;
        }
        "board" => writeln!(out, "{}", session.render())?,
        "layout" => writeln!(out, "{}", session.controller().layout_descriptor())?,
        "moves" => {
            let square = parts.next().unwrap_or_default();
            match algebraic_to_position(square) {
                Ok(position) => {
                    let controller = session.controller();
                    let targets: Vec<String> = controller
                        .piece_at(position)
                        .map(|piece| controller.legal_targets(piece.id))
                        .unwrap_or_default()
                        .into_iter()
                        .map(position_to_algebraic)
                        .collect();
                    writeln!(out, "{}", targets.join(" "))?;
                }
                Err(err) => writeln!(out, "{err}")?,
            }
        }
        "pause" => {
            if !session.pause() {
                writeln!(out, "match is not running")?;
            }
        }
        "resume" => {
            if !session.resume() {
                writeln!(out, "match is not paused")?;
            }
        }
        "restart" => {
            let layout = LayoutChoice::from_text(&parts.collect::<Vec<_>>().join(" "));
            if let LayoutSource::StandardFallback(err) = session.restart(layout) {
                writeln!(out, "layout rejected ({err}); playing the standard position")?;
            }
            writeln!(out, "{}", session.render())?;
        }
        "quit" | "exit" => return Ok(true),
        _ => match session.make_move_notation(trimmed) {
            Ok(true) => {
                writeln!(out, "{}", session.render())?;
                if let Some(winner) = session.winner() {
                    writeln!(out, "{winner} wins")?;
                }
            }
            Ok(false) => writeln!(out, "move rejected")?,
            Err(err) => writeln!(out, "{err}")?,
        },
    }

    Ok(false)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let settings = match build_settings(&args) {
        Ok(settings) => settings,
        Err(err) => {
            error!(%err, "could not load settings");
            std::process::exit(2);
        }
    };

    let result = if args.self_play {
        run_self_play(settings, args.seed)
    } else {
        run_console(settings, args.seed)
    };
    if let Err(err) = result {
        error!(%err, "console i/o failed");
        std::process::exit(1);
    }
}
