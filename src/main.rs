//! BLOCKFALL - falling blocks in the terminal

mod audio;
mod board;
mod clock;
mod game;
mod highscore;
mod input;
mod menu;
mod mode;
mod piece;
mod score;
mod settings;
mod tetromino;
mod ui;

use anyhow::Context;
use audio::MusicPlayer;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::Game;
use highscore::Ledger;
use input::{InputEvent, InputMap, Key};
use mode::App;
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::Settings;
use std::{
    io::{self, stdout},
    path::Path,
    time::{Duration, Instant},
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

const LOG_FILE: &str = "blockfall.log";

fn main() -> anyhow::Result<()> {
    let data_dir = Settings::data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;

    // Log to a file so the terminal UI stays clean
    let file_appender = tracing_appender::rolling::never(&data_dir, LOG_FILE);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blockfall=debug".parse()?),
        )
        .with_ansi(false)
        .init();

    tracing::info!(log = %data_dir.join(LOG_FILE).display(), "BLOCKFALL starting up");

    let settings = Settings::load();
    if let Err(e) = Settings::write_default_if_missing() {
        tracing::warn!("could not write default settings: {e}");
    }
    let scores_path = settings.high_scores_path();
    let ledger = Ledger::load(&scores_path)
        .with_context(|| format!("failed to load high scores from {}", scores_path.display()))?;

    let music = if settings.audio.music_enabled {
        let player = MusicPlayer::start(settings.audio.bgm_volume)
            .context("failed to start background music")?;
        Some(player)
    } else {
        None
    };

    let game = match settings.gameplay.seed {
        Some(seed) => Game::with_seed(seed),
        None => Game::new(),
    };
    let mut app = App::new(game, ledger);
    let input = InputMap::from_settings(&settings);

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app, &input, &settings, music);
    let outcome = save_then_report(result, app.ledger(), &scores_path);

    // Restore terminal before reporting anything
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome?;

    let score = app.game().score;
    println!("\nThanks for playing BLOCKFALL!");
    println!(
        "Last score: {} | Level: {} | Lines: {}",
        score.points, score.level, score.lines
    );
    tracing::info!("BLOCKFALL shutting down");

    Ok(())
}

/// Persist the ledger whatever happened in the frame loop, then report the
/// loop's error first if it had one
fn save_then_report(
    loop_result: io::Result<()>,
    ledger: &Ledger,
    path: &Path,
) -> anyhow::Result<()> {
    let saved = ledger
        .save(path)
        .with_context(|| format!("failed to save high scores to {}", path.display()));
    loop_result.context("terminal I/O failed")?;
    saved
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    input: &InputMap,
    settings: &Settings,
    mut music: Option<MusicPlayer>,
) -> io::Result<()> {
    let mut last_frame = Instant::now();

    while !app.should_quit() {
        terminal.draw(|frame| app.render(frame, settings))?;

        // Drain every pending key, waiting at most one frame for the first
        let mut timeout = FRAME_DURATION.saturating_sub(last_frame.elapsed());
        while event::poll(timeout)? {
            timeout = Duration::ZERO;
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if input::is_interrupt(&key) {
                tracing::info!("interrupted");
                return Ok(());
            }

            for event in input.translate(key) {
                if event == InputEvent::Key(Key::ToggleMusic) && !app.is_entering_name() {
                    if let Some(player) = music.as_mut() {
                        player.toggle();
                    }
                    continue;
                }
                app.handle_event(event);
            }
        }

        let now = Instant::now();
        app.update(now - last_frame);
        last_frame = now;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_saved_when_loop_fails() {
        let dir = std::env::temp_dir().join(format!("blockfall-exit-{}", std::process::id()));
        let path = dir.join("high_scores.txt");
        let mut ledger = Ledger::new();
        ledger.insert("ZED".to_string(), 4200);

        let failed = Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone"));
        let err = save_then_report(failed, &ledger, &path).unwrap_err();
        assert!(err.to_string().contains("terminal I/O failed"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ZED,4200\n");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_clean_exit_saves_ledger() {
        let dir = std::env::temp_dir().join(format!("blockfall-clean-{}", std::process::id()));
        let path = dir.join("high_scores.txt");
        let ledger = Ledger::new();

        save_then_report(Ok(()), &ledger, &path).unwrap();
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
