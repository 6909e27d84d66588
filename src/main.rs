mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::Print,
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use space_invaders::config::GameConfig;
use space_invaders::entities::{AudioCue, InputState};
use space_invaders::simulation::CombatSimulation;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈130 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// The terminal is in raw mode, so logs go to a file instead.
const LOG_FILE: &str = "space_invaders.log";

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum LoopExit {
    Quit,
    Restart,
}

/// Pull every pending event off the channel without blocking.  Non-key
/// events (resize, focus, mouse) are skipped; they must not hold back the
/// key events queued behind them.
fn drain_events(
    rx: &mpsc::Receiver<Event>,
    key_frame: &mut HashMap<KeyCode, u64>,
    frame: u64,
    cleared: bool,
) -> Option<LoopExit> {
    while let Ok(ev) = rx.try_recv() {
        let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
            continue;
        };
        match kind {
            KeyEventKind::Press => {
                key_frame.insert(code, frame);
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Some(LoopExit::Quit);
                    }
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Some(LoopExit::Quit);
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') if cleared => {
                        return Some(LoopExit::Restart);
                    }
                    _ => {}
                }
            }
            KeyEventKind::Repeat => {
                key_frame.insert(code, frame);
            }
            KeyEventKind::Release => {
                key_frame.remove(&code);
            }
        }
    }
    None
}

/// Run one wave until the player quits or restarts after clearing it.
///
/// Input model: a `key_frame` map records the frame of the last press/repeat
/// event for every key, and each frame reads which keys are still "fresh".
/// That lets Space and A/D be held together.  Keyboard-enhancement terminals
/// also report releases, which drop keys immediately.
fn game_loop<W: Write>(
    out: &mut W,
    config: &GameConfig,
    rx: &mpsc::Receiver<Event>,
) -> space_invaders::Result<LoopExit> {
    let mut rng = thread_rng();
    let start = Instant::now();
    let mut sim = CombatSimulation::new(config.clone(), 0.0, &mut rng);

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        if let Some(exit) = drain_events(rx, &mut key_frame, frame, sim.is_cleared()) {
            return Ok(exit);
        }

        let input = InputState {
            left: any_held(
                &key_frame,
                &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
                frame,
            ),
            right: any_held(
                &key_frame,
                &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
                frame,
            ),
            fire: is_held(&key_frame, &KeyCode::Char(' '), frame),
        };

        sim.tick(&input, start.elapsed().as_secs_f64(), &mut rng);

        for cue in sim.drain_audio() {
            match cue {
                AudioCue::PlayerShot if config.audio_bell => {
                    out.queue(Print('\x07'))?;
                }
                AudioCue::PlayerShot => {}
            }
        }

        let (width, height) = terminal::size()?;
        display::render(out, &sim, width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Without a log file, stay silent rather than scribble on the screen.
    if let Ok(file) = File::create(LOG_FILE) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
}

fn load_config() -> space_invaders::Result<GameConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let config = GameConfig::load(&path)?;
            info!(path = %path, "loaded config");
            Ok(config)
        }
        None => Ok(GameConfig::default()),
    }
}

fn main() -> space_invaders::Result<()> {
    init_logging();
    let config = load_config()?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for key-release events; other terminals fall back to HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking event reads live on their own thread so the frame loop never
    // waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &config, &rx);

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        warn!(error = %e, "game exited with error");
    }
    result
}

fn run<W: Write>(
    out: &mut W,
    config: &GameConfig,
    rx: &mpsc::Receiver<Event>,
) -> space_invaders::Result<()> {
    loop {
        match game_loop(out, config, rx)? {
            LoopExit::Quit => break,
            LoopExit::Restart => info!("restarting wave"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn keys_behind_non_key_events_are_read_same_frame() {
        let (tx, rx) = mpsc::channel();
        tx.send(Event::Resize(80, 24)).unwrap();
        tx.send(Event::FocusGained).unwrap();
        tx.send(press(KeyCode::Char(' '))).unwrap();
        tx.send(press(KeyCode::Left)).unwrap();

        let mut key_frame = HashMap::new();
        assert_eq!(drain_events(&rx, &mut key_frame, 5, false), None);
        assert!(is_held(&key_frame, &KeyCode::Char(' '), 5));
        assert!(is_held(&key_frame, &KeyCode::Left, 5));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn quit_after_resize_is_honoured() {
        let (tx, rx) = mpsc::channel();
        tx.send(Event::Resize(100, 30)).unwrap();
        tx.send(press(KeyCode::Char('q'))).unwrap();

        let mut key_frame = HashMap::new();
        assert_eq!(drain_events(&rx, &mut key_frame, 1, false), Some(LoopExit::Quit));
    }

    #[test]
    fn restart_only_once_cleared() {
        let (tx, rx) = mpsc::channel();
        tx.send(press(KeyCode::Char('r'))).unwrap();
        let mut key_frame = HashMap::new();
        assert_eq!(drain_events(&rx, &mut key_frame, 1, false), None);

        tx.send(press(KeyCode::Char('r'))).unwrap();
        assert_eq!(drain_events(&rx, &mut key_frame, 2, true), Some(LoopExit::Restart));
    }
}
