/// Keyboard stand-in for the analog stick, speed knob and fire button.
///
/// Input model: the reader thread records when each key was last seen
/// (press or repeat). A key counts as held while that stamp is younger
/// than `HOLD_WINDOW`. Terminals that report key releases drop the key
/// immediately; classic terminals let it expire, which is shorter than
/// the OS repeat interval, so the key stays live while it is generating
/// repeats.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use pixel_raider::{Controls, InputSample, Signals, Source};

const HOLD_WINDOW: Duration = Duration::from_millis(130);

/// Speed knob steps, in hundredths.
const SPEED_STEP: u32 = 10;
const SPEED_DEFAULT: u32 = 10;

#[derive(Debug)]
pub struct KeyboardControls {
    key_seen: Mutex<HashMap<KeyCode, Instant>>,
    speed: AtomicU32,
}

impl Default for KeyboardControls {
    fn default() -> Self {
        Self {
            key_seen: Mutex::new(HashMap::new()),
            speed: AtomicU32::new(SPEED_DEFAULT),
        }
    }
}

impl KeyboardControls {
    fn is_held(seen: &HashMap<KeyCode, Instant>, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| seen.get(k).is_some_and(|t| t.elapsed() <= HOLD_WINDOW))
    }

    fn press(&self, code: KeyCode) {
        let mut seen = self.key_seen.lock().unwrap_or_else(PoisonError::into_inner);
        seen.insert(code, Instant::now());
    }

    fn release(&self, code: KeyCode) {
        let mut seen = self.key_seen.lock().unwrap_or_else(PoisonError::into_inner);
        seen.remove(&code);
    }

    fn nudge_speed(&self, faster: bool) {
        let _ = self.speed.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| {
            Some(if faster {
                s.saturating_sub(SPEED_STEP)
            } else {
                (s + SPEED_STEP).min(100)
            })
        });
    }
}

impl Controls for KeyboardControls {
    fn sample(&self) -> InputSample {
        let seen = self.key_seen.lock().unwrap_or_else(PoisonError::into_inner);
        let axis = |low: &[KeyCode], high: &[KeyCode]| {
            match (Self::is_held(&seen, low), Self::is_held(&seen, high)) {
                (true, false) => 0.0,
                (false, true) => 1.0,
                _ => 0.5,
            }
        };
        InputSample {
            x: axis(
                &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
                &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            ),
            y: axis(
                &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')],
                &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')],
            ),
            speed: self.speed.load(Ordering::Relaxed) as f32 / 100.0,
        }
    }
}

/// Dedicate a thread to blocking event reads. It only records keys and
/// raises signals; the engine does everything else.
pub fn spawn_reader(controls: Arc<KeyboardControls>, signals: Arc<Signals>) {
    thread::spawn(move || loop {
        let Ok(event) = event::read() else {
            signals.request_quit();
            break;
        };
        let Event::Key(KeyEvent { code, kind, modifiers, .. }) = event else {
            continue;
        };
        match kind {
            KeyEventKind::Press => {
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        signals.request_quit();
                        break;
                    }
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        signals.request_quit();
                        break;
                    }
                    KeyCode::Char(' ') => signals.raise(Source::Button),
                    KeyCode::Char('+') | KeyCode::Char('=') => controls.nudge_speed(true),
                    KeyCode::Char('-') => controls.nudge_speed(false),
                    _ => {}
                }
                controls.press(code);
            }
            KeyEventKind::Repeat => controls.press(code),
            KeyEventKind::Release => controls.release(code),
        }
    });
}
