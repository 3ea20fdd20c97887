//! Key handling: crossterm key events in, game actions out.
//!
//! Terminals differ in whether they report key releases. With release
//! reporting a key is held from press to release; without it a key counts as
//! held for [`HOLD_LATCH`] after its last press or auto-repeat.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

pub const HOLD_LATCH: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    TurnLeft,
    TurnRight,
    ThrustForward,
    ThrustBack,
    Fire,
    Pause,
    Back,
    MenuUp,
    MenuDown,
    Confirm,
}

/// Actions bound to a key. Arrow keys double as menu navigation.
pub fn actions_for(code: KeyCode) -> &'static [Action] {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => &[Action::TurnLeft],
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => &[Action::TurnRight],
        KeyCode::Up => &[Action::ThrustForward, Action::MenuUp],
        KeyCode::Char('w') | KeyCode::Char('W') => &[Action::ThrustForward, Action::MenuUp],
        KeyCode::Down => &[Action::ThrustBack, Action::MenuDown],
        KeyCode::Char('s') | KeyCode::Char('S') => &[Action::ThrustBack, Action::MenuDown],
        KeyCode::Char(' ') => &[Action::Fire],
        KeyCode::Char('p') | KeyCode::Char('P') => &[Action::Pause],
        KeyCode::Esc => &[Action::Back],
        KeyCode::Enter => &[Action::Confirm],
        _ => &[],
    }
}

/// Held-key state for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    held: HashSet<Action>,
}

impl KeySnapshot {
    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            held: actions.into_iter().collect(),
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }
}

#[derive(Debug, Default)]
pub struct InputTracker {
    last_seen: HashMap<Action, Instant>,
    releases_reported: bool,
}

impl InputTracker {
    pub fn new(releases_reported: bool) -> Self {
        Self {
            last_seen: HashMap::new(),
            releases_reported,
        }
    }

    /// Record a key event and return the actions it newly presses, which the
    /// caller forwards as discrete events. Repeats and releases return none.
    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Action> {
        let actions = actions_for(key.code);
        match key.kind {
            KeyEventKind::Press => {
                for &action in actions {
                    self.last_seen.insert(action, now);
                }
                actions.to_vec()
            }
            KeyEventKind::Repeat => {
                for &action in actions {
                    self.last_seen.insert(action, now);
                }
                Vec::new()
            }
            KeyEventKind::Release => {
                self.releases_reported = true;
                for action in actions {
                    self.last_seen.remove(action);
                }
                Vec::new()
            }
        }
    }

    pub fn snapshot(&self, now: Instant) -> KeySnapshot {
        let held = self
            .last_seen
            .iter()
            .filter(|(_, seen)| {
                self.releases_reported || now.saturating_duration_since(**seen) < HOLD_LATCH
            })
            .map(|(&action, _)| action)
            .collect();
        KeySnapshot { held }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn press_yields_discrete_actions() {
        let mut tracker = InputTracker::new(false);
        let now = Instant::now();
        let pressed = tracker.on_key(key(KeyCode::Up, KeyEventKind::Press), now);
        assert_eq!(pressed, vec![Action::ThrustForward, Action::MenuUp]);
        assert!(tracker
            .on_key(key(KeyCode::Up, KeyEventKind::Repeat), now)
            .is_empty());
        assert!(tracker.on_key(key(KeyCode::Char('x'), KeyEventKind::Press), now).is_empty());
    }

    #[test]
    fn latch_expires_without_release_events() {
        let mut tracker = InputTracker::new(false);
        let t0 = Instant::now();
        tracker.on_key(key(KeyCode::Left, KeyEventKind::Press), t0);
        assert!(tracker.snapshot(t0).is_held(Action::TurnLeft));
        assert!(!tracker
            .snapshot(t0 + HOLD_LATCH + Duration::from_millis(1))
            .is_held(Action::TurnLeft));
    }

    #[test]
    fn release_events_end_hold() {
        let mut tracker = InputTracker::new(true);
        let t0 = Instant::now();
        tracker.on_key(key(KeyCode::Char(' '), KeyEventKind::Press), t0);
        let later = t0 + Duration::from_secs(2);
        assert!(tracker.snapshot(later).is_held(Action::Fire));
        tracker.on_key(key(KeyCode::Char(' '), KeyEventKind::Release), later);
        assert!(!tracker.snapshot(later).is_held(Action::Fire));
    }
}
