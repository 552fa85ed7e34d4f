//! Global keyboard shortcuts.
//!
//! A [`KeyboardSurface`] stands for the UI surface that owns the global key
//! listener. [`KeyboardSurface::attach`] registers a set of bindings and
//! returns a [`ShortcutGuard`]; the bindings are live until the guard is
//! dropped. Matched chords run the bound store action and report that the
//! platform default should be suppressed.

use crate::config::Routes;
use crate::error::{Pm33Error, Result};
use crate::listener::{Registration, Registry};
use crate::store::WorkflowStore;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

static CHORD_RE: OnceLock<Regex> = OnceLock::new();

fn chord_re() -> &'static Regex {
    CHORD_RE.get_or_init(|| {
        Regex::new(
            r"^(?:(?:ctrl|control|cmd|command|meta|mod|shift|alt|option)\+)*[a-z0-9]$",
        )
        .unwrap()
    })
}

impl KeyEvent {
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Parse chords such as `ctrl+k`, `cmd+K`, `mod+shift+w`.
    /// `mod` means Ctrl; `cmd`/`command`/`meta` mean Meta.
    pub fn parse(chord: &str) -> Result<Self> {
        let normalized: String = chord
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        if !chord_re().is_match(&normalized) {
            return Err(Pm33Error::InvalidChord(chord.to_string()));
        }

        let mut event = KeyEvent::default();
        let mut parts: Vec<&str> = normalized.split('+').collect();
        let key = parts.pop().unwrap_or_default();
        for modifier in parts {
            match modifier {
                "ctrl" | "control" | "mod" => event.ctrl = true,
                "cmd" | "command" | "meta" => event.meta = true,
                "shift" => event.shift = true,
                _ => event.alt = true,
            }
        }
        event.key = key.to_string();
        Ok(event)
    }

    /// Cmd on macOS, Ctrl elsewhere.
    pub fn has_command_modifier(&self) -> bool {
        self.ctrl || self.meta
    }
}

impl std::str::FromStr for KeyEvent {
    type Err = Pm33Error;

    fn from_str(s: &str) -> Result<Self> {
        KeyEvent::parse(s)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.meta {
            f.write_str("cmd+")?;
        }
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.alt {
            f.write_str("alt+")?;
        }
        if self.shift {
            f.write_str("shift+")?;
        }
        f.write_str(&self.key)
    }
}

// ---------------------------------------------------------------------------
// Shortcuts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShortcutAction {
    ToggleCommandPalette,
    /// Go to `route` and count it as a power-user action.
    Navigate { route: String },
    /// Count a power-user action; the sync itself runs elsewhere.
    SyncIntegrations,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shortcut {
    pub key: char,
    pub description: &'static str,
    pub action: ShortcutAction,
}

impl Shortcut {
    /// Cmd/Ctrl plus the bound key and nothing else; Shift or Alt on top of
    /// the chord do not match.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if !event.has_command_modifier() || event.shift || event.alt {
            return false;
        }
        let mut chars = event.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c.eq_ignore_ascii_case(&self.key),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortcutBindings {
    shortcuts: Vec<Shortcut>,
}

impl ShortcutBindings {
    pub fn new(shortcuts: Vec<Shortcut>) -> Self {
        Self { shortcuts }
    }

    /// Cmd/Ctrl + K, H, N, J, W.
    pub fn defaults(routes: &Routes) -> Self {
        Self::new(vec![
            Shortcut {
                key: 'k',
                description: "Toggle command palette",
                action: ShortcutAction::ToggleCommandPalette,
            },
            Shortcut {
                key: 'h',
                description: "Go to command center",
                action: ShortcutAction::Navigate {
                    route: routes.command_center.clone(),
                },
            },
            Shortcut {
                key: 'n',
                description: "Go to strategic intelligence",
                action: ShortcutAction::Navigate {
                    route: routes.strategic_intelligence.clone(),
                },
            },
            Shortcut {
                key: 'j',
                description: "Sync integrations",
                action: ShortcutAction::SyncIntegrations,
            },
            Shortcut {
                key: 'w',
                description: "Open workflow view",
                action: ShortcutAction::Navigate {
                    route: routes.workflow.clone(),
                },
            },
        ])
    }

    pub fn find(&self, event: &KeyEvent) -> Option<&Shortcut> {
        self.shortcuts.iter().find(|s| s.matches(event))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shortcut> {
        self.shortcuts.iter()
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Opaque "go to this route" capability supplied by the host.
pub trait Navigator {
    fn navigate(&mut self, route: &str);
}

/// Remembers every route it was asked to visit.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    pub visited: Vec<String>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, route: &str) {
        self.visited.push(route.to_string());
    }
}

// ---------------------------------------------------------------------------
// KeyboardSurface
// ---------------------------------------------------------------------------

pub type ShortcutGuard = Registration<ShortcutBindings>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Handled {
        action: ShortcutAction,
        prevent_default: bool,
    },
    Ignored,
}

impl Dispatch {
    pub fn is_handled(&self) -> bool {
        matches!(self, Dispatch::Handled { .. })
    }
}

#[derive(Debug, Default)]
pub struct KeyboardSurface {
    listeners: Registry<ShortcutBindings>,
}

impl KeyboardSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start listening with `bindings` until the returned guard is dropped.
    pub fn attach(&self, bindings: ShortcutBindings) -> ShortcutGuard {
        let guard = self.listeners.register(bindings.into());
        tracing::debug!(listener = guard.id(), "keyboard listener attached");
        guard
    }

    pub fn is_listening(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Run the first binding that matches `event`. Ignored when nothing is
    /// attached or no chord matches.
    pub fn dispatch(
        &self,
        event: &KeyEvent,
        store: &mut WorkflowStore,
        navigator: &mut dyn Navigator,
    ) -> Dispatch {
        let action = self
            .listeners
            .snapshot()
            .iter()
            .find_map(|bindings| bindings.find(event).map(|s| s.action.clone()));

        let Some(action) = action else {
            return Dispatch::Ignored;
        };

        tracing::debug!(chord = %event, ?action, "shortcut matched");
        match &action {
            ShortcutAction::ToggleCommandPalette => store.toggle_command_palette(),
            ShortcutAction::Navigate { route } => {
                navigator.navigate(route);
                store.record_power_user_action();
            }
            ShortcutAction::SyncIntegrations => store.record_power_user_action(),
        }

        Dispatch::Handled {
            action,
            prevent_default: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
