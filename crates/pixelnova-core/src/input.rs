//! Pointer and keyboard events, and the keyboard shortcut table.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::tools::ToolKind;

/// Pointer button identifiers, numbered like DOM `MouseEvent.button`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other(u8),
}

impl PointerButton {
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => PointerButton::Primary,
            1 => PointerButton::Middle,
            2 => PointerButton::Secondary,
            n => PointerButton::Other(n),
        }
    }

    /// Buttons that start a drawing stroke.
    pub fn is_stroke_button(self) -> bool {
        matches!(self, PointerButton::Primary | PointerButton::Secondary)
    }
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    pub const CTRL_SHIFT: Self = Self {
        shift: true,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer events in screen coordinates (CSS pixels relative to the canvas element).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: PointerButton,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        button: PointerButton,
    },
    /// The pointer left the canvas element.
    Leave,
    Wheel {
        position: Point,
        delta_y: f64,
    },
}

/// Keyboard event. `key` uses DOM key names ("b", "Escape", " ").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed {
        key: String,
        modifiers: Modifiers,
        repeat: bool,
    },
    Released {
        key: String,
    },
}

impl KeyEvent {
    pub fn pressed(key: impl Into<String>) -> Self {
        KeyEvent::Pressed {
            key: key.into(),
            modifiers: Modifiers::NONE,
            repeat: false,
        }
    }

    pub fn pressed_with(key: impl Into<String>, modifiers: Modifiers) -> Self {
        KeyEvent::Pressed {
            key: key.into(),
            modifiers,
            repeat: false,
        }
    }

    pub fn released(key: impl Into<String>) -> Self {
        KeyEvent::Released { key: key.into() }
    }
}

pub fn is_space(key: &str) -> bool {
    key == " " || key.eq_ignore_ascii_case("space") || key.eq_ignore_ascii_case("spacebar")
}

/// Editor actions bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectTool(ToolKind),
    Undo,
    Redo,
    Copy,
    Paste,
    ClearSelection,
    DeleteSelection,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub command: Command,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: Command,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == modifiers.command()
            && (!self.ctrl || self.shift == modifiers.shift)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        let mut shortcuts: Vec<Shortcut> = ToolKind::ALL
            .iter()
            .map(|&kind| {
                Shortcut::new(
                    kind.shortcut(),
                    false,
                    false,
                    Command::SelectTool(kind),
                    kind.name(),
                )
            })
            .collect();
        shortcuts.extend([
            Shortcut::new("Z", true, false, Command::Undo, "Undo"),
            Shortcut::new("Z", true, true, Command::Redo, "Redo"),
            Shortcut::new("Y", true, false, Command::Redo, "Redo"),
            Shortcut::new("C", true, false, Command::Copy, "Copy selection"),
            Shortcut::new("V", true, false, Command::Paste, "Paste selection"),
            Shortcut::new("Escape", false, false, Command::ClearSelection, "Clear selection"),
            Shortcut::new("Delete", false, false, Command::DeleteSelection, "Delete selection"),
            Shortcut::new("Backspace", false, false, Command::DeleteSelection, "Delete selection"),
        ]);
        shortcuts
    }

    /// Resolve a key press to a command.
    pub fn lookup(key: &str, modifiers: Modifiers) -> Option<Command> {
        Self::all()
            .into_iter()
            .find(|s| s.matches(key, modifiers))
            .map(|s| s.command)
    }
}
