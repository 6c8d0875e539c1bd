//! Keyboard command parsing.
//!
//! A two-state parser: either idle, or holding the first key of a chord. Digits
//! 2-9 set a repeat count that applies to the next repeatable command and is then
//! reset to 1. Single keys with a binding run immediately; any other printable key
//! starts a chord. When the second key does not complete a chord, the pending key
//! is dropped and the second key is parsed again from the idle state, so `gx`
//! behaves like a lone `x`.

use tracing::debug;

/// A decoded keystroke. Turning raw key events into these is the host's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Tab,
    Escape,
    Enter,
    Backspace,
    Left,
    Right,
    /// Function key `F1`..`F12`.
    F(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    ScrollDown,
    ScrollUp,
    SaveAll,
    NextCalendar,
    /// Enter summary editing; `clear` starts from an empty buffer.
    Edit { clear: bool },
    Delete,
    DeleteTimeblock,
    /// Deselect and park the cursor at the current time.
    CursorNow,
    /// Move the selected event to the current time.
    EventNow,
    /// Shift the selected event by one fine step in the given direction.
    Nudge(i32),
    PushMove(i32),
    MoveRelative(i32),
    SelectRelative(i32),
    Expand(i32),
    PushExpand,
    Insert,
    OpenBelow,
    ToggleCalendar(usize),
    AlignHour,
    AlignUp,
    AlignDown,
    CenterView,
    TopView,
    BottomView,
    ZoomIn,
    ZoomOut,
}

impl Command {
    /// Whether a repeat count runs this command more than once.
    pub fn is_repeatable(self) -> bool {
        matches!(
            self,
            Command::ScrollDown
                | Command::ScrollUp
                | Command::Nudge(_)
                | Command::PushMove(_)
                | Command::MoveRelative(_)
                | Command::SelectRelative(_)
                | Command::Expand(_)
                | Command::PushExpand
                | Command::ZoomIn
                | Command::ZoomOut
        )
    }
}

pub const CHORDS: &[(char, char, Command)] = &[
    ('a', 'h', Command::AlignHour),
    ('a', 'k', Command::AlignUp),
    ('a', 'j', Command::AlignDown),
    ('z', 'z', Command::CenterView),
    ('z', 't', Command::TopView),
    ('z', 'b', Command::BottomView),
    ('z', 'i', Command::ZoomIn),
    ('z', 'o', Command::ZoomOut),
    ('g', 'j', Command::SelectRelative(1)),
    ('g', 'k', Command::SelectRelative(-1)),
    ('d', 'd', Command::DeleteTimeblock),
];

pub fn chord(first: char, second: char) -> Option<Command> {
    CHORDS
        .iter()
        .find(|(a, b, _)| *a == first && *b == second)
        .map(|(_, _, cmd)| *cmd)
}

/// Commands bound to a single key.
pub fn single_key(key: Key) -> Option<Command> {
    let cmd = match key {
        Key::Ctrl('d') => Command::ScrollDown,
        Key::Ctrl('u') => Command::ScrollUp,
        Key::Ctrl('s') => Command::SaveAll,
        Key::Ctrl('j') => Command::PushMove(1),
        Key::Ctrl('k') => Command::PushMove(-1),
        Key::Ctrl('v') => Command::PushExpand,
        Key::Tab => Command::NextCalendar,
        Key::F(n @ 1..=6) => Command::ToggleCalendar(n as usize - 1),
        Key::Char(c) => match c {
            'c' | 'C' | 's' | 'S' => Command::Edit { clear: true },
            'A' => Command::Edit { clear: false },
            'x' => Command::Delete,
            't' => Command::CursorNow,
            'T' => Command::EventNow,
            'J' => Command::Nudge(1),
            'K' => Command::Nudge(-1),
            'j' => Command::MoveRelative(1),
            'k' => Command::MoveRelative(-1),
            'v' => Command::Expand(1),
            'V' => Command::Expand(-1),
            'i' => Command::Insert,
            'o' => Command::OpenBelow,
            _ => return None,
        },
        _ => return None,
    };
    Some(cmd)
}

/// What one keystroke amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Run `command` `repeat` times.
    Run { command: Command, repeat: u32 },
    /// First half of a chord.
    Pending(char),
    /// A repeat count was set.
    Repeat(u32),
    Ignored,
}

#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    pending: Option<char>,
    repeat: u32,
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self {
            pending: None,
            repeat: 1,
        }
    }

    pub fn pending(&self) -> Option<char> {
        self.pending
    }

    pub fn repeat(&self) -> u32 {
        self.repeat
    }

    /// Override the repeat count, e.g. from a host-side count prefix.
    pub fn set_repeat(&mut self, repeat: u32) {
        self.repeat = repeat.max(1);
    }

    pub fn reset(&mut self) {
        self.pending = None;
        self.repeat = 1;
    }

    pub fn feed(&mut self, key: Key) -> Dispatch {
        if let Some(first) = self.pending.take() {
            if let Key::Char(second) = key {
                if let Some(command) = chord(first, second) {
                    debug!(first = %first, second = %second, ?command, "chord");
                    return self.run(command);
                }
            }
            debug!(first = %first, ?key, "no chord, reparsing key");
        }

        match key {
            Key::Char(c @ '2'..='9') => {
                let n = c.to_digit(10).unwrap_or(1);
                self.repeat = n;
                Dispatch::Repeat(n)
            }
            Key::Escape => {
                self.reset();
                Dispatch::Ignored
            }
            _ => match (single_key(key), key) {
                (Some(command), _) => self.run(command),
                (None, Key::Char(c)) if !c.is_control() => {
                    self.pending = Some(c);
                    Dispatch::Pending(c)
                }
                _ => Dispatch::Ignored,
            },
        }
    }

    fn run(&mut self, command: Command) -> Dispatch {
        let repeat = if command.is_repeatable() { self.repeat } else { 1 };
        self.repeat = 1;
        Dispatch::Run { command, repeat }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chord_table_has_no_duplicates() {
        for (i, (a, b, _)) in CHORDS.iter().enumerate() {
            assert!(!CHORDS[i + 1..].iter().any(|(x, y, _)| x == a && y == b));
        }
    }

    #[test]
    fn chord_keys_never_shadow_single_keys() {
        for (a, _, _) in CHORDS {
            assert_eq!(single_key(Key::Char(*a)), None, "chord prefix {a} is bound");
        }
    }

    #[test]
    fn function_keys_map_to_calendars() {
        assert_eq!(single_key(Key::F(1)), Some(Command::ToggleCalendar(0)));
        assert_eq!(single_key(Key::F(6)), Some(Command::ToggleCalendar(5)));
        assert_eq!(single_key(Key::F(7)), None);
    }
}
