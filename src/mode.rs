// Display modes and the keys that switch between them.

use clap::ValueEnum;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    #[default]
    Normal,
    Canny,
    Sobel,
}

impl Mode {
    /// Title of the window this mode shows its output on.
    pub fn surface_name(self) -> &'static str {
        match self {
            Mode::Normal => "Normal Frame",
            Mode::Canny => "Canny Edge Map",
            Mode::Sobel => "Sobel Demo - Simple Edge Detector",
        }
    }
}

/// A key as reported by the display's key poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPress {
    Escape,
    Char(char),
}

/// What a key asks the controller to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Enter(Mode),
}

/// Map a key to a command. Unbound keys hold the current mode.
pub fn command_for(key: KeyPress) -> Option<Command> {
    match key {
        KeyPress::Escape => Some(Command::Quit),
        KeyPress::Char(c) => match c.to_ascii_lowercase() {
            'c' => Some(Command::Enter(Mode::Canny)),
            's' => Some(Command::Enter(Mode::Sobel)),
            'n' => Some(Command::Enter(Mode::Normal)),
            _ => None,
        },
    }
}
