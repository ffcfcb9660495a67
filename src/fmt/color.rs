//! Console colors are plain SGR escape sequences built from a foreground, a background and a set
//! of text attributes; callers that render to HTML or other markup supply their own open/close
//! strings instead.

use crate::Error;
use crate::level::Level;
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

/// Foreground color. `Unchanged` leaves whatever the terminal currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Fg {
    #[default]
    Unchanged,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

/// Background color. `Unchanged` leaves whatever the terminal currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bg {
    #[default]
    Unchanged,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

/// Position of a named color in the 8-color SGR palette.
fn palette_offset(name: &str) -> Option<u8> {
    match name.to_lowercase().as_str() {
        "black" => Some(0),
        "red" => Some(1),
        "green" => Some(2),
        "yellow" => Some(3),
        "blue" => Some(4),
        "magenta" => Some(5),
        "cyan" => Some(6),
        "white" => Some(7),
        _ => None,
    }
}

impl Fg {
    /// SGR parameter, `None` for `Unchanged`.
    #[must_use]
    pub const fn code(self) -> Option<u8> {
        match self {
            Self::Unchanged => None,
            Self::Black => Some(30),
            Self::Red => Some(31),
            Self::Green => Some(32),
            Self::Yellow => Some(33),
            Self::Blue => Some(34),
            Self::Magenta => Some(35),
            Self::Cyan => Some(36),
            Self::White => Some(37),
        }
    }

    const fn from_offset(offset: u8) -> Self {
        match offset {
            0 => Self::Black,
            1 => Self::Red,
            2 => Self::Green,
            3 => Self::Yellow,
            4 => Self::Blue,
            5 => Self::Magenta,
            6 => Self::Cyan,
            7 => Self::White,
            _ => Self::Unchanged,
        }
    }
}

impl Bg {
    /// SGR parameter, `None` for `Unchanged`.
    #[must_use]
    pub const fn code(self) -> Option<u8> {
        match self {
            Self::Unchanged => None,
            Self::Black => Some(40),
            Self::Red => Some(41),
            Self::Green => Some(42),
            Self::Yellow => Some(43),
            Self::Blue => Some(44),
            Self::Magenta => Some(45),
            Self::Cyan => Some(46),
            Self::White => Some(47),
        }
    }

    const fn from_offset(offset: u8) -> Self {
        match offset {
            0 => Self::Black,
            1 => Self::Red,
            2 => Self::Green,
            3 => Self::Yellow,
            4 => Self::Blue,
            5 => Self::Magenta,
            6 => Self::Cyan,
            7 => Self::White,
            _ => Self::Unchanged,
        }
    }
}

impl FromStr for Fg {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if matches!(s.to_lowercase().as_str(), "unchanged" | "default" | "") {
            return Ok(Self::Unchanged);
        }
        palette_offset(s)
            .map(Self::from_offset)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown color: {s}")))
    }
}

impl FromStr for Bg {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if matches!(s.to_lowercase().as_str(), "unchanged" | "default" | "") {
            return Ok(Self::Unchanged);
        }
        palette_offset(s)
            .map(Self::from_offset)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown color: {s}")))
    }
}

bitflags! {
    /// Text attributes; the empty set means plain text.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextAttr: u8 {
        const BRIGHT = 1 << 0;
        const DIM = 1 << 1;
        const UNDERLINE = 1 << 2;
        const BLINK = 1 << 3;
        const REVERSE = 1 << 4;
        const HIDDEN = 1 << 5;
    }
}

impl TextAttr {
    const SGR: [(Self, u8); 6] = [
        (Self::BRIGHT, 1),
        (Self::DIM, 2),
        (Self::UNDERLINE, 4),
        (Self::BLINK, 5),
        (Self::REVERSE, 7),
        (Self::HIDDEN, 8),
    ];

    /// SGR parameters for every set attribute, in ascending code order.
    #[must_use]
    pub fn codes(self) -> Vec<u8> {
        Self::SGR
            .iter()
            .filter(|(attr, _)| self.contains(*attr))
            .map(|(_, code)| *code)
            .collect()
    }
}

impl FromStr for TextAttr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reset" | "none" => Ok(Self::empty()),
            "bright" | "bold" => Ok(Self::BRIGHT),
            "dim" => Ok(Self::DIM),
            "underline" => Ok(Self::UNDERLINE),
            "blink" => Ok(Self::BLINK),
            "reverse" => Ok(Self::REVERSE),
            "hidden" => Ok(Self::HIDDEN),
            _ => Err(Error::InvalidConfig(format!("unknown text attribute: {s}"))),
        }
    }
}

/// A console color triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConsoleColor {
    pub fg: Fg,
    pub bg: Bg,
    pub attr: TextAttr,
}

impl ConsoleColor {
    /// Terminates any active SGR styling.
    pub const RESET: &'static str = "\x1b[0m";

    #[must_use]
    pub const fn new(fg: Fg, bg: Bg, attr: TextAttr) -> Self {
        Self { fg, bg, attr }
    }

    /// Escape sequence that switches to this color. Always starts from a reset so attributes
    /// of a previous sequence do not bleed through.
    #[must_use]
    pub fn open(self) -> String {
        let mut codes = vec![0];
        codes.extend(self.attr.codes());
        codes.extend(self.fg.code());
        codes.extend(self.bg.code());
        let params: Vec<String> = codes.iter().map(u8::to_string).collect();
        format!("\x1b[{}m", params.join(";"))
    }
}

/// How a channel or a severity is framed when coloring is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpec {
    /// ANSI console colors.
    Console(ConsoleColor),
    /// Caller-provided wrap strings, e.g. `<span style="...">` and `</span>`.
    Strings { open: String, close: String },
}

impl ColorSpec {
    /// Sequence written before the colored text.
    #[must_use]
    pub fn open(&self) -> String {
        match self {
            Self::Console(color) => color.open(),
            Self::Strings { open, .. } => open.clone(),
        }
    }

    /// Sequence written after the colored text.
    #[must_use]
    pub fn close(&self) -> &str {
        match self {
            Self::Console(_) => ConsoleColor::RESET,
            Self::Strings { close, .. } => close,
        }
    }

    /// Wraps `text` in this color's open and close sequences.
    #[must_use]
    pub fn wrap(&self, text: &str) -> String {
        format!("{}{text}{}", self.open(), self.close())
    }
}

impl From<ConsoleColor> for ColorSpec {
    fn from(color: ConsoleColor) -> Self {
        Self::Console(color)
    }
}

impl fmt::Display for ConsoleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.open())
    }
}

/// Built-in per-severity prefix colors, restored by `reset_prefix_colors`.
#[must_use]
pub fn default_prefix_color(level: Level) -> ColorSpec {
    let color = match level {
        Level::Debug => ConsoleColor::new(Fg::Unchanged, Bg::Unchanged, TextAttr::DIM),
        Level::Info => ConsoleColor::default(),
        Level::Notice => ConsoleColor::new(Fg::Green, Bg::Unchanged, TextAttr::empty()),
        Level::Warning => ConsoleColor::new(Fg::Yellow, Bg::Unchanged, TextAttr::empty()),
        Level::Err => ConsoleColor::new(Fg::Red, Bg::Unchanged, TextAttr::empty()),
        Level::Crit => ConsoleColor::new(Fg::Red, Bg::Unchanged, TextAttr::BRIGHT),
        Level::Alert => ConsoleColor::new(
            Fg::Red,
            Bg::Unchanged,
            TextAttr::BRIGHT.union(TextAttr::REVERSE),
        ),
        Level::Emerg => ConsoleColor::new(
            Fg::Red,
            Bg::Unchanged,
            TextAttr::BRIGHT
                .union(TextAttr::REVERSE)
                .union(TextAttr::BLINK),
        ),
    };
    ColorSpec::Console(color)
}

/// Which framing sequence is being decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScope {
    /// Wrapping the generated prefix in the severity's color.
    Prefix,
    /// Opening the channel's color before the message body.
    MessageOpen,
    /// Resetting the channel's color after a line-terminated message.
    MessageClose,
}

/// Every switch that takes part in a color decision for one (call, destination) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorGates {
    /// Global prefix color switch.
    pub global_prefix: bool,
    /// Global message color switch.
    pub global_message: bool,
    /// The channel has a color configured.
    pub channel_colored: bool,
    /// The destination's own color switch.
    pub output_colored: bool,
    /// The previous message of the channel did not end a line.
    pub continuation: bool,
    /// The current message ends with a newline.
    pub ends_line: bool,
}

/// Decides whether a framing sequence is written.
#[must_use]
pub const fn should_color(scope: ColorScope, gates: &ColorGates) -> bool {
    if !gates.output_colored {
        return false;
    }
    match scope {
        ColorScope::Prefix => gates.global_prefix && !gates.continuation,
        ColorScope::MessageOpen => {
            gates.global_message && gates.channel_colored && !gates.continuation
        }
        ColorScope::MessageClose => {
            gates.global_message && gates.channel_colored && gates.ends_line
        }
    }
}
