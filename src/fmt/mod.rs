//! Framing around the message body: generated prefixes and color sequences.

mod color;
mod prefix;

pub use color::{
    Bg, ColorGates, ColorScope, ColorSpec, ConsoleColor, Fg, TextAttr, default_prefix_color,
    should_color,
};
pub use prefix::{DATE_FORMAT, Location, Prefix, PrefixFields, render};
