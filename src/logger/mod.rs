//! The logger: output and channel registries, global switches, and the dispatch entry points.
//!
//! Every public operation takes one lock on the whole state, so the fan-out of a call is never
//! interleaved with another call's. A sink that calls back into the same logger deadlocks.

mod builder;
mod dispatch;
mod from_config;
mod rate;

pub use builder::LoggerBuilder;

use crate::Error;
use crate::clock::Clock;
use crate::fmt::{Bg, ColorSpec, ConsoleColor, Fg, Location, Prefix, TextAttr, default_prefix_color};
use crate::internal;
use crate::level::{Level, Threshold};
use crate::output::SinkHandle;
use crate::registry::{Id, IdTable, OutputTable, Registration};
use rate::{LastMessage, RateLimiter};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What a log call did when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// Written to this many destinations (zero when none accepted the level).
    Written { outputs: usize },
    /// The channel is disabled or its threshold rejects the level.
    Filtered,
    /// Logging is globally disabled.
    Disabled,
    /// Identical to the previous message and held back; counted for the repeat summary.
    Repeated,
}

impl Emission {
    /// Whether anything reached a destination.
    #[must_use]
    pub const fn wrote(self) -> bool {
        matches!(self, Self::Written { outputs } if outputs > 0)
    }
}

pub(crate) struct State {
    enabled: bool,
    outputs: OutputTable,
    ids: IdTable,
    prefix: Prefix,
    color_prefix: bool,
    color_message: bool,
    prefix_colors: [ColorSpec; 8],
    rate: RateLimiter,
    suppress_repeats: bool,
    last: Option<LastMessage>,
}

fn default_prefix_colors() -> [ColorSpec; 8] {
    Level::ALL.map(default_prefix_color)
}

/// Channel-based logger with fan-out to registered sinks.
pub struct Logger {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Logger")
            .field("enabled", &state.enabled)
            .field("outputs", &state.outputs.len())
            .field("ids", &state.ids.in_use())
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Default capacities, logging enabled, no outputs.
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::new().build()
    }

    /// Capacities and the clock are fixed at construction, so they are only reachable here.
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // --- global switch ---

    /// Master switch: lets an application silence every channel at once without touching their settings.
    pub fn enable(&self) {
        self.state().enabled = true;
    }

    /// Channel and output settings survive, so [`Logger::enable`] brings logging back as it was.
    pub fn disable(&self) {
        self.state().enabled = false;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state().enabled
    }

    // --- global outputs ---

    /// Registers `handle` for every channel. Registering a sink again only counts it again.
    ///
    /// # Errors
    /// [`Error::OutputInvalid`] for a closed sink, [`Error::OutputsFull`] when no slot is free.
    pub fn register_output(&self, handle: &SinkHandle) -> Result<Registration, Error> {
        let registration = self.state().outputs.register(handle)?;
        if let Registration::AlreadyRegistered { count } = registration {
            internal::debug(
                "OUTPUT",
                &format!("{handle:?} registered again ({count} refs)"),
            );
        }
        Ok(registration)
    }

    /// Drops one registration. Returns how many remain; the sink stops receiving at zero.
    ///
    /// # Errors
    /// [`Error::OutputNotFound`] if `handle` is not registered.
    pub fn deregister_output(&self, handle: &SinkHandle) -> Result<u32, Error> {
        self.state().outputs.deregister(handle).inspect_err(|_| {
            internal::warn("OUTPUT", &format!("Deregistering unknown {handle:?}"));
        })
    }

    /// Lets setup code avoid counting a sink twice when it is wired from several places.
    #[must_use]
    pub fn is_output_registered(&self, handle: &SinkHandle) -> bool {
        self.state().outputs.contains(handle)
    }

    /// Accepts a minimum [`Level`] or an exact [`crate::LevelMask`].
    ///
    /// # Errors
    /// [`Error::LevelUnknown`] for an empty mask, [`Error::OutputNotFound`] if not registered.
    pub fn set_output_threshold(
        &self,
        handle: &SinkHandle,
        threshold: impl Into<Threshold>,
    ) -> Result<(), Error> {
        self.state()
            .outputs
            .set_threshold(handle, threshold.into())
    }

    /// Callers that adjust a threshold temporarily need the old value to restore it.
    ///
    /// # Errors
    /// [`Error::OutputNotFound`] if `handle` is not registered.
    pub fn output_threshold(&self, handle: &SinkHandle) -> Result<Threshold, Error> {
        self.state().outputs.threshold(handle)
    }

    /// Color escapes belong on a terminal but corrupt files and pipes, so each output decides.
    ///
    /// # Errors
    /// [`Error::OutputNotFound`] if `handle` is not registered.
    pub fn set_output_color(&self, handle: &SinkHandle, enabled: bool) -> Result<(), Error> {
        self.state().outputs.set_color(handle, enabled)
    }

    /// False for unregistered sinks, which never receive colored text anyway.
    #[must_use]
    pub fn is_output_color_enabled(&self, handle: &SinkHandle) -> bool {
        self.state().outputs.color_enabled(handle)
    }

    // --- channels ---

    /// Allocates a channel, disabled and with no threshold. A name already held by a live
    /// channel returns that id again and must be released once more.
    ///
    /// # Errors
    /// [`Error::IdsFull`] when every slot is taken.
    pub fn request_id(&self, name: Option<&str>) -> Result<Id, Error> {
        let mut state = self.state();
        let id = state.ids.request(name)?;
        if let Ok(channel) = state.ids.slot(id)
            && channel.refs() > 1
        {
            internal::debug(
                "ID",
                &format!(
                    "Channel {} requested again ({} refs)",
                    channel.name().unwrap_or_default(),
                    channel.refs()
                ),
            );
        }
        Ok(id)
    }

    /// Drops one reference. At zero the slot is reset and may be handed out again.
    /// Returns the references left.
    ///
    /// # Errors
    /// [`Error::IdUnknown`] out of range, [`Error::IdNotFound`] if not allocated.
    pub fn release_id(&self, id: Id) -> Result<u32, Error> {
        let mut state = self.state();
        let remaining = state.ids.release(id)?;
        if remaining == 0 && state.last.as_ref().is_some_and(|l| l.id == id) {
            state.last = None;
        }
        Ok(remaining)
    }

    /// Owned, because the name can be released by another thread once the lock drops.
    #[must_use]
    pub fn id_name(&self, id: Id) -> Option<String> {
        self.state().ids.name(id).map(str::to_string)
    }

    /// Channels start disabled so a library can request ids without producing output until the application opts in.
    ///
    /// # Errors
    /// [`Error::IdUnknown`] when `id` is out of range.
    pub fn enable_id(&self, id: Id) -> Result<(), Error> {
        self.state().ids.set_enabled(id, true)
    }

    /// Keeps the channel's threshold, prefix and outputs for a later [`Logger::enable_id`].
    ///
    /// # Errors
    /// [`Error::IdUnknown`] when `id` is out of range.
    pub fn disable_id(&self, id: Id) -> Result<(), Error> {
        self.state().ids.set_enabled(id, false)
    }

    /// False for free or out-of-range ids, which can never produce output.
    #[must_use]
    pub fn is_id_enabled(&self, id: Id) -> bool {
        self.state().ids.is_enabled(id)
    }

    /// Accepts a minimum [`Level`] or an exact [`crate::LevelMask`].
    ///
    /// # Errors
    /// [`Error::IdUnknown`] out of range, [`Error::LevelUnknown`] for an empty mask.
    pub fn set_id_threshold(&self, id: Id, threshold: impl Into<Threshold>) -> Result<(), Error> {
        self.state().ids.set_threshold(id, threshold.into())
    }

    /// [`Threshold::Unset`] until one is set.
    ///
    /// # Errors
    /// [`Error::IdUnknown`] when `id` is out of range.
    pub fn id_threshold(&self, id: Id) -> Result<Threshold, Error> {
        self.state().ids.threshold(id)
    }

    /// Whether a message at `level` passes the channel's own switch and threshold. Registered
    /// destinations are not consulted.
    #[must_use]
    pub fn id_generates_output(&self, id: Id, level: Level) -> bool {
        self.state().ids.generates_output(id, level)
    }

    // --- channel-private outputs ---

    /// Adds a destination only this channel writes to.
    ///
    /// # Errors
    /// Id errors as for [`Logger::release_id`]; output errors as for
    /// [`Logger::register_output`].
    pub fn register_id_output(&self, id: Id, handle: &SinkHandle) -> Result<Registration, Error> {
        self.state().ids.channel_mut(id)?.outputs_mut().register(handle)
    }

    /// Private registrations are counted like global ones; the sink leaves the channel at zero.
    ///
    /// # Errors
    /// Id errors as for [`Logger::release_id`]; [`Error::OutputNotFound`] if not registered.
    pub fn deregister_id_output(&self, id: Id, handle: &SinkHandle) -> Result<u32, Error> {
        self.state().ids.channel_mut(id)?.outputs_mut().deregister(handle)
    }

    /// Only the channel's own table is consulted; global registrations do not count.
    #[must_use]
    pub fn is_id_output_registered(&self, id: Id, handle: &SinkHandle) -> bool {
        self.state()
            .ids
            .channel(id)
            .is_ok_and(|c| c.outputs().contains(handle))
    }

    /// A private entry can let a shared sink see more of one channel than its global entry allows.
    ///
    /// # Errors
    /// Id errors, [`Error::LevelUnknown`], or [`Error::OutputNotFound`].
    pub fn set_id_output_threshold(
        &self,
        id: Id,
        handle: &SinkHandle,
        threshold: impl Into<Threshold>,
    ) -> Result<(), Error> {
        self.state()
            .ids
            .channel_mut(id)?
            .outputs_mut()
            .set_threshold(handle, threshold.into())
    }

    /// # Errors
    /// Id errors or [`Error::OutputNotFound`].
    pub fn id_output_threshold(&self, id: Id, handle: &SinkHandle) -> Result<Threshold, Error> {
        self.state().ids.channel(id)?.outputs().threshold(handle)
    }

    /// Overrides the color switch only for what this channel writes to the sink.
    ///
    /// # Errors
    /// Id errors or [`Error::OutputNotFound`].
    pub fn set_id_output_color(&self, id: Id, handle: &SinkHandle, enabled: bool) -> Result<(), Error> {
        self.state()
            .ids
            .channel_mut(id)?
            .outputs_mut()
            .set_color(handle, enabled)
    }

    /// False when either the channel or the private entry is missing.
    #[must_use]
    pub fn is_id_output_color_enabled(&self, id: Id, handle: &SinkHandle) -> bool {
        self.state()
            .ids
            .channel(id)
            .is_ok_and(|c| c.outputs().color_enabled(handle))
    }

    // --- prefixes ---

    /// [`Prefix::UNSET`] restores [`Prefix::DEFAULT`].
    pub fn set_prefix(&self, prefix: Prefix) {
        self.state().prefix = if prefix.is_unset() {
            Prefix::DEFAULT
        } else {
            prefix
        };
    }

    /// Never [`Prefix::UNSET`]; channels without their own prefix render this one.
    #[must_use]
    pub fn prefix(&self) -> Prefix {
        self.state().prefix
    }

    /// [`Prefix::UNSET`] makes the channel follow the global prefix again.
    ///
    /// # Errors
    /// [`Error::IdUnknown`] when `id` is out of range.
    pub fn set_id_prefix(&self, id: Id, prefix: Prefix) -> Result<(), Error> {
        self.state().ids.set_prefix(id, prefix)
    }

    /// Exactly what was last set, [`Prefix::UNSET`] by default.
    ///
    /// # Errors
    /// [`Error::IdUnknown`] when `id` is out of range.
    pub fn id_prefix(&self, id: Id) -> Result<Prefix, Error> {
        self.state().ids.prefix(id)
    }

    // --- colors ---

    /// Colors the channel's message text with a console color.
    ///
    /// # Errors
    /// [`Error::IdUnknown`] when `id` is out of range.
    pub fn set_id_color(&self, id: Id, fg: Fg, bg: Bg, attr: TextAttr) -> Result<(), Error> {
        self.set_id_color_spec(id, Some(ConsoleColor::new(fg, bg, attr).into()))
    }

    /// Wraps the channel's message text in caller-provided strings.
    ///
    /// # Errors
    /// [`Error::IdUnknown`] when `id` is out of range.
    pub fn set_id_color_strings(
        &self,
        id: Id,
        open: impl Into<String>,
        close: impl Into<String>,
    ) -> Result<(), Error> {
        let color = ColorSpec::Strings {
            open: open.into(),
            close: close.into(),
        };
        self.set_id_color_spec(id, Some(color))
    }

    /// `None` leaves the channel uncolored.
    ///
    /// # Errors
    /// [`Error::IdUnknown`] when `id` is out of range.
    pub fn set_id_color_spec(&self, id: Id, color: Option<ColorSpec>) -> Result<(), Error> {
        self.state().ids.set_color(id, color)
    }

    /// Same as passing `None` to [`Logger::set_id_color_spec`].
    ///
    /// # Errors
    /// [`Error::IdUnknown`] when `id` is out of range.
    pub fn reset_id_color(&self, id: Id) -> Result<(), Error> {
        self.set_id_color_spec(id, None)
    }

    /// Works on free slots too, so a reused slot can be checked for a clean reset.
    ///
    /// # Errors
    /// [`Error::IdUnknown`] when `id` is out of range.
    pub fn id_color(&self, id: Id) -> Result<Option<ColorSpec>, Error> {
        self.state().ids.slot(id).map(|c| c.color().cloned())
    }

    /// Prefix colors are per level, so severity stays visible even when messages are plain.
    pub fn set_prefix_color(&self, level: Level, fg: Fg, bg: Bg, attr: TextAttr) {
        self.set_prefix_color_spec(level, ConsoleColor::new(fg, bg, attr).into());
    }

    /// For destinations that understand markup other than ANSI escapes.
    pub fn set_prefix_color_strings(
        &self,
        level: Level,
        open: impl Into<String>,
        close: impl Into<String>,
    ) {
        self.set_prefix_color_spec(
            level,
            ColorSpec::Strings {
                open: open.into(),
                close: close.into(),
            },
        );
    }

    /// The form config loading uses, where the color kind is only known at runtime.
    pub fn set_prefix_color_spec(&self, level: Level, color: ColorSpec) {
        self.state().prefix_colors[level.index()] = color;
    }

    #[must_use]
    pub fn prefix_color(&self, level: Level) -> ColorSpec {
        self.state().prefix_colors[level.index()].clone()
    }

    /// Restores the built-in color of every level.
    pub fn reset_prefix_colors(&self) {
        self.state().prefix_colors = default_prefix_colors();
    }

    /// Off by default so plain-text consumers never see escape sequences they did not ask for.
    pub fn enable_prefix_color(&self) {
        self.state().color_prefix = true;
    }

    pub fn disable_prefix_color(&self) {
        self.state().color_prefix = false;
    }

    #[must_use]
    pub fn is_prefix_color_enabled(&self) -> bool {
        self.state().color_prefix
    }

    /// Only channels with a color of their own are affected.
    pub fn enable_message_color(&self) {
        self.state().color_message = true;
    }

    pub fn disable_message_color(&self) {
        self.state().color_message = false;
    }

    #[must_use]
    pub fn is_message_color_enabled(&self) -> bool {
        self.state().color_message
    }

    // --- throttling ---

    /// Maximum log calls written per second; 0 lifts the limit.
    pub fn set_rate_limit(&self, per_second: u32) {
        self.state().rate.set_limit(per_second);
    }

    /// 0 when unlimited.
    #[must_use]
    pub fn rate_limit(&self) -> u32 {
        self.state().rate.limit()
    }

    /// Turning suppression off writes any pending summary first.
    pub fn set_suppress_repeats(&self, enabled: bool) {
        let now = self.clock.now();
        let mut state = self.state();
        if !enabled {
            state.flush_repeats(now);
            state.last = None;
        }
        state.suppress_repeats = enabled;
    }

    /// Off by default; repeated lines usually matter when debugging.
    #[must_use]
    pub fn suppresses_repeats(&self) -> bool {
        self.state().suppress_repeats
    }

    // --- emission ---

    /// Filters `message` through the global switch and the channel, then writes it to every
    /// accepting destination.
    ///
    /// # Errors
    /// [`Error::IdUnknown`] if `id` is not an allocated channel, [`Error::RateLimited`] when
    /// the per-second budget is spent.
    pub fn emit(
        &self,
        id: Id,
        level: Level,
        location: Location,
        message: &str,
    ) -> Result<Emission, Error> {
        let now = self.clock.now();
        self.state().emit(id, level, &location, message, now)
    }

    /// [`Logger::emit`] with the caller's file and line.
    ///
    /// # Errors
    /// As for [`Logger::emit`].
    #[track_caller]
    pub fn log(&self, id: Id, level: Level, message: &str) -> Result<Emission, Error> {
        self.emit(id, level, Location::caller(), message)
    }

    /// Formats `args`, then emits the result.
    ///
    /// # Errors
    /// As for [`Logger::emit`].
    #[track_caller]
    pub fn log_fmt(
        &self,
        id: Id,
        level: Level,
        args: fmt::Arguments<'_>,
    ) -> Result<Emission, Error> {
        let location = Location::caller();
        match args.as_str() {
            Some(message) => self.emit(id, level, location, message),
            None => self.emit(id, level, location, &args.to_string()),
        }
    }

    /// # Errors
    /// As for [`Logger::emit`].
    #[track_caller]
    pub fn debug(&self, id: Id, message: &str) -> Result<Emission, Error> {
        self.log(id, Level::Debug, message)
    }

    /// # Errors
    /// As for [`Logger::emit`].
    #[track_caller]
    pub fn info(&self, id: Id, message: &str) -> Result<Emission, Error> {
        self.log(id, Level::Info, message)
    }

    /// # Errors
    /// As for [`Logger::emit`].
    #[track_caller]
    pub fn notice(&self, id: Id, message: &str) -> Result<Emission, Error> {
        self.log(id, Level::Notice, message)
    }

    /// # Errors
    /// As for [`Logger::emit`].
    #[track_caller]
    pub fn warning(&self, id: Id, message: &str) -> Result<Emission, Error> {
        self.log(id, Level::Warning, message)
    }

    /// # Errors
    /// As for [`Logger::emit`].
    #[track_caller]
    pub fn err(&self, id: Id, message: &str) -> Result<Emission, Error> {
        self.log(id, Level::Err, message)
    }

    /// # Errors
    /// As for [`Logger::emit`].
    #[track_caller]
    pub fn crit(&self, id: Id, message: &str) -> Result<Emission, Error> {
        self.log(id, Level::Crit, message)
    }

    /// # Errors
    /// As for [`Logger::emit`].
    #[track_caller]
    pub fn alert(&self, id: Id, message: &str) -> Result<Emission, Error> {
        self.log(id, Level::Alert, message)
    }

    /// # Errors
    /// As for [`Logger::emit`].
    #[track_caller]
    pub fn emerg(&self, id: Id, message: &str) -> Result<Emission, Error> {
        self.log(id, Level::Emerg, message)
    }

    /// Writes any pending repeat summary, then flushes every registered sink.
    ///
    /// # Errors
    /// Returns the first I/O error encountered across all sinks.
    pub fn flush(&self) -> Result<(), Error> {
        let now = self.clock.now();
        let mut state = self.state();
        state.flush_repeats(now);

        let mut seen: Vec<&SinkHandle> = Vec::new();
        let globals = state.outputs.iter();
        let privates = state.ids.iter().flat_map(|(_, c)| c.outputs().iter());
        for entry in globals.chain(privates) {
            if seen.contains(&entry.handle()) {
                continue;
            }
            seen.push(entry.handle());
            entry.handle().sink().flush()?;
        }
        Ok(())
    }
}
