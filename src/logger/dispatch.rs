//! The one place a message is filtered, framed and written.

use super::{Emission, State};
use super::rate::LastMessage;
use crate::Error;
use crate::fmt::{ColorGates, ColorScope, Location, PrefixFields, render, should_color};
use crate::internal;
use crate::level::Level;
use crate::registry::{Id, OutputEntry, OutputTable};
use chrono::{DateTime, Local};

/// Every destination that accepts `level`, each sink once. A sink registered both globally
/// and on the channel is taken if either entry accepts; the private entry wins when both do,
/// so its color switch applies.
fn destinations<'a>(
    global: &'a OutputTable,
    private: &'a OutputTable,
    level: Level,
) -> Vec<&'a OutputEntry> {
    let mut targets: Vec<&OutputEntry> = global
        .iter()
        .filter_map(|g| {
            private
                .iter()
                .find(|p| p.handle() == g.handle() && p.accepts(level))
                .or_else(|| g.accepts(level).then_some(g))
        })
        .collect();
    targets.extend(
        private
            .iter()
            .filter(|p| p.accepts(level) && !global.contains(p.handle())),
    );
    targets
}

impl State {
    pub(super) fn emit(
        &mut self,
        id: Id,
        level: Level,
        location: &Location,
        message: &str,
        now: DateTime<Local>,
    ) -> Result<Emission, Error> {
        let channel = self.ids.channel(id).map_err(|_| Error::IdUnknown)?;
        if !self.enabled {
            return Ok(Emission::Disabled);
        }
        if !channel.passes(level) {
            return Ok(Emission::Filtered);
        }
        if !self.rate.admit(now.timestamp()) {
            return Err(Error::RateLimited);
        }

        if self.suppress_repeats {
            if let Some(last) = self.last.as_mut()
                && last.matches(id, level, message)
            {
                last.repeats += 1;
                return Ok(Emission::Repeated);
            }
            self.flush_repeats(now);
            self.last = message
                .ends_with('\n')
                .then(|| LastMessage::new(id, level, message));
        }

        let outputs = self.fan_out(id, level, location, message, now);
        if let Ok(channel) = self.ids.channel_mut(id) {
            channel.set_continuation(!message.ends_with('\n'));
        }
        Ok(Emission::Written { outputs })
    }

    /// Writes the pending "last message repeated" line, if any, to the channel that produced
    /// the repeated message.
    pub(super) fn flush_repeats(&mut self, now: DateTime<Local>) {
        let Some(last) = self.last.as_mut() else {
            return;
        };
        let Some(summary) = last.summary() else {
            return;
        };
        last.repeats = 0;
        let (id, level) = (last.id, last.level);

        if self.enabled && self.ids.channel(id).is_ok_and(|c| c.passes(level)) {
            self.fan_out(id, level, &Location::default(), &summary, now);
            if let Ok(channel) = self.ids.channel_mut(id) {
                channel.set_continuation(false);
            }
        }
    }

    /// Frames `message` for every accepting destination and writes it there as one piece.
    /// Returns how many destinations took the write.
    fn fan_out(
        &self,
        id: Id,
        level: Level,
        location: &Location,
        message: &str,
        now: DateTime<Local>,
    ) -> usize {
        let Ok(channel) = self.ids.channel(id) else {
            return 0;
        };

        let continuation = channel.continuation();
        let prefix = if channel.prefix().is_unset() {
            self.prefix
        } else {
            channel.prefix()
        };
        let prefix_text = if continuation {
            String::new()
        } else {
            render(
                prefix,
                &PrefixFields {
                    time: now,
                    name: channel.name(),
                    level,
                    location,
                },
            )
        };
        let color = channel.color();
        let ends_line = message.ends_with('\n');

        let mut written = 0;
        for entry in destinations(&self.outputs, channel.outputs(), level) {
            let gates = ColorGates {
                global_prefix: self.color_prefix,
                global_message: self.color_message,
                channel_colored: color.is_some(),
                output_colored: entry.color_enabled(),
                continuation,
                ends_line,
            };

            let mut text = String::with_capacity(prefix_text.len() + message.len());
            if !prefix_text.is_empty() {
                if should_color(ColorScope::Prefix, &gates) {
                    text.push_str(&self.prefix_colors[level.index()].wrap(&prefix_text));
                } else {
                    text.push_str(&prefix_text);
                }
            }
            if let Some(color) = color.filter(|_| should_color(ColorScope::MessageOpen, &gates)) {
                text.push_str(&color.open());
            }
            text.push_str(message);
            if let Some(color) = color.filter(|_| should_color(ColorScope::MessageClose, &gates)) {
                text.push_str(color.close());
            }

            match entry.handle().sink().write_str(&text) {
                Ok(()) => written += 1,
                Err(e) => internal::warn(
                    "DISPATCH",
                    &format!("Write to {:?} failed: {e}", entry.handle()),
                ),
            }
        }
        written
    }
}
