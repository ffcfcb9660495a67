//! Reference-counted set of sinks with per-sink threshold and color switch.

use super::{Registration, check_threshold};
use crate::Error;
use crate::level::{Level, Threshold};
use crate::output::SinkHandle;

/// One registered sink.
#[derive(Debug, Clone)]
pub struct OutputEntry {
    handle: SinkHandle,
    count: u32,
    threshold: Threshold,
    color: bool,
}

impl OutputEntry {
    /// Identity of the sink; two entries never share one.
    #[must_use]
    pub const fn handle(&self) -> &SinkHandle {
        &self.handle
    }

    /// Number of registrations not yet matched by a deregistration.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Never [`Threshold::Unset`]: new entries start at the most permissive level.
    #[must_use]
    pub const fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Seeded from [`crate::Sink::supports_color`] so only terminals get escapes by default.
    #[must_use]
    pub const fn color_enabled(&self) -> bool {
        self.color
    }

    /// The per-destination half of filtering; the channel filter has already run.
    #[must_use]
    pub const fn accepts(&self, level: Level) -> bool {
        self.threshold.accepts(level)
    }
}

/// A table holds each sink at most once; registering it again bumps its count.
#[derive(Debug, Clone)]
pub struct OutputTable {
    slots: Vec<Option<OutputEntry>>,
}

impl OutputTable {
    /// Slots are allocated up front so registration never reallocates while dispatch iterates.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Fixed at construction; [`Error::OutputsFull`] is reported beyond it.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of distinct sinks currently registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// A channel with an empty private table only writes to global outputs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find(&self, handle: &SinkHandle) -> Option<&OutputEntry> {
        self.slots.iter().flatten().find(|e| e.handle == *handle)
    }

    fn find_mut(&mut self, handle: &SinkHandle) -> Option<&mut OutputEntry> {
        self.slots.iter_mut().flatten().find(|e| e.handle == *handle)
    }

    /// Adds `handle` at the most permissive threshold, or counts one more registration of it.
    ///
    /// # Errors
    /// [`Error::OutputInvalid`] for a closed sink, [`Error::OutputsFull`] when no slot is free.
    pub fn register(&mut self, handle: &SinkHandle) -> Result<Registration, Error> {
        if !handle.sink().is_open() {
            return Err(Error::OutputInvalid);
        }

        if let Some(entry) = self.find_mut(handle) {
            entry.count += 1;
            return Ok(Registration::AlreadyRegistered { count: entry.count });
        }

        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.is_none())
            .ok_or(Error::OutputsFull)?;

        *slot = Some(OutputEntry {
            handle: handle.clone(),
            count: 1,
            threshold: Threshold::Min(Level::Debug),
            color: handle.sink().supports_color(),
        });
        Ok(Registration::Added)
    }

    /// Drops one registration of `handle`; the slot is freed when none remain.
    /// Returns the number of registrations left.
    ///
    /// # Errors
    /// [`Error::OutputNotFound`] if `handle` is not registered.
    pub fn deregister(&mut self, handle: &SinkHandle) -> Result<u32, Error> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.as_ref().is_some_and(|e| e.handle == *handle))
            .ok_or(Error::OutputNotFound)?;

        let remaining = match slot {
            Some(entry) => {
                entry.count = entry.count.saturating_sub(1);
                entry.count
            }
            None => return Err(Error::OutputNotFound),
        };

        if remaining == 0 {
            *slot = None;
        }
        Ok(remaining)
    }

    /// Used to keep a sink registered in two tables from being written twice.
    #[must_use]
    pub fn contains(&self, handle: &SinkHandle) -> bool {
        self.find(handle).is_some()
    }

    /// Several subsystems may register the same sink; it stays until each has deregistered.
    /// Zero when absent.
    #[must_use]
    pub fn count(&self, handle: &SinkHandle) -> u32 {
        self.find(handle).map_or(0, OutputEntry::count)
    }

    /// Unset thresholds and empty masks are refused here so a destination can never silently swallow everything.
    ///
    /// # Errors
    /// [`Error::LevelUnknown`] for an unset threshold or empty mask,
    /// [`Error::OutputNotFound`] if `handle` is not registered.
    pub fn set_threshold(&mut self, handle: &SinkHandle, threshold: Threshold) -> Result<(), Error> {
        let threshold = check_threshold(threshold)?;
        let entry = self.find_mut(handle).ok_or(Error::OutputNotFound)?;
        entry.threshold = threshold;
        Ok(())
    }

    /// Callers restoring a temporary change need the previous value.
    ///
    /// # Errors
    /// [`Error::OutputNotFound`] if `handle` is not registered.
    pub fn threshold(&self, handle: &SinkHandle) -> Result<Threshold, Error> {
        self.find(handle)
            .map(OutputEntry::threshold)
            .ok_or(Error::OutputNotFound)
    }

    /// Pipes and files handed to a terminal-capable sink type still need a way to opt out.
    ///
    /// # Errors
    /// [`Error::OutputNotFound`] if `handle` is not registered.
    pub fn set_color(&mut self, handle: &SinkHandle, enabled: bool) -> Result<(), Error> {
        let entry = self.find_mut(handle).ok_or(Error::OutputNotFound)?;
        entry.color = enabled;
        Ok(())
    }

    /// False for unregistered sinks.
    #[must_use]
    pub fn color_enabled(&self, handle: &SinkHandle) -> bool {
        self.find(handle).is_some_and(OutputEntry::color_enabled)
    }

    /// Slot order, which only changes on (de)registration, so fan-out order is predictable.
    pub fn iter(&self) -> impl Iterator<Item = &OutputEntry> {
        self.slots.iter().flatten()
    }

    /// Releasing a channel forgets its private outputs regardless of their counts.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }
}
