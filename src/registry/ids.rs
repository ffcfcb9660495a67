//! Channel slots: allocation by name, enable switch, threshold and per-channel presentation.

use super::{DEFAULT_MAX_ID_OUTPUTS, Id, OutputTable, check_threshold};
use crate::Error;
use crate::fmt::{ColorSpec, Prefix};
use crate::level::{Level, Threshold};

/// State of one channel id.
#[derive(Debug, Clone)]
pub struct Channel {
    refs: u32,
    name: Option<String>,
    enabled: bool,
    threshold: Threshold,
    continuation: bool,
    color: Option<ColorSpec>,
    prefix: Prefix,
    outputs: OutputTable,
}

impl Channel {
    fn vacant(id_outputs: usize) -> Self {
        Self {
            refs: 0,
            name: None,
            enabled: false,
            threshold: Threshold::Unset,
            continuation: false,
            color: None,
            prefix: Prefix::UNSET,
            outputs: OutputTable::with_capacity(id_outputs),
        }
    }

    fn reset(&mut self) {
        self.refs = 0;
        self.name = None;
        self.enabled = false;
        self.threshold = Threshold::Unset;
        self.continuation = false;
        self.color = None;
        self.prefix = Prefix::UNSET;
        self.outputs.clear();
    }

    /// Free slots keep their storage but answer every lookup as absent.
    #[must_use]
    pub const fn in_use(&self) -> bool {
        self.refs > 0
    }

    /// Outstanding requests for this channel.
    #[must_use]
    pub const fn refs(&self) -> u32 {
        self.refs
    }

    /// Named channels can be looked up again by [`IdTable::request`], anonymous ones cannot.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Channels start disabled until the application opts in.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// [`Threshold::Unset`] filters everything, so a forgotten threshold means silence, not noise.
    #[must_use]
    pub const fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Whether the last written message left its line open, so the next one skips the prefix.
    #[must_use]
    pub const fn continuation(&self) -> bool {
        self.continuation
    }

    pub(crate) const fn set_continuation(&mut self, open: bool) {
        self.continuation = open;
    }

    /// `None` leaves message text uncolored even when message color is on globally.
    #[must_use]
    pub const fn color(&self) -> Option<&ColorSpec> {
        self.color.as_ref()
    }

    /// [`Prefix::UNSET`] means the channel follows the global prefix.
    #[must_use]
    pub const fn prefix(&self) -> Prefix {
        self.prefix
    }

    /// Channel-private outputs.
    #[must_use]
    pub const fn outputs(&self) -> &OutputTable {
        &self.outputs
    }

    pub(crate) const fn outputs_mut(&mut self) -> &mut OutputTable {
        &mut self.outputs
    }

    /// Enabled and the level passes the channel threshold.
    #[must_use]
    pub const fn passes(&self, level: Level) -> bool {
        self.enabled && self.threshold.accepts(level)
    }
}

/// Fixed array of channels indexed by [`Id`].
#[derive(Debug, Clone)]
pub struct IdTable {
    slots: Vec<Channel>,
}

impl Default for IdTable {
    fn default() -> Self {
        Self::new(super::DEFAULT_MAX_IDS, DEFAULT_MAX_ID_OUTPUTS)
    }
}

impl IdTable {
    /// `capacity` is clamped so no slot collides with [`Id::UNKNOWN`].
    #[must_use]
    pub fn new(capacity: usize, id_outputs: usize) -> Self {
        let capacity = capacity.min(usize::from(Id::UNKNOWN.raw()));
        Self {
            slots: (0..capacity).map(|_| Channel::vacant(id_outputs)).collect(),
        }
    }

    /// Fixed at construction; [`Error::IdsFull`] is reported beyond it.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of channels currently allocated.
    #[must_use]
    pub fn in_use(&self) -> usize {
        self.slots.iter().filter(|c| c.in_use()).count()
    }

    /// Allocates a channel. A name already held by a live channel returns that channel's id
    /// and takes one more reference on it; `None` always allocates a fresh slot.
    ///
    /// # Errors
    /// [`Error::IdsFull`] when every slot is in use.
    pub fn request(&mut self, name: Option<&str>) -> Result<Id, Error> {
        if let Some(name) = name
            && let Some(index) = self
                .slots
                .iter()
                .position(|c| c.in_use() && c.name() == Some(name))
        {
            self.slots[index].refs += 1;
            return Ok(Self::id_at(index));
        }

        let index = self
            .slots
            .iter()
            .position(|c| !c.in_use())
            .ok_or(Error::IdsFull)?;

        let channel = &mut self.slots[index];
        channel.reset();
        channel.refs = 1;
        channel.name = name.map(str::to_string);
        Ok(Self::id_at(index))
    }

    /// Drops one reference; the last one resets the slot. Returns the references left.
    ///
    /// # Errors
    /// [`Error::IdUnknown`] out of range, [`Error::IdNotFound`] for a free slot.
    pub fn release(&mut self, id: Id) -> Result<u32, Error> {
        let channel = self.slot_mut(id)?;
        if !channel.in_use() {
            return Err(Error::IdNotFound);
        }
        channel.refs -= 1;
        let remaining = channel.refs;
        if remaining == 0 {
            channel.reset();
        }
        Ok(remaining)
    }

    #[allow(clippy::cast_possible_truncation)]
    const fn id_at(index: usize) -> Id {
        // capacity is clamped below u16::MAX in new()
        Id::from_raw(index as u16)
    }

    /// Any slot in range, allocated or not.
    ///
    /// # Errors
    /// [`Error::IdUnknown`] when `id` is out of range.
    pub fn slot(&self, id: Id) -> Result<&Channel, Error> {
        self.slots.get(id.index()).ok_or(Error::IdUnknown)
    }

    pub(crate) fn slot_mut(&mut self, id: Id) -> Result<&mut Channel, Error> {
        self.slots.get_mut(id.index()).ok_or(Error::IdUnknown)
    }

    /// An allocated channel.
    ///
    /// # Errors
    /// [`Error::IdUnknown`] out of range, [`Error::IdNotFound`] for a free slot.
    pub fn channel(&self, id: Id) -> Result<&Channel, Error> {
        let channel = self.slot(id)?;
        if channel.in_use() {
            Ok(channel)
        } else {
            Err(Error::IdNotFound)
        }
    }

    pub(crate) fn channel_mut(&mut self, id: Id) -> Result<&mut Channel, Error> {
        let channel = self.slot_mut(id)?;
        if channel.in_use() {
            Ok(channel)
        } else {
            Err(Error::IdNotFound)
        }
    }

    /// True when `id` names an allocated channel.
    #[must_use]
    pub fn is_live(&self, id: Id) -> bool {
        self.channel(id).is_ok()
    }

    /// # Errors
    /// [`Error::IdUnknown`] when `id` is out of range.
    pub fn set_enabled(&mut self, id: Id, enabled: bool) -> Result<(), Error> {
        self.slot_mut(id)?.enabled = enabled;
        Ok(())
    }

    /// False for out-of-range ids.
    #[must_use]
    pub fn is_enabled(&self, id: Id) -> bool {
        self.slot(id).is_ok_and(Channel::is_enabled)
    }

    /// # Errors
    /// [`Error::IdUnknown`] out of range, [`Error::LevelUnknown`] for an unset threshold or
    /// empty mask.
    pub fn set_threshold(&mut self, id: Id, threshold: Threshold) -> Result<(), Error> {
        let channel = self.slot_mut(id)?;
        channel.threshold = check_threshold(threshold)?;
        Ok(())
    }

    /// # Errors
    /// [`Error::IdUnknown`] when `id` is out of range.
    pub fn threshold(&self, id: Id) -> Result<Threshold, Error> {
        self.slot(id).map(Channel::threshold)
    }

    /// Whether a message at `level` on `id` would pass the channel filter.
    #[must_use]
    pub fn generates_output(&self, id: Id, level: Level) -> bool {
        self.slot(id).is_ok_and(|c| c.passes(level))
    }

    /// `None` for anonymous, free, or out-of-range ids alike.
    #[must_use]
    pub fn name(&self, id: Id) -> Option<&str> {
        self.slot(id).ok().and_then(Channel::name)
    }

    /// # Errors
    /// [`Error::IdUnknown`] when `id` is out of range.
    pub fn set_prefix(&mut self, id: Id, prefix: Prefix) -> Result<(), Error> {
        self.slot_mut(id)?.prefix = prefix;
        Ok(())
    }

    /// # Errors
    /// [`Error::IdUnknown`] when `id` is out of range.
    pub fn prefix(&self, id: Id) -> Result<Prefix, Error> {
        self.slot(id).map(Channel::prefix)
    }

    /// `None` removes the channel's message color.
    ///
    /// # Errors
    /// [`Error::IdUnknown`] when `id` is out of range.
    pub fn set_color(&mut self, id: Id, color: Option<ColorSpec>) -> Result<(), Error> {
        self.slot_mut(id)?.color = color;
        Ok(())
    }

    /// Live channels in id order.
    pub fn iter(&self) -> impl Iterator<Item = (Id, &Channel)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, c)| c.in_use())
            .map(|(i, c)| (Self::id_at(i), c))
    }
}
