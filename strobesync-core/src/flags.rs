//! Event flag store
//!
//! Interrupt-level producers (edge detector, timer compare, ADC, tick)
//! only ever set a flag or capture a raw reading here. The dispatch loop is
//! the single consumer: it test-and-clears each flag exactly once and runs
//! the matching handler.
//!
//! Every cell is `const`-constructible so the whole store can live in a
//! `static` shared between interrupt context and the main loop.

use portable_atomic::{AtomicBool, AtomicU16, AtomicU8, Ordering};

use crate::analog::ConversionError;

/// Single-producer, single-consumer event flag
#[derive(Debug)]
pub struct FlagCell {
    raised: AtomicBool,
}

impl FlagCell {
    /// Create a cleared flag
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Raise the flag (producer side)
    ///
    /// Raising an already-raised flag is a no-op: events are never counted.
    pub fn set(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Test-and-clear (consumer side)
    ///
    /// Returns `true` exactly once per raise.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::Acquire)
    }

    /// Peek without clearing
    pub fn is_set(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Drop a pending event without handling it
    pub fn clear(&self) {
        self.raised.store(false, Ordering::Release);
    }
}

impl Default for FlagCell {
    fn default() -> Self {
        Self::new()
    }
}

const SLOT_EMPTY: u8 = 0;
const SLOT_READY: u8 = 1;
const SLOT_FAILED: u8 = 2;

/// Completion cell for one in-flight analog conversion
///
/// Carries the raw reading alongside the completion flag, in the shape of
/// an `Option<Result<u16, ConversionError>>` that the consumer takes.
#[derive(Debug)]
pub struct ConversionCell {
    reading: AtomicU16,
    state: AtomicU8,
}

impl ConversionCell {
    /// Create an empty cell
    pub const fn new() -> Self {
        Self {
            reading: AtomicU16::new(0),
            state: AtomicU8::new(SLOT_EMPTY),
        }
    }

    /// Publish a completed reading (producer side)
    pub fn publish(&self, reading: u16) {
        self.reading.store(reading, Ordering::Relaxed);
        self.state.store(SLOT_READY, Ordering::Release);
    }

    /// Report that the conversion finished without a usable reading
    pub fn fail(&self) {
        self.state.store(SLOT_FAILED, Ordering::Release);
    }

    /// Take the completion, if any (consumer side)
    pub fn take(&self) -> Option<Result<u16, ConversionError>> {
        match self.state.swap(SLOT_EMPTY, Ordering::Acquire) {
            SLOT_READY => Some(Ok(self.reading.load(Ordering::Relaxed))),
            SLOT_FAILED => Some(Err(ConversionError::ConversionFailed)),
            _ => None,
        }
    }

    /// Check for a pending completion without taking it
    pub fn is_pending(&self) -> bool {
        self.state.load(Ordering::Acquire) != SLOT_EMPTY
    }
}

impl Default for ConversionCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Flag raised when the strobe timer expires
///
/// The single pulse timer is multiplexed across the sequencer phases;
/// the target travels with every arm call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerTarget {
    /// Delay elapsed or wait finished: start a pulse
    PulseOn,
    /// Pulse-on time elapsed: end the pulse
    PulseOff,
    /// One wait-phase countdown step elapsed
    WaitTick,
}

/// All event sources of the controller
#[derive(Debug, Default)]
pub struct EventFlags {
    /// External trigger edge
    pub trigger: FlagCell,
    /// Strobe timer: start pulse
    pub pulse_on: FlagCell,
    /// Strobe timer: wait countdown step
    pub wait_tick: FlagCell,
    /// Strobe timer: end pulse
    pub pulse_off: FlagCell,
    /// Analog conversion complete
    pub conversion: ConversionCell,
    /// Application tick
    pub app_tick: FlagCell,
    /// Heartbeat tick
    pub heartbeat_tick: FlagCell,
}

impl EventFlags {
    /// Create a store with every flag cleared
    pub const fn new() -> Self {
        Self {
            trigger: FlagCell::new(),
            pulse_on: FlagCell::new(),
            wait_tick: FlagCell::new(),
            pulse_off: FlagCell::new(),
            conversion: ConversionCell::new(),
            app_tick: FlagCell::new(),
            heartbeat_tick: FlagCell::new(),
        }
    }

    /// Flag raised by a strobe timer expiry for `target`
    pub fn timer_flag(&self, target: TimerTarget) -> &FlagCell {
        match target {
            TimerTarget::PulseOn => &self.pulse_on,
            TimerTarget::PulseOff => &self.pulse_off,
            TimerTarget::WaitTick => &self.wait_tick,
        }
    }

    /// Record a strobe timer expiry (timer interrupt side)
    pub fn timer_fired(&self, target: TimerTarget) {
        self.timer_flag(target).set();
    }

    /// Drop pending timer events left over from a cancelled train
    pub fn clear_strobe_timers(&self) {
        self.pulse_on.clear();
        self.wait_tick.clear();
        self.pulse_off.clear();
    }

    /// Check if any strobe-class event is waiting
    pub fn strobe_pending(&self) -> bool {
        self.trigger.is_set()
            || self.pulse_on.is_set()
            || self.wait_tick.is_set()
            || self.pulse_off.is_set()
    }

    /// Check if any event at all is waiting
    pub fn any_pending(&self) -> bool {
        self.strobe_pending()
            || self.conversion.is_pending()
            || self.app_tick.is_set()
            || self.heartbeat_tick.is_set()
    }
}
