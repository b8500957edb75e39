//! Periodic tick counters
//!
//! A 1 ms base tick (hardware timer interrupt or ticker task) feeds a set
//! of reloading countdowns. Each countdown raises its flag when it reaches
//! zero and starts over; nothing else is tracked.

use crate::config::TickConfig;
use crate::flags::EventFlags;

/// Reloading countdown in base ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickCounter {
    reload: u16,
    remaining: u16,
    active: bool,
}

impl TickCounter {
    /// Create an active counter that expires every `reload` base ticks
    pub const fn new(reload: u16) -> Self {
        let reload = if reload == 0 { 1 } else { reload };
        Self {
            reload,
            remaining: reload,
            active: true,
        }
    }

    /// Period in base ticks
    pub const fn reload(&self) -> u16 {
        self.reload
    }

    /// Whether the counter is running
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Start or stop the counter; starting restarts the countdown
    pub fn set_active(&mut self, active: bool) {
        if active && !self.active {
            self.remaining = self.reload;
        }
        self.active = active;
    }

    /// Advance by one base tick
    ///
    /// Returns `true` when the period elapsed on this tick.
    pub fn advance(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.remaining = self.reload;
            true
        } else {
            false
        }
    }
}

/// Application and heartbeat tick sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickCounters {
    /// Drives analog sampling
    pub application: TickCounter,
    /// Drives the heartbeat LED
    pub heartbeat: TickCounter,
}

impl TickCounters {
    /// Create both counters from the configured periods
    pub const fn new(config: TickConfig) -> Self {
        Self {
            application: TickCounter::new(config.application_ms),
            heartbeat: TickCounter::new(config.heartbeat_ms),
        }
    }

    /// Advance one 1 ms base tick and raise the flags that elapsed
    ///
    /// Returns `true` if any flag was raised, so the caller knows to wake
    /// the dispatch loop.
    pub fn advance(&mut self, flags: &EventFlags) -> bool {
        let mut raised = false;
        if self.application.advance() {
            flags.app_tick.set();
            raised = true;
        }
        if self.heartbeat.advance() {
            flags.heartbeat_tick.set();
            raised = true;
        }
        raised
    }
}

impl Default for TickCounters {
    fn default() -> Self {
        Self::new(TickConfig::DEFAULT)
    }
}
