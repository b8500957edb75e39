//! GPIO output wrapper
//!
//! Logical levels follow `strobesync_hal::OutputPin`: "high" is active.
//! Outputs wired active-low set `inverted` and are flipped here, so the
//! control core never sees the board polarity.

use embassy_rp::gpio::{Level, Output};
use strobesync_hal::OutputPin;

/// Push-pull output with configurable polarity
pub struct RpOutput<'d> {
    pin: Output<'d>,
    inverted: bool,
}

impl<'d> RpOutput<'d> {
    /// Wrap an output; the pin is driven inactive immediately
    pub fn new(mut pin: Output<'d>, inverted: bool) -> Self {
        pin.set_level(inactive_level(inverted));
        Self { pin, inverted }
    }
}

/// Electrical level of an idle output
pub fn inactive_level(inverted: bool) -> Level {
    if inverted {
        Level::High
    } else {
        Level::Low
    }
}

impl OutputPin for RpOutput<'_> {
    fn set_high(&mut self) {
        if self.inverted {
            self.pin.set_low();
        } else {
            self.pin.set_high();
        }
    }

    fn set_low(&mut self) {
        if self.inverted {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high() != self.inverted
    }
}
