//! GPIO pin abstractions
//!
//! Levels are logical: "high" means the output is active. Implementations
//! wired active-low invert at the register.

/// Digital output pin
pub trait OutputPin {
    /// Drive the output active
    fn set_high(&mut self);

    /// Drive the output inactive
    fn set_low(&mut self);

    /// Toggle the pin state
    fn toggle(&mut self) {
        if self.is_set_high() {
            self.set_low();
        } else {
            self.set_high();
        }
    }

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently driven active
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently driven inactive
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}
