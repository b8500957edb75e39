//! PWM compare register abstraction

/// PWM output channel driven by a compare value
pub trait PwmCompare {
    /// Write the compare value (duty = value / (top + 1))
    fn set_compare_value(&mut self, value: u16);

    /// Counter top value; compare values above it saturate at 100% duty
    fn top(&self) -> u16;
}
