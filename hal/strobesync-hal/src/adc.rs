//! Analog-to-digital conversion abstraction
//!
//! Conversions are started here and completed asynchronously: the
//! implementation delivers the raw reading through whatever completion
//! path the application wires up (an interrupt writing into a capture
//! cell, a task publishing the result, ...).

/// Analog converter with one conversion in flight at a time
///
/// `C` is the application's logical channel identifier.
pub trait AnalogConverter<C> {
    /// Start a conversion on `channel`
    ///
    /// Callers must not start a new conversion before the previous one
    /// has completed.
    fn start_conversion(&mut self, channel: C);
}
