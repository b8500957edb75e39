//! One-shot timer abstraction
//!
//! Models a single hardware compare channel that can hold at most one
//! pending expiry. When it expires, the implementation raises the event
//! identified by `target` (typically by setting a flag from interrupt
//! context) and then stays idle until armed again.

/// Single re-armable one-shot timer
///
/// `T` identifies what the expiry should raise. The timer never queues:
/// arming replaces whatever was pending.
pub trait OneShotTimer<T> {
    /// Arm the timer to expire `duration_us` microseconds from now
    fn arm(&mut self, duration_us: u32, target: T);

    /// Cancel any pending expiry
    ///
    /// Cancelling an idle timer is a no-op.
    fn cancel(&mut self);
}
