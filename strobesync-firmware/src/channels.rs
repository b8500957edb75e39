//! Inter-task communication
//!
//! Event producers (edge, timer, ADC, tick tasks) write into [`FLAGS`] and
//! then signal [`WAKE`]. The dispatch task is the only consumer of both.
//! Commands flowing the other way (arm the strobe timer, start a
//! conversion) are latest-wins signals.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Instant;

use strobesync_core::analog::AnalogChannel;
use strobesync_core::flags::{FlagCell, TimerTarget};
use strobesync_core::EventFlags;

/// Flag store shared by every producer and the dispatch task
pub static FLAGS: EventFlags = EventFlags::new();

/// Wakes the dispatch task after a flag was raised
pub static WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Strobe timer command (updated by the dispatch task)
pub static TIMER_CMD: Signal<CriticalSectionRawMutex, TimerCommand> = Signal::new();

/// Conversion request (updated by the dispatch task)
pub static ADC_REQUEST: Signal<CriticalSectionRawMutex, AnalogChannel> = Signal::new();

/// Command for the strobe timer task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerCommand {
    /// Expire at `deadline` and raise `target`
    Arm {
        /// Absolute expiry time
        deadline: Instant,
        /// Flag raised on expiry
        target: TimerTarget,
    },
    /// Drop any pending expiry
    Cancel,
}

/// Raise a flag and wake the dispatch task
pub fn raise(flag: &FlagCell) {
    flag.set();
    WAKE.signal(());
}
