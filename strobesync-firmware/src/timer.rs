//! Strobe timer front end
//!
//! The control core arms and cancels the strobe timer synchronously. Here
//! that becomes a command for `pulse_timer_task`, which owns the actual
//! embassy timer. The deadline is fixed when `arm` is called, so time spent
//! handing the command over does not stretch the phase.

use embassy_time::{Duration, Instant};
use strobesync_core::flags::TimerTarget;
use strobesync_hal::OneShotTimer;

use crate::channels::{TimerCommand, TIMER_CMD};

/// One-shot timer backed by the pulse timer task
#[derive(Default)]
pub struct SignalTimer {
    arms: u32,
}

impl SignalTimer {
    /// Create the front end
    pub const fn new() -> Self {
        Self { arms: 0 }
    }

    /// Number of expiries requested since start-up
    pub fn arms(&self) -> u32 {
        self.arms
    }
}

impl OneShotTimer<TimerTarget> for SignalTimer {
    fn arm(&mut self, duration_us: u32, target: TimerTarget) {
        self.arms = self.arms.wrapping_add(1);
        let deadline = Instant::now() + Duration::from_micros(u64::from(duration_us));
        TIMER_CMD.signal(TimerCommand::Arm { deadline, target });
    }

    fn cancel(&mut self) {
        TIMER_CMD.signal(TimerCommand::Cancel);
    }
}
