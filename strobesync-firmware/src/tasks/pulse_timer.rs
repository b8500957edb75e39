//! Strobe pulse timer task
//!
//! Owns the single one-shot strobe timer. Commands come from
//! `SignalTimer` in the dispatch task; an expiry raises the flag named by
//! the command's target.
//!
//! The command branch is polled first, so a command issued in the same
//! pass as an expiry (a trigger cancelling the pending phase) always wins
//! over that expiry.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};

use strobesync_core::flags::TimerTarget;

use crate::channels::{TimerCommand, FLAGS, TIMER_CMD, WAKE};

/// Pulse timer task - serves arm/cancel commands
#[embassy_executor::task]
pub async fn pulse_timer_task() {
    info!("Pulse timer task started");

    let mut pending: Option<(Instant, TimerTarget)> = None;

    loop {
        pending = match pending {
            None => apply(TIMER_CMD.wait().await),
            Some((deadline, target)) => {
                match select(TIMER_CMD.wait(), Timer::at(deadline)).await {
                    Either::First(cmd) => apply(cmd),
                    Either::Second(()) => {
                        FLAGS.timer_fired(target);
                        WAKE.signal(());
                        None
                    }
                }
            }
        };
    }
}

/// New pending expiry after a command
fn apply(cmd: TimerCommand) -> Option<(Instant, TimerTarget)> {
    match cmd {
        TimerCommand::Arm { deadline, target } => {
            if deadline < Instant::now() {
                debug!("Strobe timer armed late for {:?}", target);
            }
            Some((deadline, target))
        }
        TimerCommand::Cancel => None,
    }
}
