//! Trigger input task
//!
//! Turns the configured edge on the trigger input into a trigger flag.
//! Edges that arrive before the dispatch task took the previous one merge
//! into a single restart.

use defmt::*;
use embassy_rp::gpio::Input;

use crate::board::TriggerEdge;
use crate::channels::{raise, FLAGS};

/// Trigger task - waits for edges on the trigger input
#[embassy_executor::task]
pub async fn trigger_task(mut input: Input<'static>, edge: TriggerEdge) {
    info!("Trigger task started ({:?} edge)", edge);

    loop {
        match edge {
            TriggerEdge::Rising => input.wait_for_rising_edge().await,
            TriggerEdge::Falling => input.wait_for_falling_edge().await,
            TriggerEdge::Any => input.wait_for_any_edge().await,
        }

        trace!("Trigger edge");
        raise(&FLAGS.trigger);
    }
}
