//! Base tick task
//!
//! Runs the 1 ms base tick that feeds the application and heartbeat
//! countdowns.

use defmt::*;
use embassy_time::{Duration, Ticker};

use strobesync_core::config::{TickConfig, ONE_MILLISECOND_US};
use strobesync_core::tick::TickCounters;

use crate::channels::{FLAGS, WAKE};

/// Tick task - advances the countdowns every base tick
#[embassy_executor::task]
pub async fn tick_task(config: TickConfig) {
    info!(
        "Tick task started (app {}ms, heartbeat {}ms)",
        config.application_ms, config.heartbeat_ms
    );

    let mut counters = TickCounters::new(config);
    let mut ticker = Ticker::every(Duration::from_micros(u64::from(ONE_MILLISECOND_US)));

    loop {
        ticker.next().await;

        if counters.advance(&FLAGS) {
            WAKE.signal(());
        }
    }
}
