//! Dispatch task
//!
//! Owns the controller and every output. Sleeps until a producer signals
//! `WAKE`, then runs dispatch passes until no flag is left.

use defmt::*;

use strobesync_core::{Controller, Hardware};
use strobesync_hal_rp2040::{RpOutput, RpPwm};

use crate::analog::SignalConverter;
use crate::channels::{FLAGS, WAKE};
use crate::timer::SignalTimer;

/// Concrete board hardware driven by the controller
pub type BoardHardware =
    Hardware<RpOutput<'static>, RpOutput<'static>, SignalTimer, SignalConverter, RpPwm<'static>>;

/// Dispatch task - the cooperative main loop
#[embassy_executor::task]
pub async fn dispatch_task(mut controller: Controller, mut hw: BoardHardware) {
    info!("Dispatch task started");

    controller.start(&mut hw);
    debug!("Outputs idle: {:?}", controller.status());

    loop {
        WAKE.wait().await;

        while FLAGS.any_pending() {
            let summary = controller.poll(&FLAGS, &mut hw);

            if summary.triggered {
                debug!(
                    "Strobe restart (trigger {}, delay {}us)",
                    controller.status().triggers,
                    controller.strobe().delay_us()
                );
            }

            if let Some(conversion) = summary.conversion {
                trace!("{:?}", conversion);
            }

            if summary.heartbeat {
                debug!(
                    "Status: {:?}, timer arms {}",
                    controller.status(),
                    hw.timer.arms()
                );
            }
        }
    }
}
