//! ADC task
//!
//! Runs one conversion per request from the dispatch task and publishes
//! the 10-bit result (or the failure) through the conversion cell.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};

use strobesync_core::analog::AnalogChannel;
use strobesync_hal_rp2040::normalize_to_10bit;

use crate::channels::{ADC_REQUEST, FLAGS, WAKE};

/// ADC task - converts on request
#[embassy_executor::task]
pub async fn adc_task(
    mut adc: Adc<'static, Async>,
    mut direction: Channel<'static>,
    mut position: Channel<'static>,
) {
    info!("ADC task started");

    loop {
        let channel = ADC_REQUEST.wait().await;
        let input = match channel {
            AnalogChannel::Direction => &mut direction,
            AnalogChannel::Position => &mut position,
        };

        match adc.read(input).await {
            Ok(raw) => {
                let reading = normalize_to_10bit(raw);
                trace!("{:?} reading: {} (raw {})", channel, reading, raw);
                FLAGS.conversion.publish(reading);
            }
            Err(e) => {
                warn!("{:?} conversion failed: {:?}", channel, Debug2Format(&e));
                FLAGS.conversion.fail();
            }
        }

        WAKE.signal(());
    }
}
