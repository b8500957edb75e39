//! Conversion request front end
//!
//! Starting a conversion only posts the channel to `adc_task`; the result
//! comes back through the conversion cell in the flag store.

use strobesync_core::analog::AnalogChannel;
use strobesync_hal::AnalogConverter;

use crate::channels::ADC_REQUEST;

/// Analog converter backed by the ADC task
#[derive(Default)]
pub struct SignalConverter;

impl AnalogConverter<AnalogChannel> for SignalConverter {
    fn start_conversion(&mut self, channel: AnalogChannel) {
        ADC_REQUEST.signal(channel);
    }
}
