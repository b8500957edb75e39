//! ADC input map
//!
//! RP2040 has a single 12-bit ADC with four external inputs:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28
//! - ADC3: GPIO29
//!
//! The control core works in 10-bit counts, so raw results are shifted
//! down before they are published.

/// External ADC input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcInput {
    /// ADC0 on GPIO26
    Adc0,
    /// ADC1 on GPIO27
    Adc1,
    /// ADC2 on GPIO28
    Adc2,
    /// ADC3 on GPIO29
    Adc3,
}

impl AdcInput {
    /// GPIO pin carrying this input
    pub const fn gpio(self) -> u8 {
        match self {
            AdcInput::Adc0 => 26,
            AdcInput::Adc1 => 27,
            AdcInput::Adc2 => 28,
            AdcInput::Adc3 => 29,
        }
    }

    /// Input routed to a GPIO pin, if any
    pub const fn from_gpio(gpio: u8) -> Option<Self> {
        match gpio {
            26 => Some(AdcInput::Adc0),
            27 => Some(AdcInput::Adc1),
            28 => Some(AdcInput::Adc2),
            29 => Some(AdcInput::Adc3),
            _ => None,
        }
    }
}

/// Reduce a 12-bit conversion result to the 10-bit range
pub const fn normalize_to_10bit(raw: u16) -> u16 {
    (raw & 0x0FFF) >> 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpio_map_round_trips() {
        for input in [AdcInput::Adc0, AdcInput::Adc1, AdcInput::Adc2, AdcInput::Adc3] {
            assert_eq!(AdcInput::from_gpio(input.gpio()), Some(input));
        }
        assert_eq!(AdcInput::from_gpio(25), None);
    }

    #[test]
    fn test_normalize_full_scale() {
        assert_eq!(normalize_to_10bit(0), 0);
        assert_eq!(normalize_to_10bit(4095), 1023);
        assert_eq!(normalize_to_10bit(2048), 512);
        // stray bits above 12 are ignored
        assert_eq!(normalize_to_10bit(0xF000 | 4095), 1023);
    }
}
