//! Discrete control lines of the tracker board.

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState};

/// Placeholder for a control line that is not wired up.
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = core::convert::Infallible;
}

impl InputPin for NoPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Pins of the tracker board driven by [`Modem`](crate::Modem).
///
/// Return `None` from an accessor (and use [`NoPin`] as its type) for lines
/// that are not connected. Without a status line the modem is probed with
/// `AT` to determine whether it is powered.
pub trait BoardConfig {
    /// `M95_POWERKEY`, pulsed high to toggle the module power
    type PowerKeyPin: OutputPin;
    /// `ENABLE`, switches the regulator feeding the modem and peripherals
    type EnablePin: OutputPin;
    /// `STATUS`, reflects whether the module is running
    type StatusPin: InputPin;
    type ButtonPin: InputPin;
    type LedPin: OutputPin;

    /// Level of the status line while the module is powered up
    const STATUS_ON_LEVEL: PinState = PinState::Low;
    /// Level of the button line while the button is pressed
    const BUTTON_PRESSED_LEVEL: PinState = PinState::Low;

    fn power_key_pin(&mut self) -> Option<&mut Self::PowerKeyPin>;
    fn enable_pin(&mut self) -> Option<&mut Self::EnablePin>;
    fn status_pin(&mut self) -> Option<&mut Self::StatusPin>;
    fn button_pin(&mut self) -> Option<&mut Self::ButtonPin>;
    fn led_pin(&mut self) -> Option<&mut Self::LedPin>;
}

/// Sample an input line and compare it to `active`.
pub(crate) fn is_active<P: InputPin>(pin: &mut P, active: PinState) -> Result<bool, crate::Error> {
    let high = pin.is_high().map_err(|_| crate::Error::Pin)?;
    Ok(high == (active == PinState::High))
}

pub(crate) fn drive<P: OutputPin>(pin: Option<&mut P>, state: PinState) -> Result<(), crate::Error> {
    match pin {
        Some(pin) => pin.set_state(state).map_err(|_| crate::Error::Pin),
        None => Ok(()),
    }
}
