//! # User LED
//!
//! Thin ownership wrapper over the pin driving a board LED. The DISCO
//! user LEDs sit between the 3V3 rail and the pin, so they are active
//! low; the polarity lives here and nowhere else.

use core::convert::Infallible;

use embedded_hal::digital::StatefulOutputPin;

/// An active-low LED behind any stateful output pin
///
/// GPIO outputs on this board cannot fail, so only infallible pins are
/// accepted; the dispatch path built on top has no error channel.
pub struct Led<P> {
    pin: P,
}

impl<P> Led<P>
where
    P: StatefulOutputPin<Error = Infallible>,
{
    /// Wraps an already-configured push-pull output pin
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn on(&mut self) {
        infallible(self.pin.set_low());
    }

    pub fn off(&mut self) {
        infallible(self.pin.set_high());
    }

    /// Flips the LED to the opposite state
    pub fn toggle(&mut self) {
        infallible(self.pin.toggle());
    }
}

fn infallible(res: Result<(), Infallible>) {
    match res {
        Ok(()) => (),
        Err(never) => match never {},
    }
}
