//! # Board bring-up
//!
//! The one-time start-up sequence: freeze the clock tree, put the LED in
//! a known state, arm the button line. Strictly ordered and not
//! re-entrant; nothing may observe an interrupt before the sequence has
//! run to completion, which the [`Board`] → [`Dispatcher`] handover
//! encodes in the types.

use core::convert::Infallible;

use cortex_m::asm;
use embedded_hal::digital::StatefulOutputPin;

use crate::dispatch::Dispatcher;
use crate::exti::{Edge, ExtiControl, ExtiLine, IrqPriority, Pull};
use crate::led::Led;
use crate::rcc::{ClockConfig, ClockControl, ClockError};

/// EXTI line wired to the blue user button (PA0)
pub const USER_BUTTON: ExtiLine = ExtiLine::Line0;

/// NVIC priority the button line is registered at
pub const BUTTON_PRIORITY: IrqPriority = IrqPriority::new(2);

/// Platform context before bring-up
///
/// Owns the write-once [`ClockConfig`] and the LED. Defaults to watching
/// [`USER_BUTTON`] at [`BUTTON_PRIORITY`]; both can be overridden before
/// bring-up, never after.
pub struct Board<P> {
    config: ClockConfig,
    led: Led<P>,
    line: ExtiLine,
    priority: IrqPriority,
}

impl<P> Board<P>
where
    P: StatefulOutputPin<Error = Infallible>,
{
    pub fn new(config: ClockConfig, led: Led<P>) -> Self {
        Self {
            config,
            led,
            line: USER_BUTTON,
            priority: BUTTON_PRIORITY,
        }
    }

    /// Watches `line` instead of the user button
    pub fn watch(mut self, line: ExtiLine) -> Self {
        self.line = line;
        self
    }

    /// Registers the watched line at `priority` instead of the default
    pub fn priority(mut self, priority: IrqPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Runs the bring-up sequence against the hardware collaborator
    ///
    /// Clock configuration comes first and is the only fallible step: on
    /// `Err` the sequence stops immediately, with the LED untouched and no
    /// interrupt armed, and the caller is expected to [`halt`]. On success
    /// the LED starts dark, the line is armed for rising edges with no
    /// pull (the button has its own pull-down), and the armed context is
    /// handed back as a [`Dispatcher`].
    pub fn bring_up<H>(mut self, hal: &mut H) -> Result<Dispatcher<P>, ClockError>
    where
        H: ClockControl + ExtiControl,
    {
        let clocks = hal.configure(&self.config)?;
        self.led.off();
        hal.arm(self.line, Edge::Rising, Pull::None, self.priority);
        Ok(Dispatcher::new(self.led, self.line, clocks))
    }
}

/// Foreground loop after a successful bring-up
///
/// Sleeps between events; every armed interrupt wakes the core, runs its
/// handler and drops back here.
pub fn idle() -> ! {
    loop {
        asm::wfi();
    }
}

/// Fail-stop sink for an unverifiable clock tree
///
/// Masks interrupts and parks the core for good. Observable from outside
/// only as a board that never shows any LED activity.
pub fn halt() -> ! {
    cortex_m::interrupt::disable();
    loop {
        asm::wfi();
    }
}
