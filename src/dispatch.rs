//! # Edge-interrupt dispatch
//!
//! The one piece of runtime behavior on this board: an armed line fires,
//! the runtime calls [`Dispatcher::on_edge_interrupt`] with the line that
//! did, and the LED toggles if it was the watched one. The handler runs
//! to completion with no waits or retries, so it is safe to call at
//! interrupt priority.

use core::convert::Infallible;

use embedded_hal::digital::StatefulOutputPin;

use crate::exti::ExtiLine;
use crate::led::Led;
use crate::rcc::Clocks;

/// Armed platform context
///
/// Produced by a successful bring-up; owns the LED and the frozen clock
/// record for the rest of the process lifetime. Edge events arriving
/// while a dispatch is still executing are not queued by the hardware:
/// at most one edge is pending at any time, and that assumption is relied
/// on rather than papered over.
///
/// The LED is mutated from the interrupt path only. If a port ever drives
/// it from the foreground as well, accesses must be serialized first,
/// e.g. by masking the line around the foreground write or by parking the
/// dispatcher in a `critical_section` mutex.
pub struct Dispatcher<P> {
    led: Led<P>,
    line: ExtiLine,
    clocks: Clocks,
}

impl<P> Dispatcher<P>
where
    P: StatefulOutputPin<Error = Infallible>,
{
    pub(crate) fn new(led: Led<P>, line: ExtiLine, clocks: Clocks) -> Self {
        Self { led, line, clocks }
    }

    /// Entry point invoked by the runtime when an armed line fires
    ///
    /// The handler slot is shared by every line routed to it, so `line`
    /// is checked against the watched one before acting: a match toggles
    /// the LED exactly once, anything else is a silent no-op. Toggling
    /// rather than setting means each physical edge produces one physical
    /// transition; two edges cancel out by design.
    pub fn on_edge_interrupt(&mut self, line: ExtiLine) {
        if line == self.line {
            self.led.toggle();
        }
    }

    /// The line this dispatcher reacts to
    pub const fn line(&self) -> ExtiLine {
        self.line
    }

    /// Frequencies the platform was brought up with
    pub const fn clocks(&self) -> &Clocks {
        &self.clocks
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;
    use core::convert::Infallible;

    use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};

    use super::Dispatcher;
    use crate::exti::ExtiLine;
    use crate::led::Led;
    use crate::rcc::ClockConfig;

    /// Pin double that records its level and write count into cells owned
    /// by the test, since the dispatcher consumes the pin itself.
    struct PinProbe<'a> {
        level: &'a Cell<bool>,
        writes: &'a Cell<u32>,
    }

    impl ErrorType for PinProbe<'_> {
        type Error = Infallible;
    }

    impl OutputPin for PinProbe<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.level.set(false);
            self.writes.set(self.writes.get() + 1);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.level.set(true);
            self.writes.set(self.writes.get() + 1);
            Ok(())
        }
    }

    impl StatefulOutputPin for PinProbe<'_> {
        fn is_set_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.level.get())
        }

        fn is_set_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.level.get())
        }
    }

    fn dispatcher<'a>(
        level: &'a Cell<bool>,
        writes: &'a Cell<u32>,
    ) -> Dispatcher<PinProbe<'a>> {
        let clocks = ClockConfig::disco().clocks().unwrap();
        let led = Led::new(PinProbe { level, writes });
        Dispatcher::new(led, ExtiLine::Line0, clocks)
    }

    #[test]
    fn matching_line_toggles_exactly_once() {
        let level = Cell::new(true);
        let writes = Cell::new(0);
        let mut dispatcher = dispatcher(&level, &writes);

        dispatcher.on_edge_interrupt(ExtiLine::Line0);

        assert_eq!(writes.get(), 1);
        assert!(!level.get());
    }

    #[test]
    fn other_lines_leave_the_output_alone() {
        let level = Cell::new(true);
        let writes = Cell::new(0);
        let mut dispatcher = dispatcher(&level, &writes);

        dispatcher.on_edge_interrupt(ExtiLine::Line1);
        dispatcher.on_edge_interrupt(ExtiLine::Line13);
        dispatcher.on_edge_interrupt(ExtiLine::Line15);

        assert_eq!(writes.get(), 0);
        assert!(level.get());
    }

    #[test]
    fn double_dispatch_restores_the_original_state() {
        let level = Cell::new(true);
        let writes = Cell::new(0);
        let mut dispatcher = dispatcher(&level, &writes);

        dispatcher.on_edge_interrupt(ExtiLine::Line0);
        dispatcher.on_edge_interrupt(ExtiLine::Line0);

        // Two real edges mean two real transitions, not a saturated set.
        assert_eq!(writes.get(), 2);
        assert!(level.get());
    }

    #[test]
    fn one_output_operation_per_event() {
        let level = Cell::new(true);
        let writes = Cell::new(0);
        let mut dispatcher = dispatcher(&level, &writes);

        for n in 1..=16 {
            dispatcher.on_edge_interrupt(ExtiLine::Line0);
            assert_eq!(writes.get(), n);
        }
    }
}
