//! Bring-up sequencing against recording fakes
//!
//! The collaborator traits are implemented by a fake that logs every call,
//! so the ordering and fail-stop contracts of the start-up sequence can be
//! checked without the board.

use core::cell::Cell;
use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};
use heapless::Vec;

use stm32f469_bringup::board::{self, Board};
use stm32f469_bringup::exti::{Edge, ExtiControl, ExtiLine, IrqPriority, Pull};
use stm32f469_bringup::led::Led;
use stm32f469_bringup::rcc::{ClockConfig, ClockControl, ClockError, Clocks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Configure,
    Arm {
        line: ExtiLine,
        edge: Edge,
        pull: Pull,
        priority: IrqPriority,
    },
}

struct FakeHal {
    calls: Vec<Call, 8>,
    clock_fault: Option<ClockError>,
}

impl FakeHal {
    fn new() -> Self {
        Self {
            calls: Vec::new(),
            clock_fault: None,
        }
    }

    fn failing(err: ClockError) -> Self {
        Self {
            clock_fault: Some(err),
            ..Self::new()
        }
    }
}

impl ClockControl for FakeHal {
    fn configure(&mut self, config: &ClockConfig) -> Result<Clocks, ClockError> {
        self.calls.push(Call::Configure).unwrap();
        match self.clock_fault {
            Some(err) => Err(err),
            None => config.clocks(),
        }
    }
}

impl ExtiControl for FakeHal {
    fn arm(&mut self, line: ExtiLine, edge: Edge, pull: Pull, priority: IrqPriority) {
        self.calls
            .push(Call::Arm {
                line,
                edge,
                pull,
                priority,
            })
            .unwrap();
    }
}

struct TestPin<'a> {
    level: &'a Cell<bool>,
    writes: &'a Cell<u32>,
}

impl ErrorType for TestPin<'_> {
    type Error = Infallible;
}

impl OutputPin for TestPin<'_> {
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

impl StatefulOutputPin for TestPin<'_> {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.level.get())
    }

    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.level.get())
    }
}

fn test_board<'a>(level: &'a Cell<bool>, writes: &'a Cell<u32>) -> Board<TestPin<'a>> {
    let led = Led::new(TestPin { level, writes });
    Board::new(ClockConfig::disco(), led)
}

#[test]
fn arming_follows_a_successful_clock_config() {
    let level = Cell::new(false);
    let writes = Cell::new(0);
    let mut hal = FakeHal::new();

    test_board(&level, &writes).bring_up(&mut hal).unwrap();

    assert_eq!(
        hal.calls.as_slice(),
        &[
            Call::Configure,
            Call::Arm {
                line: board::USER_BUTTON,
                edge: Edge::Rising,
                pull: Pull::None,
                priority: board::BUTTON_PRIORITY,
            },
        ]
    );
}

#[test]
fn led_starts_dark_after_bring_up() {
    let level = Cell::new(false);
    let writes = Cell::new(0);
    let mut hal = FakeHal::new();

    test_board(&level, &writes).bring_up(&mut hal).unwrap();

    // One deliberate write, to the inactive (high) level.
    assert_eq!(writes.get(), 1);
    assert!(level.get());
}

#[test]
fn clock_fault_stops_the_sequence() {
    let level = Cell::new(false);
    let writes = Cell::new(0);
    let mut hal = FakeHal::failing(ClockError::VcoOutOfRange);

    let result = test_board(&level, &writes)
        .bring_up(&mut hal)
        .map(|_| ());

    assert_eq!(result, Err(ClockError::VcoOutOfRange));
    // Nothing after the failed configure may have run: no arming, no
    // output writes, no partial state.
    assert_eq!(hal.calls.as_slice(), &[Call::Configure]);
    assert_eq!(writes.get(), 0);
}

#[test]
fn invalid_tree_is_rejected_by_the_collaborator() {
    let level = Cell::new(false);
    let writes = Cell::new(0);
    let mut hal = FakeHal::new();

    let config = ClockConfig {
        overdrive: false,
        ..ClockConfig::disco()
    };
    let led = Led::new(TestPin {
        level: &level,
        writes: &writes,
    });
    let result = Board::new(config, led).bring_up(&mut hal).map(|_| ());

    assert_eq!(result, Err(ClockError::OverdriveRequired));
    assert_eq!(hal.calls.as_slice(), &[Call::Configure]);
    assert_eq!(writes.get(), 0);
}

#[test]
fn dispatch_toggles_only_on_the_watched_line() {
    let level = Cell::new(false);
    let writes = Cell::new(0);
    let mut hal = FakeHal::new();

    let mut dispatcher = test_board(&level, &writes).bring_up(&mut hal).unwrap();
    assert!(level.get()); // dark

    dispatcher.on_edge_interrupt(ExtiLine::Line4);
    assert!(level.get());

    dispatcher.on_edge_interrupt(board::USER_BUTTON);
    assert!(!level.get()); // lit

    dispatcher.on_edge_interrupt(board::USER_BUTTON);
    assert!(level.get()); // dark again
}

#[test]
fn watched_line_and_priority_can_be_overridden() {
    let level = Cell::new(false);
    let writes = Cell::new(0);
    let mut hal = FakeHal::new();

    let mut dispatcher = test_board(&level, &writes)
        .watch(ExtiLine::Line13)
        .priority(IrqPriority::new(5))
        .bring_up(&mut hal)
        .unwrap();

    assert_eq!(dispatcher.line(), ExtiLine::Line13);
    assert_eq!(
        hal.calls.as_slice(),
        &[
            Call::Configure,
            Call::Arm {
                line: ExtiLine::Line13,
                edge: Edge::Rising,
                pull: Pull::None,
                priority: IrqPriority::new(5),
            },
        ]
    );

    // The guard follows the override.
    dispatcher.on_edge_interrupt(board::USER_BUTTON);
    assert!(level.get());
    dispatcher.on_edge_interrupt(ExtiLine::Line13);
    assert!(!level.get());
}

#[test]
fn frozen_clocks_are_reported_back() {
    let level = Cell::new(false);
    let writes = Cell::new(0);
    let mut hal = FakeHal::new();

    let dispatcher = test_board(&level, &writes).bring_up(&mut hal).unwrap();
    let clocks = dispatcher.clocks();

    assert_eq!(clocks.sysclk().to_MHz(), 180);
    assert_eq!(clocks.pclk1().to_MHz(), 45);
    assert_eq!(clocks.pclk2().to_MHz(), 90);
    assert_eq!(clocks.wait_states(), 5);
}
