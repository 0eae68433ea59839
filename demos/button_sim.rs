//! Host simulation of the button-to-LED bring-up
//!
//! Stands in a printing collaborator for the hardware and walks the full
//! sequence: clock validation, LED init, arming, then three edge events of
//! which one targets a line nobody watches.
//!
//! ```text
//! cargo run --example button_sim
//! ```

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};

use stm32f469_bringup::board::Board;
use stm32f469_bringup::exti::{Edge, ExtiControl, ExtiLine, IrqPriority, Pull};
use stm32f469_bringup::led::Led;
use stm32f469_bringup::rcc::{ClockConfig, ClockControl, ClockError, Clocks};

struct SimHal;

impl ClockControl for SimHal {
    fn configure(&mut self, config: &ClockConfig) -> Result<Clocks, ClockError> {
        let clocks = config.clocks()?;
        println!(
            "rcc: sysclk {} MHz, hclk {} MHz, pclk1 {} MHz, pclk2 {} MHz, {} wait states",
            clocks.sysclk().to_MHz(),
            clocks.hclk().to_MHz(),
            clocks.pclk1().to_MHz(),
            clocks.pclk2().to_MHz(),
            clocks.wait_states(),
        );
        Ok(clocks)
    }
}

impl ExtiControl for SimHal {
    fn arm(&mut self, line: ExtiLine, edge: Edge, pull: Pull, priority: IrqPriority) {
        println!(
            "exti: armed line {} ({:?} edge, pull {:?}) at priority {}",
            line.number(),
            edge,
            pull,
            priority.level(),
        );
    }
}

/// Prints every level transition the way a probe on PG6 would see it.
struct SimPin {
    level: bool,
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.level = false;
        println!("gpio: PG6 low (LD1 lit)");
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.level = true;
        println!("gpio: PG6 high (LD1 dark)");
        Ok(())
    }
}

impl StatefulOutputPin for SimPin {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.level)
    }

    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.level)
    }
}

fn main() {
    let led = Led::new(SimPin { level: true });
    let board = Board::new(ClockConfig::disco(), led);

    let mut hal = SimHal;
    let mut dispatcher = match board.bring_up(&mut hal) {
        Ok(dispatcher) => dispatcher,
        Err(err) => {
            // On the board this is a silent halt; on the host we can say why.
            eprintln!("bring-up failed: {err:?}");
            std::process::exit(1);
        }
    };

    for line in [ExtiLine::Line0, ExtiLine::Line13, ExtiLine::Line0] {
        println!("edge on line {}", line.number());
        dispatcher.on_edge_interrupt(line);
    }
}
