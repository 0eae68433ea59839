//! # Bring-up for the STM32F469I-DISCO board
//!
//! This crate carries the fixed start-up policy of the board: derive a
//! 180 MHz system clock from the 8 MHz HSE crystal, bring up the green
//! user LED (LD1) and arm the blue user button (PA0, EXTI line 0) as a
//! rising-edge interrupt source. Every matching edge toggles the LED from
//! the interrupt path; the foreground loop only sleeps.
//!
//! Register-level access is deliberately left to a collaborator behind two
//! small traits, [`rcc::ClockControl`] and [`exti::ExtiControl`], plus the
//! [`embedded-hal`] digital pin traits. On hardware the device HAL
//! implements them; the test suite substitutes recording fakes, so the
//! whole bring-up sequence and the dispatch guard run on the host.
//!
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal
//!
//! # Usage
//!
//! The clock tree is plain data and can be inspected anywhere:
//!
//! ```rust
//! use stm32f469_bringup::rcc::ClockConfig;
//!
//! let clocks = ClockConfig::disco().clocks().unwrap();
//! assert_eq!(clocks.sysclk().to_MHz(), 180);
//! assert_eq!(clocks.wait_states(), 5);
//! ```
//!
//! On the board itself, the port's `main` wires the collaborator in and
//! parks the dispatcher where the EXTI0 handler can reach it:
//!
//! ```rust,ignore
//! #[entry]
//! fn main() -> ! {
//!     let mut hal = port::take();
//!     let led = Led::new(port::ld1());
//!
//!     let board = Board::new(ClockConfig::disco(), led);
//!     match board.bring_up(&mut hal) {
//!         Ok(dispatcher) => port::install(dispatcher),
//!         // An unverifiable clock tree is unsafe to run peripherals on.
//!         Err(_) => board::halt(),
//!     }
//!     board::idle()
//! }
//!
//! #[interrupt]
//! fn EXTI0() {
//!     port::with_dispatcher(|d| d.on_edge_interrupt(ExtiLine::Line0));
//! }
//! ```

#![no_std]

pub mod board;
pub mod dispatch;
pub mod exti;
pub mod led;
pub mod prelude;
pub mod rcc;
pub mod time;
