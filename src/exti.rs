//! # External interrupt lines
//!
//! Types naming the EXTI resources the board uses and the [`ExtiControl`]
//! seam a collaborator implements to arm them. GPIO pins multiplex onto
//! sixteen lines by pin number; the board only ever arms one of them, but
//! the handler entry point is shared hardware-side, so dispatch always
//! carries the [`ExtiLine`] that fired.

/// Edge sensitivity of an armed line
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
    RisingFalling,
}

/// Internal pull resistor applied to the input pin
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pull {
    /// Floating input; the board provides its own biasing
    None,
    Up,
    Down,
}

/// One of the sixteen GPIO-capable EXTI lines
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtiLine {
    Line0 = 0,
    Line1 = 1,
    Line2 = 2,
    Line3 = 3,
    Line4 = 4,
    Line5 = 5,
    Line6 = 6,
    Line7 = 7,
    Line8 = 8,
    Line9 = 9,
    Line10 = 10,
    Line11 = 11,
    Line12 = 12,
    Line13 = 13,
    Line14 = 14,
    Line15 = 15,
}

impl ExtiLine {
    /// Line number as used in the EXTI register bitfields
    pub const fn number(self) -> u8 {
        self as u8
    }
}

/// NVIC preemption priority
///
/// Only four priority bits are implemented on this core; excess bits are
/// truncated here rather than silently by the hardware.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IrqPriority(u8);

impl IrqPriority {
    pub const fn new(level: u8) -> Self {
        Self(level & 0x0f)
    }

    pub const fn level(self) -> u8 {
        self.0
    }
}

/// Interrupt-arming collaborator
///
/// Infallible at this layer: a line/edge combination the hardware cannot
/// express is a build-time defect, not a runtime condition. The
/// collaborator guarantees that no edge event is delivered before `arm`
/// returns, and that the pending flag is cleared before the handler is
/// re-entered.
pub trait ExtiControl {
    /// Configures the pin mapped to `line` as an input with `pull`, makes
    /// it an interrupt source sensitive to `edge` and unmasks it in the
    /// NVIC at `priority`.
    fn arm(&mut self, line: ExtiLine, edge: Edge, pull: Pull, priority: IrqPriority);
}
