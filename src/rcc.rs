//! # Reset & Control Clock
//!
//! Clock-tree policy for the board: the 8 MHz HSE crystal feeds the main
//! PLL, whose `/P` tap becomes the 180 MHz system clock, divided down onto
//! the AHB and the two APB buses. [`ClockConfig`] is the write-once record
//! of that tree; [`ClockConfig::clocks`] derives the resulting [`Clocks`]
//! or reports why the tree cannot be run.
//!
//! Applying the configuration to the hardware is the job of a
//! [`ClockControl`] collaborator. The existence of a [`Clocks`] value
//! indicates that the clock configuration can no longer be changed.
//!
//! ```rust
//! use stm32f469_bringup::rcc::ClockConfig;
//!
//! let clocks = ClockConfig::disco().clocks().unwrap();
//! assert_eq!(clocks.hclk().to_MHz(), 180);
//! ```

use crate::time::Hertz;

// Electrical limits from RM0386 and the STM32F469 datasheet, VDD = 3.3 V.
const HSE_MIN: u32 = 4_000_000;
const HSE_MAX: u32 = 26_000_000;
const VCO_IN_MIN: u32 = 1_000_000;
const VCO_IN_MAX: u32 = 2_000_000;
const VCO_OUT_MIN: u32 = 100_000_000;
const VCO_OUT_MAX: u32 = 432_000_000;
const SYSCLK_MAX: u32 = 180_000_000;
// Above this the power regulator must run in over-drive mode.
const OVERDRIVE_THRESHOLD: u32 = 168_000_000;
const PCLK1_MAX: u32 = 45_000_000;
const PCLK2_MAX: u32 = 90_000_000;
// One flash wait state per started 30 MHz of HCLK beyond the first.
const FLASH_WS_STEP: u32 = 30_000_000;

/// Division factor of the main PLL `/P` output tap
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PllP {
    /// VCO divided by 2
    Div2 = 2,
    /// VCO divided by 4
    Div4 = 4,
    /// VCO divided by 6
    Div6 = 6,
    /// VCO divided by 8
    Div8 = 8,
}

impl PllP {
    pub const fn divisor(self) -> u32 {
        self as u32
    }
}

/// AHB prescaler
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AhbPrescaler {
    /// SYSCLK not divided
    Div1 = 1,
    /// SYSCLK divided by 2
    Div2 = 2,
    /// SYSCLK divided by 4
    Div4 = 4,
    /// SYSCLK divided by 8
    Div8 = 8,
    /// SYSCLK divided by 16
    Div16 = 16,
    /// SYSCLK divided by 64
    Div64 = 64,
    /// SYSCLK divided by 128
    Div128 = 128,
    /// SYSCLK divided by 256
    Div256 = 256,
    /// SYSCLK divided by 512
    Div512 = 512,
}

impl AhbPrescaler {
    pub const fn divisor(self) -> u32 {
        self as u32
    }
}

/// APB prescaler
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApbPrescaler {
    /// HCLK not divided
    Div1 = 1,
    /// HCLK divided by 2
    Div2 = 2,
    /// HCLK divided by 4
    Div4 = 4,
    /// HCLK divided by 8
    Div8 = 8,
    /// HCLK divided by 16
    Div16 = 16,
}

impl ApbPrescaler {
    pub const fn divisor(self) -> u32 {
        self as u32
    }
}

/// Main PLL factors: `VCO = HSE / M * N`, `SYSCLK = VCO / P`
///
/// The `/Q` tap feeds the 48 MHz clock domain and the `/R` tap the DSI
/// host; both are derived here but only consumed on boards that use them.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PllConfig {
    /// Input division factor, 2..=63. Must bring the VCO input into 1..2 MHz.
    pub m: u8,
    /// VCO multiplication factor, 50..=432
    pub n: u16,
    /// System clock tap divisor
    pub p: PllP,
    /// 48 MHz domain tap divisor, 2..=15
    pub q: u8,
    /// DSI tap divisor, 2..=7
    pub r: u8,
}

/// Write-once clock tree description
///
/// Built once at start-up, handed to [`ClockControl::configure`] exactly
/// once, never mutated afterwards.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClockConfig {
    /// Frequency of the external crystal
    pub hse: Hertz,
    pub pll: PllConfig,
    pub ahb: AhbPrescaler,
    pub apb1: ApbPrescaler,
    pub apb2: ApbPrescaler,
    /// Run the voltage regulator in over-drive mode. Required for a system
    /// clock above 168 MHz.
    pub overdrive: bool,
}

impl ClockConfig {
    /// The tree shipped on the STM32F469I-DISCO: 8 MHz crystal, VCO at
    /// 360 MHz, 180 MHz core, 45 MHz APB1 and 90 MHz APB2.
    pub const fn disco() -> Self {
        Self {
            hse: Hertz::from_raw(8_000_000),
            pll: PllConfig {
                m: 8,
                n: 360,
                p: PllP::Div2,
                q: 7,
                r: 6,
            },
            ahb: AhbPrescaler::Div1,
            apb1: ApbPrescaler::Div4,
            apb2: ApbPrescaler::Div2,
            overdrive: true,
        }
    }

    /// Derives the frozen [`Clocks`] this tree produces, checking every
    /// limit the hardware would enforce. A configuration that fails here
    /// must not be applied; there is no fallback tree.
    pub fn clocks(&self) -> Result<Clocks, ClockError> {
        let hse = self.hse.raw();
        if hse < HSE_MIN || hse > HSE_MAX {
            return Err(ClockError::HseOutOfRange);
        }

        let PllConfig { m, n, p, q, r } = self.pll;
        if !(2..=63).contains(&m) || !(50..=432).contains(&n) {
            return Err(ClockError::InvalidPllFactor);
        }
        if !(2..=15).contains(&q) || !(2..=7).contains(&r) {
            return Err(ClockError::InvalidPllFactor);
        }

        let vco_in = hse / m as u32;
        if vco_in < VCO_IN_MIN || vco_in > VCO_IN_MAX {
            return Err(ClockError::PllInputOutOfRange);
        }

        let vco = vco_in * n as u32;
        if vco < VCO_OUT_MIN || vco > VCO_OUT_MAX {
            return Err(ClockError::VcoOutOfRange);
        }

        let sysclk = vco / p.divisor();
        if sysclk > SYSCLK_MAX {
            return Err(ClockError::SysclkOverclocked);
        }
        if sysclk > OVERDRIVE_THRESHOLD && !self.overdrive {
            return Err(ClockError::OverdriveRequired);
        }

        let hclk = sysclk / self.ahb.divisor();
        let pclk1 = hclk / self.apb1.divisor();
        if pclk1 > PCLK1_MAX {
            return Err(ClockError::Pclk1Overclocked);
        }
        let pclk2 = hclk / self.apb2.divisor();
        if pclk2 > PCLK2_MAX {
            return Err(ClockError::Pclk2Overclocked);
        }

        Ok(Clocks {
            sysclk: Hertz::from_raw(sysclk),
            hclk: Hertz::from_raw(hclk),
            pclk1: Hertz::from_raw(pclk1),
            pclk2: Hertz::from_raw(pclk2),
            pll48clk: Hertz::from_raw(vco / q as u32),
            wait_states: ((hclk - 1) / FLASH_WS_STEP) as u8,
        })
    }
}

/// Frozen clock frequencies
///
/// The existence of this value indicates that the clock configuration has
/// been applied and can no longer be changed.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clocks {
    sysclk: Hertz,
    hclk: Hertz,
    pclk1: Hertz,
    pclk2: Hertz,
    pll48clk: Hertz,
    wait_states: u8,
}

impl Clocks {
    /// Returns the system (core) frequency
    pub const fn sysclk(&self) -> Hertz {
        self.sysclk
    }

    /// Returns the frequency of the AHB
    pub const fn hclk(&self) -> Hertz {
        self.hclk
    }

    /// Returns the frequency of the APB1
    pub const fn pclk1(&self) -> Hertz {
        self.pclk1
    }

    /// Returns the frequency of the APB2
    pub const fn pclk2(&self) -> Hertz {
        self.pclk2
    }

    /// Returns the frequency of the PLL `/Q` tap
    pub const fn pll48clk(&self) -> Hertz {
        self.pll48clk
    }

    /// Returns whether the `/Q` tap can drive the USB and SDIO peripherals
    pub const fn pll48clk_valid(&self) -> bool {
        self.pll48clk.raw() == 48_000_000
    }

    /// Flash wait states required at this AHB frequency
    pub const fn wait_states(&self) -> u8 {
        self.wait_states
    }
}

/// Reasons a clock tree fails validation
///
/// Every variant is fatal: the bring-up sequence stops and the board never
/// reaches steady state rather than running peripherals on an unverified
/// bus clock.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// The crystal is outside the 4..=26 MHz HSE range
    HseOutOfRange,
    /// A PLL division or multiplication factor is outside its field range
    InvalidPllFactor,
    /// `HSE / M` misses the 1..=2 MHz VCO input band
    PllInputOutOfRange,
    /// `HSE / M * N` misses the 100..=432 MHz VCO band
    VcoOutOfRange,
    /// The `/P` tap exceeds the 180 MHz system clock limit
    SysclkOverclocked,
    /// The requested system clock needs the regulator in over-drive mode
    OverdriveRequired,
    /// APB1 would run above 45 MHz
    Pclk1Overclocked,
    /// APB2 would run above 90 MHz
    Pclk2Overclocked,
}

/// Clock-control collaborator
///
/// Implemented over the real RCC/PWR/flash registers on hardware and by a
/// fake in tests. Called exactly once, before anything that depends on a
/// bus clock is touched.
pub trait ClockControl {
    /// Validates `config` and switches the system clock to it, adjusting
    /// flash wait states and the regulator on the way. On `Err` the caller
    /// must treat the system as unusable; no partial tree is left enabled.
    fn configure(&mut self, config: &ClockConfig) -> Result<Clocks, ClockError>;
}

#[test]
fn disco_clock_tree() {
    let clocks = ClockConfig::disco().clocks().unwrap();
    assert_eq!(clocks.sysclk().to_MHz(), 180);
    assert_eq!(clocks.hclk().to_MHz(), 180);
    assert_eq!(clocks.pclk1().to_MHz(), 45);
    assert_eq!(clocks.pclk2().to_MHz(), 90);
    assert_eq!(clocks.wait_states(), 5);
    // 360 MHz VCO / 7 lands off the 48 MHz grid; the board does not care.
    assert_eq!(clocks.pll48clk().raw(), 51_428_571);
    assert!(!clocks.pll48clk_valid());
}

#[test]
fn pll48_tap_valid_at_exactly_48_mhz() {
    let config = ClockConfig {
        pll: PllConfig {
            m: 4,
            n: 168,
            p: PllP::Div2,
            q: 7,
            r: 6,
        },
        overdrive: false,
        ..ClockConfig::disco()
    };
    let clocks = config.clocks().unwrap();
    assert_eq!(clocks.sysclk().to_MHz(), 168);
    assert!(clocks.pll48clk_valid());
}

#[test]
fn rejects_unverifiable_trees() {
    let disco = ClockConfig::disco();

    let slow_crystal = ClockConfig {
        hse: Hertz::from_raw(2_000_000),
        ..disco
    };
    assert_eq!(slow_crystal.clocks(), Err(ClockError::HseOutOfRange));

    let bad_q = ClockConfig {
        pll: PllConfig { q: 1, ..disco.pll },
        ..disco
    };
    assert_eq!(bad_q.clocks(), Err(ClockError::InvalidPllFactor));

    let hot_vco_input = ClockConfig {
        pll: PllConfig { m: 2, ..disco.pll },
        ..disco
    };
    assert_eq!(hot_vco_input.clocks(), Err(ClockError::PllInputOutOfRange));

    let slow_vco = ClockConfig {
        pll: PllConfig { n: 50, ..disco.pll },
        ..disco
    };
    assert_eq!(slow_vco.clocks(), Err(ClockError::VcoOutOfRange));

    let overclocked = ClockConfig {
        pll: PllConfig { n: 432, ..disco.pll },
        ..disco
    };
    assert_eq!(overclocked.clocks(), Err(ClockError::SysclkOverclocked));

    let fast_apb1 = ClockConfig {
        apb1: ApbPrescaler::Div2,
        ..disco
    };
    assert_eq!(fast_apb1.clocks(), Err(ClockError::Pclk1Overclocked));

    let fast_apb2 = ClockConfig {
        apb2: ApbPrescaler::Div1,
        ..disco
    };
    assert_eq!(fast_apb2.clocks(), Err(ClockError::Pclk2Overclocked));
}

#[test]
fn overdrive_gates_the_top_speed_grade() {
    let no_overdrive = ClockConfig {
        overdrive: false,
        ..ClockConfig::disco()
    };
    assert_eq!(no_overdrive.clocks(), Err(ClockError::OverdriveRequired));
}
