//! Time units
//!
//! Frequencies are [`fugit`] rates. The [`RateExtU32`] extension trait adds
//! `.Hz()`, `.kHz()` and `.MHz()` to `u32` for building them.

pub use fugit::{
    HertzU32 as Hertz, KilohertzU32 as KiloHertz, MegahertzU32 as MegaHertz, RateExtU32,
};
