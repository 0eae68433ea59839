pub use crate::exti::ExtiControl as _stm32f469_bringup_exti_ExtiControl;
pub use crate::rcc::ClockControl as _stm32f469_bringup_rcc_ClockControl;
pub use crate::time::RateExtU32 as _fugit_RateExtU32;
pub use embedded_hal::digital::OutputPin as _embedded_hal_digital_OutputPin;
pub use embedded_hal::digital::StatefulOutputPin as _embedded_hal_digital_StatefulOutputPin;
