//! Software stand-ins for the division unit and interrupt controller.
//!
//! Used on general-purpose hosts where neither peripheral exists.

use vdp_geom_hal::{DivisionUnit, InterruptControl};

/// Synchronous 16.16 divider. The quotient is ready as soon as the
/// division is issued.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoftDivider {
    quotient: i32,
}

impl SoftDivider {
    pub const fn new() -> Self {
        Self { quotient: 0 }
    }
}

impl DivisionUnit for SoftDivider {
    fn issue(&mut self, dividend: i32, divisor: i32) {
        self.quotient = fix16_div_bits(dividend, divisor);
    }

    fn retrieve(&mut self) -> i32 {
        self.quotient
    }
}

/// Divide two raw 16.16 values, saturating on overflow. A zero divisor
/// yields the extreme value matching the dividend's sign, like the hardware
/// unit's overflow result.
pub fn fix16_div_bits(dividend: i32, divisor: i32) -> i32 {
    if divisor == 0 {
        return if dividend < 0 { i32::MIN } else { i32::MAX };
    }
    let quotient = ((dividend as i64) << 16) / divisor as i64;
    quotient.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Interrupt controller for hosts without one. Masking is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInterrupts;

impl InterruptControl for NoInterrupts {
    fn mask_all(&mut self) -> u8 {
        0
    }

    fn restore(&mut self, _level: u8) {}
}
