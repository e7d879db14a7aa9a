#![no_std]

/// Abstracts the CPU's fixed-point division unit.
///
/// Operands and the quotient are raw 16.16 fixed-point bit patterns. A
/// division is started with [`issue`](DivisionUnit::issue) and collected with
/// [`retrieve`](DivisionUnit::retrieve); callers are expected to do unrelated
/// work in between so a pipelined unit can overlap the divide. Synchronous
/// implementations may compute the quotient eagerly in `issue`.
pub trait DivisionUnit {
    /// Start computing `dividend / divisor`.
    ///
    /// Callers MUST NOT pass a divisor below the near-plane clamp; the
    /// pipeline never issues a zero or negative divisor.
    fn issue(&mut self, dividend: i32, divisor: i32);

    /// Return the quotient of the most recent [`issue`](DivisionUnit::issue).
    fn retrieve(&mut self) -> i32;
}

/// Abstracts the interrupt controller's priority mask.
///
/// The transform-and-cull pass owns the division unit and every scratch
/// buffer for its whole duration, so it runs with all interrupts masked.
pub trait InterruptControl {
    /// Mask every interrupt level. Returns the previous mask so it can be
    /// handed back to [`restore`](InterruptControl::restore).
    fn mask_all(&mut self) -> u8;

    /// Restore a mask previously returned by [`mask_all`](InterruptControl::mask_all).
    fn restore(&mut self, level: u8);
}

impl<T: DivisionUnit + ?Sized> DivisionUnit for &mut T {
    fn issue(&mut self, dividend: i32, divisor: i32) {
        (**self).issue(dividend, divisor)
    }

    fn retrieve(&mut self) -> i32 {
        (**self).retrieve()
    }
}

impl<T: InterruptControl + ?Sized> InterruptControl for &mut T {
    fn mask_all(&mut self) -> u8 {
        (**self).mask_all()
    }

    fn restore(&mut self, level: u8) {
        (**self).restore(level)
    }
}
