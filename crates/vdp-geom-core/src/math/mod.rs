//! Fixed-point math used by the geometry pipeline.

pub mod fixed;
pub mod matrix;

pub use fixed::{fix16, fix16_from_f32, fix16_int32_mul, saturate_i16, Angle, Fix16, FixVec3, ScreenPoint};
pub use matrix::{Mat43, MatrixStack, MatrixStackError, MATRIX_STACK_DEPTH};
