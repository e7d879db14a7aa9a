//! Affine 4x3 fixed-point matrices and the world-transform stack.

use core::ops::Mul;

use super::fixed::{Angle, Fix16, FixVec3};

/// Maximum depth of a [`MatrixStack`].
pub const MATRIX_STACK_DEPTH: usize = 16;

/// Row-major affine transform: a 3x3 rotation/scale block in columns 0-2 and
/// the translation in column 3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mat43 {
    pub rows: [[Fix16; 4]; 3],
}

impl Default for Mat43 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat43 {
    pub const IDENTITY: Self = Self {
        rows: [
            [Fix16::ONE, Fix16::ZERO, Fix16::ZERO, Fix16::ZERO],
            [Fix16::ZERO, Fix16::ONE, Fix16::ZERO, Fix16::ZERO],
            [Fix16::ZERO, Fix16::ZERO, Fix16::ONE, Fix16::ZERO],
        ],
    };

    pub fn from_translation(t: FixVec3) -> Self {
        let mut m = Self::IDENTITY;
        m.rows[0][3] = t.x;
        m.rows[1][3] = t.y;
        m.rows[2][3] = t.z;
        m
    }

    /// Uniform scale about the origin.
    pub fn from_scale(s: Fix16) -> Self {
        let mut m = Self::IDENTITY;
        m.rows[0][0] = s;
        m.rows[1][1] = s;
        m.rows[2][2] = s;
        m
    }

    pub fn from_rotation_x(angle: Angle) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let mut m = Self::IDENTITY;
        m.rows[1][1] = c;
        m.rows[1][2] = -s;
        m.rows[2][1] = s;
        m.rows[2][2] = c;
        m
    }

    pub fn from_rotation_y(angle: Angle) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let mut m = Self::IDENTITY;
        m.rows[0][0] = c;
        m.rows[0][2] = s;
        m.rows[2][0] = -s;
        m.rows[2][2] = c;
        m
    }

    /// Build a transform whose columns are the given basis vectors, placed at
    /// `origin`.
    pub fn from_basis(x_axis: FixVec3, y_axis: FixVec3, z_axis: FixVec3, origin: FixVec3) -> Self {
        Self {
            rows: [
                [x_axis.x, y_axis.x, z_axis.x, origin.x],
                [x_axis.y, y_axis.y, z_axis.y, origin.y],
                [x_axis.z, y_axis.z, z_axis.z, origin.z],
            ],
        }
    }

    /// Dot product of row `row`'s 3x3 part with `p`, plus that row's
    /// translation.
    pub fn row_dot(&self, row: usize, p: &FixVec3) -> Fix16 {
        let r = &self.rows[row];
        r[0].saturating_mul(p.x)
            .saturating_add(r[1].saturating_mul(p.y))
            .saturating_add(r[2].saturating_mul(p.z))
            .saturating_add(r[3])
    }

    pub fn transform_point(&self, p: &FixVec3) -> FixVec3 {
        FixVec3::new(self.row_dot(0, p), self.row_dot(1, p), self.row_dot(2, p))
    }

    /// Inverse of a rotation + translation transform.
    ///
    /// Only valid when the 3x3 block is orthonormal: the rotation is
    /// transposed and the translation becomes `-Rᵀ·t`.
    pub fn inverse_rigid(&self) -> Self {
        let mut out = Self::IDENTITY;
        for i in 0..3 {
            for j in 0..3 {
                out.rows[i][j] = self.rows[j][i];
            }
        }
        let t = FixVec3::new(self.rows[0][3], self.rows[1][3], self.rows[2][3]);
        for i in 0..3 {
            let column = FixVec3::new(self.rows[0][i], self.rows[1][i], self.rows[2][i]);
            out.rows[i][3] = Fix16::ZERO.saturating_sub(column.dot(&t));
        }
        out
    }
}

impl Mul for Mat43 {
    type Output = Mat43;

    fn mul(self, rhs: Mat43) -> Mat43 {
        let mut out = Mat43::IDENTITY;
        for i in 0..3 {
            for j in 0..4 {
                let mut acc = if j == 3 { self.rows[i][3] } else { Fix16::ZERO };
                for k in 0..3 {
                    acc = acc.saturating_add(self.rows[i][k].saturating_mul(rhs.rows[k][j]));
                }
                out.rows[i][j] = acc;
            }
        }
        out
    }
}

/// Error returned by [`MatrixStack`] push/pop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixStackError {
    /// Pushed past [`MATRIX_STACK_DEPTH`].
    Overflow,
    /// Tried to pop the root matrix.
    Underflow,
}

impl core::fmt::Display for MatrixStackError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MatrixStackError::Overflow => write!(f, "matrix stack overflow"),
            MatrixStackError::Underflow => write!(f, "matrix stack underflow"),
        }
    }
}

impl core::error::Error for MatrixStackError {}

/// Caller-maintained stack of world transforms. The pipeline reads only the
/// top entry.
#[derive(Clone, Debug)]
pub struct MatrixStack {
    stack: heapless::Vec<Mat43, MATRIX_STACK_DEPTH>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack {
    /// Create a stack holding a single identity matrix.
    pub fn new() -> Self {
        let mut stack = heapless::Vec::new();
        // Capacity is non-zero, so the first push cannot fail.
        let _ = stack.push(Mat43::IDENTITY);
        Self { stack }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn top(&self) -> &Mat43 {
        // The root entry is never popped.
        &self.stack[self.stack.len() - 1]
    }

    pub fn top_mut(&mut self) -> &mut Mat43 {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Duplicate the top matrix.
    pub fn push(&mut self) -> Result<(), MatrixStackError> {
        let top = *self.top();
        self.stack.push(top).map_err(|_| MatrixStackError::Overflow)
    }

    pub fn pop(&mut self) -> Result<(), MatrixStackError> {
        if self.stack.len() <= 1 {
            return Err(MatrixStackError::Underflow);
        }
        self.stack.pop();
        Ok(())
    }

    pub fn translate(&mut self, t: FixVec3) {
        self.apply(Mat43::from_translation(t));
    }

    pub fn scale(&mut self, s: Fix16) {
        self.apply(Mat43::from_scale(s));
    }

    pub fn rotate_x(&mut self, angle: Angle) {
        self.apply(Mat43::from_rotation_x(angle));
    }

    pub fn rotate_y(&mut self, angle: Angle) {
        self.apply(Mat43::from_rotation_y(angle));
    }

    fn apply(&mut self, m: Mat43) {
        let top = self.top_mut();
        *top = *top * m;
    }
}
