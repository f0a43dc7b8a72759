/// Square matrices backed by nalgebra storage
///
/// Entries are addressed as `(row, col)`; vectors are columns, so a
/// transform applies as `m * v`.
use std::fmt;
use std::ops::{Add, Mul, Sub};

use crate::error::{MathError, MathResult};
use crate::vector::{Vector3, Vector4, EPSILON};

#[derive(Debug, Clone, Copy)]
pub struct Matrix3(nalgebra::Matrix3<f64>);

#[derive(Debug, Clone, Copy)]
pub struct Matrix4(nalgebra::Matrix4<f64>);

macro_rules! impl_square_matrix {
    ($name:ident, $na:ident, $dim:literal, $vector:ident) => {
        impl $name {
            pub fn identity() -> Self {
                Self(nalgebra::$na::identity())
            }

            pub fn zero() -> Self {
                Self(nalgebra::$na::zeros())
            }

            /// Build from row-major rows, checking the shape.
            pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> MathResult<Self> {
                let bad_row = rows.iter().map(|r| r.as_ref().len()).find(|&len| len != $dim);
                if rows.len() != $dim || bad_row.is_some() {
                    return Err(MathError::DimensionMismatch {
                        expected: $dim,
                        rows: rows.len(),
                        cols: bad_row
                            .or_else(|| rows.first().map(|r| r.as_ref().len()))
                            .unwrap_or(0),
                    });
                }
                Ok(Self(nalgebra::$na::from_fn(|r, c| rows[r].as_ref()[c])))
            }

            pub fn from_array(rows: [[f64; $dim]; $dim]) -> Self {
                Self(nalgebra::$na::from_fn(|r, c| rows[r][c]))
            }

            pub fn to_array(&self) -> [[f64; $dim]; $dim] {
                let mut rows = [[0.0; $dim]; $dim];
                for (r, row) in rows.iter_mut().enumerate() {
                    for (c, value) in row.iter_mut().enumerate() {
                        *value = self.0[(r, c)];
                    }
                }
                rows
            }

            pub fn get(&self, row: usize, col: usize) -> f64 {
                self.0[(row, col)]
            }

            pub fn set(&mut self, row: usize, col: usize, value: f64) {
                self.0[(row, col)] = value;
            }

            pub fn transpose(&self) -> Self {
                Self(self.0.transpose())
            }

            pub fn as_nalgebra(&self) -> &nalgebra::$na<f64> {
                &self.0
            }
        }

        impl Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul for $name {
            type Output = Self;

            fn mul(self, rhs: Self) -> Self {
                Self(self.0 * rhs.0)
            }
        }

        impl Mul<$vector> for $name {
            type Output = $vector;

            fn mul(self, v: $vector) -> $vector {
                $vector::from(self.0 * nalgebra::$vector::<f64>::from(v))
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.0
                    .iter()
                    .zip(other.0.iter())
                    .all(|(a, b)| (a - b).abs() < EPSILON)
            }
        }

        impl From<nalgebra::$na<f64>> for $name {
            fn from(m: nalgebra::$na<f64>) -> Self {
                Self(m)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for row in self.to_array() {
                    let cells: Vec<String> = row.iter().map(|v| format!("{:.4}", v)).collect();
                    writeln!(f, "[{}]", cells.join(", "))?;
                }
                Ok(())
            }
        }
    };
}

impl_square_matrix!(Matrix3, Matrix3, 3, Vector3);
impl_square_matrix!(Matrix4, Matrix4, 4, Vector4);

impl Matrix3 {
    /// Determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> f64 {
        let m = &self.0;
        m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
            - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
            + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}
