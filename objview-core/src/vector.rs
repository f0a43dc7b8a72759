/// Fixed-size vectors with tolerance equality and checked division
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::error::{MathError, MathResult};

/// Absolute tolerance used for equality, division and normalization checks.
pub const EPSILON: f64 = 1e-10;

/// Axis selector for component-wise updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Vector4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

macro_rules! impl_vector {
    ($name:ident, $dim:literal, $na:ident, $($field:ident),+) => {
        impl $name {
            pub const fn new($($field: f64),+) -> Self {
                Self { $($field),+ }
            }

            pub const fn zero() -> Self {
                Self { $($field: 0.0),+ }
            }

            pub fn dot(&self, other: &Self) -> f64 {
                0.0 $(+ self.$field * other.$field)+
            }

            /// Euclidean length
            pub fn length(&self) -> f64 {
                self.dot(self).sqrt()
            }

            /// Divide every component by `scalar`, refusing divisors near zero.
            pub fn divide(&self, scalar: f64) -> MathResult<Self> {
                if scalar.abs() < EPSILON {
                    return Err(MathError::DivisionByZero { divisor: scalar });
                }
                Ok(Self { $($field: self.$field / scalar),+ })
            }

            /// Unit-length copy of this vector.
            pub fn normalized(&self) -> MathResult<Self> {
                let len = self.length();
                if len < EPSILON {
                    return Err(MathError::ZeroLengthVector);
                }
                Ok(Self { $($field: self.$field / len),+ })
            }

            /// Normalize in place. Leaves the vector untouched on error.
            pub fn normalize(&mut self) -> MathResult<()> {
                *self = self.normalized()?;
                Ok(())
            }

            pub fn to_array(self) -> [f64; $dim] {
                [$(self.$field),+]
            }
        }

        impl Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field -= rhs.$field;)+
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;

            fn mul(self, scalar: f64) -> Self {
                Self { $($field: self.$field * scalar),+ }
            }
        }

        impl Neg for $name {
            type Output = Self;

            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                true $(&& (self.$field - other.$field).abs() < EPSILON)+
            }
        }

        impl From<[f64; $dim]> for $name {
            fn from(components: [f64; $dim]) -> Self {
                let [$($field),+] = components;
                Self { $($field),+ }
            }
        }

        impl From<$name> for nalgebra::$na<f64> {
            fn from(v: $name) -> Self {
                nalgebra::$na::new($(v.$field),+)
            }
        }

        impl From<nalgebra::$na<f64>> for $name {
            fn from(v: nalgebra::$na<f64>) -> Self {
                Self { $($field: v.$field),+ }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let parts = [$(format!("{:.4}", self.$field)),+];
                write!(f, "{}({})", stringify!($name), parts.join(", "))
            }
        }
    };
}

impl_vector!(Vector2, 2, Vector2, x, y);
impl_vector!(Vector3, 3, Vector3, x, y, z);
impl_vector!(Vector4, 4, Vector4, x, y, z, w);

impl Vector3 {
    pub const fn splat(value: f64) -> Self {
        Self::new(value, value, value)
    }

    pub const fn unit_y() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn component(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Copy of this vector with one component replaced.
    pub fn with_component(self, axis: Axis, value: f64) -> Self {
        match axis {
            Axis::X => Self { x: value, ..self },
            Axis::Y => Self { y: value, ..self },
            Axis::Z => Self { z: value, ..self },
        }
    }

    /// Homogeneous point (x, y, z, 1)
    pub fn to_point(self) -> Vector4 {
        Vector4::new(self.x, self.y, self.z, 1.0)
    }
}

impl Vector4 {
    /// Drop the w component without dividing.
    pub fn xyz(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }
}
