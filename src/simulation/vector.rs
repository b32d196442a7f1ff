//! Validated 3D vector used for every position, velocity and acceleration
//!
//! `Vector3D` wraps an nalgebra `Vector3<f64>` and adds:
//! - mutating, chainable arithmetic (`add`, `sub`, `scale`, `cross`, `lerp`)
//! - `validate(context)` that names the failing component and field
//! - checked division (zero scalar is an error, not Infinity)
//! - serialization as a plain `{x, y, z}` map or a flat `[x, y, z]` array

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, PhysicsResult};

pub type NVec3 = Vector3<f64>;

/// Plain `{x, y, z}` shape used on the wire
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct VectorData {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(from = "VectorData", into = "VectorData")]
pub struct Vector3D(NVec3);

impl Vector3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(NVec3::new(x, y, z))
    }

    pub fn zero() -> Self {
        Self(NVec3::zeros())
    }

    pub fn unit_x() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    pub fn unit_y() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    pub fn unit_z() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn z(&self) -> f64 {
        self.0.z
    }

    pub fn set(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.0 = NVec3::new(x, y, z);
        self
    }

    /// Overwrite all components with those of `other`
    pub fn copy_from(&mut self, other: &Vector3D) -> &mut Self {
        self.0 = other.0;
        self
    }

    pub fn add(&mut self, other: &Vector3D) -> &mut Self {
        self.0 += other.0;
        self
    }

    pub fn sub(&mut self, other: &Vector3D) -> &mut Self {
        self.0 -= other.0;
        self
    }

    pub fn scale(&mut self, s: f64) -> &mut Self {
        self.0 *= s;
        self
    }

    /// Divide every component by `s`; a zero divisor is a contract error
    pub fn div_scalar(&mut self, s: f64) -> PhysicsResult<&mut Self> {
        if s == 0.0 {
            return Err(PhysicsError::DivisionByZero);
        }
        self.0 /= s;
        Ok(self)
    }

    pub fn dot(&self, other: &Vector3D) -> f64 {
        self.0.dot(&other.0)
    }

    /// Replace `self` with `self × other`
    pub fn cross(&mut self, other: &Vector3D) -> &mut Self {
        self.0 = self.0.cross(&other.0);
        self
    }

    pub fn length_squared(&self) -> f64 {
        self.0.norm_squared()
    }

    pub fn length(&self) -> f64 {
        self.0.norm()
    }

    /// Scale to unit length. The zero vector stays zero.
    pub fn normalize(&mut self) -> &mut Self {
        let len = self.length();
        if len > 0.0 {
            self.0 /= len;
        }
        self
    }

    pub fn distance_to(&self, other: &Vector3D) -> f64 {
        (self.0 - other.0).norm()
    }

    pub fn distance_squared_to(&self, other: &Vector3D) -> f64 {
        (self.0 - other.0).norm_squared()
    }

    /// Move toward `target` by the fraction `alpha` (0 = stay, 1 = arrive)
    pub fn lerp(&mut self, target: &Vector3D, alpha: f64) -> &mut Self {
        self.0 = self.0.lerp(&target.0, alpha);
        self
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }

    /// Fail with the first non-finite component, tagged with `context`
    pub fn validate(&self, context: &str) -> PhysicsResult<()> {
        for (component, value) in ['x', 'y', 'z'].into_iter().zip(self.0.iter()) {
            if !value.is_finite() {
                return Err(PhysicsError::NonFinite {
                    context: context.to_string(),
                    component,
                    value: *value,
                });
            }
        }
        Ok(())
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.0.x, self.0.y, self.0.z]
    }

    pub fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Build from a slice of exactly three components
    pub fn from_slice(values: &[f64]) -> PhysicsResult<Self> {
        match values {
            [x, y, z] => Ok(Self::new(*x, *y, *z)),
            _ => Err(PhysicsError::Schema(format!(
                "expected 3 vector components, got {}",
                values.len()
            ))),
        }
    }
}

impl Default for Vector3D {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<NVec3> for Vector3D {
    fn from(v: NVec3) -> Self {
        Self(v)
    }
}

impl From<VectorData> for Vector3D {
    fn from(d: VectorData) -> Self {
        Self::new(d.x, d.y, d.z)
    }
}

impl From<Vector3D> for VectorData {
    fn from(v: Vector3D) -> Self {
        Self {
            x: v.0.x,
            y: v.0.y,
            z: v.0.z,
        }
    }
}

impl std::fmt::Display for Vector3D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:e}, {:e}, {:e})", self.0.x, self.0.y, self.0.z)
    }
}

// Operator forms for integrator math. The mutating methods above stay the
// public contract; these produce fresh values.

impl std::ops::Add for Vector3D {
    type Output = Vector3D;
    fn add(self, rhs: Vector3D) -> Vector3D {
        Vector3D(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Vector3D {
    type Output = Vector3D;
    fn sub(self, rhs: Vector3D) -> Vector3D {
        Vector3D(self.0 - rhs.0)
    }
}

impl std::ops::Mul<f64> for Vector3D {
    type Output = Vector3D;
    fn mul(self, rhs: f64) -> Vector3D {
        Vector3D(self.0 * rhs)
    }
}

impl std::ops::Mul<Vector3D> for f64 {
    type Output = Vector3D;
    fn mul(self, rhs: Vector3D) -> Vector3D {
        Vector3D(rhs.0 * self)
    }
}

impl std::ops::Neg for Vector3D {
    type Output = Vector3D;
    fn neg(self) -> Vector3D {
        Vector3D(-self.0)
    }
}

impl std::ops::AddAssign for Vector3D {
    fn add_assign(&mut self, rhs: Vector3D) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Vector3D {
    fn sub_assign(&mut self, rhs: Vector3D) {
        self.0 -= rhs.0;
    }
}
