use std::{
    fmt::{self, Display},
    ops,
};

use serde::{Deserialize, Serialize};

/// A point or vector with three `f32` coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// Create a new Vec3 from coordinates.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Construct a new point at {0,0,0}.
    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }

    /// Create a unit Y-axis vector, the default build direction.
    pub fn y_axis() -> Self {
        Self { x: 0.0, y: 1.0, z: 0.0 }
    }

    /// Compute the minimum x, y and z coordinates compared to another point.
    pub fn min(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Compute the maximum x, y and z coordinates compared to another point.
    pub fn max(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// Computes the dot product between two Vec3 values.
    #[inline(always)]
    pub fn dot(&self, rhs: &Vec3) -> f32 {
        (self.x * rhs.x) + (self.y * rhs.y) + (self.z * rhs.z)
    }

    /// Computes the cross product between two Vec3 values.
    #[inline(always)]
    pub fn cross(&self, rhs: &Vec3) -> Vec3 {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Compute the total length of the vector (distance to origin).
    #[inline(always)]
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Normalize the vector, giving it unit length. Leaves a zero-length vector unchanged.
    #[inline(always)]
    pub fn normalize(&self) -> Vec3 {
        let len = self.magnitude();
        if len < 1e-10 {
            *self
        } else {
            *self * (1.0 / len)
        }
    }

    /// Computes the angle in radians between two Vec3 values, clamping the
    /// intermediate cosine to `[-1, 1]` to guard against precision overshoot.
    pub fn angle(&self, rhs: &Vec3) -> f32 {
        let len_self = self.magnitude();
        let len_other = rhs.magnitude();
        if len_self < 1e-10 || len_other < 1e-10 {
            return 0.0;
        }
        let cosine = (self.dot(rhs) / (len_self * len_other)).clamp(-1.0, 1.0);
        cosine.acos()
    }
}

impl ops::Add<Vec3> for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Self { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

impl ops::Sub<Vec3> for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Self { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

impl ops::Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        Self { x: self.x * rhs, y: self.y * rhs, z: self.z * rhs }
    }
}

impl ops::Div<f32> for Vec3 {
    type Output = Vec3;
    fn div(self, rhs: f32) -> Vec3 {
        Self { x: self.x / rhs, y: self.y / rhs, z: self.z / rhs }
    }
}

impl Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{}, {}, {}}}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;

    #[test]
    fn test_compute_angle_opposite() {
        let v1 = Vec3::new(1.392251, 0.440162, -0.148186);
        let v2 = Vec3::new(-0.263397, -0.083273, 0.028035);

        let angle = v1.angle(&v2);
        assert!((angle - PI).abs() < 0.01);
    }

    #[test]
    fn test_normalize_zero_length_stays_zero() {
        let v = Vec3::origin();
        assert_eq!(v.normalize(), Vec3::origin());
    }

    #[test]
    fn test_cross_orthogonal_unit_axes() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        let z = x.cross(&y);
        assert_eq!(z, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_serialize_vec3() {
        let v1 = Vec3::new(1.0, 2.0, 3.0);

        let json = serde_json::to_string_pretty(&v1).unwrap();
        let deserialized: Vec3 = serde_json::from_str(&json).unwrap();

        assert!((v1.x - deserialized.x).abs() < 0.001);
        assert!((v1.y - deserialized.y).abs() < 0.001);
        assert!((v1.z - deserialized.z).abs() < 0.001);
    }
}
