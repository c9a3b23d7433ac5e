//! Minimal 3D math used across the workspace. All numeric types are f32.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Plain 3-component vector. Landmarks, locations, Euler rotations and scales
/// are all carried as `Vec3`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// All three components set to `v`.
    pub fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Component by spatial axis index (0 = x, 1 = y, 2 = z).
    pub fn axis(&self, index: usize) -> f32 {
        match index {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean distance between two points.
    pub fn distance(&self, other: &Vec3) -> f32 {
        (*self - *other).length()
    }

    /// Midpoint between two points.
    pub fn midpoint(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            (self.x + other.x) * 0.5,
            (self.y + other.y) * 0.5,
            (self.z + other.z) * 0.5,
        )
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 4.0, 0.0);
        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn axis_indexing() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.axis(0), 1.0);
        assert_eq!(v.axis(1), 2.0);
        assert_eq!(v.axis(2), 3.0);
    }
}
