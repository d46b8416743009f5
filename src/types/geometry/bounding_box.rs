use serde::{Deserialize, Serialize};

use super::Vec3;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum coordinate of the box.
    pub min: Vec3,
    /// Maximum coordinate of the box.
    pub max: Vec3,
}

impl BoundingBox {
    /// Create a new BoundingBox from a min and max coordinate.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a new BoundingBox with zero size at the origin.
    pub fn zero() -> Self {
        Self { min: Vec3::origin(), max: Vec3::origin() }
    }

    /// Compute the bounding box of a packed `3*V` position buffer.
    ///
    /// Returns the zero box for empty input, since there is no coordinate to
    /// establish either extreme.
    pub fn from_positions(positions: &[f32]) -> BoundingBox {
        if positions.is_empty() {
            return BoundingBox::zero();
        }

        let mut min = Vec3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Vec3::new(f32::MIN, f32::MIN, f32::MIN);

        for chunk in positions.chunks_exact(3) {
            let v = Vec3::new(chunk[0], chunk[1], chunk[2]);
            min = min.min(&v);
            max = max.max(&v);
        }

        BoundingBox::new(min, max)
    }

    /// Size of the box in x, y and z. `dimensions[k] = max[k] - min[k]` exactly.
    pub fn dimensions(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest of the three axis dimensions.
    pub fn max_dimension(&self) -> f32 {
        let d = self.dimensions();
        d.x.max(d.y).max(d.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_gives_zero_box() {
        let bbox = BoundingBox::from_positions(&[]);
        assert_eq!(bbox.min, Vec3::origin());
        assert_eq!(bbox.max, Vec3::origin());
    }

    #[test]
    fn test_unit_cube_bounds() {
        let positions = [
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0,
            1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0,
        ];
        let bbox = BoundingBox::from_positions(&positions);
        assert_eq!(bbox.min, Vec3::origin());
        assert_eq!(bbox.max, Vec3::new(1.0, 1.0, 1.0));
        let dims = bbox.dimensions();
        assert_eq!((dims.x, dims.y, dims.z), (1.0, 1.0, 1.0));
        assert_eq!(bbox.max_dimension(), 1.0);
    }

    #[test]
    fn test_min_le_max_on_every_axis() {
        let positions = [3.0, -1.0, 2.0, -4.0, 5.0, 0.5];
        let bbox = BoundingBox::from_positions(&positions);
        assert!(bbox.min.x <= bbox.max.x);
        assert!(bbox.min.y <= bbox.max.y);
        assert!(bbox.min.z <= bbox.max.z);
    }
}
