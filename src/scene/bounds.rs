use glam::{Mat4, Vec3};

/// Axis-aligned bounding box with a validity flag. An invalid box carries
/// meaningless extrema and must never be merged into an aggregate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
    pub valid: bool,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min: Vec3::MAX,
            max: Vec3::MIN,
            valid: false,
        }
    }
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min,
            max,
            valid: true,
        }
    }

    /// Project all eight corners through the matrix and rebuild the box
    /// from their componentwise extrema.
    pub fn transformed(&self, matrix: Mat4) -> BoundingBox {
        if !self.valid {
            return *self;
        }
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];
        let mut min = Vec3::MAX;
        let mut max = Vec3::MIN;
        for corner in corners {
            let corner = matrix.transform_point3(corner);
            min = min.min(corner);
            max = max.max(corner);
        }
        BoundingBox::new(min, max)
    }

    /// Union with another box. Invalid boxes never contribute.
    pub fn merge(&mut self, other: &BoundingBox) {
        if !other.valid {
            return;
        }
        if !self.valid {
            *self = *other;
            return;
        }
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn extend(&mut self, point: Vec3) {
        if self.valid {
            self.min = self.min.min(point);
            self.max = self.max.max(point);
        } else {
            *self = BoundingBox::new(point, point);
        }
    }
}
