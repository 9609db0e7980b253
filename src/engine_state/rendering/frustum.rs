//! View-frustum culling of whole chunks.
//!
//! The six clip planes are extracted from the camera's projection×view
//! matrix. A plane `(n, d)` keeps every point `p` with `n·p + d >= 0`.

use cgmath::{InnerSpace, Matrix, Matrix4, Point3, Vector3, Vector4};

use crate::engine_state::voxels::chunk::{ChunkCoord, CHUNK_DIMENSION};

/// A clip plane with an inward-facing normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f32>,
    pub distance: f32,
}

impl Plane {
    fn from_row(row: Vector4<f32>) -> Self {
        Plane {
            normal: row.truncate(),
            distance: row.w,
        }
    }

    /// Scales the plane so its normal has unit length. Degenerate planes are left as is.
    pub fn normalized(self) -> Self {
        let length = self.normal.magnitude();
        if length <= f32::EPSILON {
            return self;
        }
        Plane {
            normal: self.normal / length,
            distance: self.distance / length,
        }
    }

    /// Signed distance of `point`; negative means outside.
    #[inline]
    pub fn distance_to_point(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(Vector3::new(point.x, point.y, point.z)) + self.distance
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    /// The full-height box `[16cx, 16cx+16] × [0, H] × [16cz, 16cz+16]` of a chunk.
    pub fn for_chunk(coord: ChunkCoord, world_height: usize) -> Self {
        let size = CHUNK_DIMENSION as f32;
        let min = Point3::new(coord.x as f32 * size, 0.0, coord.z as f32 * size);
        Aabb {
            min,
            max: Point3::new(min.x + size, world_height as f32, min.z + size),
        }
    }

    pub fn corners(&self) -> [Point3<f32>; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
        ]
    }
}

/// The six clip planes of a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extracts the planes as `row3 ± row0/1/2` of `view_projection`.
    pub fn from_view_projection(view_projection: &Matrix4<f32>) -> Self {
        let row = |i: usize| view_projection.row(i);
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));

        let planes = [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r3 + r2, r3 - r2]
            .map(|row| Plane::from_row(row).normalized());

        Frustum { planes }
    }

    /// Conservative box test: a box is rejected only when all eight corners
    /// lie outside the same plane.
    pub fn is_box_visible(&self, aabb: &Aabb) -> bool {
        let corners = aabb.corners();
        self.planes.iter().all(|plane| {
            corners
                .iter()
                .any(|corner| plane.distance_to_point(*corner) >= 0.0)
        })
    }

    pub fn is_chunk_visible(&self, coord: ChunkCoord, world_height: usize) -> bool {
        self.is_box_visible(&Aabb::for_chunk(coord, world_height))
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{perspective, Deg, SquareMatrix};

    use super::*;

    fn looking_down_negative_z(eye: Point3<f32>) -> Frustum {
        let view = Matrix4::look_to_rh(eye, -Vector3::unit_z(), Vector3::unit_y());
        let proj = perspective(Deg(70.0), 16.0 / 9.0, 0.1, 500.0);
        Frustum::from_view_projection(&(proj * view))
    }

    #[test]
    fn planes_are_normalized() {
        let frustum = looking_down_negative_z(Point3::new(0.0, 70.0, 0.0));
        for plane in frustum.planes {
            assert!((plane.normal.magnitude() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn chunk_containing_the_camera_is_visible() {
        let frustum = looking_down_negative_z(Point3::new(8.0, 70.0, 8.0));
        assert!(frustum.is_chunk_visible(ChunkCoord::new(0, 0), 164));
    }

    #[test]
    fn chunks_behind_or_far_aside_are_culled() {
        let frustum = looking_down_negative_z(Point3::new(8.0, 70.0, 8.0));
        assert!(frustum.is_chunk_visible(ChunkCoord::new(0, -3), 164));
        assert!(!frustum.is_chunk_visible(ChunkCoord::new(0, 3), 164));
        assert!(!frustum.is_chunk_visible(ChunkCoord::new(-20, -1), 164));
    }

    #[test]
    fn identity_keeps_the_unit_cube() {
        let frustum = Frustum::from_view_projection(&Matrix4::identity());
        let inside = Aabb {
            min: Point3::new(-0.5, -0.5, -0.5),
            max: Point3::new(0.5, 0.5, 0.5),
        };
        let outside = Aabb {
            min: Point3::new(2.0, 2.0, 2.0),
            max: Point3::new(3.0, 3.0, 3.0),
        };
        assert!(frustum.is_box_visible(&inside));
        assert!(!frustum.is_box_visible(&outside));
    }
}
