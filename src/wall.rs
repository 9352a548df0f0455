//! Static walls bounding the simulation box.

use crate::float::Float;
use crate::vec::Vec2;

/// A static line segment with a unit normal pointing into the box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Wall<F: Float> {
    pub p0: Vec2<F>,
    pub p1: Vec2<F>,
    pub normal: Vec2<F>,
}

impl<F: Float> Wall<F> {
    /// Wall from `p0` to `p1`; the interior lies to the left of the edge.
    pub fn new(p0: Vec2<F>, p1: Vec2<F>) -> Self {
        Wall { p0, p1, normal: (p1 - p0).perp().normalize() }
    }

    /// Signed distance of `point` from the wall line, positive inside the box.
    pub fn signed_distance(&self, point: Vec2<F>) -> F {
        (point - self.p0).dot(self.normal)
    }

    /// True when `point` lies strictly on the outer side.
    pub fn is_outside(&self, point: Vec2<F>) -> bool {
        self.signed_distance(point) < F::zero()
    }

    /// The four walls of the axis-aligned box `[-h, h]^2`, counter-clockwise
    /// from the floor: bottom, right, top, left.
    pub fn box_walls(half_extent: F) -> [Wall<F>; 4] {
        let h = half_extent;
        let bl = Vec2::new(-h, -h);
        let br = Vec2::new(h, -h);
        let tr = Vec2::new(h, h);
        let tl = Vec2::new(-h, h);
        [
            Wall::new(bl, br),
            Wall::new(br, tr),
            Wall::new(tr, tl),
            Wall::new(tl, bl),
        ]
    }
}

/// Corners of the box as a closed line strip (first corner repeated).
pub fn box_corners<F: Float>(walls: &[Wall<F>]) -> alloc::vec::Vec<Vec2<F>> {
    let mut corners: alloc::vec::Vec<Vec2<F>> = walls.iter().map(|w| w.p0).collect();
    if let Some(first) = corners.first().copied() {
        corners.push(first);
    }
    corners
}
