use assert2::assert;
use bon::bon;

use crate::geometry::{
    BarycentricCoordinates, FloatType, Ray, RayIntersectionExt as _, WorldPoint, WorldVector,
};

use super::{GeomId, PrimId, Scene};

/// A ray segment to cast against a committed scene.
#[derive(Copy, Clone, Debug)]
pub struct RayCast {
    pub ray: Ray,
    pub min_t: FloatType,
    pub max_t: FloatType,
}

#[bon]
impl RayCast {
    #[builder]
    pub fn new(
        origin: WorldPoint,
        direction: WorldVector,
        #[builder(default = 0.0)] min_t: FloatType,
        #[builder(default = FloatType::INFINITY)] max_t: FloatType,
    ) -> Self {
        assert!(min_t <= max_t);
        RayCast {
            ray: Ray::new(origin, direction),
            min_t,
            max_t,
        }
    }
}

/// Hit record of a scene ray cast. Distances are measured along the
/// normalized ray direction.
#[derive(Copy, Clone, Debug)]
pub struct RayHit {
    pub t: FloatType,
    /// Unnormalized geometric normal of the hit triangle.
    pub normal: WorldVector,
    /// Local coordinates of the hit on the triangle.
    pub uv: BarycentricCoordinates<FloatType>,
    pub geom: GeomId,
    pub prim: PrimId,
}

impl RayHit {
    pub fn position(&self, cast: &RayCast) -> WorldPoint {
        cast.ray.point_at(self.t)
    }
}

impl Scene {
    /// Closest intersection of the ray segment with the committed scene.
    pub fn intersect(&self, cast: &RayCast) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;

        for (id, bounds) in self.candidates() {
            let limit = best.as_ref().map_or(cast.max_t, |hit| hit.t);
            let (t1, t2) = bounds.intersect(&cast.ray);
            if t1.max(cast.min_t) > t2.min(limit) {
                continue;
            }
            let Some(geometry) = self.geometry(id) else {
                continue;
            };
            for prim in geometry.prim_ids() {
                let Some(triangle) = geometry.triangle(prim) else {
                    continue;
                };
                let (valid, t, uv) = triangle.intersect(&cast.ray);
                let limit = best.as_ref().map_or(cast.max_t, |hit| hit.t);
                if !valid || t < cast.min_t || t > limit {
                    continue;
                }
                best = Some(RayHit {
                    t,
                    normal: triangle.normal(),
                    uv,
                    geom: id,
                    prim,
                });
            }
        }

        best
    }

    /// Whether anything in the committed scene intersects the ray segment.
    pub fn occluded(&self, cast: &RayCast) -> bool {
        for (id, bounds) in self.candidates() {
            let (t1, t2) = bounds.intersect(&cast.ray);
            if t1.max(cast.min_t) > t2.min(cast.max_t) {
                continue;
            }
            let Some(geometry) = self.geometry(id) else {
                continue;
            };
            for prim in geometry.prim_ids() {
                let Some(triangle) = geometry.triangle(prim) else {
                    continue;
                };
                let (valid, t, _uv) = triangle.intersect(&cast.ray);
                if valid && t >= cast.min_t && t <= cast.max_t {
                    return true;
                }
            }
        }

        false
    }
}
