mod driver;
mod registry;

pub use driver::{NearestDriver, ProximityScan};
pub use registry::{QueryRegistry, QueryToken};

use assert2::assert;
use bon::bon;

use crate::geometry::{BarycentricCoordinates, FloatType, WorldPoint};
use crate::scene::{GeomId, PrimId};

/// A nearest-point query: the point of interest and the search radius around
/// it. The radius shrinks while a traversal narrows in on the best candidate.
#[derive(Copy, Clone, Debug)]
pub struct PointQuery {
    pub point: WorldPoint,
    pub radius: FloatType,
}

#[bon]
impl PointQuery {
    #[builder]
    pub fn new(
        point: WorldPoint,
        #[builder(default = FloatType::INFINITY)] radius: FloatType,
    ) -> Self {
        assert!(radius >= 0.0);
        PointQuery { point, radius }
    }
}

/// Best candidate found by a nearest-point traversal.
#[derive(Copy, Clone, Debug)]
pub struct NearestHit {
    /// The closest point on the winning triangle.
    pub point: WorldPoint,
    /// Local coordinates of `point` on the winning triangle.
    pub uv: BarycentricCoordinates<FloatType>,
    /// Squared distance from the query point to `point`.
    pub dist_sq: FloatType,
    pub geom: GeomId,
    pub prim: PrimId,
}

impl NearestHit {
    pub fn distance(&self) -> FloatType {
        self.dist_sq.sqrt()
    }
}

/// What evaluating one candidate did to the traversal state.
///
/// Drivers may use this to re-check their pruning bounds right away instead of
/// polling the registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CandidateOutcome {
    /// The candidate improved on the best distance so far; the search radius
    /// was narrowed and remaining candidates outside it can be pruned.
    RadiusUpdated,
    /// The candidate was skipped or did not improve the best distance.
    NoChange,
}

#[cfg(test)]
mod tests {
    use std::thread;

    use assert2::assert;

    use super::*;
    use crate::scene::{Scene, TriangleGeometry};

    /// One unit triangle in the z = `z` plane, in front of the origin corner.
    fn single_triangle(z: f32) -> TriangleGeometry {
        TriangleGeometry::from_buffers(
            vec![
                WorldPoint::new(0.0, 0.0, z),
                WorldPoint::new(1.0, 0.0, z),
                WorldPoint::new(0.0, 1.0, z),
            ],
            vec![0, 1, 2],
        )
        .unwrap()
    }

    fn two_plane_scene() -> (Scene, GeomId, GeomId) {
        let mut scene = Scene::new();
        let near = scene.attach(single_triangle(1.0));
        let far = scene.attach(single_triangle(10.0));
        scene.commit();
        (scene, near, far)
    }

    #[test]
    fn picks_the_nearer_geometry() {
        let (scene, near, _far) = two_plane_scene();
        let query = PointQuery::builder()
            .point(WorldPoint::new(0.25, 0.25, 0.0))
            .build();

        let hit = scene.closest_point(query).unwrap();
        assert!(hit.geom == near);
        assert!(hit.prim == PrimId::from_raw(0));
        assert!(hit.point == WorldPoint::new(0.25, 0.25, 1.0));
        assert!(hit.dist_sq == 1.0);
        assert!(hit.uv == BarycentricCoordinates { u: 0.25, v: 0.25 });
        assert!(hit.distance() == 1.0);
    }

    #[test]
    fn finds_far_geometry_with_default_radius() {
        let (scene, _near, far) = two_plane_scene();
        let query = PointQuery::builder()
            .point(WorldPoint::new(0.25, 0.25, 20.0))
            .build();

        let hit = scene.closest_point(query).unwrap();
        assert!(hit.geom == far);
    }

    #[test]
    fn radius_prunes_out_of_range_geometries() {
        let (scene, _near, _far) = two_plane_scene();
        let query = PointQuery::builder()
            .point(WorldPoint::new(0.25, 0.25, 20.0))
            .radius(2.0)
            .build();

        assert!(scene.closest_point(query).is_none());
    }

    #[test]
    fn empty_scene_finds_nothing() {
        let scene = Scene::new();
        let query = PointQuery::builder().point(WorldPoint::origin()).build();
        assert!(scene.closest_point(query).is_none());
    }

    #[test]
    fn uncommitted_scene_finds_nothing() {
        let mut scene = Scene::new();
        scene.attach(single_triangle(1.0));
        let query = PointQuery::builder().point(WorldPoint::origin()).build();
        assert!(scene.closest_point(query).is_none());
    }

    #[test]
    fn detached_geometry_is_skipped_silently() {
        let (mut scene, near, far) = two_plane_scene();
        scene.detach(near).unwrap();

        // The stale snapshot still lists the detached geometry as a candidate,
        // resolving it fails and the traversal moves on.
        let query = PointQuery::builder()
            .point(WorldPoint::new(0.25, 0.25, 0.0))
            .build();
        let hit = scene.closest_point(query).unwrap();
        assert!(hit.geom == far);
    }

    /// A traversal driver that visits every committed candidate in attach
    /// order, without any pruning.
    struct ExhaustiveScan;

    impl NearestDriver for ExhaustiveScan {
        fn traverse(&self, scene: &Scene, registry: &QueryRegistry, token: QueryToken) {
            for (id, _bounds) in scene.candidates() {
                let Some(geometry) = scene.geometry(id) else {
                    continue;
                };
                for prim in geometry.prim_ids() {
                    registry.visit(scene, token, id, prim);
                }
            }
        }
    }

    #[test]
    fn custom_driver_agrees_with_default() {
        let (scene, _near, _far) = two_plane_scene();
        let query = PointQuery::builder()
            .point(WorldPoint::new(0.7, -0.3, 4.0))
            .build();

        let default_hit = scene.closest_point(query).unwrap();
        let exhaustive_hit = scene.closest_point_with(&ExhaustiveScan, query).unwrap();

        assert!(default_hit.geom == exhaustive_hit.geom);
        assert!(default_hit.prim == exhaustive_hit.prim);
        assert!(default_hit.point == exhaustive_hit.point);
        assert!(default_hit.dist_sq == exhaustive_hit.dist_sq);
    }

    #[test]
    fn concurrent_queries_match_sequential_answers() {
        let (scene, _near, _far) = two_plane_scene();
        let queries: Vec<_> = (0..8)
            .map(|i| {
                PointQuery::builder()
                    .point(WorldPoint::new(0.3, 0.2, i as f32 * 1.5))
                    .build()
            })
            .collect();

        let sequential: Vec<_> = queries.iter().map(|q| scene.closest_point(*q)).collect();

        let scene = &scene;
        thread::scope(|s| {
            let handles: Vec<_> = queries
                .iter()
                .map(|&q| s.spawn(move || scene.closest_point(q)))
                .collect();
            for (handle, expected) in handles.into_iter().zip(&sequential) {
                let hit = handle.join().unwrap();
                match (hit, expected) {
                    (Some(hit), Some(expected)) => {
                        assert!(hit.geom == expected.geom);
                        assert!(hit.prim == expected.prim);
                        assert!(hit.dist_sq == expected.dist_sq);
                    }
                    (None, None) => {}
                    (hit, expected) => panic!("mismatch: {hit:?} vs {expected:?}"),
                }
            }
        });
    }

    #[test]
    fn query_outside_plane_projects_onto_edge() {
        let (scene, near, _far) = two_plane_scene();
        let query = PointQuery::builder()
            .point(WorldPoint::new(0.5, -2.0, 1.0))
            .build();

        let hit = scene.closest_point(query).unwrap();
        assert!(hit.geom == near);
        assert!(hit.point == WorldPoint::new(0.5, 0.0, 1.0));
        assert!(hit.uv == BarycentricCoordinates { u: 0.5, v: 0.0 });
    }
}
