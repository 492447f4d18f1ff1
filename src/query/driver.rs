use itertools::Itertools as _;
use ordered_float::OrderedFloat;

use crate::scene::Scene;

use super::{QueryRegistry, QueryToken};

/// A nearest-point traversal strategy over a committed scene.
///
/// The driver owns the visitation order and the pruning; all best-distance
/// bookkeeping goes through the registry's candidate callback. Implementations
/// must not hold on to the token beyond the `traverse` call.
pub trait NearestDriver {
    fn traverse(&self, scene: &Scene, registry: &QueryRegistry, token: QueryToken);
}

/// Reference driver: visits whole geometries in order of increasing
/// lower-bound distance and stops at the first geometry outside the shrinking
/// search radius.
#[derive(Copy, Clone, Debug, Default)]
pub struct ProximityScan;

impl NearestDriver for ProximityScan {
    fn traverse(&self, scene: &Scene, registry: &QueryRegistry, token: QueryToken) {
        let Some(query) = registry.query(token) else {
            return;
        };

        let by_distance = scene
            .candidates()
            .map(|(id, bounds)| (id, bounds.distance_sq_to(&query.point)))
            .sorted_unstable_by_key(|(_, lower_bound)| OrderedFloat(*lower_bound));

        for (id, lower_bound) in by_distance {
            let radius = registry.radius(token);
            if lower_bound > radius * radius {
                // Candidates are sorted, nothing closer is left
                break;
            }
            let Some(geometry) = scene.geometry(id) else {
                continue;
            };
            for prim in geometry.prim_ids() {
                registry.visit(scene, token, id, prim);
            }
        }
    }
}
