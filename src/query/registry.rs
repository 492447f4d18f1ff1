use std::sync::{Arc, Mutex};

use slotmap::SlotMap;

use crate::geometry::FloatType;
use crate::scene::{GeomId, PrimId, Scene};

use super::{CandidateOutcome, NearestHit, PointQuery};

slotmap::new_key_type! {
    /// Opaque handle to the scratch state of one in-flight nearest-point
    /// traversal.
    pub struct QueryToken;
}

/// Arena of per-traversal scratch states.
///
/// A traversal driver only ever holds a [`QueryToken`]; the scratch state
/// itself stays pinned in the arena until [`finish`](QueryRegistry::finish)
/// releases it. Every entry carries its own lock, so a driver may evaluate
/// candidates of distinct queries concurrently while each query's best-distance
/// bookkeeping stays serialized.
#[derive(Default)]
pub struct QueryRegistry {
    entries: Mutex<SlotMap<QueryToken, Arc<Mutex<Scratch>>>>,
}

#[derive(Debug)]
struct Scratch {
    query: PointQuery,
    best: Option<NearestHit>,
}

impl QueryRegistry {
    pub fn new() -> QueryRegistry {
        Default::default()
    }

    /// Registers scratch state for a new traversal and hands out its token.
    pub fn begin(&self, query: PointQuery) -> QueryToken {
        self.entries
            .lock()
            .unwrap()
            .insert(Arc::new(Mutex::new(Scratch { query, best: None })))
    }

    /// The query belonging to `token`, with the current (possibly already
    /// narrowed) search radius.
    pub fn query(&self, token: QueryToken) -> Option<PointQuery> {
        self.entry(token).map(|entry| entry.lock().unwrap().query)
    }

    /// Current search radius of the traversal. Zero for a released token.
    pub fn radius(&self, token: QueryToken) -> FloatType {
        self.query(token).map_or(0.0, |query| query.radius)
    }

    /// Evaluates one candidate primitive against the traversal's best-seen
    /// state.
    ///
    /// Candidates that cannot be resolved to a triangle are skipped. A
    /// candidate that improves on the best distance updates the best point and
    /// narrows the search radius to the new distance.
    pub fn visit(
        &self,
        scene: &Scene,
        token: QueryToken,
        geom: GeomId,
        prim: PrimId,
    ) -> CandidateOutcome {
        let Some(entry) = self.entry(token) else {
            return CandidateOutcome::NoChange;
        };
        let Some(triangle) = scene.triangle_vertices(geom, prim) else {
            return CandidateOutcome::NoChange;
        };

        let mut scratch = entry.lock().unwrap();
        let closest = triangle.closest_point(&scratch.query.point);
        let improves = scratch
            .best
            .is_none_or(|best| closest.dist_sq < best.dist_sq);
        if !improves {
            return CandidateOutcome::NoChange;
        }

        scratch.best = Some(NearestHit {
            point: closest.point,
            uv: closest.uv,
            dist_sq: closest.dist_sq,
            geom,
            prim,
        });
        scratch.query.radius = closest.dist_sq.sqrt();
        CandidateOutcome::RadiusUpdated
    }

    /// Releases the scratch state and returns the traversal's answer.
    pub fn finish(&self, token: QueryToken) -> Option<NearestHit> {
        let entry = self.entries.lock().unwrap().remove(token)?;
        let best = entry.lock().unwrap().best;
        best
    }

    fn entry(&self, token: QueryToken) -> Option<Arc<Mutex<Scratch>>> {
        self.entries.lock().unwrap().get(token).cloned()
    }
}
