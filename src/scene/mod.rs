mod ray_cast;
mod triangle_geometry;

pub use ray_cast::{RayCast, RayHit};
pub use triangle_geometry::{GeometryError, ObjOpenError, PrimId, TriangleGeometry, VertexIdx};

use indexmap::IndexMap;
use thiserror::Error;

use crate::geometry::{Triangle, WorldBox, WorldPoint};
use crate::query::{NearestDriver, NearestHit, PointQuery, ProximityScan, QueryRegistry};

index_vec::define_index_type! {
    /// Identifier of a geometry attached to a scene.
    pub struct GeomId = u32;
}

/// A collection of triangle geometries that can be queried for nearest points
/// and ray hits.
///
/// Queries only ever see the state captured by the last [`commit`](Scene::commit);
/// geometries attached, detached, or re-committed since then stay invisible
/// until the next commit.
#[derive(Default)]
pub struct Scene {
    geometries: IndexMap<GeomId, TriangleGeometry>,
    /// Snapshot of the committed geometries and their bounds.
    candidates: Vec<(GeomId, WorldBox)>,
    bounds: Option<WorldBox>,
    registry: QueryRegistry,
}

impl Scene {
    pub fn new() -> Scene {
        Default::default()
    }

    /// Attaches a geometry under the smallest id not currently in use.
    pub fn attach(&mut self, geometry: TriangleGeometry) -> GeomId {
        let mut id = GeomId::from_raw(0);
        while self.geometries.contains_key(&id) {
            id = GeomId::from_raw(id.raw() + 1);
        }
        self.geometries.insert(id, geometry);
        id
    }

    /// Attaches a geometry under a caller-chosen id.
    pub fn attach_with_id(
        &mut self,
        geometry: TriangleGeometry,
        id: GeomId,
    ) -> Result<(), SceneError> {
        match self.geometries.entry(id) {
            indexmap::map::Entry::Occupied(_) => Err(SceneError::IdCollision(id)),
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(geometry);
                Ok(())
            }
        }
    }

    /// Removes a geometry from the scene, returning it if it was attached.
    pub fn detach(&mut self, id: GeomId) -> Option<TriangleGeometry> {
        self.geometries.shift_remove(&id)
    }

    pub fn geometry(&self, id: GeomId) -> Option<&TriangleGeometry> {
        self.geometries.get(&id)
    }

    pub fn geometry_mut(&mut self, id: GeomId) -> Option<&mut TriangleGeometry> {
        self.geometries.get_mut(&id)
    }

    /// Makes the current committed geometries visible to queries and caches
    /// the scene bounds.
    pub fn commit(&mut self) {
        self.candidates = self
            .geometries
            .iter()
            .filter_map(|(id, geometry)| Some((*id, geometry.bounds()?.clone())))
            .collect();
        self.bounds = self
            .candidates
            .iter()
            .map(|(_, bounds)| bounds)
            .fold(None, |acc: Option<WorldBox>, bounds| {
                Some(match acc {
                    None => bounds.clone(),
                    Some(acc) => acc.union(bounds),
                })
            });
    }

    /// Bounding box of the committed scene, None while it is empty.
    pub fn bounds(&self) -> Option<&WorldBox> {
        self.bounds.as_ref()
    }

    /// Committed geometries and their bounds, in attach order.
    pub fn candidates(&self) -> impl Iterator<Item = (GeomId, &WorldBox)> {
        self.candidates.iter().map(|(id, bounds)| (*id, bounds))
    }

    /// Resolves a candidate primitive to its vertex positions.
    ///
    /// None when the geometry is missing, not committed, or the primitive is
    /// out of range. Traversals treat that as a skippable candidate, never as
    /// an error.
    pub fn triangle_vertices(&self, geom: GeomId, prim: PrimId) -> Option<Triangle<WorldPoint>> {
        self.geometry(geom)?.triangle(prim)
    }

    /// Nearest point on the committed scene, searched with the default driver.
    pub fn closest_point(&self, query: PointQuery) -> Option<NearestHit> {
        self.closest_point_with(&ProximityScan, query)
    }

    /// Nearest point on the committed scene, searched with a caller-supplied
    /// traversal driver.
    pub fn closest_point_with<D: NearestDriver + ?Sized>(
        &self,
        driver: &D,
        query: PointQuery,
    ) -> Option<NearestHit> {
        let token = self.registry.begin(query);
        driver.traverse(self, &self.registry, token);
        self.registry.finish(token)
    }
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("geometry id {0:?} is already attached")]
    IdCollision(GeomId),
}
