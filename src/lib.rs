pub mod geometry;
mod query;
mod scene;

pub use crate::query::{
    CandidateOutcome, NearestDriver, NearestHit, PointQuery, ProximityScan, QueryRegistry,
    QueryToken,
};
pub use crate::scene::{
    GeomId, GeometryError, ObjOpenError, PrimId, RayCast, RayHit, Scene, SceneError,
    TriangleGeometry, VertexIdx,
};
