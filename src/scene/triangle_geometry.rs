use std::{fs, path::Path};

use index_vec::IndexVec;
use thiserror::Error;

use crate::geometry::{Triangle, WorldBox, WorldPoint};

index_vec::define_index_type! {
    /// Index into a geometry's vertex buffer.
    pub struct VertexIdx = u32;
}

index_vec::define_index_type! {
    /// Identifier of a triangle primitive within a geometry.
    pub struct PrimId = u32;
}

/// A triangle soup with explicit vertex and index buffers.
///
/// Buffers can be swapped at any time; the geometry only becomes visible to
/// queries once [`commit`](TriangleGeometry::commit) has validated the current
/// buffers. Changing a buffer invalidates the committed state again.
#[derive(Clone, Debug, Default)]
pub struct TriangleGeometry {
    vertices: IndexVec<VertexIdx, WorldPoint>,
    /// Flat vertex index triples, one per triangle.
    indices: Vec<u32>,
    committed: Option<CommittedGeometry>,
}

#[derive(Clone, Debug)]
struct CommittedGeometry {
    triangles: IndexVec<PrimId, Triangle<VertexIdx>>,
    /// None for a committed geometry without any triangles.
    bounds: Option<WorldBox>,
}

impl TriangleGeometry {
    pub fn new() -> TriangleGeometry {
        Default::default()
    }

    /// Builds and commits a geometry in one go.
    pub fn from_buffers(
        vertices: Vec<WorldPoint>,
        indices: Vec<u32>,
    ) -> Result<TriangleGeometry, GeometryError> {
        let mut geometry = TriangleGeometry::new();
        geometry.set_vertices(vertices);
        geometry.set_indices(indices);
        geometry.commit()?;
        Ok(geometry)
    }

    /// Reads a geometry from a Wavefront OBJ file.
    pub fn with_obj(p: impl AsRef<Path>) -> Result<TriangleGeometry, ObjOpenError> {
        let content = fs::read_to_string(p)?;
        Self::from_obj(&content)
    }

    /// Parses a geometry from Wavefront OBJ content.
    /// Non-triangle primitives are skipped.
    pub fn from_obj(content: &str) -> Result<TriangleGeometry, ObjOpenError> {
        let parsed = wavefront_obj::obj::parse(content.to_string())?;

        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for o in parsed.objects.into_iter() {
            let base = vertices.len() as u32;
            vertices.extend(
                o.vertices
                    .iter()
                    .map(|v| WorldPoint::new(v.x as f32, v.y as f32, v.z as f32)),
            );
            for geometry in o.geometry {
                for shape in geometry.shapes {
                    let wavefront_obj::obj::Primitive::Triangle(a, b, c) = shape.primitive else {
                        println!("non-triangle primitive!");
                        continue;
                    };
                    indices.extend([base + a.0 as u32, base + b.0 as u32, base + c.0 as u32]);
                }
            }
        }

        Ok(Self::from_buffers(vertices, indices)?)
    }

    pub fn set_vertices(&mut self, vertices: Vec<WorldPoint>) {
        self.vertices = vertices.into_iter().collect();
        self.committed = None;
    }

    pub fn set_indices(&mut self, indices: Vec<u32>) {
        self.indices = indices;
        self.committed = None;
    }

    /// Validates the buffers and caches the derived state.
    pub fn commit(&mut self) -> Result<(), GeometryError> {
        self.committed = None;

        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::TruncatedIndexBuffer {
                len: self.indices.len(),
            });
        }
        for (position, &index) in self.indices.iter().enumerate() {
            if index as usize >= self.vertices.len() {
                return Err(GeometryError::IndexOutOfRange {
                    index,
                    position,
                    vertex_count: self.vertices.len(),
                });
            }
        }

        let triangles: IndexVec<PrimId, _> = self
            .indices
            .chunks_exact(3)
            .map(|abc| {
                Triangle::new(
                    VertexIdx::from_raw(abc[0]),
                    VertexIdx::from_raw(abc[1]),
                    VertexIdx::from_raw(abc[2]),
                )
            })
            .collect();
        let bounds = WorldBox::from_points(
            triangles
                .iter()
                .flat_map(|t| t.iter())
                .map(|&i| &self.vertices[i]),
        );
        self.committed = Some(CommittedGeometry { triangles, bounds });

        Ok(())
    }

    pub fn is_committed(&self) -> bool {
        self.committed.is_some()
    }

    /// Bounding box of the committed triangles.
    /// None when not committed or when there are no triangles.
    pub fn bounds(&self) -> Option<&WorldBox> {
        self.committed.as_ref()?.bounds.as_ref()
    }

    /// Number of committed triangles.
    pub fn triangle_count(&self) -> usize {
        self.committed.as_ref().map_or(0, |c| c.triangles.len())
    }

    /// Primitive ids of the committed triangles.
    pub fn prim_ids(&self) -> impl Iterator<Item = PrimId> {
        (0..self.triangle_count()).map(PrimId::from_usize)
    }

    /// Vertex positions of the committed triangle `prim`.
    ///
    /// None when the geometry is unavailable, that is when it was never
    /// committed, a buffer changed since, or `prim` is out of range.
    pub fn triangle(&self, prim: PrimId) -> Option<Triangle<WorldPoint>> {
        let committed = self.committed.as_ref()?;
        let indices = committed.triangles.get(prim)?;
        Some(indices.map(|&i| self.vertices[i]))
    }
}

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("index buffer length {len} is not a multiple of 3")]
    TruncatedIndexBuffer { len: usize },

    #[error("vertex index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        index: u32,
        position: usize,
        vertex_count: usize,
    },
}

#[derive(Debug, Error)]
pub enum ObjOpenError {
    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse file: {0}")]
    ParseError(#[from] wavefront_obj::ParseError),

    #[error("Parsed geometry is invalid: {0}")]
    InvalidGeometry(#[from] GeometryError),
}
