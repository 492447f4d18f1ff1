use super::{BarycentricCoordinates, FloatType, Triangle, WorldPoint};

/// Result of a closest-point-on-triangle query.
#[derive(Copy, Clone, Debug)]
pub struct ClosestPoint {
    /// The closest point, always within the closed triangle.
    pub point: WorldPoint,
    /// Squared distance from the query point to `point`.
    pub dist_sq: FloatType,
    /// Local coordinates of `point` on the triangle.
    pub uv: BarycentricCoordinates<FloatType>,
}

/// Closest point to `p` on the (possibly degenerate) triangle `(a, b, c)`.
///
/// Walks the Voronoi regions of the triangle's features in a fixed order
/// (vertex a, vertex b, edge ab, vertex c, edge ac, edge bc, face), following
/// Ericson, Real-Time Collision Detection, 5.1.5. The branch order decides
/// ties on region boundaries, so it must stay as is for reproducible results.
///
/// Degenerate triangles collapse to the nearest vertex or edge without
/// producing NaNs. Inputs are expected to be finite.
pub fn closest_point_on_triangle(
    p: &WorldPoint,
    a: &WorldPoint,
    b: &WorldPoint,
    c: &WorldPoint,
) -> ClosestPoint {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return ClosestPoint {
            point: *a,
            dist_sq: ap.norm_squared(),
            uv: BarycentricCoordinates { u: 0.0, v: 0.0 },
        };
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return ClosestPoint {
            point: *b,
            dist_sq: bp.norm_squared(),
            uv: BarycentricCoordinates { u: 1.0, v: 0.0 },
        };
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let t = d1 / (d1 - d3);
        let point = a + ab * t;
        return ClosestPoint {
            point,
            dist_sq: (p - point).norm_squared(),
            uv: BarycentricCoordinates { u: t, v: 0.0 },
        };
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return ClosestPoint {
            point: *c,
            dist_sq: cp.norm_squared(),
            uv: BarycentricCoordinates { u: 0.0, v: 1.0 },
        };
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let t = d2 / (d2 - d6);
        let point = a + ac * t;
        return ClosestPoint {
            point,
            dist_sq: (p - point).norm_squared(),
            uv: BarycentricCoordinates { u: 0.0, v: t },
        };
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let t = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        let point = b + (c - b) * t;
        return ClosestPoint {
            point,
            dist_sq: (p - point).norm_squared(),
            uv: BarycentricCoordinates { u: 1.0 - t, v: t },
        };
    }

    let denom = 1.0 / (va + vb + vc);
    let u = vb * denom;
    let v = vc * denom;
    let point = a + ab * u + ac * v;
    ClosestPoint {
        point,
        dist_sq: (p - point).norm_squared(),
        uv: BarycentricCoordinates { u, v },
    }
}

impl Triangle<WorldPoint> {
    /// Closest point on this triangle to `p`, see [`closest_point_on_triangle`].
    pub fn closest_point(&self, p: &WorldPoint) -> ClosestPoint {
        closest_point_on_triangle(p, &self[0], &self[1], &self[2])
    }
}
