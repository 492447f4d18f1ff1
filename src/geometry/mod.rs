mod aabb;
mod closest_point;
mod ray_box_intersection;
mod ray_triangle_intersection;
mod triangle;

pub use aabb::Aabb;
pub use closest_point::{ClosestPoint, closest_point_on_triangle};
pub use ray_box_intersection::RayIntersectionExt;
pub use triangle::{BarycentricCoordinates, Triangle};

pub type FloatType = f32;

pub type WorldPoint = nalgebra::Point3<FloatType>;
pub type WorldVector = nalgebra::Vector3<FloatType>;
pub type WorldBox = Aabb<WorldPoint>;

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Normalized direction of the ray
    pub direction: WorldVector,

    /// Componentwise inverse of the ray direction
    /// Zeros in direction get turned into positive infinity regardless of the sign of the zero
    pub inv_direction: WorldVector,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        let direction = direction.normalize();
        let inv_direction = direction.map(|x| if x == 0.0 { f32::INFINITY } else { 1.0 / x });

        Ray {
            origin,
            direction,
            inv_direction,
        }
    }

    pub fn point_at(&self, distance: FloatType) -> WorldPoint {
        self.origin + self.direction * distance
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use proptest::prelude::*;

    pub fn coord_strategy() -> BoxedStrategy<FloatType> {
        (-100.0f32..100.0f32).boxed()
    }

    pub fn world_point_strategy() -> BoxedStrategy<WorldPoint> {
        (coord_strategy(), coord_strategy(), coord_strategy())
            .prop_map(|(x, y, z)| WorldPoint::new(x, y, z))
            .boxed()
    }

    pub fn triangle_strategy() -> BoxedStrategy<Triangle<WorldPoint>> {
        (
            world_point_strategy(),
            world_point_strategy(),
            world_point_strategy(),
        )
            .prop_map(|(a, b, c)| Triangle::new(a, b, c))
            .boxed()
    }
}
