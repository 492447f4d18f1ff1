use num_traits::{One, Zero};
use std::ops::Sub;

use nalgebra::{ClosedAddAssign, ClosedDivAssign, ClosedMulAssign, ClosedSubAssign, Point, Scalar};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aabb<Point> {
    pub min: Point,
    pub max: Point,
}

impl<Point> Aabb<Point> {
    pub fn new(min: Point, max: Point) -> Aabb<Point> {
        Aabb { min, max }
    }
}

impl<Point: Sub + Copy> Aabb<Point> {
    pub fn size(&self) -> Point::Output {
        self.max - self.min
    }
}

impl<T: Scalar + Copy + PartialOrd, const D: usize> Aabb<Point<T, D>> {
    /// Smallest box containing all the points, None for an empty iterator.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point<T, D>>) -> Option<Self>
    where
        T: 'a,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut result = Aabb::new(*first, *first);
        for point in points {
            result.grow(point);
        }
        Some(result)
    }

    /// Expands the box to contain `point`.
    pub fn grow(&mut self, point: &Point<T, D>) {
        for i in 0..D {
            if point[i] < self.min[i] {
                self.min[i] = point[i];
            }
            if point[i] > self.max[i] {
                self.max[i] = point[i];
            }
        }
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.grow(&other.min);
        result.grow(&other.max);
        result
    }

    /// Whether the point is inside the box, boundary included.
    pub fn contains(&self, point: &Point<T, D>) -> bool {
        (0..D).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }
}

impl<T: Scalar + ClosedAddAssign + ClosedDivAssign + One, const D: usize> Aabb<Point<T, D>> {
    pub fn center(&self) -> Point<T, D> {
        let two = T::one() + T::one();
        let avg_coords = (&self.min.coords + &self.max.coords) / two;
        Point::from(avg_coords)
    }
}

impl<T, const D: usize> Aabb<Point<T, D>>
where
    T: Scalar + Copy + PartialOrd + Zero + ClosedAddAssign + ClosedSubAssign + ClosedMulAssign,
{
    /// Squared distance from `point` to the box, zero for points inside.
    ///
    /// This is a lower bound on the squared distance from `point` to anything
    /// contained in the box.
    pub fn distance_sq_to(&self, point: &Point<T, D>) -> T {
        let mut result = T::zero();
        for i in 0..D {
            let d = if point[i] < self.min[i] {
                self.min[i] - point[i]
            } else if point[i] > self.max[i] {
                point[i] - self.max[i]
            } else {
                continue;
            };
            result += d * d;
        }
        result
    }
}
