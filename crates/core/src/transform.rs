//! Rigid transforms and axis-aligned bounding boxes.

use nalgebra::{Point3, RealField, Rotation3, Unit, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 3D rigid transformation: rotation about the origin, then translation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform3D<S: RealField + Copy> {
    /// Rotation applied first.
    pub rotation: Rotation3<S>,
    /// Translation applied after the rotation.
    pub translation: Vector3<S>,
}

impl<S: RealField + Copy> Transform3D<S> {
    /// Creates a new identity transform.
    pub fn identity() -> Self {
        Self {
            rotation: Rotation3::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Creates a new transform with both rotation and translation.
    pub fn new(rotation: Rotation3<S>, translation: Vector3<S>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Transforms a 3D point.
    pub fn transform_point(&self, p: &Point3<S>) -> Point3<S> {
        self.rotation * p + self.translation
    }
}

impl<S: RealField + Copy> Default for Transform3D<S> {
    fn default() -> Self {
        Self::identity()
    }
}

/// Rotation of `degrees` about `axis`. A zero axis yields the identity.
pub fn axis_rotation(axis: Vector3<f64>, degrees: f64) -> Rotation3<f64> {
    match Unit::try_new(axis, f64::EPSILON) {
        Some(axis) => Rotation3::from_axis_angle(&axis, degrees.to_radians()),
        None => Rotation3::identity(),
    }
}

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AABB3D<S> {
    /// Minimum x coordinate.
    pub min_x: S,
    /// Minimum y coordinate.
    pub min_y: S,
    /// Minimum z coordinate.
    pub min_z: S,
    /// Maximum x coordinate.
    pub max_x: S,
    /// Maximum y coordinate.
    pub max_y: S,
    /// Maximum z coordinate.
    pub max_z: S,
}

impl<S: RealField + Copy> AABB3D<S> {
    /// Creates a new AABB from min/max coordinates.
    pub fn new(min_x: S, min_y: S, min_z: S, max_x: S, max_y: S, max_z: S) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// Creates an AABB enclosing a set of points.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<S>>,
        S: 'a,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut aabb = Self::new(first.x, first.y, first.z, first.x, first.y, first.z);

        for p in points {
            aabb.min_x = aabb.min_x.min(p.x);
            aabb.min_y = aabb.min_y.min(p.y);
            aabb.min_z = aabb.min_z.min(p.z);
            aabb.max_x = aabb.max_x.max(p.x);
            aabb.max_y = aabb.max_y.max(p.y);
            aabb.max_z = aabb.max_z.max(p.z);
        }

        Some(aabb)
    }

    /// Returns the minimum corner.
    pub fn min(&self) -> Point3<S> {
        Point3::new(self.min_x, self.min_y, self.min_z)
    }

    /// Returns the maximum corner.
    pub fn max(&self) -> Point3<S> {
        Point3::new(self.max_x, self.max_y, self.max_z)
    }

    /// Returns the width (x dimension) of the AABB.
    pub fn width(&self) -> S {
        self.max_x - self.min_x
    }

    /// Returns the depth (y dimension) of the AABB.
    pub fn depth(&self) -> S {
        self.max_y - self.min_y
    }

    /// Returns the height (z dimension) of the AABB.
    pub fn height(&self) -> S {
        self.max_z - self.min_z
    }

    /// Returns the extents as a vector.
    pub fn size(&self) -> Vector3<S> {
        Vector3::new(self.width(), self.depth(), self.height())
    }

    /// Returns the volume of the AABB.
    pub fn volume(&self) -> S {
        self.width() * self.depth() * self.height()
    }

}
