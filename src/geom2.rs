//! Two dimensional types for the chord-normalized frame of a profile.

pub type Point2 = parry2d_f64::na::Point2<f64>;
pub type Vector2 = parry2d_f64::na::Vector2<f64>;
pub type Aabb2 = parry2d_f64::bounding_volume::Aabb;

/// Compute the axis aligned bounding box of a set of 2D points.  Returns `None` for an empty
/// slice.
///
/// # Arguments
///
/// * `points`: the points to bound
///
/// returns: Option<Aabb>
///
/// # Examples
///
/// ```
/// use bezfoil::geom2::{points_aabb, Point2};
/// let aabb = points_aabb(&[Point2::new(0.0, -0.1), Point2::new(1.0, 0.2)]).unwrap();
/// assert_eq!(aabb.mins, Point2::new(0.0, -0.1));
/// assert_eq!(aabb.maxs, Point2::new(1.0, 0.2));
/// ```
pub fn points_aabb(points: &[Point2]) -> Option<Aabb2> {
    let first = points.first()?;
    let mut mins = *first;
    let mut maxs = *first;
    for p in points.iter().skip(1) {
        mins = mins.inf(p);
        maxs = maxs.sup(p);
    }
    Some(Aabb2::new(mins, maxs))
}

/// Lift a point in the local profile plane into 3D with a zero z coordinate.
pub fn lift(p: &Point2) -> crate::Point3 {
    crate::Point3::new(p.x, p.y, 0.0)
}
