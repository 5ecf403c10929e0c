mod plane3;

pub use plane3::Plane3;

pub type Point3 = parry3d_f64::na::Point3<f64>;
pub type Vector3 = parry3d_f64::na::Vector3<f64>;
pub type UnitVec3 = parry3d_f64::na::Unit<Vector3>;
pub type Iso3 = parry3d_f64::na::Isometry3<f64>;
pub type UnitQuat = parry3d_f64::na::UnitQuaternion<f64>;

/// A straight sketch line between two points.  The start/end order carries no meaning for the
/// orientation resolution, which works out the shared vertex itself.
pub type Segment3 = parry3d_f64::shape::Segment;

/// Returns a copy of the segment with its start and end points exchanged.
pub fn reversed_segment(segment: &Segment3) -> Segment3 {
    Segment3::new(segment.b, segment.a)
}

/// Returns true if every coordinate of the point is finite.
pub fn is_finite_point(p: &Point3) -> bool {
    p.coords.iter().all(|c| c.is_finite())
}
