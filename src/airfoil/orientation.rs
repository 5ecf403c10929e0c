//! Resolution of the reference frame that a profile is placed into.  The user picks either two
//! sketch lines (the chord from nose to tail and a perpendicular pointing toward the upper side)
//! or up to two sketch points (nose and tail).  Sketch lines have an arbitrary start/end order,
//! so the shared nose vertex is found by nearest endpoint matching, and the side of the chord
//! that the perpendicular points to decides whether the profile has to be mirrored.

use crate::common::near_zero;
use crate::common::points::{closest_pair, dist};
use crate::geom3::{Plane3, UnitQuat, is_finite_point};
use crate::{ImportError, Iso3, Point3, Result, Segment3, UnitVec3, Vector3};
use parry3d_f64::na::{Matrix3, Rotation3, Translation3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// The frame that maps chord-normalized profile coordinates to world coordinates:
/// `world = origin + scale * (x_local * x_dir + y_local * y_dir)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFrame {
    /// The nose (leading edge) position in world space
    pub origin: Point3,

    /// Unit direction of the chord, from the nose to the tail
    pub x_dir: UnitVec3,

    /// Unit direction perpendicular to the chord within the sketch plane
    pub y_dir: UnitVec3,

    /// The chord length, in world units
    pub scale: f64,
}

impl ReferenceFrame {
    fn from_axes(origin: Point3, x_dir: UnitVec3, y_dir: UnitVec3, scale: f64) -> Self {
        Self {
            origin,
            x_dir,
            y_dir,
            scale,
        }
    }

    /// The unit normal of the sketch plane, `x_dir × y_dir`
    pub fn normal(&self) -> UnitVec3 {
        UnitVec3::new_normalize(self.x_dir.cross(&self.y_dir))
    }

    /// The rotation taking the local x, y and z axes onto `x_dir`, `y_dir` and the normal
    pub fn rotation(&self) -> UnitQuat {
        let m = Matrix3::from_columns(&[
            self.x_dir.into_inner(),
            self.y_dir.into_inner(),
            self.normal().into_inner(),
        ]);
        UnitQuat::from_rotation_matrix(&Rotation3::from_matrix_unchecked(m))
    }

    /// The rigid part of the frame transform (rotation then translation to the origin), without
    /// the chord scale.
    pub fn isometry(&self) -> Iso3 {
        Iso3::from_parts(Translation3::from(self.origin.coords), self.rotation())
    }

    /// The plane that the frame lies in
    pub fn sketch_plane(&self) -> Plane3 {
        Plane3::from((&self.normal(), &self.origin))
    }

    /// Map an already scaled local coordinate into world space
    pub fn to_world(&self, x: f64, y: f64) -> Point3 {
        self.origin + self.x_dir.into_inner() * x + self.y_dir.into_inner() * y
    }
}

/// A resolved reference frame together with the decision whether the local y coordinates have
/// to be negated so that the upper side ends up on the side of the perpendicular reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub frame: ReferenceFrame,
    pub mirrored: bool,
}

/// The reference geometry a user can select for the placement of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReferenceSelection {
    /// Nothing selected, the profile is placed at the origin of the sketch along +X
    Origin,

    /// Only the nose point selected, the profile is placed there along +X
    Nose(Point3),

    /// Nose and tail points selected, the chord runs between them in the XY sketch plane
    NoseTail(Point3, Point3),

    /// A chord line and a perpendicular line pointing toward the upper side
    Lines { chord: Segment3, perp: Segment3 },
}

/// Resolve a reference frame from a chord line and a perpendicular line.
///
/// The closest pair of endpoints between the two segments identifies the nose, and both segments
/// are re-oriented to start there. The frame rotation is the minimal rotation that carries the
/// local x axis onto the chord direction (about the local x × chord axis, or about the normal of
/// the reference plane when the two are antiparallel), with the local y axis then settled into
/// the plane spanned by the two segments.  For sketches in the XY plane this is exactly the
/// minimal rotation. To decide on mirroring, the local points (1, 1) and (1, -1) are rotated and
/// moved to the nose; if the one below the chord is closer to the far end of the perpendicular,
/// the profile must be mirrored.
///
/// # Arguments
///
/// * `chord`: the chord line, nose to tail in either order
/// * `perp`: the perpendicular line, sharing the nose vertex in either order
/// * `tol`: the tolerance below which lengths and cross products count as zero
///
/// returns: Result<Orientation, ImportError>
pub fn resolve(chord: &Segment3, perp: &Segment3, tol: f64) -> Result<Orientation> {
    for p in [&chord.a, &chord.b, &perp.a, &perp.b] {
        if !is_finite_point(p) {
            return Err(ImportError::DegenerateReference(
                "reference geometry contains non-finite coordinates".to_string(),
            ));
        }
    }

    let chord_ends = [chord.a, chord.b];
    let perp_ends = [perp.a, perp.b];
    let (ci, pi) = closest_pair(&chord_ends, &perp_ends).ok_or_else(|| {
        ImportError::DegenerateReference("reference segments have no end points".to_string())
    })?;

    let nose = chord_ends[ci];
    let tail = chord_ends[1 - ci];
    let perp_start = perp_ends[pi];
    let perp_end = perp_ends[1 - pi];

    let chord_length = dist(&nose, &tail);
    if near_zero(chord_length, tol) {
        return Err(ImportError::DegenerateReference(
            "the chord line has zero length".to_string(),
        ));
    }
    if near_zero(dist(&perp_start, &perp_end), tol) {
        return Err(ImportError::DegenerateReference(
            "the perpendicular line has zero length".to_string(),
        ));
    }

    let x_dir = UnitVec3::new_normalize(tail - nose);
    let p_dir = UnitVec3::new_normalize(perp_end - perp_start);
    let cross = x_dir.cross(&p_dir);
    if near_zero(cross.norm(), tol) {
        return Err(ImportError::DegenerateReference(
            "the chord and perpendicular lines are parallel".to_string(),
        ));
    }
    let plane_normal = UnitVec3::new_normalize(cross);

    // The minimal rotation from local x onto the chord, and where it takes local y
    let minimal = UnitQuat::rotation_between(&Vector3::x(), &x_dir)
        .unwrap_or_else(|| UnitQuat::from_axis_angle(&plane_normal, PI));
    let rotated_y = minimal * Vector3::y();

    // Settle y into the reference plane, on the same side the minimal rotation put it
    let in_plane = plane_normal.cross(&x_dir);
    let y_dir = if rotated_y.dot(&in_plane) >= 0.0 {
        UnitVec3::new_normalize(in_plane)
    } else {
        UnitVec3::new_normalize(-in_plane)
    };

    let frame = ReferenceFrame::from_axes(nose, x_dir, y_dir, chord_length);
    if frame.sketch_plane().distance_to_point(&perp_start) > tol * chord_length.max(1.0) {
        return Err(ImportError::DegenerateReference(
            "the chord and perpendicular lines are not coplanar".to_string(),
        ));
    }

    let iso = frame.isometry();
    let plus = iso * Point3::new(1.0, 1.0, 0.0);
    let minus = iso * Point3::new(1.0, -1.0, 0.0);
    let mirrored = dist(&minus, &perp_end) < dist(&plus, &perp_end);

    log::debug!(
        "Resolved reference frame at {:?}, chord length {:.6}, mirrored: {}",
        nose,
        chord_length,
        mirrored
    );

    Ok(Orientation { frame, mirrored })
}

/// Resolve a reference frame from any kind of reference selection. Point based selections lie in
/// the XY sketch plane, use `default_chord` when they do not define a chord length, and are never
/// mirrored.
///
/// # Arguments
///
/// * `selection`: the selected reference geometry
/// * `default_chord`: the chord length used when the selection has no tail point
/// * `tol`: the tolerance below which lengths count as zero
///
/// returns: Result<Orientation, ImportError>
pub fn resolve_selection(
    selection: &ReferenceSelection,
    default_chord: f64,
    tol: f64,
) -> Result<Orientation> {
    let x_axis = UnitVec3::new_normalize(Vector3::x());
    let y_axis = UnitVec3::new_normalize(Vector3::y());

    let frame = match selection {
        ReferenceSelection::Lines { chord, perp } => return resolve(chord, perp, tol),
        ReferenceSelection::Origin => {
            ReferenceFrame::from_axes(Point3::origin(), x_axis, y_axis, default_chord)
        }
        ReferenceSelection::Nose(nose) => {
            if !is_finite_point(nose) {
                return Err(ImportError::DegenerateReference(
                    "the nose point has non-finite coordinates".to_string(),
                ));
            }
            ReferenceFrame::from_axes(*nose, x_axis, y_axis, default_chord)
        }
        ReferenceSelection::NoseTail(nose, tail) => {
            if !is_finite_point(nose) || !is_finite_point(tail) {
                return Err(ImportError::DegenerateReference(
                    "the nose or tail point has non-finite coordinates".to_string(),
                ));
            }
            let chord = tail - nose;
            let length = chord.norm();
            if near_zero(length, tol) {
                return Err(ImportError::DegenerateReference(
                    "nose and tail points coincide".to_string(),
                ));
            }
            let x_dir = UnitVec3::new_normalize(chord);
            let y = Vector3::z().cross(&x_dir);
            if near_zero(y.norm(), tol) {
                return Err(ImportError::DegenerateReference(
                    "the chord is normal to the sketch plane".to_string(),
                ));
            }
            ReferenceFrame::from_axes(*nose, x_dir, UnitVec3::new_normalize(y), length)
        }
    };

    if !(frame.scale.is_finite() && frame.scale > tol) {
        return Err(ImportError::DegenerateReference(format!(
            "chord length {} is not usable",
            frame.scale
        )));
    }

    Ok(Orientation {
        frame,
        mirrored: false,
    })
}
