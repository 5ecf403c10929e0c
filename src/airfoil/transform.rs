//! Placement of chord-normalized profile control points into world space.

use crate::airfoil::{Profile, ReferenceFrame, Side};
use crate::common::points::transform_points;
use crate::geom2::lift;
use crate::{ImportError, Point3, Result};
use serde::{Deserialize, Serialize};

/// Options for the transformation of a profile into world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformOptions {
    /// Distance in world units between the upper and lower trailing edge points. Zero keeps the
    /// sharp trailing edge of the profile data.
    pub tail_gap: f64,

    /// Negate the local y coordinates so the upper side lands on the other side of the chord
    pub mirror_y: bool,

    /// Chord length to scale by instead of the frame's measured chord, e.g. the value of a
    /// driving dimension
    pub scale_override: Option<f64>,
}

/// Work the host has to do in addition to placing the curve control points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlacementHint {
    /// The trailing edge was opened, so a closing line between the two trailing edge points
    /// is needed
    ClosingLine { upper: Point3, lower: Point3 },

    /// Both curves start at this point and should be made coincident there
    CoincidentNose { point: Point3 },

    /// A distance dimension named `name` between the nose and the tail of the chord, driving the
    /// root parameter
    ChordDimension {
        name: String,
        nose: Point3,
        tail: Point3,
    },
}

/// The result of placing a profile into world space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedProfile {
    /// The local profile after the tail gap adjustment but before mirroring
    pub local: Profile,

    /// Whether the local y coordinates were negated for the placement
    pub mirrored: bool,

    /// The chord length the local coordinates were scaled by
    pub chord: f64,

    /// World space control points of the upper side, nose to tail
    pub upper: Vec<Point3>,

    /// World space control points of the lower side, nose to tail
    pub lower: Vec<Point3>,

    pub hints: Vec<PlacementHint>,
}

impl PlacedProfile {
    pub fn side(&self, side: Side) -> &[Point3] {
        match side {
            Side::Upper => &self.upper,
            Side::Lower => &self.lower,
        }
    }
}

/// Apply the local steps of the transformation, the tail gap and the mirroring, to a copy of the
/// profile.  The tail gap is given in world units and converted to local units with `chord`.
///
/// # Arguments
///
/// * `profile`: the chord-normalized profile
/// * `options`: the tail gap and mirror options, the scale override is ignored here
/// * `chord`: the chord length the profile will be scaled by
///
/// returns: Profile
pub fn apply_local(profile: &Profile, options: &TransformOptions, chord: f64) -> Profile {
    let mut result = profile.clone();

    if options.tail_gap != 0.0 {
        let half = 0.5 * options.tail_gap / chord;
        for side in [Side::Upper, Side::Lower] {
            result.side_mut(side).tail_mut().y = side.gap_sign() * half;
        }
    }

    if options.mirror_y {
        for p in result.points_mut() {
            p.y = -p.y;
        }
    }

    result
}

/// Transform a chord-normalized profile into world space. The steps are applied in a fixed
/// order: open the tail gap, mirror, scale by the chord length, rotate into the reference frame
/// and translate to the frame origin.  Ordering and count of the control points are preserved.
///
/// # Arguments
///
/// * `profile`: the chord-normalized profile
/// * `frame`: the reference frame to place the profile into
/// * `options`: tail gap, mirroring and an optional chord length override
///
/// returns: Result<PlacedProfile, ImportError>
pub fn transform(
    profile: &Profile,
    frame: &ReferenceFrame,
    options: &TransformOptions,
) -> Result<PlacedProfile> {
    let chord = options.scale_override.unwrap_or(frame.scale);
    if !(chord.is_finite() && chord > 0.0) {
        return Err(ImportError::DegenerateReference(format!(
            "cannot scale a profile by a chord length of {}",
            chord
        )));
    }
    if !options.tail_gap.is_finite() {
        return Err(ImportError::DegenerateReference(format!(
            "tail gap {} is not a finite length",
            options.tail_gap
        )));
    }

    let gapped = apply_local(
        profile,
        &TransformOptions {
            mirror_y: false,
            ..*options
        },
        chord,
    );
    let placed = apply_local(
        &gapped,
        &TransformOptions {
            tail_gap: 0.0,
            ..*options
        },
        chord,
    );

    let iso = frame.isometry();
    let place = |side: Side| {
        let scaled = placed
            .side(side)
            .points()
            .iter()
            .map(|p| lift(&(*p * chord)))
            .collect::<Vec<_>>();
        transform_points(&scaled, &iso)
    };
    let upper = place(Side::Upper);
    let lower = place(Side::Lower);

    let mut hints = vec![PlacementHint::CoincidentNose { point: upper[0] }];
    if options.tail_gap != 0.0 {
        hints.push(PlacementHint::ClosingLine {
            upper: upper[upper.len() - 1],
            lower: lower[lower.len() - 1],
        });
    }

    Ok(PlacedProfile {
        local: gapped,
        mirrored: options.mirror_y,
        chord,
        upper,
        lower,
        hints,
    })
}
