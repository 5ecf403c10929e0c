//! This module contains the profile data structures and the geometric steps of the import
//! pipeline: parsing the control point text, resolving the orientation of the sketch reference
//! geometry, and transforming the chord-normalized control points into world space.

mod orientation;
mod parser;
mod transform;

use crate::{ImportError, Point2, Result};
use serde::{Deserialize, Serialize};

pub use orientation::{Orientation, ReferenceFrame, ReferenceSelection, resolve, resolve_selection};
pub use parser::{DegreeWarning, ParsedProfile, extract_coordinates, parse, parse_with_policy};
pub use transform::{PlacedProfile, PlacementHint, TransformOptions, apply_local, transform};

/// The two surfaces of an airfoil profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Upper,
    Lower,
}

impl Side {
    /// The tag used for this side in generated parameter names
    pub fn tag(self) -> &'static str {
        match self {
            Side::Upper => "oben",
            Side::Lower => "unten",
        }
    }

    /// Sign of the local y coordinate of the trailing edge point when a tail gap is opened
    pub fn gap_sign(self) -> f64 {
        match self {
            Side::Upper => 1.0,
            Side::Lower => -1.0,
        }
    }
}

/// The control points of one side of an airfoil profile.  The points run from the leading edge
/// (nose) to the trailing edge (tail), so the first point is shared with the opposite side and
/// the last point is this side's trailing edge point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCurve {
    points: Vec<Point2>,
}

impl ProfileCurve {
    /// Create a new curve from control points ordered nose to tail.  At least two points are
    /// required for a curve of degree one.
    pub fn try_new(points: Vec<Point2>) -> Result<Self> {
        if points.len() < 2 {
            return Err(ImportError::MalformedProfile(format!(
                "a profile side needs at least 2 control points, found {}",
                points.len()
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Point2] {
        &mut self.points
    }

    /// The spline degree of the curve, which is one less than the number of control points
    pub fn degree(&self) -> usize {
        self.points.len() - 1
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn nose(&self) -> &Point2 {
        &self.points[0]
    }

    pub fn tail(&self) -> &Point2 {
        &self.points[self.points.len() - 1]
    }

    pub fn tail_mut(&mut self) -> &mut Point2 {
        let last = self.points.len() - 1;
        &mut self.points[last]
    }
}

/// A named airfoil profile made of an upper and a lower control point curve of equal degree,
/// in chord-normalized coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    upper: ProfileCurve,
    lower: ProfileCurve,
}

impl Profile {
    pub fn try_new(name: &str, upper: ProfileCurve, lower: ProfileCurve) -> Result<Self> {
        if upper.len() != lower.len() {
            return Err(ImportError::DegreeMismatch {
                upper: upper.len(),
                lower: lower.len(),
                expected: upper.len().max(lower.len()),
            });
        }

        Ok(Self {
            name: name.to_string(),
            upper,
            lower,
        })
    }

    /// Build a profile from the raw pair sequence of a profile file or store row: the upper side
    /// from tail to nose, followed by the lower side from nose to tail, with the nose point
    /// present once.  The upper side is reversed into the nose to tail order.
    pub fn from_raw_pairs(name: &str, pairs: &[Point2]) -> Result<Self> {
        let n = pairs.len();
        if n < 3 {
            return Err(ImportError::MalformedProfile(format!(
                "at least 3 coordinate pairs are needed to form a profile, found {}",
                n
            )));
        }

        let mut upper = pairs[..(n + 1) / 2].to_vec();
        upper.reverse();
        let lower = pairs[(n - 1) / 2..].to_vec();

        Profile::try_new(name, ProfileCurve::try_new(upper)?, ProfileCurve::try_new(lower)?)
    }

    /// The inverse of `from_raw_pairs`, producing the raw file ordering with the shared nose
    /// point written once.
    pub fn to_raw_pairs(&self) -> Vec<Point2> {
        let mut pairs = self.upper.points().to_vec();
        pairs.reverse();
        pairs.extend(self.lower.points().iter().skip(1));
        pairs
    }

    pub fn upper(&self) -> &ProfileCurve {
        &self.upper
    }

    pub fn lower(&self) -> &ProfileCurve {
        &self.lower
    }

    pub fn side(&self, side: Side) -> &ProfileCurve {
        match side {
            Side::Upper => &self.upper,
            Side::Lower => &self.lower,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut ProfileCurve {
        match side {
            Side::Upper => &mut self.upper,
            Side::Lower => &mut self.lower,
        }
    }

    /// The spline degree shared by both sides
    pub fn degree(&self) -> usize {
        self.upper.degree()
    }

    /// Iterate over the mutable control points of both sides
    pub fn points_mut(&mut self) -> impl Iterator<Item = &mut Point2> {
        self.upper
            .points
            .iter_mut()
            .chain(self.lower.points.iter_mut())
    }
}
