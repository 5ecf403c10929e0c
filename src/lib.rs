//! Import of Bezier airfoil profiles (control point data from "bez.dat" files) into a parametric
//! CAD sketch.  The crate parses profile text, resolves the orientation of the sketch reference
//! geometry, places the control points in world space and binds every placed coordinate to a
//! named, re-evaluable parameter so that the host design can resize or flip the profile later.

pub mod airfoil;
pub mod common;
pub mod config;
mod errors;
pub mod geom2;
pub mod geom3;
pub mod import;
pub mod params;
pub mod store;

pub use errors::ImportError;

pub use airfoil::{Profile, ProfileCurve, Side};
pub use config::{DegreePolicy, ImportConfig};
pub use geom2::{Point2, Vector2};
pub use geom3::{Iso3, Point3, Segment3, UnitVec3, Vector3};

pub type Result<T> = std::result::Result<T, ImportError>;
