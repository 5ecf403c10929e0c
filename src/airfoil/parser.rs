//! Parsing of the text profile format written by the Bezier airfoil designer.  The format is free
//! form: a header line with the profile name, then blank-line separated sections, one of which
//! contains the control points as whitespace separated coordinate pairs, upper side from the
//! trailing edge to the nose followed by the lower side from the nose to the trailing edge.

use crate::airfoil::Profile;
use crate::config::DegreePolicy;
use crate::geom2::points_aabb;
use crate::{ImportError, Point2, Result};
use regex::Regex;
use std::sync::LazyLock;

/// A coordinate line holds two decimal numbers with at least three fractional digits each, which
/// is what separates coordinates from header and label lines.
static COORDINATE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?\d+\.\d{3,})\s+(-?\d+\.\d{3,})\s*$").expect("valid coordinate pattern")
});

const UNNAMED: &str = "unnamed";

/// Reported when a profile was accepted with a degree other than the expected one.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DegreeWarning {
    /// The number of control points found on each side
    pub points_per_side: usize,

    /// The degree which was expected from the configuration
    pub expected_degree: usize,
}

impl DegreeWarning {
    /// The degree the import continues with
    pub fn adopted_degree(&self) -> usize {
        self.points_per_side - 1
    }
}

impl std::fmt::Display for DegreeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "spline degree of the profile does not match {} (detected {} points per side), \
             continuing with degree {}",
            self.expected_degree,
            self.points_per_side,
            self.adopted_degree()
        )
    }
}

/// The result of parsing profile text.
#[derive(Debug, Clone)]
pub struct ParsedProfile {
    pub profile: Profile,
    pub warning: Option<DegreeWarning>,
}

/// Parse profile text expecting degree 9 curves and adapting to other degrees with a warning.
///
/// # Arguments
///
/// * `text`: the full content of a profile file
///
/// returns: Result<ParsedProfile, ImportError>
pub fn parse(text: &str) -> Result<ParsedProfile> {
    parse_with_policy(text, DegreePolicy::Adaptive, 9)
}

/// Parse profile text into a `Profile` in the canonical nose to tail ordering.
///
/// The coordinate pairs of the last section which contains any are split in the middle, sharing
/// the nose point: the first `floor((N+1)/2)` pairs form the upper side and the pairs from index
/// `floor((N-1)/2)` to the end form the lower side.  Sides of unequal length are always rejected.
/// When the side length does not match `expected_degree + 1`, `DegreePolicy::Strict` rejects the
/// profile while `DegreePolicy::Adaptive` continues with the detected degree and returns a
/// warning.
///
/// # Arguments
///
/// * `text`: the full content of a profile file
/// * `policy`: how to handle a degree other than `expected_degree`
/// * `expected_degree`: the expected spline degree of each side
///
/// returns: Result<ParsedProfile, ImportError>
pub fn parse_with_policy(
    text: &str,
    policy: DegreePolicy,
    expected_degree: usize,
) -> Result<ParsedProfile> {
    let pairs = extract_coordinates(text)?;
    let profile = Profile::from_raw_pairs(&profile_name(text), &pairs)?;

    let expected_points = expected_degree + 1;
    let warning = if profile.upper().len() != expected_points {
        match policy {
            DegreePolicy::Strict => {
                return Err(ImportError::DegreeMismatch {
                    upper: profile.upper().len(),
                    lower: profile.lower().len(),
                    expected: expected_points,
                });
            }
            DegreePolicy::Adaptive => {
                let warning = DegreeWarning {
                    points_per_side: profile.upper().len(),
                    expected_degree,
                };
                log::warn!("{}", warning);
                Some(warning)
            }
        }
    } else {
        None
    };

    if let Some(aabb) = points_aabb(&pairs) {
        if aabb.mins.x < -0.5 || aabb.maxs.x > 1.5 || aabb.mins.y < -1.0 || aabb.maxs.y > 1.0 {
            log::warn!(
                "Profile '{}' does not look chord-normalized (bounds {:?} to {:?})",
                profile.name,
                aabb.mins,
                aabb.maxs
            );
        }
    }

    log::debug!(
        "Parsed profile '{}' with {} control points per side",
        profile.name,
        profile.upper().len()
    );

    Ok(ParsedProfile { profile, warning })
}

/// Extract the coordinate pairs of the last blank-line separated section of the text which has
/// any coordinate lines in it. Fails with `MalformedProfile` if there are none at all.
///
/// # Arguments
///
/// * `text`: the full content of a profile file
///
/// returns: Result<Vec<OPoint<f64, Const<2>>, Global>, ImportError>
///
/// # Examples
///
/// ```
/// use bezfoil::airfoil::extract_coordinates;
/// let text = "my foil\n0.500 0.100\n\n1.0000 0.0000\n0.0000 0.0000\n";
/// let pairs = extract_coordinates(text).unwrap();
/// assert_eq!(pairs.len(), 2);
/// assert_eq!(pairs[0].x, 1.0);
/// ```
pub fn extract_coordinates(text: &str) -> Result<Vec<Point2>> {
    sections(text)
        .iter()
        .map(|lines| section_coordinates(lines))
        .filter(|pairs| !pairs.as_ref().is_ok_and(|p| p.is_empty()))
        .last()
        .ok_or_else(|| ImportError::MalformedProfile("no coordinate pairs found".to_string()))?
}

fn sections(text: &str) -> Vec<Vec<&str>> {
    let mut result = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        result.push(current);
    }
    result
}

/// Coordinates too large for an f64 parse to infinity and are rejected.
fn section_coordinates(lines: &[&str]) -> Result<Vec<Point2>> {
    let mut pairs = Vec::new();
    for c in lines.iter().filter_map(|line| COORDINATE_LINE.captures(line)) {
        let (Ok(x), Ok(y)) = (c[1].parse::<f64>(), c[2].parse::<f64>()) else {
            continue;
        };
        if !(x.is_finite() && y.is_finite()) {
            return Err(ImportError::MalformedProfile(format!(
                "coordinate line '{}' is out of range",
                c[0].trim()
            )));
        }
        pairs.push(Point2::new(x, y));
    }
    Ok(pairs)
}

/// The first non-blank line which is not a coordinate line names the profile.
fn profile_name(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !COORDINATE_LINE.is_match(line))
        .unwrap_or(UNNAMED)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    /// Build a degree `n - 1` profile text with a header, upper side tail to nose, then lower
    /// side nose to tail.
    fn profile_text(per_side: usize) -> String {
        let mut text = String::from("test foil bez\n\n");
        let count = 2 * per_side - 1;
        for i in 0..count {
            let t = i as f64 / (count - 1) as f64;
            let x = (2.0 * t - 1.0).abs();
            let y = if i < per_side - 1 { 0.08 * x * (1.0 - x) + 0.01 } else { -0.05 * x * (1.0 - x) };
            text.push_str(&format!("{:.6}  {:.6}\n", x, if i == per_side - 1 { 0.0 } else { y }));
        }
        text
    }

    #[test]
    fn nineteen_pairs_share_leading_edge() {
        let parsed = parse(&profile_text(10)).unwrap();
        let profile = parsed.profile;
        assert!(parsed.warning.is_none());
        assert_eq!(profile.upper().len(), 10);
        assert_eq!(profile.lower().len(), 10);
        assert_eq!(profile.upper().nose(), profile.lower().nose());
        assert_relative_eq!(profile.upper().nose().x, 0.0);
        assert_relative_eq!(profile.upper().tail().x, 1.0);
        assert_relative_eq!(profile.lower().tail().x, 1.0);
        assert_eq!(profile.name, "test foil bez");
    }

    #[test]
    fn raw_order_boundary_is_shared() {
        let text = profile_text(10);
        let pairs = extract_coordinates(&text).unwrap();
        let profile = parse(&text).unwrap().profile;
        let raw = profile.to_raw_pairs();
        assert_eq!(raw, pairs);
        assert_eq!(raw[9], *profile.lower().nose());
    }

    #[test]
    fn header_lines_are_not_coordinates() {
        let text = "NACA 2412\n1.0 0.0\n\n1.000000 0.000000\n0.000000 0.000000\n0.500000 -0.0500\n";
        let pairs = extract_coordinates(text).unwrap();
        assert_eq!(pairs.len(), 3);
        assert_relative_eq!(pairs[2].y, -0.05);
    }

    #[test]
    fn last_section_with_matches_is_used() {
        let text = "name\n\n0.100 0.100\n0.200 0.200\n0.300 0.300\n\n1.000 0.000\n0.000 0.000\n\
                    0.500 0.000\n\ncomments only\n\n";
        let pairs = extract_coordinates(text).unwrap();
        assert_eq!(pairs.len(), 3);
        assert_relative_eq!(pairs[0].x, 1.0);
    }

    #[test]
    fn overflowing_coordinate_is_malformed() {
        let huge = format!("1{}.000000", "0".repeat(400));
        let text = profile_text(10).replacen("1.000000", &huge, 1);
        assert!(text.contains(&huge));
        let result = parse(&text);
        assert!(matches!(result, Err(ImportError::MalformedProfile(_))));
    }

    #[test]
    fn windows_line_endings() {
        let text = profile_text(10).replace('\n', "\r\n");
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed.profile.upper().len(), 10);
    }

    #[test]
    fn no_coordinates_is_malformed() {
        let result = parse("just a header\n\n1.0 2.0\n");
        assert!(matches!(result, Err(ImportError::MalformedProfile(_))));
    }

    #[test_case(4, 3)]
    #[test_case(6, 5)]
    #[test_case(8, 7)]
    fn adaptive_degree(per_side: usize, degree: usize) {
        let parsed = parse(&profile_text(per_side)).unwrap();
        let warning = parsed.warning.unwrap();
        assert_eq!(warning.adopted_degree(), degree);
        assert_eq!(parsed.profile.degree(), degree);
    }

    #[test]
    fn strict_degree_rejects() {
        let result = parse_with_policy(&profile_text(6), DegreePolicy::Strict, 9);
        assert_eq!(
            result.unwrap_err(),
            ImportError::DegreeMismatch {
                upper: 6,
                lower: 6,
                expected: 10
            }
        );
    }

    #[test]
    fn strict_degree_accepts_matching() {
        let parsed = parse_with_policy(&profile_text(6), DegreePolicy::Strict, 5).unwrap();
        assert!(parsed.warning.is_none());
    }

    #[test]
    fn unequal_sides_always_rejected() {
        let mut text = profile_text(10);
        text.push_str("1.000100 0.000000\n");
        let result = parse(&text);
        assert!(matches!(result, Err(ImportError::DegreeMismatch { .. })));
    }
}
