//! Common operations on f64 points in D-dimensional space.

use parry3d_f64::na::{AbstractRotation, Isometry, Point};

/// Returns the distance between two points in D-dimensional space.
///
/// # Arguments
///
/// * `a`: the first point
/// * `b`: the second point
///
/// returns: f64
///
/// # Examples
///
/// ```
/// use bezfoil::common::points::dist;
/// use bezfoil::Point2;
/// let a = Point2::new(1.0, 2.0);
/// let b = Point2::new(3.0, 2.0);
/// let d = dist(&a, &b);
/// assert_eq!(d, 2.0);
/// ```
pub fn dist<const D: usize>(a: &Point<f64, D>, b: &Point<f64, D>) -> f64 {
    (a - b).norm()
}

/// Find the pair of points, one from each candidate list, which are closest to each other.
/// Returns the index into `a` and the index into `b` of the pair. On equal distances the first
/// pair encountered (iterating `a` in the outer loop) wins, which keeps the result stable for
/// symmetric inputs.
///
/// # Arguments
///
/// * `a`: the first candidate list, must not be empty
/// * `b`: the second candidate list, must not be empty
///
/// returns: Option<(usize, usize)>
///
/// # Examples
///
/// ```
/// use bezfoil::common::points::closest_pair;
/// use bezfoil::Point3;
/// let a = [Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)];
/// let b = [Point3::new(0.0, 5.0, 0.0), Point3::new(10.0, 0.1, 0.0)];
/// assert_eq!(closest_pair(&a, &b), Some((1, 1)));
/// ```
pub fn closest_pair<const D: usize>(
    a: &[Point<f64, D>],
    b: &[Point<f64, D>],
) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for (i, pa) in a.iter().enumerate() {
        for (j, pb) in b.iter().enumerate() {
            let d = dist(pa, pb);
            if best.is_none_or(|(_, _, bd)| d < bd) {
                best = Some((i, j, d));
            }
        }
    }
    best.map(|(i, j, _)| (i, j))
}

/// Generic 2 or 3 dimensional transformation of a slice of `Point` entities by an `Isometry`,
/// resulting in an owned `Vec` of new point entities being created and returned.
///
/// # Arguments
///
/// * `points`: a slice of `Point` entities to transform
/// * `transform`: the `Isometry` to apply to each point
///
/// returns: Vec<OPoint<f64, Const<{ D }>>, Global>
///
/// # Examples
///
/// ```
/// use bezfoil::{Iso3, Point3};
/// use bezfoil::common::points::transform_points;
///
/// let points = vec![Point3::new(1.0, 2.0, 0.0), Point3::new(3.0, 4.0, 0.0)];
/// let transform = Iso3::translation(1.0, 2.0, 3.0);
/// let transformed_points = transform_points(&points, &transform);
/// assert_eq!(transformed_points[0], Point3::new(2.0, 4.0, 3.0));
/// assert_eq!(transformed_points[1], Point3::new(4.0, 6.0, 3.0));
/// ```
pub fn transform_points<R, const D: usize>(
    points: &[Point<f64, D>],
    transform: &Isometry<f64, R, D>,
) -> Vec<Point<f64, D>>
where
    R: AbstractRotation<f64, D>,
{
    points.iter().map(|p| transform * p).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point3;

    #[test]
    fn closest_pair_prefers_first_on_tie() {
        let a = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        let b = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        assert_eq!(closest_pair(&a, &b), Some((0, 0)));
    }

    #[test]
    fn closest_pair_empty() {
        let a: [Point3; 0] = [];
        let b = [Point3::new(0.0, 0.0, 0.0)];
        assert_eq!(closest_pair(&a, &b), None);
    }
}
