//! Binding of a placed profile to named parameters.  Each control point gets a pair of raw data
//! parameters holding the chord-normalized coordinates and a pair of placement parameters whose
//! expressions scale the raw data by the root chord and the mirror switches.  Editing the root or
//! switch parameters in the host then re-derives the placement without a new import.

use crate::airfoil::{PlacedProfile, Profile, Side};
use crate::params::{
    ControlPointBinding, Expression, Factor, NamedParameter, ParamUnit, ParameterSet,
};
use crate::{ImportError, Result};

/// The naming and unit options of a binding.
#[derive(Debug, Clone)]
pub struct BindOptions<'a> {
    /// Alphabetic tag appended to every generated name
    pub suffix: &'a str,

    /// Name of an external parameter which drives the root chord
    pub driving: Option<&'a str>,

    /// Factor converting the driving parameter into internal length units
    pub unit_factor: f64,

    /// Length unit of the placement parameters and the driving parameter
    pub length_unit: &'a str,

    /// Without a driving parameter, bind the root to a new chord dimension `wurzeltiefe<suffix>`
    /// for placements which have no tail point fixing the chord length
    pub chord_dimension: bool,
}

/// Check that a suffix is non-empty and made of letters only.
///
/// # Examples
///
/// ```
/// use bezfoil::params::validate_suffix;
/// assert!(validate_suffix("ab").is_ok());
/// assert!(validate_suffix("ab12").is_err());
/// ```
pub fn validate_suffix(suffix: &str) -> Result<()> {
    if suffix.is_empty() || !suffix.chars().all(char::is_alphabetic) {
        return Err(ImportError::InvalidSuffix(suffix.to_string()));
    }
    Ok(())
}

fn point_names(side: Side, suffix: &str, i: usize) -> ControlPointBinding {
    let tag = side.tag();
    ControlPointBinding {
        side,
        index: i,
        xdat: format!("xdat{}{}{}", tag, suffix, i),
        ydat: format!("ydat{}{}{}", tag, suffix, i),
        x: format!("x{}{}{}", tag, suffix, i),
        y: format!("y{}{}{}", tag, suffix, i),
    }
}

/// Create the named parameters for a placed profile.
///
/// The set starts with `root<suffix>` (the chord length, or bound to the driving parameter),
/// `invx<suffix>` (-1 if the placement was mirrored, else 1) and `invy<suffix>` (1), followed by
/// the `xdat`, `ydat`, `x` and `y` parameters of every control point of the upper (`oben`) and
/// lower (`unten`) sides.  The placement values equal their evaluated expressions, which are the
/// coordinates of the placed points in the reference frame.
///
/// With `chord_dimension` set and no driving parameter, the set starts with the favorite length
/// parameter `wurzeltiefe<suffix>` (the chord in length units) and the root is bound to it
/// instead of being a favorite itself.
///
/// # Arguments
///
/// * `placed`: the placed profile, supplying the mirror state
/// * `local`: the local profile the raw data parameters are taken from
/// * `chord`: the chord length, the initial value of the root parameter
/// * `options`: suffix, driving parameter and unit options
/// * `is_taken`: returns true for names which already exist in the host design
///
/// returns: Result<ParameterSet, ImportError>
pub fn bind<F>(
    placed: &PlacedProfile,
    local: &Profile,
    chord: f64,
    options: &BindOptions,
    is_taken: F,
) -> Result<ParameterSet>
where
    F: Fn(&str) -> bool,
{
    validate_suffix(options.suffix)?;
    if placed.upper.len() != local.upper().len() || placed.lower.len() != local.lower().len() {
        return Err(ImportError::DegreeMismatch {
            upper: placed.upper.len(),
            lower: placed.lower.len(),
            expected: local.upper().len(),
        });
    }

    let s = options.suffix;
    let mut set = ParameterSet::new(
        s,
        format!("root{}", s),
        format!("invx{}", s),
        format!("invy{}", s),
    );

    let mut root = NamedParameter::new(set.root.clone(), chord, ParamUnit::Dimensionless)
        .with_comment(&format!("root{}", s))
        .favorite();
    if let Some(driving) = options.driving {
        root = root.with_expression(Expression::new(vec![
            Factor::Param(driving.to_string()),
            Factor::Constant(options.unit_factor),
            Factor::PerUnit(options.length_unit.to_string()),
        ]));
        set.external_favorites.push(driving.to_string());
    } else if options.chord_dimension {
        let name = format!("wurzeltiefe{}", s);
        let dimension = NamedParameter::new(
            name.clone(),
            chord / options.unit_factor,
            ParamUnit::Length(options.length_unit.to_string()),
        )
        .with_comment("chord length")
        .favorite();
        root = root.with_expression(Expression::new(vec![
            Factor::Param(name.clone()),
            Factor::Constant(options.unit_factor),
            Factor::PerUnit(options.length_unit.to_string()),
        ]));
        root.favorite = false;
        set.push(dimension);
        set.chord_dimension = Some(name);
    }
    let invx_value = if placed.mirrored { -1.0 } else { 1.0 };
    let invx = NamedParameter::new(set.invx.clone(), invx_value, ParamUnit::Dimensionless)
        .with_comment("switch to bottom")
        .favorite();
    let invy = NamedParameter::new(set.invy.clone(), 1.0, ParamUnit::Dimensionless)
        .with_comment("switch to back")
        .favorite();

    set.push(root);
    set.push(invx);
    set.push(invy);

    let length = ParamUnit::Length(options.length_unit.to_string());
    for side in [Side::Upper, Side::Lower] {
        let curve = local.side(side);
        for (i, p) in curve.points().iter().enumerate() {
            let names = point_names(side, s, i);

            let x = NamedParameter::new(names.x.clone(), p.x * chord, length.clone())
                .with_expression(Expression::product(&[&names.xdat, &set.root, &set.invy]));
            let mut y =
                NamedParameter::new(names.y.clone(), p.y * chord * invx_value, length.clone())
                    .with_expression(Expression::product(&[&names.ydat, &set.root, &set.invx]));
            if i == curve.degree() {
                y = y.with_comment("trailing edge").favorite();
            }

            set.push(NamedParameter::new(
                names.xdat.clone(),
                p.x,
                ParamUnit::Dimensionless,
            ));
            set.push(NamedParameter::new(
                names.ydat.clone(),
                p.y,
                ParamUnit::Dimensionless,
            ));
            set.push(x);
            set.push(y);
            set.push_binding(names);
        }
    }

    if let Some(taken) = set.iter().map(|p| p.name.as_str()).find(|n| is_taken(n)) {
        log::warn!("Parameter '{}' already exists in the design", taken);
        return Err(ImportError::DuplicateSuffix(s.to_string()));
    }

    log::debug!("Bound {} parameters with suffix '{}'", set.len(), s);
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airfoil::{ReferenceSelection, TransformOptions, resolve_selection, transform};
    use crate::Point2;
    use approx::assert_relative_eq;
    use std::collections::{HashMap, HashSet};
    use test_case::test_case;

    fn options<'a>(suffix: &'a str, driving: Option<&'a str>) -> BindOptions<'a> {
        BindOptions {
            suffix,
            driving,
            unit_factor: 0.1,
            length_unit: "mm",
            chord_dimension: false,
        }
    }

    fn placed(chord: f64, mirror: bool) -> PlacedProfile {
        placed_with_gap(chord, mirror, 0.0)
    }

    fn placed_with_gap(chord: f64, mirror: bool, tail_gap: f64) -> PlacedProfile {
        let pairs = (0..19)
            .map(|i| {
                let x = ((i as f64) - 9.0).abs() / 9.0;
                let y = if i < 9 { 0.06 * x * (1.0 - x) } else { -0.03 * x * (1.0 - x) };
                Point2::new(x, y)
            })
            .collect::<Vec<_>>();
        let profile = Profile::from_raw_pairs("p", &pairs).unwrap();
        let frame = resolve_selection(&ReferenceSelection::Origin, chord, 1e-9)
            .unwrap()
            .frame;
        let options = TransformOptions {
            tail_gap,
            mirror_y: mirror,
            ..Default::default()
        };
        transform(&profile, &frame, &options).unwrap()
    }

    #[test]
    fn default_binding() {
        let p = placed(12.5, false);
        let set = bind(&p, &p.local, p.chord, &options("ab", None), |_| false).unwrap();

        assert_eq!(set.value("rootab"), Some(12.5));
        assert_eq!(set.value("invxab"), Some(1.0));
        assert_eq!(set.value("invyab"), Some(1.0));
        assert_eq!(set.coordinate_pairs().len(), 40);
        assert_eq!(set.len(), 83);
        assert!(set.get("rootab").unwrap().expression.is_none());

        let x = set.get("xobenab3").unwrap();
        assert_eq!(
            x.expression.as_ref().unwrap().to_string(),
            "xdatobenab3 * rootab * invyab"
        );
        let y = set.get("yuntenab7").unwrap();
        assert_eq!(
            y.expression.as_ref().unwrap().to_string(),
            "ydatuntenab7 * rootab * invxab"
        );
        assert!(set.get("yobenab9").unwrap().favorite);
        assert!(set.get("yuntenab9").unwrap().favorite);
        assert!(!set.get("yuntenab8").unwrap().favorite);
    }

    #[test]
    fn values_match_placement() {
        for mirror in [false, true] {
            let p = placed(40.0, mirror);
            let set = bind(&p, &p.local, p.chord, &options("q", None), |_| false).unwrap();
            for side in [Side::Upper, Side::Lower] {
                for (i, world) in p.side(side).iter().enumerate() {
                    let b = set.binding(side, i).unwrap();
                    assert_relative_eq!(set.value(&b.x).unwrap(), world.x, epsilon = 1e-12);
                    assert_relative_eq!(set.value(&b.y).unwrap(), world.y, epsilon = 1e-12);
                }
            }
            assert_eq!(set.value("invxq"), Some(if mirror { -1.0 } else { 1.0 }));
        }
    }

    #[test]
    fn chord_dimension_drives_root() {
        let p = placed(10.0, false);
        let opts = BindOptions {
            chord_dimension: true,
            ..options("ab", None)
        };
        let mut set = bind(&p, &p.local, p.chord, &opts, |_| false).unwrap();
        assert_eq!(set.chord_dimension.as_deref(), Some("wurzeltiefeab"));
        assert_eq!(set.len(), 84);
        assert_eq!(set.iter().next().unwrap().name, "wurzeltiefeab");

        let dim = set.get("wurzeltiefeab").unwrap();
        assert_relative_eq!(dim.value, 100.0, epsilon = 1e-12);
        assert!(dim.favorite);
        let root = set.get("rootab").unwrap();
        assert!(!root.favorite);
        assert_eq!(
            root.expression.as_ref().unwrap().to_string(),
            "wurzeltiefeab * 0.1 / mm"
        );

        set.set_value("wurzeltiefeab", 250.0).unwrap();
        set.reevaluate(&HashMap::new()).unwrap();
        assert_relative_eq!(set.value("rootab").unwrap(), 25.0, epsilon = 1e-12);
        assert_relative_eq!(set.value("xobenab9").unwrap(), 25.0, epsilon = 1e-12);
    }

    #[test]
    fn driving_parameter_wins_over_chord_dimension() {
        let p = placed(10.0, false);
        let opts = BindOptions {
            chord_dimension: true,
            ..options("ab", Some("d1"))
        };
        let set = bind(&p, &p.local, p.chord, &opts, |_| false).unwrap();
        assert!(set.chord_dimension.is_none());
        assert!(!set.contains("wurzeltiefeab"));
        assert_eq!(set.len(), 83);
    }

    #[test]
    fn mirrored_tail_gap() {
        let p = placed_with_gap(100.0, true, 2.0);
        let set = bind(&p, &p.local, p.chord, &options("ab", None), |_| false).unwrap();
        assert_eq!(set.value("invxab"), Some(-1.0));
        assert_relative_eq!(set.value("ydatobenab9").unwrap(), 0.01, epsilon = 1e-12);
        assert_relative_eq!(set.value("ydatuntenab9").unwrap(), -0.01, epsilon = 1e-12);
        assert_relative_eq!(set.value("yobenab9").unwrap(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(set.value("yuntenab9").unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.upper[9].y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn reevaluate_after_root_edit() {
        let p = placed(10.0, false);
        let mut set = bind(&p, &p.local, p.chord, &options("ab", None), |_| false).unwrap();
        let before = set.value("xobenab5").unwrap();
        set.set_value("rootab", 30.0).unwrap();
        set.reevaluate(&HashMap::new()).unwrap();
        assert_relative_eq!(set.value("xobenab5").unwrap(), before * 3.0, epsilon = 1e-12);

        set.set_value("invxab", -1.0).unwrap();
        set.reevaluate(&HashMap::new()).unwrap();
        assert!(set.value("yobenab5").unwrap() < 0.0);
    }

    #[test]
    fn driving_parameter() {
        let p = placed(10.0, false);
        let mut set = bind(&p, &p.local, p.chord, &options("ab", Some("d1")), |_| false).unwrap();
        let root = set.get("rootab").unwrap();
        assert_eq!(root.expression.as_ref().unwrap().to_string(), "d1 * 0.1 / mm");
        assert!(root.favorite);
        assert_eq!(set.external_favorites, vec!["d1".to_string()]);

        let mut externals = HashMap::new();
        externals.insert("d1".to_string(), 200.0);
        set.reevaluate(&externals).unwrap();
        assert_relative_eq!(set.value("rootab").unwrap(), 20.0, epsilon = 1e-12);
        assert_relative_eq!(set.value("xobenab9").unwrap(), 20.0, epsilon = 1e-12);

        let missing = set.reevaluate(&HashMap::new());
        assert_eq!(missing, Err(ImportError::UnknownParameter("d1".to_string())));
    }

    #[test_case("ab12")]
    #[test_case("")]
    #[test_case("a b")]
    #[test_case("a_b")]
    fn invalid_suffix(suffix: &str) {
        let p = placed(10.0, false);
        let result = bind(&p, &p.local, p.chord, &options(suffix, None), |_| false);
        assert_eq!(result.unwrap_err(), ImportError::InvalidSuffix(suffix.to_string()));
    }

    #[test]
    fn duplicate_suffix() {
        let p = placed(10.0, false);
        let first = bind(&p, &p.local, p.chord, &options("ab", None), |_| false).unwrap();
        let taken = first.iter().map(|n| n.name.clone()).collect::<HashSet<_>>();

        let again = bind(&p, &p.local, p.chord, &options("ab", None), |n| taken.contains(n));
        assert_eq!(again.unwrap_err(), ImportError::DuplicateSuffix("ab".to_string()));

        let other = bind(&p, &p.local, p.chord, &options("abc", None), |n| taken.contains(n));
        assert!(other.is_ok());
    }
}
