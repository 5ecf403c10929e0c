//! Named parameters exposed to the host design.  The parameters form an ordered set in which
//! every expression only references parameters created before it (or parameters external to the
//! set, such as a driving dimension), so the whole set can be re-evaluated in a single pass.

mod binder;
mod expression;

use crate::airfoil::Side;
use crate::{ImportError, Result};
use serde::Serialize;
use std::collections::HashMap;

pub use binder::{BindOptions, bind, validate_suffix};
pub use expression::{Expression, Factor};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParamUnit {
    Dimensionless,
    Length(String),
}

impl ParamUnit {
    /// The unit string as the host expects it, empty for dimensionless values
    pub fn as_str(&self) -> &str {
        match self {
            ParamUnit::Dimensionless => "",
            ParamUnit::Length(unit) => unit,
        }
    }
}

/// A live scalar exposed to the host design, optionally bound to an expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedParameter {
    pub name: String,
    pub value: f64,
    pub unit: ParamUnit,
    pub expression: Option<Expression>,
    pub comment: String,

    /// Whether the host should list this parameter among the user's favorites
    pub favorite: bool,
}

impl NamedParameter {
    pub fn new(name: String, value: f64, unit: ParamUnit) -> Self {
        Self {
            name,
            value,
            unit,
            expression: None,
            comment: String::new(),
            favorite: false,
        }
    }

    pub fn with_expression(mut self, expression: Expression) -> Self {
        self.expression = Some(expression);
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    pub fn favorite(mut self) -> Self {
        self.favorite = true;
        self
    }
}

/// The names of the four parameters generated for one control point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlPointBinding {
    pub side: Side,
    pub index: usize,

    /// Raw, chord-normalized x coordinate
    pub xdat: String,

    /// Raw, chord-normalized y coordinate
    pub ydat: String,

    /// Placed x coordinate, bound to `xdat * root * invy`
    pub x: String,

    /// Placed y coordinate, bound to `ydat * root * invx`
    pub y: String,
}

/// The ordered result of binding a placed profile to parameters.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSet {
    pub suffix: String,

    /// Name of the root chord parameter
    pub root: String,

    /// Name of the switch parameter that negates the placed y coordinates
    pub invx: String,

    /// Name of the switch parameter that negates the placed x coordinates
    pub invy: String,

    params: Vec<NamedParameter>,

    #[serde(skip)]
    index: HashMap<String, usize>,

    bindings: Vec<ControlPointBinding>,

    /// Parameters outside of this set which the host should mark as favorites, such as the
    /// driving dimension
    pub external_favorites: Vec<String>,

    /// Name of the chord length dimension the root is bound to, if one was created
    pub chord_dimension: Option<String>,
}

impl ParameterSet {
    fn new(suffix: &str, root: String, invx: String, invy: String) -> Self {
        Self {
            suffix: suffix.to_string(),
            root,
            invx,
            invy,
            params: Vec::new(),
            index: HashMap::new(),
            bindings: Vec::new(),
            external_favorites: Vec::new(),
            chord_dimension: None,
        }
    }

    fn push(&mut self, param: NamedParameter) {
        self.index.insert(param.name.clone(), self.params.len());
        self.params.push(param);
    }

    fn push_binding(&mut self, binding: ControlPointBinding) {
        self.bindings.push(binding);
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&NamedParameter> {
        self.index.get(name).map(|&i| &self.params[i])
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.get(name).map(|p| p.value)
    }

    /// All parameters in creation (and dependency) order
    pub fn iter(&self) -> impl Iterator<Item = &NamedParameter> {
        self.params.iter()
    }

    pub fn bindings(&self) -> &[ControlPointBinding] {
        &self.bindings
    }

    pub fn binding(&self, side: Side, index: usize) -> Option<&ControlPointBinding> {
        self.bindings
            .iter()
            .find(|b| b.side == side && b.index == index)
    }

    /// Every coordinate pair of the set: the raw data pair and the placement pair of each
    /// control point.
    pub fn coordinate_pairs(&self) -> Vec<(&str, &str)> {
        self.bindings
            .iter()
            .flat_map(|b| [(b.xdat.as_str(), b.ydat.as_str()), (b.x.as_str(), b.y.as_str())])
            .collect()
    }

    /// Set the value of a parameter, as a user editing it in the host design would.  Call
    /// `reevaluate` afterward to update everything that depends on it.
    pub fn set_value(&mut self, name: &str, value: f64) -> Result<()> {
        let i = *self
            .index
            .get(name)
            .ok_or_else(|| ImportError::UnknownParameter(name.to_string()))?;
        self.params[i].value = value;
        Ok(())
    }

    /// Recompute the value of every expression-bound parameter in creation order.  References to
    /// names outside of this set are resolved through `externals`.
    ///
    /// # Arguments
    ///
    /// * `externals`: values of parameters that live outside of the set, e.g. a driving dimension
    ///
    /// returns: Result<(), ImportError>
    pub fn reevaluate(&mut self, externals: &HashMap<String, f64>) -> Result<()> {
        for i in 0..self.params.len() {
            let Some(expression) = &self.params[i].expression else {
                continue;
            };
            let value = expression.evaluate(|name| {
                self.index
                    .get(name)
                    .map(|&j| self.params[j].value)
                    .or_else(|| externals.get(name).copied())
            })?;
            self.params[i].value = value;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_set() -> ParameterSet {
        let mut set = ParameterSet::new("a", "roota".into(), "invxa".into(), "invya".into());
        set.push(NamedParameter::new("roota".into(), 2.0, ParamUnit::Dimensionless));
        set.push(
            NamedParameter::new("xa".into(), 6.0, ParamUnit::Length("mm".into()))
                .with_expression(Expression::new(vec![
                    Factor::Constant(3.0),
                    Factor::Param("roota".into()),
                ])),
        );
        set
    }

    #[test]
    fn set_and_reevaluate() {
        let mut set = small_set();
        set.set_value("roota", 5.0).unwrap();
        set.reevaluate(&HashMap::new()).unwrap();
        assert_eq!(set.value("xa"), Some(15.0));
    }

    #[test]
    fn set_unknown() {
        let mut set = small_set();
        assert_eq!(
            set.set_value("nope", 1.0),
            Err(ImportError::UnknownParameter("nope".into()))
        );
    }

    #[test]
    fn unit_strings() {
        assert_eq!(ParamUnit::Dimensionless.as_str(), "");
        assert_eq!(ParamUnit::Length("mm".into()).as_str(), "mm");
    }
}
