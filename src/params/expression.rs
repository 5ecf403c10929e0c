//! A small typed model of the algebraic expressions bound to the generated parameters.  Every
//! binding the importer produces is a product of parameter references and constants, optionally
//! divided by a unit to strip the dimension of a length parameter.

use crate::{ImportError, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Factor {
    /// A reference to another parameter by name
    Param(String),

    /// A numeric constant
    Constant(f64),

    /// Division by a unit (`/ mm`), which makes a length dimensionless. The numeric value of the
    /// referenced parameters is already in internal units, so this contributes a factor of one.
    PerUnit(String),
}

/// A product of factors, rendered in the host's expression syntax by `Display`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    factors: Vec<Factor>,
}

impl Expression {
    pub fn new(factors: Vec<Factor>) -> Self {
        Self { factors }
    }

    /// The product of the named parameters
    pub fn product(names: &[&str]) -> Self {
        Self::new(names.iter().map(|n| Factor::Param(n.to_string())).collect())
    }

    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// The names of all parameters this expression depends on
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.factors.iter().filter_map(|f| match f {
            Factor::Param(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Evaluate the expression, resolving parameter references through `lookup`.
    ///
    /// # Arguments
    ///
    /// * `lookup`: returns the current value of a parameter, or `None` if it is unknown
    ///
    /// returns: Result<f64, ImportError>
    ///
    /// # Examples
    ///
    /// ```
    /// use bezfoil::params::{Expression, Factor};
    /// let e = Expression::new(vec![
    ///     Factor::Param("d1".to_string()),
    ///     Factor::Constant(0.1),
    ///     Factor::PerUnit("mm".to_string()),
    /// ]);
    /// assert_eq!(e.to_string(), "d1 * 0.1 / mm");
    /// let v = e.evaluate(|_| Some(250.0)).unwrap();
    /// assert!((v - 25.0).abs() < 1e-12);
    /// ```
    pub fn evaluate<F>(&self, lookup: F) -> Result<f64>
    where
        F: Fn(&str) -> Option<f64>,
    {
        self.factors.iter().try_fold(1.0, |acc, f| match f {
            Factor::Param(name) => lookup(name)
                .map(|v| acc * v)
                .ok_or_else(|| ImportError::UnknownParameter(name.clone())),
            Factor::Constant(c) => Ok(acc * c),
            Factor::PerUnit(_) => Ok(acc),
        })
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = self
            .factors
            .iter()
            .enumerate()
            .map(|(i, factor)| match (i, factor) {
                (0, Factor::Param(name)) => name.clone(),
                (0, Factor::Constant(c)) => c.to_string(),
                (_, Factor::Param(name)) => format!(" * {}", name),
                (_, Factor::Constant(c)) => format!(" * {}", c),
                (0, Factor::PerUnit(unit)) => format!("1 / {}", unit),
                (_, Factor::PerUnit(unit)) => format!(" / {}", unit),
            })
            .join("");
        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_display() {
        let e = Expression::product(&["xdatobenab0", "rootab", "invyab"]);
        assert_eq!(e.to_string(), "xdatobenab0 * rootab * invyab");
        assert_eq!(
            e.references().collect::<Vec<_>>(),
            vec!["xdatobenab0", "rootab", "invyab"]
        );
    }

    #[test]
    fn unknown_reference() {
        let e = Expression::product(&["a", "b"]);
        let result = e.evaluate(|n| if n == "a" { Some(2.0) } else { None });
        assert_eq!(result, Err(ImportError::UnknownParameter("b".to_string())));
    }

    #[test]
    fn leading_unit() {
        let e = Expression::new(vec![Factor::PerUnit("mm".to_string())]);
        assert_eq!(e.to_string(), "1 / mm");
        assert_eq!(e.evaluate(|_| None), Ok(1.0));
    }
}
