//! Constraint evaluation over versions.
//!
//! A constraint pairs one of six comparison operators with a reference
//! version; a constraint set is the conjunction of its members. Evaluation
//! relies only on the scheme's `equal` and `less` primitives.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::version::{Version, VersionError, VersionParser};

/// The comparison operators a constraint may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
}

impl Operator {
    /// Operators in parse order: two-character symbols come first so that
    /// `>=1.0` is never read as `>` followed by `=1.0`.
    const PARSE_ORDER: [Operator; 6] = [
        Operator::GreaterOrEqual,
        Operator::LessOrEqual,
        Operator::NotEqual,
        Operator::Equal,
        Operator::Greater,
        Operator::Less,
    ];

    /// The operator's textual symbol.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `(operator, reference version)` predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    operator: Operator,
    version: Version,
}

impl Constraint {
    pub fn new(operator: Operator, version: Version) -> Self {
        Self { operator, version }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Evaluate the predicate for a candidate version.
    ///
    /// The reference version sits on the left of the operator: `>1.2.0`
    /// matches every candidate that `1.2.0` compares greater than.
    pub fn matches(&self, candidate: &Version) -> bool {
        let reference = &self.version;
        match self.operator {
            Operator::Equal => reference.equal(candidate),
            Operator::NotEqual => !reference.equal(candidate),
            Operator::Greater => !reference.less(candidate) && !reference.equal(candidate),
            Operator::Less => reference.less(candidate),
            Operator::GreaterOrEqual => !reference.less(candidate),
            Operator::LessOrEqual => reference.less(candidate) || reference.equal(candidate),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}

impl std::str::FromStr for Constraint {
    type Err = ConstraintParseError;

    /// Parse the rendered form, inferring the version scheme from the text.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_constraint(text, |version| version.parse())
    }
}

impl Serialize for Constraint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Constraint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// AND-composition of constraints. The empty set matches every version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new(constraints: Vec<Constraint>) -> Self {
        Self { constraints }
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    /// True when every member matches the candidate.
    pub fn matches(&self, candidate: &Version) -> bool {
        self.constraints.iter().all(|c| c.matches(candidate))
    }
}

impl From<Vec<Constraint>> for ConstraintSet {
    fn from(constraints: Vec<Constraint>) -> Self {
        Self::new(constraints)
    }
}

impl FromIterator<Constraint> for ConstraintSet {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, constraint) in self.constraints.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            constraint.fmt(f)?;
        }
        Ok(())
    }
}

/// Error parsing a constraint string.
#[derive(Debug, Error)]
pub enum ConstraintParseError {
    /// The text does not start with one of the six operator symbols.
    #[error("unknown operator in constraint {0:?}")]
    UnknownOperator(String),

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Parse `<op><version>`, handing the remainder to `parse_version`.
pub fn parse_constraint(
    text: &str,
    parse_version: VersionParser,
) -> Result<Constraint, ConstraintParseError> {
    for operator in Operator::PARSE_ORDER {
        if let Some(rest) = text.strip_prefix(operator.as_str()) {
            return Ok(Constraint::new(operator, parse_version(rest)?));
        }
    }
    Err(ConstraintParseError::UnknownOperator(text.to_string()))
}
