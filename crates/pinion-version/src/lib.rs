//! Version schemes and constraint evaluation for the pinion resolver.
//!
//! This crate provides:
//! - The [`Version`] type covering both supported schemes (SemVer 2.0.0 and
//!   plain sequence numbers)
//! - [`Constraint`] and [`ConstraintSet`] predicates over versions
//! - Constraint parsing with scheme-specific version parsers
//!
//! # Example
//!
//! ```
//! use pinion_version::{parse_constraint, Version};
//!
//! let constraint = parse_constraint("=1.2.3", Version::parse_semantic)?;
//! assert!(constraint.matches(&Version::parse_semantic("v1.2.3")?));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod constraint;
pub mod version;

pub use constraint::{
    parse_constraint, Constraint, ConstraintParseError, ConstraintSet, Operator,
};
pub use version::{Version, VersionError, VersionParser};
