//! Identities for selectable project versions and the constraint audit
//! trail built during discovery.

use std::fmt;

use pinion_version::ConstraintSet;
use serde::{Deserialize, Serialize};

/// Name of the synthetic project carrying the caller's root dependencies.
pub const ROOT_PROJECT: &str = "root";

/// Identifies one selectable (project, version) candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectIdent {
    pub name: String,
    /// Stable version identifier; empty for the synthetic root.
    pub version: String,
}

impl ProjectIdent {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// The ident of the synthetic root project.
    pub fn root() -> Self {
        Self::new(ROOT_PROJECT, "")
    }

    /// Whether this ident names the synthetic root. The name alone is the
    /// sentinel: a root origin marks its constraints unconditional.
    pub fn is_root(&self) -> bool {
        self.name == ROOT_PROJECT
    }
}

impl fmt::Display for ProjectIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}={}", self.name, self.version)
        }
    }
}

/// A constraint recorded during discovery together with where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginConstraint {
    /// Project version that introduced the constraint; the root ident for
    /// top-level requirements.
    pub origin: ProjectIdent,
    /// Name of the project the constraint applies to.
    pub subject: String,
    pub constraints: ConstraintSet,
}

impl fmt::Display for OriginConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} constrains \"{}\" with {}",
            self.origin, self.subject, self.constraints
        )
    }
}
