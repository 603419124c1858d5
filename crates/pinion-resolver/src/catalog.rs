//! Project records and the read-only catalog the resolver consults.

use std::collections::HashMap;

use pinion_version::{ConstraintSet, Version};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A dependency on another project, optionally narrowed by constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    /// Name of the target project.
    pub name: String,
    /// AND-composed constraints; the empty set accepts any version.
    pub constraints: ConstraintSet,
}

impl Dependency {
    /// Create a dependency accepting any version.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: ConstraintSet::default(),
        }
    }

    /// Create a dependency narrowed by constraints.
    pub fn with_constraints(name: impl Into<String>, constraints: impl Into<ConstraintSet>) -> Self {
        Self {
            name: name.into(),
            constraints: constraints.into(),
        }
    }
}

/// A concrete release of a project with its own dependency list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectVersion {
    pub version: Version,
    pub dependencies: Vec<Dependency>,
}

impl ProjectVersion {
    /// Create a release with no dependencies.
    pub fn new(version: Version) -> Self {
        Self {
            version,
            dependencies: Vec::new(),
        }
    }

    /// Add a dependency.
    pub fn add_dependency(&mut self, dependency: Dependency) {
        self.dependencies.push(dependency);
    }
}

/// A named project and its releases, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub versions: Vec<ProjectVersion>,
}

impl Project {
    /// Create a project with no releases.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            versions: Vec::new(),
        }
    }

    /// Add a release.
    pub fn add_version(&mut self, version: ProjectVersion) {
        self.versions.push(version);
    }
}

/// Error from a catalog lookup.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("project not found: {0}")]
    NotFound(String),

    /// Any other backend failure; the resolver passes it through verbatim.
    #[error("catalog backend failure: {0}")]
    Backend(String),
}

/// Read-only lookup from project name to project record.
///
/// Implementations must return versions sorted descending (newest first)
/// with no two versions comparing equal.
pub trait Catalog {
    fn get(&self, name: &str) -> Result<Project, CatalogError>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn get(&self, name: &str) -> Result<Project, CatalogError> {
        (**self).get(name)
    }
}

/// In-memory catalog backend.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    projects: HashMap<String, Project>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a project, sorting its releases newest-first. Replaces any
    /// project already stored under the same name.
    pub fn add(&mut self, mut project: Project) {
        project.versions.sort_by(|a, b| {
            b.version
                .precedence(&a.version)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.projects.insert(project.name.clone(), project);
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl Catalog for InMemoryCatalog {
    fn get(&self, name: &str) -> Result<Project, CatalogError> {
        self.projects
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }
}
