//! Transitive discovery of involved projects and their constraints.
//!
//! The walker descends depth-first from the root dependency list. Every
//! dependency is looked up in the catalog; first-seen projects enter the
//! involved set in encounter order, and every non-empty constraint list is
//! recorded against its subject together with the originating project
//! version. Recursion descends into all versions of a newly seen project
//! and stops at the first-seen check on revisits, which also makes cyclic
//! dependency graphs safe to traverse.

use indexmap::IndexMap;
use tracing::trace;

use crate::catalog::{Catalog, CatalogError, Dependency, Project};
use crate::ident::{OriginConstraint, ProjectIdent};
use crate::resolver::ResolveError;

/// Everything the walker learned about the dependency tree.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Involved project records in first-seen order.
    pub projects: Vec<Project>,
    /// Constraint audit per involved project, keyed in first-seen order.
    pub constraints: IndexMap<String, Vec<OriginConstraint>>,
}

/// Depth-first discovery over a catalog.
pub struct Walker<'a, C: ?Sized> {
    catalog: &'a C,
    discovery: Discovery,
}

impl<'a, C: Catalog + ?Sized> Walker<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self {
            catalog,
            discovery: Discovery::default(),
        }
    }

    /// Walk the tree from the root dependency list.
    ///
    /// Fails on the first missing project or backend error, in traversal
    /// order. Whatever was discovered up to that point is preserved and can
    /// still be taken with [`Walker::into_discovery`].
    pub fn walk(&mut self, root_dependencies: &[Dependency]) -> Result<(), ResolveError> {
        self.visit(&ProjectIdent::root(), root_dependencies)
    }

    pub fn into_discovery(self) -> Discovery {
        self.discovery
    }

    fn visit(
        &mut self,
        origin: &ProjectIdent,
        dependencies: &[Dependency],
    ) -> Result<(), ResolveError> {
        for dependency in dependencies {
            let project = match self.catalog.get(&dependency.name) {
                Ok(project) => project,
                Err(CatalogError::NotFound(_)) => {
                    return Err(ResolveError::UnknownDependency {
                        name: dependency.name.clone(),
                    });
                }
                Err(err) => return Err(err.into()),
            };

            let first_seen = !self.discovery.constraints.contains_key(&dependency.name);
            if first_seen {
                trace!("Discovered {}", dependency.name);
                self.discovery
                    .constraints
                    .insert(dependency.name.clone(), Vec::new());
            }

            if !dependency.constraints.is_empty() {
                let audit = OriginConstraint {
                    origin: origin.clone(),
                    subject: dependency.name.clone(),
                    constraints: dependency.constraints.clone(),
                };
                trace!("Recorded {}", audit);
                self.discovery
                    .constraints
                    .entry(dependency.name.clone())
                    .or_default()
                    .push(audit);
            }

            if first_seen {
                self.discovery.projects.push(project.clone());
                for release in &project.versions {
                    let release_ident =
                        ProjectIdent::new(project.name.clone(), release.version.to_string());
                    self.visit(&release_ident, &release.dependencies)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryCatalog, ProjectVersion};
    use pinion_version::{parse_constraint, Version};

    fn semver(text: &str) -> Version {
        Version::parse_semantic(text).unwrap()
    }

    fn constrained(name: &str, text: &str) -> Dependency {
        Dependency::with_constraints(
            name,
            vec![parse_constraint(text, Version::parse_semantic).unwrap()],
        )
    }

    fn release(version: &str, dependencies: Vec<Dependency>) -> ProjectVersion {
        let mut pv = ProjectVersion::new(semver(version));
        for dependency in dependencies {
            pv.add_dependency(dependency);
        }
        pv
    }

    fn project(name: &str, versions: Vec<ProjectVersion>) -> Project {
        let mut p = Project::new(name);
        for version in versions {
            p.add_version(version);
        }
        p
    }

    fn pinned_catalog() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        catalog.add(project(
            "A",
            vec![
                release("1.1.1", vec![constrained("C", "=2.0.1")]),
                release("1.1.0", vec![constrained("C", "=2.0.0")]),
            ],
        ));
        catalog.add(project("B", vec![release("1.0.0", vec![constrained("C", "=2.0.0")])]));
        catalog.add(project(
            "C",
            vec![release("2.0.1", vec![]), release("2.0.0", vec![])],
        ));
        catalog
    }

    #[test]
    fn test_first_seen_order() {
        let catalog = pinned_catalog();
        let mut walker = Walker::new(&catalog);
        walker
            .walk(&[Dependency::new("A"), Dependency::new("B")])
            .unwrap();

        let discovery = walker.into_discovery();
        let names: Vec<&str> = discovery.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["A", "C", "B"]);
        let keys: Vec<&String> = discovery.constraints.keys().collect();
        assert_eq!(keys, ["A", "C", "B"]);
    }

    #[test]
    fn test_constraint_audit() {
        let catalog = pinned_catalog();
        let mut walker = Walker::new(&catalog);
        walker
            .walk(&[Dependency::new("A"), Dependency::new("B")])
            .unwrap();

        let discovery = walker.into_discovery();
        let rendered: Vec<String> = discovery.constraints["C"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            rendered,
            [
                "A=1.1.1 constrains \"C\" with =2.0.1",
                "A=1.1.0 constrains \"C\" with =2.0.0",
                "B=1.0.0 constrains \"C\" with =2.0.0",
            ]
        );

        // unconstrained root requirements leave an empty audit entry
        assert!(discovery.constraints["A"].is_empty());
    }

    #[test]
    fn test_root_origin_for_constrained_root_dependency() {
        let catalog = pinned_catalog();
        let mut walker = Walker::new(&catalog);
        walker.walk(&[constrained("C", "=2.0.0")]).unwrap();

        let discovery = walker.into_discovery();
        assert_eq!(
            discovery.constraints["C"][0].to_string(),
            "root constrains \"C\" with =2.0.0"
        );
    }

    #[test]
    fn test_unknown_dependency() {
        let catalog = pinned_catalog();
        let mut walker = Walker::new(&catalog);
        let err = walker.walk(&[Dependency::new("X")]).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownDependency { name } if name == "X"));
    }

    #[test]
    fn test_cyclic_dependencies_terminate() {
        let mut catalog = InMemoryCatalog::new();
        catalog.add(project("A", vec![release("1.0.0", vec![Dependency::new("B")])]));
        catalog.add(project("B", vec![release("1.0.0", vec![Dependency::new("A")])]));

        let mut walker = Walker::new(&catalog);
        walker.walk(&[Dependency::new("A")]).unwrap();

        let discovery = walker.into_discovery();
        let names: Vec<&str> = discovery.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }
}
