//! SAT-backed package dependency resolution.
//!
//! Given a root dependency list and a catalog of project records, the
//! resolver selects at most one version per involved project such that
//! every constraint is satisfied, preferring the newest feasible version of
//! each project. The dependency tree is translated into CNF over
//! per-(project, version) literals and searched under solver assumptions.
//!
//! # Example
//!
//! ```
//! use pinion_resolver::{Dependency, InMemoryCatalog, Project, ProjectVersion, Resolver};
//! use pinion_version::Version;
//!
//! let mut tools = Project::new("tools");
//! tools.add_version(ProjectVersion::new(Version::parse_semantic("1.0.0")?));
//!
//! let mut catalog = InMemoryCatalog::new();
//! catalog.add(tools);
//!
//! let resolver = Resolver::new(&catalog);
//! let resolution = resolver.resolve(&[Dependency::new("tools")])?;
//! assert_eq!(resolution[0].to_string(), "tools=1.0.0");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
pub mod ident;
pub mod resolver;
pub mod sat;
pub mod walker;

pub use catalog::{Catalog, CatalogError, Dependency, InMemoryCatalog, Project, ProjectVersion};
pub use ident::{OriginConstraint, ProjectIdent, ROOT_PROJECT};
pub use resolver::{ResolveError, Resolver};
