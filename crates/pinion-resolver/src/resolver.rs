//! The resolver façade and the prefer-latest search.
//!
//! A [`Resolver`] records one resolution run: discovery, encoding and the
//! solver live for the duration of that run and are dropped with it; only
//! the outcome and the constraint audit are retained. For a fresh
//! resolution, construct a fresh resolver.

use std::collections::HashSet;
use std::sync::OnceLock;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, trace};
use varisat::lit::Lit;
use varisat::solver::Solver;

use crate::catalog::{Catalog, CatalogError, Dependency};
use crate::ident::{OriginConstraint, ProjectIdent};
use crate::sat::{encode, Encoding};
use crate::walker::Walker;

/// Error produced by a resolution run.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// A dependency names a project the catalog does not know.
    #[error("unknown dependency {name:?}")]
    UnknownDependency { name: String },

    /// Every version of `name` conflicts with the selections committed
    /// before it.
    #[error("no version of {name:?} satisfies the collected constraints")]
    Unsatisfiable { name: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The SAT backend failed. Not reachable with the in-process solver.
    #[error("solver failure: {0}")]
    Solver(String),
}

/// Outcome of the single run a resolver performs.
#[derive(Debug)]
struct RunRecord {
    outcome: Result<Vec<ProjectIdent>, ResolveError>,
    constraints: IndexMap<String, Vec<OriginConstraint>>,
}

/// Records a resolver run over a catalog.
///
/// The run executes at most once per instance: concurrent callers race to
/// start it, exactly one does the work, and every caller observes the same
/// outcome. The root dependency list of the first call is the one that
/// binds.
pub struct Resolver<C> {
    catalog: C,
    run: OnceLock<RunRecord>,
}

impl<C: Catalog> Resolver<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            run: OnceLock::new(),
        }
    }

    /// Resolve the root dependency list to one version per involved
    /// project, preferring the newest feasible version of each project in
    /// discovery order.
    pub fn resolve(
        &self,
        root_dependencies: &[Dependency],
    ) -> Result<Vec<ProjectIdent>, ResolveError> {
        self.run
            .get_or_init(|| self.execute(root_dependencies))
            .outcome
            .clone()
    }

    /// Constraints recorded against `name` during discovery.
    ///
    /// Empty when the project is not involved or no run has happened yet.
    /// Available even when the run failed after the discovery phase.
    pub fn constraints_for(&self, name: &str) -> &[OriginConstraint] {
        self.run
            .get()
            .and_then(|record| record.constraints.get(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn execute(&self, root_dependencies: &[Dependency]) -> RunRecord {
        let mut walker = Walker::new(&self.catalog);
        let walked = walker.walk(root_dependencies);
        let discovery = walker.into_discovery();
        debug!("Discovered {} involved projects", discovery.projects.len());

        let outcome = walked.and_then(|()| {
            let mut solver = Solver::new();
            let encoding = encode(&discovery, &mut solver);
            search(&mut solver, &encoding)
        });
        RunRecord {
            outcome,
            constraints: discovery.constraints,
        }
    }
}

/// Commit projects in discovery order, each to its newest version that
/// still admits a model together with the commitments made before it.
fn search(solver: &mut Solver, encoding: &Encoding) -> Result<Vec<ProjectIdent>, ResolveError> {
    if encoding.is_empty() {
        return Ok(Vec::new());
    }

    let mut assumptions: Vec<Lit> = Vec::with_capacity(encoding.candidates.len());
    for (name, candidates) in &encoding.candidates {
        let mut committed = false;
        for candidate in candidates {
            trace!("Trying {}", candidate.ident);
            assumptions.push(candidate.lit);
            solver.assume(&assumptions);
            if solve(solver)? {
                debug!("Committed {}", candidate.ident);
                committed = true;
                break;
            }
            assumptions.pop();
        }
        if !committed {
            return Err(ResolveError::Unsatisfiable { name: name.clone() });
        }
    }

    // One final solve under all commitments, reading the model back.
    solver.assume(&assumptions);
    if !solve(solver)? {
        return Err(ResolveError::Solver(
            "committed selections lost satisfiability on readback".to_string(),
        ));
    }
    let Some(model) = solver.model() else {
        return Err(ResolveError::Solver(
            "no model available after successful solve".to_string(),
        ));
    };
    let model: HashSet<Lit> = model.into_iter().collect();

    let mut resolved = Vec::with_capacity(encoding.candidates.len());
    for candidates in encoding.candidates.values() {
        for candidate in candidates {
            if model.contains(&candidate.lit) {
                resolved.push(candidate.ident.clone());
            }
        }
    }
    // the model must agree with the commitments: one ident per project
    debug_assert!(assumptions.iter().all(|lit| model.contains(lit)));
    debug_assert_eq!(resolved.len(), encoding.candidates.len());
    Ok(resolved)
}

fn solve(solver: &mut Solver) -> Result<bool, ResolveError> {
    solver
        .solve()
        .map_err(|err| ResolveError::Solver(err.to_string()))
}
