//! CNF encoding of a discovered dependency tree.
//!
//! Every (project, version) candidate gets one positive literal, allocated
//! in discovery order. Three clause families are emitted:
//!
//! 1. per project, at least one of its version literals holds;
//! 2. per project, at most one holds (pairwise exclusions);
//! 3. per recorded constraint, every subject version failing it is
//!    forbidden: unconditionally when the origin is the root, otherwise
//!    only while the origin's own literal holds.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;
use varisat::lit::Lit;
use varisat::solver::Solver;
use varisat::ExtendFormula;

use pinion_version::Version;

use crate::ident::ProjectIdent;
use crate::walker::Discovery;

/// One selectable (project, version) candidate and its solver literal.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub ident: ProjectIdent,
    pub version: Version,
    pub lit: Lit,
}

/// Literal tables retained for the search and for model decoding.
#[derive(Debug, Default)]
pub struct Encoding {
    /// Candidates per project: discovery order outer, newest-first inner.
    pub candidates: IndexMap<String, Vec<Candidate>>,
}

impl Encoding {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Total number of candidate literals.
    pub fn literal_count(&self) -> usize {
        self.candidates.values().map(Vec::len).sum()
    }
}

/// Emit the clauses for `discovery` into `solver` and return the tables.
pub fn encode(discovery: &Discovery, solver: &mut Solver) -> Encoding {
    let mut candidates: IndexMap<String, Vec<Candidate>> = IndexMap::new();
    let mut literals: HashMap<ProjectIdent, Lit> = HashMap::new();

    for project in &discovery.projects {
        let mut releases = Vec::with_capacity(project.versions.len());
        for release in &project.versions {
            let lit = solver.new_lit();
            let ident = ProjectIdent::new(project.name.clone(), release.version.to_string());
            literals.insert(ident.clone(), lit);
            releases.push(Candidate {
                ident,
                version: release.version.clone(),
                lit,
            });
        }

        // every involved project must select some version
        let any_version: Vec<Lit> = releases.iter().map(|c| c.lit).collect();
        solver.add_clause(&any_version);

        // and never more than one
        for (index, candidate) in releases.iter().enumerate() {
            for other in &releases[index + 1..] {
                solver.add_clause(&[!candidate.lit, !other.lit]);
            }
        }

        candidates.insert(project.name.clone(), releases);
    }

    for (subject, audits) in &discovery.constraints {
        let Some(subject_candidates) = candidates.get(subject) else {
            continue;
        };
        for audit in audits {
            let origin_lit = if audit.origin.is_root() {
                None
            } else {
                Some(
                    *literals
                        .get(&audit.origin)
                        .expect("constraint origin recorded by the walker has a literal"),
                )
            };
            for candidate in subject_candidates {
                if audit.constraints.matches(&candidate.version) {
                    continue;
                }
                match origin_lit {
                    // requirement from the root is unconditional
                    None => solver.add_clause(&[!candidate.lit]),
                    // origin selected => this version is forbidden
                    Some(origin) => solver.add_clause(&[!origin, !candidate.lit]),
                }
            }
        }
    }

    debug!(
        "Encoded {} literals across {} projects",
        literals.len(),
        discovery.projects.len()
    );
    Encoding { candidates }
}
