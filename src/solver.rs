//! C9: the orchestrator. Owns the staged (raw, not-yet-normalized)
//! statements per variable pair, the per-pair containers materialized for a
//! single `solve` call, and the dependency graph tying them together.

use log::{debug, info};
use rustc_hash::FxHashMap;
use std::collections::HashSet;

use crate::containers::dynamic_list::DynamicList;
use crate::containers::overlap_map::OverlapMap;
use crate::containers::static_list::StaticList;
use crate::containers::Container;
use crate::error::InfluenceError;
use crate::graph::DependencyGraph;
use crate::quality::Quality;
use crate::rules;
use crate::statement::Statement;

type Pair = (String, String);

#[derive(Default)]
pub struct Solver {
    staged: FxHashMap<Pair, Vec<Statement>>,
    containers: FxHashMap<Pair, Container>,
    graph: DependencyGraph,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage one statement `influencing -[quality]-> influenced` over
    /// `x`/`y`, and record the `influencing -> influenced` dependency edge.
    /// Rejects the edge (and the statement) if it would close a cycle.
    pub fn add(
        &mut self,
        influencing: &str,
        x: (f64, f64),
        quality: Quality,
        y: (f64, f64),
        influenced: &str,
    ) -> Result<(), InfluenceError> {
        self.graph.add(influencing, influenced, true)?;
        let statement = Statement::try_new(x.0, x.1, quality, y.0, y.1)?;
        self.staged
            .entry((influencing.to_string(), influenced.to_string()))
            .or_default()
            .push(statement);
        Ok(())
    }

    pub fn add_many<I>(&mut self, statements: I) -> Result<(), InfluenceError>
    where
        I: IntoIterator<Item = (String, (f64, f64), Quality, (f64, f64), String)>,
    {
        for (influencing, x, quality, y, influenced) in statements {
            self.add(&influencing, x, quality, y, &influenced)?;
        }
        Ok(())
    }

    /// Drop exactly one staged occurrence matching the given statement.
    /// Errors if the pair was never staged or the statement isn't present.
    pub fn remove(
        &mut self,
        influencing: &str,
        x: (f64, f64),
        quality: Quality,
        y: (f64, f64),
        influenced: &str,
    ) -> Result<(), InfluenceError> {
        let key = (influencing.to_string(), influenced.to_string());
        let statement = Statement::try_new(x.0, x.1, quality, y.0, y.1)?;
        match self.staged.get_mut(&key) {
            Some(bucket) => match bucket.iter().position(|st| *st == statement) {
                Some(idx) => {
                    bucket.swap_remove(idx);
                    Ok(())
                }
                None => Err(InfluenceError::NotStaged {
                    influencing: influencing.to_string(),
                    influenced: influenced.to_string(),
                }),
            },
            None => Err(InfluenceError::NotStaged {
                influencing: influencing.to_string(),
                influenced: influenced.to_string(),
            }),
        }
    }

    /// Same as `remove`, but reports absence as `false` instead of an error.
    pub fn discard(
        &mut self,
        influencing: &str,
        x: (f64, f64),
        quality: Quality,
        y: (f64, f64),
        influenced: &str,
    ) -> bool {
        self.remove(influencing, x, quality, y, influenced).is_ok()
    }

    /// Does `statement` hold, given everything staged so far?
    pub fn solve(
        &mut self,
        influencing: &str,
        x: (f64, f64),
        quality: Quality,
        y: (f64, f64),
        influenced: &str,
    ) -> Result<bool, InfluenceError> {
        let hypothesis = Statement::try_new(x.0, x.1, quality, y.0, y.1)?;

        if influencing == influenced {
            return Ok(reflexive(&hypothesis));
        }

        let order = self.graph.setup(influencing, influenced);
        let mut used: HashSet<String> = order.iter().cloned().collect();
        used.insert(influencing.to_string());
        used.insert(influenced.to_string());

        let target_key = (influencing.to_string(), influenced.to_string());
        self.staged.entry(target_key.clone()).or_default();

        let keys: Vec<Pair> = self
            .staged
            .keys()
            .filter(|(a, b)| used.contains(a) && used.contains(b))
            .cloned()
            .collect();

        self.containers.clear();
        for key in &keys {
            let statements = self.staged.get(key).cloned().unwrap_or_default();
            let filtered: Vec<Statement> = if key.1 == influenced {
                statements.into_iter().filter(|st| st.overlaps_y(y.0, y.1)).collect()
            } else {
                statements
            };

            let container = if *key == target_key {
                Container::Dynamic(DynamicList::new(hypothesis, filtered))
            } else if key.1 == influenced {
                Container::Overlap(OverlapMap::from_statements(filtered))
            } else {
                Container::Static(StaticList::new(&filtered))
            };
            self.containers.insert(key.clone(), container);
        }

        let phase1 = self.solve_target(&target_key);
        if phase1 {
            info!("solve: proven in phase one, no transitive cover needed");
            return Ok(true);
        }
        if let Some(dynamic) = self.containers.get_mut(&target_key).and_then(Container::as_dynamic_mut) {
            dynamic.reset();
        }

        self.build_transitive_cover(&order, influenced);

        let phase2 = self.solve_target(&target_key);
        info!("solve: {} after building the transitive cover", phase2);
        Ok(phase2)
    }

    fn solve_target(&mut self, target: &Pair) -> bool {
        self.containers
            .get_mut(target)
            .and_then(Container::as_dynamic_mut)
            .map(DynamicList::solve)
            .unwrap_or(false)
    }

    /// Walk `order` node by node; for each predecessor `pre` of `node`,
    /// compose every normalized `StaticList[(pre, node)]` statement with
    /// `OverlapMap[(node, goal)]`'s tightest y-cover via `Transitivity`,
    /// folding the result into `OverlapMap[(pre, goal)]` (creating it on
    /// first use) and recording the new `pre -> goal` edge without a cycle
    /// check - acyclicity already holds by construction. `node` is dropped
    /// from the graph once every predecessor has been processed.
    fn build_transitive_cover(&mut self, order: &[String], goal: &str) {
        for node in order {
            let predecessors = self.graph.get_pre(node);
            for pre in &predecessors {
                self.build_transitives(pre, node, goal);
            }
            self.graph.remove_node(node);
        }
    }

    fn build_transitives(&mut self, a: &str, b: &str, c: &str) {
        let ab_key = (a.to_string(), b.to_string());
        let bc_key = (b.to_string(), c.to_string());
        let ac_key = (a.to_string(), c.to_string());

        let ab_statements: Vec<Statement> = match self.containers.get(&ab_key) {
            Some(container) => container.get_statements().to_vec(),
            None => return,
        };

        if let Some(bc) = self.containers.get_mut(&bc_key).and_then(Container::as_overlap_mut) {
            bc.initiate();
        } else {
            return;
        }

        self.containers
            .entry(ac_key.clone())
            .or_insert_with(|| Container::Overlap(OverlapMap::new()));

        for st in ab_statements {
            let slimmest = match self.containers.get(&bc_key).and_then(|container| match container {
                Container::Overlap(map) => map.slimest(st.begin_y, st.end_y),
                _ => None,
            }) {
                Some(s) => s,
                None => continue,
            };

            let rule = match rules::transitivity(&st, &slimmest) {
                Some(rule) => rule,
                None => continue,
            };

            let added = self
                .containers
                .get_mut(&ac_key)
                .map(|container| container.add(Some(rule)))
                .unwrap_or(false);
            if added {
                debug!("build_transitives: new transitive edge {} -> {}", a, c);
                let _ = self.graph.add(a, c, false);
            }
        }
    }

    /// Total number of statements across the containers built by the most
    /// recent `solve` call.
    pub fn len(&self) -> usize {
        self.containers.values().map(Container::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `A -> A` only holds under `Mono`/`Arb` and only when the hypothesis's
/// y-range is contained in its own x-range.
fn reflexive(hypothesis: &Statement) -> bool {
    if matches!(hypothesis.quality, Quality::Anti | Quality::Cons) {
        return false;
    }
    hypothesis.contains_point(hypothesis.begin_y) && hypothesis.contains_point(hypothesis.end_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::Quality::*;

    #[test]
    fn reflexive_hypothesis_holds_only_under_mono_or_arb_within_its_own_range() {
        let mut solver = Solver::new();
        assert!(solver.solve("a", (0.0, 10.0), Mono, (1.0, 9.0), "a").unwrap());
        assert!(!solver.solve("a", (0.0, 10.0), Cons, (1.0, 9.0), "a").unwrap());
        assert!(!solver.solve("a", (0.0, 10.0), Mono, (-1.0, 9.0), "a").unwrap());
    }

    #[test]
    fn direct_statement_proves_the_hypothesis() {
        let mut solver = Solver::new();
        solver.add("a", (0.0, 10.0), Cons, (1.0, 2.0), "b").unwrap();
        assert!(solver.solve("a", (2.0, 8.0), Mono, (1.0, 2.0), "b").unwrap());
    }

    #[test]
    fn missing_evidence_is_not_provable() {
        let mut solver = Solver::new();
        solver.add("a", (0.0, 10.0), Arb, (1.0, 2.0), "b").unwrap();
        assert!(!solver.solve("a", (2.0, 8.0), Mono, (1.0, 2.0), "b").unwrap());
    }

    #[test]
    fn transitive_chain_is_composed_through_an_intermediate_variable() {
        let mut solver = Solver::new();
        solver.add("a", (0.0, 10.0), Mono, (0.0, 10.0), "b").unwrap();
        solver.add("b", (0.0, 10.0), Mono, (0.0, 10.0), "c").unwrap();
        assert!(solver.solve("a", (0.0, 10.0), Mono, (0.0, 10.0), "c").unwrap());
    }

    #[test]
    fn cyclic_statements_are_rejected() {
        let mut solver = Solver::new();
        solver.add("a", (0.0, 1.0), Mono, (0.0, 1.0), "b").unwrap();
        solver.add("b", (0.0, 1.0), Mono, (0.0, 1.0), "c").unwrap();
        let err = solver.add("c", (0.0, 1.0), Mono, (0.0, 1.0), "a").unwrap_err();
        assert!(matches!(err, InfluenceError::CycleRejected { .. }));
    }

    #[test]
    fn remove_requires_a_staged_match() {
        let mut solver = Solver::new();
        let err = solver.remove("a", (0.0, 1.0), Mono, (0.0, 1.0), "b").unwrap_err();
        assert!(matches!(err, InfluenceError::NotStaged { .. }));

        solver.add("a", (0.0, 1.0), Mono, (0.0, 1.0), "b").unwrap();
        solver.remove("a", (0.0, 1.0), Mono, (0.0, 1.0), "b").unwrap();
    }

    #[test]
    fn discard_never_errors() {
        let mut solver = Solver::new();
        assert!(!solver.discard("a", (0.0, 1.0), Mono, (0.0, 1.0), "b"));
        solver.add("a", (0.0, 1.0), Mono, (0.0, 1.0), "b").unwrap();
        assert!(solver.discard("a", (0.0, 1.0), Mono, (0.0, 1.0), "b"));
    }

    /// Smoke timing: a long chain of variables, each with a dense,
    /// overlapping statement set, still solves well within a second - a
    /// stand-in for a full benchmark-suite driver, which is out of scope.
    #[test]
    fn long_chain_with_dense_overlap_solves_promptly() {
        use std::time::{Duration, Instant};

        let mut solver = Solver::new();
        let vars: Vec<String> = (0..20).map(|i| format!("v{}", i)).collect();
        for pair in vars.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            for i in 0..20 {
                let x = (i as f64 * 0.4, i as f64 * 0.4 + 1.0);
                solver.add(a, x, Mono, x, b).unwrap();
            }
        }

        let start = Instant::now();
        solver
            .solve(&vars[0], (0.0, 8.0), Mono, (0.0, 8.0), &vars[vars.len() - 1])
            .unwrap();
        assert!(
            start.elapsed() < Duration::from_secs(1),
            "solve over a 20-hop dense chain took too long"
        );
    }
}
