//! Chain walker: follow one "first" edge, then repeated "next" edges.
//!
//! ```text
//! Start ──first_rel──▶ v1 ──next_rel──▶ v2 ──next_rel──▶ … ──▶ vn   (no next_rel: done)
//! ```
//!
//! The anchor node contributes no vertex. A missing `first_rel` edge is a
//! hard failure; a missing `next_rel` edge is the normal end of the chain.
//! At each step the first outgoing edge (creation order) whose target has
//! not been visited is taken.

use hashbrown::HashSet;
use tracing::{debug, trace};

use crate::model::NodeId;
use crate::storage::GraphView;
use crate::{Error, Result};
use super::config::DEFAULT_MAX_WALK_STEPS;

/// Where the walk currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    Start,
    Walking(NodeId),
    Terminal,
}

/// Deterministic, bounded walk along a relationship chain.
pub struct ChainWalker<'g, G: GraphView + ?Sized> {
    graph: &'g G,
    first_rel: String,
    next_rel: String,
    max_steps: usize,
}

impl<'g, G: GraphView + ?Sized> ChainWalker<'g, G> {
    pub fn new(graph: &'g G, first_rel: impl Into<String>, next_rel: impl Into<String>) -> Self {
        Self {
            graph,
            first_rel: first_rel.into(),
            next_rel: next_rel.into(),
            max_steps: DEFAULT_MAX_WALK_STEPS,
        }
    }

    /// Maximum number of vertices the walk may collect before it is treated
    /// as runaway and fails with `CycleDetected`.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Walk from `start` and return the chain's vertex nodes in visit order.
    ///
    /// Errors:
    /// - `NotFound` if `start` does not exist
    /// - `BrokenChain` if `start` has no outgoing `first_rel` edge
    /// - `CycleDetected` if the only way forward revisits a node other than
    ///   the first vertex, or the chain is longer than the step bound
    ///
    /// A `next_rel` edge back to the first vertex ends the walk normally.
    pub fn walk(&self, start: NodeId) -> Result<Vec<NodeId>> {
        if self.graph.node(start).is_none() {
            return Err(Error::NotFound(format!("Node {start}")));
        }
        debug!(%start, first = %self.first_rel, next = %self.next_rel, "walking chain");

        let mut visited: HashSet<NodeId> = HashSet::new();
        visited.insert(start);
        let mut chain: Vec<NodeId> = Vec::new();
        let mut state = WalkState::Start;

        loop {
            state = match state {
                WalkState::Start => match self.step(start, &self.first_rel, &chain, &visited)? {
                    Some(first) => self.visit(first, &mut chain, &mut visited)?,
                    None => {
                        debug!(%start, rel_type = %self.first_rel, "no entry edge");
                        return Err(Error::BrokenChain {
                            node: start,
                            rel_type: self.first_rel.clone(),
                        });
                    }
                },
                WalkState::Walking(current) => match self.step(current, &self.next_rel, &chain, &visited)? {
                    Some(next) => self.visit(next, &mut chain, &mut visited)?,
                    None => WalkState::Terminal,
                },
                WalkState::Terminal => break,
            };
        }

        debug!(%start, vertices = chain.len(), "chain walk finished");
        Ok(chain)
    }

    /// Pick the edge to follow out of `from`.
    ///
    /// `Ok(None)` means there is nowhere to go: no edge of that type, or
    /// every edge leads back to the first vertex (the ring closed itself).
    fn step(
        &self,
        from: NodeId,
        rel_type: &str,
        chain: &[NodeId],
        visited: &HashSet<NodeId>,
    ) -> Result<Option<NodeId>> {
        let candidates = self.graph.outgoing(from, rel_type);
        let Some(back) = candidates.first() else {
            return Ok(None);
        };

        if let Some(rel) = candidates.iter().find(|rel| !visited.contains(&rel.dst)) {
            trace!(%from, to = %rel.dst, rel = %rel.id, "follow");
            return Ok(Some(rel.dst));
        }

        // Every candidate is already on the chain. Only a return to the
        // first vertex is a legitimate end; anything else is a loop.
        let first = chain.first().copied();
        if candidates.iter().any(|rel| Some(rel.dst) == first) {
            trace!(%from, "chain closes on its first vertex");
            Ok(None)
        } else {
            debug!(%from, to = %back.dst, "chain loops back");
            Err(Error::CycleDetected { node: back.dst, steps: chain.len() })
        }
    }

    fn visit(
        &self,
        node: NodeId,
        chain: &mut Vec<NodeId>,
        visited: &mut HashSet<NodeId>,
    ) -> Result<WalkState> {
        if chain.len() >= self.max_steps {
            debug!(%node, max_steps = self.max_steps, "walk bound exceeded");
            return Err(Error::CycleDetected { node, steps: chain.len() });
        }
        chain.push(node);
        visited.insert(node);
        Ok(WalkState::Walking(node))
    }
}
