//! Finite poset engine: cover (Hasse) digraph, reachability, extrema.
//!
//! A [`FinitePoset`] is an immutable pair of an interned element set and the
//! transitively-reduced cover relation, stored as a `petgraph` digraph with
//! edges pointing from lower to upper element. All comparability queries walk
//! this graph; because the cover relation is the exact transitive reduction of
//! the order's closure, reachability through covers equals reachability
//! through the original relation.

pub mod factories;
pub mod relation;

use std::collections::{BinaryHeap, HashMap, VecDeque};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::element::Element;

pub use relation::{OrderResult, RelationStore};

/// An immutable finite partially ordered set.
///
/// Constructed once, from either a generating relation (closure computed and
/// validated at construction) or a trusted cover relation; no element can be
/// added or removed afterwards. Cloning is deep and cheap for the finite
/// element counts this engine targets.
#[derive(Debug, Clone)]
pub struct FinitePoset<E: Element> {
    store: RelationStore<E>,
    /// Cover digraph; node weight is the element's enumeration index,
    /// edge `a → b` means `a` is covered by `b`.
    graph: DiGraph<usize, ()>,
    /// Enumeration index → node index.
    nodes: Vec<NodeIndex>,
}

impl<E: Element> FinitePoset<E> {
    /// Build a poset from a generating relation.
    ///
    /// The reflexive-transitive closure is computed by fixpoint iteration and
    /// checked for antisymmetry; the stored cover relation is its transitive
    /// reduction. Pairs are `(lower, upper)`; reflexive pairs are implied and
    /// may be included or omitted freely.
    pub fn from_relation(
        elements: impl IntoIterator<Item = E>,
        pairs: impl IntoIterator<Item = (E, E)>,
    ) -> OrderResult<Self> {
        let store = RelationStore::new(elements);
        let pairs: Vec<(E, E)> = pairs.into_iter().collect();
        let closure = store.transitive_closure(&pairs)?;
        let covers = store.covers_from_closure(&closure);
        Ok(Self::from_cover_indices(store, &covers))
    }

    /// Build a poset directly from cover pairs `(lower, upper)`.
    ///
    /// The input is trusted to be the transitive reduction of a strict partial
    /// order and is not re-validated beyond element membership; behavior on a
    /// cyclic cover set is undefined.
    pub fn from_covers(
        elements: impl IntoIterator<Item = E>,
        covers: impl IntoIterator<Item = (E, E)>,
    ) -> OrderResult<Self> {
        let store = RelationStore::new(elements);
        let mut cover_indices = Vec::new();
        for (lo, hi) in covers {
            cover_indices.push((store.index_of(&lo)?, store.index_of(&hi)?));
        }
        Ok(Self::from_cover_indices(store, &cover_indices))
    }

    /// Build a poset from a tagged lazy element source.
    ///
    /// Fails fast on an infinite-tagged source; exact order algorithms are
    /// finite-only.
    pub fn from_stream<I: Iterator<Item = E>>(
        stream: crate::element::ElementStream<E, I>,
        pairs: impl IntoIterator<Item = (E, E)>,
    ) -> OrderResult<Self> {
        let elements = stream.materialize()?;
        Self::from_relation(elements, pairs)
    }

    fn from_cover_indices(store: RelationStore<E>, covers: &[(usize, usize)]) -> Self {
        let mut graph = DiGraph::with_capacity(store.len(), covers.len());
        let nodes: Vec<NodeIndex> = (0..store.len()).map(|i| graph.add_node(i)).collect();
        for &(lo, hi) in covers {
            graph.add_edge(nodes[lo], nodes[hi], ());
        }
        debug!(
            elements = store.len(),
            covers = covers.len(),
            "poset constructed"
        );
        Self {
            store,
            graph,
            nodes,
        }
    }

    /// The fixed enumeration order used for all matrix-indexed operations.
    ///
    /// Stable across calls on the same instance.
    pub fn elements(&self) -> &[E] {
        self.store.elements()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True when the poset has no elements.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Membership test.
    pub fn contains(&self, element: &E) -> bool {
        self.store.contains(element)
    }

    pub(crate) fn index_of(&self, element: &E) -> OrderResult<usize> {
        self.store.index_of(element)
    }

    pub(crate) fn element_at(&self, idx: usize) -> &E {
        self.store.element_at(idx)
    }

    /// Index-level `≤`: BFS upward from `i` over cover edges until `j` is
    /// reached or the frontier is exhausted.
    pub(crate) fn le_idx(&self, i: usize, j: usize) -> bool {
        if i == j {
            return true;
        }
        let target = self.nodes[j];
        let mut bfs = petgraph::visit::Bfs::new(&self.graph, self.nodes[i]);
        while let Some(node) = bfs.next(&self.graph) {
            if node == target {
                return true;
            }
        }
        false
    }

    /// True iff `x ≤ y`.
    pub fn le(&self, x: &E, y: &E) -> OrderResult<bool> {
        Ok(self.le_idx(self.index_of(x)?, self.index_of(y)?))
    }

    /// True iff `x < y`.
    pub fn lt(&self, x: &E, y: &E) -> OrderResult<bool> {
        let (i, j) = (self.index_of(x)?, self.index_of(y)?);
        Ok(i != j && self.le_idx(i, j))
    }

    /// True iff `x ≥ y`.
    pub fn ge(&self, x: &E, y: &E) -> OrderResult<bool> {
        self.le(y, x)
    }

    /// True iff `x > y`.
    pub fn gt(&self, x: &E, y: &E) -> OrderResult<bool> {
        self.lt(y, x)
    }

    /// True iff `x ≤ y` or `y ≤ x`.
    pub fn is_comparable(&self, x: &E, y: &E) -> OrderResult<bool> {
        let (i, j) = (self.index_of(x)?, self.index_of(y)?);
        Ok(self.le_idx(i, j) || self.le_idx(j, i))
    }

    /// True iff `x` covers `y`: `y < x` with no element strictly between.
    ///
    /// With the cover graph being the exact transitive reduction, this is a
    /// single edge lookup.
    pub fn covers(&self, x: &E, y: &E) -> OrderResult<bool> {
        let (i, j) = (self.index_of(x)?, self.index_of(y)?);
        Ok(self.graph.find_edge(self.nodes[j], self.nodes[i]).is_some())
    }

    fn cover_neighbors(&self, idx: usize, direction: Direction) -> Vec<usize> {
        let mut neighbors: Vec<usize> = self
            .graph
            .neighbors_directed(self.nodes[idx], direction)
            .map(|n| self.graph[n])
            .collect();
        neighbors.sort_unstable();
        neighbors
    }

    /// Immediate successors of `x` in the Hasse diagram, in enumeration order.
    pub fn upper_covers(&self, x: &E) -> OrderResult<Vec<E>> {
        let idx = self.index_of(x)?;
        Ok(self
            .cover_neighbors(idx, Direction::Outgoing)
            .into_iter()
            .map(|i| self.element_at(i).clone())
            .collect())
    }

    /// Immediate predecessors of `x` in the Hasse diagram, in enumeration order.
    pub fn lower_covers(&self, x: &E) -> OrderResult<Vec<E>> {
        let idx = self.index_of(x)?;
        Ok(self
            .cover_neighbors(idx, Direction::Incoming)
            .into_iter()
            .map(|i| self.element_at(i).clone())
            .collect())
    }

    /// Elements with no strictly smaller element.
    pub fn minimal_elements(&self) -> Vec<E> {
        self.extrema(Direction::Incoming)
    }

    /// Elements with no strictly greater element.
    pub fn maximal_elements(&self) -> Vec<E> {
        self.extrema(Direction::Outgoing)
    }

    fn extrema(&self, direction: Direction) -> Vec<E> {
        (0..self.len())
            .filter(|&i| {
                self.graph
                    .neighbors_directed(self.nodes[i], direction)
                    .next()
                    .is_none()
            })
            .map(|i| self.element_at(i).clone())
            .collect()
    }

    /// All indices `j` with `element_at(i) ≤ element_at(j)`, including `i`.
    pub(crate) fn up_set_idx(&self, i: usize) -> Vec<usize> {
        let mut reached = Vec::new();
        let mut bfs = petgraph::visit::Bfs::new(&self.graph, self.nodes[i]);
        while let Some(node) = bfs.next(&self.graph) {
            reached.push(self.graph[node]);
        }
        reached
    }

    /// The cover relation as `(lower, upper)` element pairs.
    ///
    /// Together with [`elements`](Self::elements) this is the full adapter
    /// surface: an equivalent poset can be reconstructed from the two alone.
    pub fn cover_relation_pairs(&self) -> Vec<(E, E)> {
        let mut pairs: Vec<(usize, usize)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| (self.graph[a], self.graph[b]))
            .collect();
        pairs.sort_unstable();
        pairs
            .into_iter()
            .map(|(a, b)| (self.element_at(a).clone(), self.element_at(b).clone()))
            .collect()
    }

    /// The full order relation (reflexive-transitive closure) as `(x, y)`
    /// pairs with `x ≤ y`, in enumeration order of `x` then `y`.
    pub fn relation_pairs(&self) -> Vec<(E, E)> {
        let mut pairs = Vec::new();
        for i in 0..self.len() {
            let mut ups = self.up_set_idx(i);
            ups.sort_unstable();
            for j in ups {
                pairs.push((self.element_at(i).clone(), self.element_at(j).clone()));
            }
        }
        pairs
    }

    /// A linear extension of the order: Kahn's algorithm over the cover
    /// digraph with ready-queue ties broken by enumeration order, so the
    /// result is fully determined by `elements()`.
    pub fn linear_extension(&self) -> Vec<E> {
        let n = self.len();
        let mut in_degree: Vec<usize> = (0..n)
            .map(|i| {
                self.graph
                    .neighbors_directed(self.nodes[i], Direction::Incoming)
                    .count()
            })
            .collect();
        let mut ready: BinaryHeap<std::cmp::Reverse<usize>> = (0..n)
            .filter(|&i| in_degree[i] == 0)
            .map(std::cmp::Reverse)
            .collect();
        let mut order = Vec::with_capacity(n);
        while let Some(std::cmp::Reverse(i)) = ready.pop() {
            order.push(self.element_at(i).clone());
            for j in self.cover_neighbors(i, Direction::Outgoing) {
                in_degree[j] -= 1;
                if in_degree[j] == 0 {
                    ready.push(std::cmp::Reverse(j));
                }
            }
        }
        order
    }

    /// The dual poset: same elements, every cover edge reversed.
    pub fn dual(&self) -> Self {
        let covers: Vec<(usize, usize)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| (self.graph[b], self.graph[a]))
            .collect();
        Self::from_cover_indices(self.store.clone(), &covers)
    }

    /// Breadth-first distance in cover steps from `x` up to `y`, or `None`
    /// when `x ≰ y`.
    pub fn cover_distance(&self, x: &E, y: &E) -> OrderResult<Option<usize>> {
        let (i, j) = (self.index_of(x)?, self.index_of(y)?);
        if i == j {
            return Ok(Some(0));
        }
        let target = self.nodes[j];
        let mut depth: HashMap<NodeIndex, usize> = HashMap::new();
        let mut queue = VecDeque::new();
        depth.insert(self.nodes[i], 0);
        queue.push_back(self.nodes[i]);
        while let Some(node) = queue.pop_front() {
            let d = depth[&node];
            for next in self.graph.neighbors_directed(node, Direction::Outgoing) {
                if next == target {
                    return Ok(Some(d + 1));
                }
                if !depth.contains_key(&next) {
                    depth.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        Ok(None)
    }
}
