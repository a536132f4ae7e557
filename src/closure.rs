//! Closure/kernel framework: a generic fixpoint driver over subsets.
//!
//! A [`ClosureOperator`] pairs a one-step expansion rule with the axioms it
//! claims (extensive, intensive, idempotent, monotone) and a mandatory pass
//! cap. The driver unions the rule's output into the running set until a full
//! pass adds nothing new; reaching the cap without convergence is reported as
//! [`ClosureError::Divergence`], never silently truncated. The cap exists
//! because closures over generator sets (composition of a function set, for
//! one) can grow without bound on malformed input.
//!
//! Provided operators: order-ideal and order-filter closure over any poset,
//! composition closure of endomorphism sets, Moore pairwise-intersection
//! closure of subset families, and the polar closures induced by a binary
//! relation between two domains.

use std::collections::{BTreeSet, HashSet};

use tracing::trace;

use crate::element::{Element, render};
use crate::error::ClosureError;
use crate::order::FinitePoset;

/// Result type for closure operations.
pub type ClosureResult<T> = std::result::Result<T, ClosureError>;

/// Default pass cap for the fixpoint driver.
///
/// Generous for any closure over a materialized finite universe; generator
/// closures that legitimately need more must opt in via
/// [`ClosureOperator::with_cap`].
pub const DEFAULT_PASS_CAP: usize = 256;

/// Which of the operator axioms a rule claims to satisfy.
///
/// Metadata only: the framework never re-derives these, but the law-check
/// helpers let tests confirm them on concrete seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosureAxioms {
    /// `S ⊆ cl(S)`.
    pub extensive: bool,
    /// `cl(S) ⊆ S`.
    pub intensive: bool,
    /// `cl(cl(S)) = cl(S)`.
    pub idempotent: bool,
    /// `S ⊆ T ⇒ cl(S) ⊆ cl(T)`.
    pub monotone: bool,
}

impl ClosureAxioms {
    /// The Moore-closure contract: extensive, idempotent, monotone.
    pub fn closure() -> Self {
        Self {
            extensive: true,
            intensive: false,
            idempotent: true,
            monotone: true,
        }
    }

    /// The kernel (interior) contract: intensive, idempotent, monotone.
    pub fn kernel() -> Self {
        Self {
            extensive: false,
            intensive: true,
            idempotent: true,
            monotone: true,
        }
    }
}

type StepRule<T> = Box<dyn Fn(&HashSet<T>) -> ClosureResult<HashSet<T>> + Send + Sync>;

/// A named subset operator with declared axioms and a capped fixpoint driver.
pub struct ClosureOperator<T: Element> {
    name: String,
    axioms: ClosureAxioms,
    cap: usize,
    step: StepRule<T>,
}

impl<T: Element> ClosureOperator<T> {
    /// Wrap a one-step expansion rule.
    ///
    /// The rule returns the elements a single pass should add (returning
    /// already-present elements is harmless); the driver does the unioning
    /// and the convergence detection.
    pub fn new(
        name: impl Into<String>,
        axioms: ClosureAxioms,
        step: impl Fn(&HashSet<T>) -> ClosureResult<HashSet<T>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            axioms,
            cap: DEFAULT_PASS_CAP,
            step: Box::new(step),
        }
    }

    /// Override the pass cap. A cap always exists; zero is clamped to one.
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap.max(1);
        self
    }

    /// Operator name, used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The axioms this operator declares.
    pub fn axioms(&self) -> ClosureAxioms {
        self.axioms
    }

    /// The active pass cap.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Run the fixpoint: union one-step expansions into the seed until a pass
    /// produces no new elements, or fail with
    /// [`ClosureError::Divergence`] at the cap.
    pub fn apply(&self, seed: &HashSet<T>) -> ClosureResult<HashSet<T>> {
        let mut current = seed.clone();
        for pass in 1..=self.cap {
            let expansion = (self.step)(&current)?;
            let before = current.len();
            current.extend(expansion);
            trace!(
                operator = %self.name,
                pass,
                size = current.len(),
                "closure pass"
            );
            if current.len() == before {
                return Ok(current);
            }
        }
        Err(ClosureError::Divergence {
            operator: self.name.clone(),
            passes: self.cap,
        })
    }

    /// Law check: `seed ⊆ cl(seed)`.
    pub fn is_extensive_on(&self, seed: &HashSet<T>) -> ClosureResult<bool> {
        let closed = self.apply(seed)?;
        Ok(seed.is_subset(&closed))
    }

    /// Law check: `cl(cl(seed)) == cl(seed)`.
    pub fn is_idempotent_on(&self, seed: &HashSet<T>) -> ClosureResult<bool> {
        let once = self.apply(seed)?;
        let twice = self.apply(&once)?;
        Ok(once == twice)
    }

    /// Law check: `small ⊆ large ⇒ cl(small) ⊆ cl(large)`.
    ///
    /// Vacuously true when `small` is not a subset of `large`.
    pub fn is_monotone_on(&self, small: &HashSet<T>, large: &HashSet<T>) -> ClosureResult<bool> {
        if !small.is_subset(large) {
            return Ok(true);
        }
        let cl_small = self.apply(small)?;
        let cl_large = self.apply(large)?;
        Ok(cl_small.is_subset(&cl_large))
    }
}

/// A named subset operator for the dual contract: intensive, idempotent,
/// monotone. The driver re-applies the rule to its own output (kernels shrink,
/// so unioning would be wrong) until a pass changes nothing, under the same
/// mandatory cap as [`ClosureOperator`].
pub struct KernelOperator<T: Element> {
    name: String,
    axioms: ClosureAxioms,
    cap: usize,
    step: StepRule<T>,
}

impl<T: Element> KernelOperator<T> {
    /// Wrap a one-step contraction rule returning the elements to keep.
    pub fn new(
        name: impl Into<String>,
        axioms: ClosureAxioms,
        step: impl Fn(&HashSet<T>) -> ClosureResult<HashSet<T>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            axioms,
            cap: DEFAULT_PASS_CAP,
            step: Box::new(step),
        }
    }

    /// Override the pass cap. A cap always exists; zero is clamped to one.
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap.max(1);
        self
    }

    /// Operator name, used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The axioms this operator declares.
    pub fn axioms(&self) -> ClosureAxioms {
        self.axioms
    }

    /// Run the fixpoint: re-apply the rule until its output stabilizes, or
    /// fail with [`ClosureError::Divergence`] at the cap.
    pub fn apply(&self, seed: &HashSet<T>) -> ClosureResult<HashSet<T>> {
        let mut current = seed.clone();
        for pass in 1..=self.cap {
            let next = (self.step)(&current)?;
            trace!(
                operator = %self.name,
                pass,
                size = next.len(),
                "kernel pass"
            );
            if next == current {
                return Ok(next);
            }
            current = next;
        }
        Err(ClosureError::Divergence {
            operator: self.name.clone(),
            passes: self.cap,
        })
    }

    /// Law check: `k(seed) ⊆ seed`.
    pub fn is_intensive_on(&self, seed: &HashSet<T>) -> ClosureResult<bool> {
        let kernel = self.apply(seed)?;
        Ok(kernel.is_subset(seed))
    }

    /// Law check: `k(k(seed)) == k(seed)`.
    pub fn is_idempotent_on(&self, seed: &HashSet<T>) -> ClosureResult<bool> {
        let once = self.apply(seed)?;
        let twice = self.apply(&once)?;
        Ok(once == twice)
    }

    /// Law check: `small ⊆ large ⇒ k(small) ⊆ k(large)`.
    ///
    /// Vacuously true when `small` is not a subset of `large`.
    pub fn is_monotone_on(&self, small: &HashSet<T>, large: &HashSet<T>) -> ClosureResult<bool> {
        if !small.is_subset(large) {
            return Ok(true);
        }
        let k_small = self.apply(small)?;
        let k_large = self.apply(large)?;
        Ok(k_small.is_subset(&k_large))
    }
}

// ---------------------------------------------------------------------------
// Order-ideal / order-filter closure
// ---------------------------------------------------------------------------

/// Downward closure under a poset's order: one pass adds every `z ≤ x` for
/// each seed member `x`.
pub fn order_ideal<E: Element + 'static>(poset: FinitePoset<E>) -> ClosureOperator<E> {
    order_closure("order-ideal", poset, true)
}

/// Upward closure under a poset's order: one pass adds every `z ≥ x`.
pub fn order_filter<E: Element + 'static>(poset: FinitePoset<E>) -> ClosureOperator<E> {
    order_closure("order-filter", poset, false)
}

fn order_closure<E: Element + 'static>(
    name: &str,
    poset: FinitePoset<E>,
    downward: bool,
) -> ClosureOperator<E> {
    ClosureOperator::new(name, ClosureAxioms::closure(), move |seed: &HashSet<E>| {
        let mut added = HashSet::new();
        for x in seed {
            let xi = poset
                .index_of(x)
                .map_err(|_| ClosureError::UnknownElement { element: render(x) })?;
            for (zi, z) in poset.elements().iter().enumerate() {
                let related = if downward {
                    poset.le_idx(zi, xi)
                } else {
                    poset.le_idx(xi, zi)
                };
                if related && !seed.contains(z) {
                    added.insert(z.clone());
                }
            }
        }
        Ok(added)
    })
}

// ---------------------------------------------------------------------------
// Composition closure
// ---------------------------------------------------------------------------

/// A total endomorphism of `{0, …, n-1}` as an explicit mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndoMap {
    table: Vec<usize>,
}

impl EndoMap {
    /// Build from a mapping table. Returns `None` when any entry falls
    /// outside the domain.
    pub fn from_table(table: Vec<usize>) -> Option<Self> {
        let n = table.len();
        table.iter().all(|&v| v < n).then_some(Self { table })
    }

    /// The identity endomorphism on `n` points.
    pub fn identity(n: usize) -> Self {
        Self {
            table: (0..n).collect(),
        }
    }

    /// Domain size.
    pub fn degree(&self) -> usize {
        self.table.len()
    }

    /// Image of a point.
    pub fn apply(&self, i: usize) -> usize {
        self.table[i]
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    ///
    /// Degrees must match; composition across domains is meaningless here.
    pub fn compose(&self, other: &Self) -> Option<Self> {
        (self.degree() == other.degree()).then(|| Self {
            table: other.table.iter().map(|&i| self.table[i]).collect(),
        })
    }
}

/// Closure of an endomorphism set under pairwise composition.
///
/// Pairs of mismatched degree are skipped; the cap matters here more than
/// anywhere else, since a generator set over a large domain can grow its
/// monoid past any practical bound.
pub fn composition_closure() -> ClosureOperator<EndoMap> {
    ClosureOperator::new(
        "composition",
        ClosureAxioms::closure(),
        |seed: &HashSet<EndoMap>| {
            let mut added = HashSet::new();
            for f in seed {
                for g in seed {
                    if let Some(h) = f.compose(g) {
                        if !seed.contains(&h) {
                            added.insert(h);
                        }
                    }
                }
            }
            Ok(added)
        },
    )
}

// ---------------------------------------------------------------------------
// Moore intersection closure
// ---------------------------------------------------------------------------

/// Closure of a family of subsets under pairwise intersection.
///
/// Subsets are index sets over some fixed universe enumeration; `BTreeSet`
/// keeps them hashable members of the family.
pub fn moore_intersection_closure() -> ClosureOperator<BTreeSet<usize>> {
    ClosureOperator::new(
        "moore-intersection",
        ClosureAxioms::closure(),
        |seed: &HashSet<BTreeSet<usize>>| {
            let mut added = HashSet::new();
            for a in seed {
                for b in seed {
                    let meet: BTreeSet<usize> = a.intersection(b).copied().collect();
                    if !seed.contains(&meet) {
                        added.insert(meet);
                    }
                }
            }
            Ok(added)
        },
    )
}

// ---------------------------------------------------------------------------
// Polar (Galois) closure from a binary relation
// ---------------------------------------------------------------------------

/// A binary relation between two finite domains, with its polar maps.
///
/// The polars form a Galois connection between the two powersets; composing
/// them yields the closed sets of the relation without needing explicit
/// adjoint maps.
#[derive(Debug, Clone)]
pub struct BinaryRelation<A: Element, B: Element> {
    lefts: Vec<A>,
    rights: Vec<B>,
    pairs: HashSet<(A, B)>,
}

impl<A: Element + 'static, B: Element + 'static> BinaryRelation<A, B> {
    /// Build a relation over the two domains. Pairs mentioning values outside
    /// either domain are dropped.
    pub fn new(
        lefts: impl IntoIterator<Item = A>,
        rights: impl IntoIterator<Item = B>,
        pairs: impl IntoIterator<Item = (A, B)>,
    ) -> Self {
        let lefts: Vec<A> = lefts.into_iter().collect();
        let rights: Vec<B> = rights.into_iter().collect();
        let pairs = pairs
            .into_iter()
            .filter(|(a, b)| lefts.contains(a) && rights.contains(b))
            .collect();
        Self {
            lefts,
            rights,
            pairs,
        }
    }

    /// True iff `a` relates to `b`.
    pub fn relates(&self, a: &A, b: &B) -> bool {
        self.pairs.contains(&(a.clone(), b.clone()))
    }

    /// Right polar: `{b : ∀a ∈ s, a R b}`. The polar of the empty set is the
    /// whole right domain.
    pub fn polar_right(&self, s: &HashSet<A>) -> HashSet<B> {
        let mut polar = HashSet::new();
        for b in &self.rights {
            if s.iter().all(|a| self.relates(a, b)) {
                polar.insert(b.clone());
            }
        }
        polar
    }

    /// Left polar: `{a : ∀b ∈ t, a R b}`.
    pub fn polar_left(&self, t: &HashSet<B>) -> HashSet<A> {
        let mut polar = HashSet::new();
        for a in &self.lefts {
            if t.iter().all(|b| self.relates(a, b)) {
                polar.insert(a.clone());
            }
        }
        polar
    }

    /// The induced closure on left subsets: `S ↦ polar_left(polar_right(S))`.
    ///
    /// One application is already closed; the driver's convergence pass
    /// simply confirms it.
    pub fn galois_closure_left(self) -> ClosureOperator<A> {
        ClosureOperator::new(
            "galois-polar-left",
            ClosureAxioms::closure(),
            move |seed: &HashSet<A>| Ok(self.polar_left(&self.polar_right(seed))),
        )
    }

    /// The induced closure on right subsets: `T ↦ polar_right(polar_left(T))`.
    pub fn galois_closure_right(self) -> ClosureOperator<B> {
        ClosureOperator::new(
            "galois-polar-right",
            ClosureAxioms::closure(),
            move |seed: &HashSet<B>| Ok(self.polar_right(&self.polar_left(seed))),
        )
    }
}
