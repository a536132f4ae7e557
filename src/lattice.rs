//! Lattice engine: memoized meets and joins over a finite poset.
//!
//! A [`FiniteLattice`] wraps an immutable [`FinitePoset`] and adds bound
//! computation with per-instance memoization. The caches are keyed by
//! unordered index pairs and written once per key; concurrent redundant
//! writes store identical values, so no exclusion beyond DashMap's per-shard
//! locking is needed and no write is ever invalidated for the life of the
//! instance.

use dashmap::DashMap;
use rayon::prelude::*;
use tracing::debug;

use crate::element::{Element, render};
use crate::error::{BoundKind, LatticeError};
use crate::order::FinitePoset;

/// Result type for lattice operations.
pub type LatticeResult<T> = std::result::Result<T, LatticeError>;

/// A finite lattice: a poset in which every pair of elements has a meet and a
/// join.
///
/// Construction via [`new`](Self::new) verifies the lattice property
/// exhaustively; [`new_unchecked`](Self::new_unchecked) defers detection to
/// the first offending query.
#[derive(Debug)]
pub struct FiniteLattice<E: Element> {
    poset: FinitePoset<E>,
    meet_cache: DashMap<(usize, usize), Option<usize>>,
    join_cache: DashMap<(usize, usize), Option<usize>>,
}

impl<E: Element> FiniteLattice<E> {
    /// Wrap a poset and verify that meet and join are defined for every pair.
    pub fn new(poset: FinitePoset<E>) -> LatticeResult<Self> {
        let lattice = Self::new_unchecked(poset);
        lattice.verify()?;
        Ok(lattice)
    }

    /// Wrap a poset without verification.
    ///
    /// Queries on pairs lacking a unique bound will fail at call time.
    pub fn new_unchecked(poset: FinitePoset<E>) -> Self {
        Self {
            poset,
            meet_cache: DashMap::new(),
            join_cache: DashMap::new(),
        }
    }

    /// The underlying poset.
    pub fn poset(&self) -> &FinitePoset<E> {
        &self.poset
    }

    /// Check that every pair has both a meet and a join.
    ///
    /// Pairs are checked in parallel; the caches absorb the results, so a
    /// verified lattice answers subsequent bound queries from memory.
    pub fn verify(&self) -> LatticeResult<()> {
        let n = self.poset.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i..n).map(move |j| (i, j)))
            .collect();
        let offence = pairs.par_iter().find_map_any(|&(i, j)| {
            for kind in [BoundKind::Meet, BoundKind::Join] {
                match self.bound_idx(i, j, kind) {
                    Err(err) => return Some(err),
                    Ok(None) => {
                        return Some(LatticeError::NotALattice {
                            x: render(self.poset.element_at(i)),
                            y: render(self.poset.element_at(j)),
                            bound: kind,
                        });
                    }
                    Ok(Some(_)) => {}
                }
            }
            None
        });
        match offence {
            Some(err) => Err(err),
            None => {
                debug!(elements = n, "lattice verified");
                Ok(())
            }
        }
    }

    /// Bound computation on indices with memoization.
    ///
    /// `Ok(None)` means no common bound exists (an explicit undefined marker,
    /// cached like any other result); a non-unique extremum among existing
    /// bounds is a [`LatticeError::NotALattice`].
    fn bound_idx(&self, i: usize, j: usize, kind: BoundKind) -> LatticeResult<Option<usize>> {
        let key = (i.min(j), i.max(j));
        let cache = match kind {
            BoundKind::Meet => &self.meet_cache,
            BoundKind::Join => &self.join_cache,
        };
        if let Some(hit) = cache.get(&key) {
            return Ok(*hit);
        }

        let n = self.poset.len();
        // Common lower bounds for meet, common upper bounds for join.
        let bounds: Vec<usize> = (0..n)
            .filter(|&z| match kind {
                BoundKind::Meet => self.poset.le_idx(z, i) && self.poset.le_idx(z, j),
                BoundKind::Join => self.poset.le_idx(i, z) && self.poset.le_idx(j, z),
            })
            .collect();

        if bounds.is_empty() {
            cache.insert(key, None);
            return Ok(None);
        }

        // The extremum must dominate every other bound; two such elements
        // would be mutually comparable and therefore equal.
        let extremum = bounds.iter().copied().find(|&m| {
            bounds.iter().all(|&z| match kind {
                BoundKind::Meet => self.poset.le_idx(z, m),
                BoundKind::Join => self.poset.le_idx(m, z),
            })
        });

        match extremum {
            Some(m) => {
                cache.insert(key, Some(m));
                Ok(Some(m))
            }
            None => Err(LatticeError::NotALattice {
                x: render(self.poset.element_at(i)),
                y: render(self.poset.element_at(j)),
                bound: kind,
            }),
        }
    }

    fn bound(&self, x: &E, y: &E, kind: BoundKind) -> LatticeResult<Option<E>> {
        let i = self.poset.index_of(x)?;
        let j = self.poset.index_of(y)?;
        Ok(self
            .bound_idx(i, j, kind)?
            .map(|m| self.poset.element_at(m).clone()))
    }

    /// Greatest lower bound of `x` and `y`.
    pub fn meet(&self, x: &E, y: &E) -> LatticeResult<Option<E>> {
        self.bound(x, y, BoundKind::Meet)
    }

    /// Least upper bound of `x` and `y`.
    pub fn join(&self, x: &E, y: &E) -> LatticeResult<Option<E>> {
        self.bound(x, y, BoundKind::Join)
    }

    /// Fold [`meet`](Self::meet) over a sequence. `Ok(None)` on empty input
    /// or whenever an intermediate meet is undefined.
    pub fn infimum<'a>(&self, elements: impl IntoIterator<Item = &'a E>) -> LatticeResult<Option<E>>
    where
        E: 'a,
    {
        self.fold_bound(elements, BoundKind::Meet)
    }

    /// Fold [`join`](Self::join) over a sequence. `Ok(None)` on empty input
    /// or whenever an intermediate join is undefined.
    pub fn supremum<'a>(&self, elements: impl IntoIterator<Item = &'a E>) -> LatticeResult<Option<E>>
    where
        E: 'a,
    {
        self.fold_bound(elements, BoundKind::Join)
    }

    fn fold_bound<'a>(
        &self,
        elements: impl IntoIterator<Item = &'a E>,
        kind: BoundKind,
    ) -> LatticeResult<Option<E>>
    where
        E: 'a,
    {
        let mut iter = elements.into_iter();
        let Some(first) = iter.next() else {
            return Ok(None);
        };
        let mut acc = first.clone();
        for next in iter {
            match self.bound(&acc, next, kind)? {
                Some(bound) => acc = bound,
                None => return Ok(None),
            }
        }
        Ok(Some(acc))
    }

    /// The unique greatest element.
    pub fn top(&self) -> LatticeResult<E> {
        self.unique_extremum(self.poset.maximal_elements(), BoundKind::Join)
    }

    /// The unique least element.
    pub fn bottom(&self) -> LatticeResult<E> {
        self.unique_extremum(self.poset.minimal_elements(), BoundKind::Meet)
    }

    fn unique_extremum(&self, candidates: Vec<E>, bound: BoundKind) -> LatticeResult<E> {
        match candidates.len() {
            1 => Ok(candidates.into_iter().next().expect("length checked")),
            _ => Err(LatticeError::NoBound { bound }),
        }
    }

    /// The complement of `x`, if one exists: a `y` with `x ∧ y = ⊥` and
    /// `x ∨ y = ⊤`.
    pub fn complement(&self, x: &E) -> LatticeResult<Option<E>> {
        self.poset.index_of(x)?;
        let top = self.top()?;
        let bottom = self.bottom()?;
        for y in self.poset.elements() {
            let meets_bottom = self.meet(x, y)?.as_ref() == Some(&bottom);
            let joins_top = self.join(x, y)?.as_ref() == Some(&top);
            if meets_bottom && joins_top {
                return Ok(Some(y.clone()));
            }
        }
        Ok(None)
    }

    /// True when every element has a complement.
    pub fn is_complemented(&self) -> LatticeResult<bool> {
        for x in self.poset.elements() {
            if self.complement(x)?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The dual lattice: order reversed, meet and join exchanged.
    ///
    /// Caches start empty; dual bounds are computed against the reversed
    /// cover graph, not translated from this instance's caches.
    pub fn dual(&self) -> Self {
        Self::new_unchecked(self.poset.dual())
    }

    /// True when this lattice's elements are a subset of `other`'s and meet
    /// and join agree with `other`'s restriction to them.
    pub fn is_sublattice_of(&self, other: &Self) -> LatticeResult<bool> {
        for x in self.poset.elements() {
            if !other.poset.contains(x) {
                return Ok(false);
            }
        }
        for x in self.poset.elements() {
            for y in self.poset.elements() {
                if self.meet(x, y)? != other.meet(x, y)? || self.join(x, y)? != other.join(x, y)? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}
