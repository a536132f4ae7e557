//! Factory constructors for the standard example posets.
//!
//! These cover the shapes the test suite and documentation lean on: total
//! orders, discrete orders, powerset/boolean lattices ordered by inclusion,
//! and divisor lattices ordered by divisibility. Each factory produces an
//! already-validated [`FinitePoset`]; wrap the lattice-shaped ones in
//! [`FiniteLattice`](crate::lattice::FiniteLattice) for meet/join.

use std::collections::BTreeSet;

use crate::element::Element;
use crate::order::FinitePoset;

/// Total order `0 < 1 < … < n-1`.
pub fn chain(n: usize) -> FinitePoset<usize> {
    let covers = (0..n.saturating_sub(1)).map(|i| (i, i + 1));
    FinitePoset::from_covers(0..n, covers).expect("chain covers reference interned elements")
}

/// Discrete order: only reflexive pairs are comparable.
pub fn antichain<E: Element>(elements: Vec<E>) -> FinitePoset<E> {
    FinitePoset::from_covers(elements, std::iter::empty())
        .expect("antichain has no cover pairs to validate")
}

/// Powerset of `base` ordered by inclusion.
///
/// Subsets are `BTreeSet` elements; `S` is covered exactly by `S ∪ {x}` for
/// each `x ∉ S`, which is the transitive reduction of inclusion, so the cover
/// construction path is used directly.
pub fn powerset_lattice<E>(base: BTreeSet<E>) -> FinitePoset<BTreeSet<E>>
where
    E: Element + Ord,
{
    let base: Vec<E> = base.into_iter().collect();
    let n = base.len();
    debug_assert!(n < usize::BITS as usize, "powerset would overflow");

    let mut subsets: Vec<BTreeSet<E>> = Vec::with_capacity(1 << n);
    for mask in 0usize..(1 << n) {
        subsets.push(
            base.iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, e)| e.clone())
                .collect(),
        );
    }

    let mut covers = Vec::new();
    for mask in 0usize..(1 << n) {
        for bit in 0..n {
            if mask & (1 << bit) == 0 {
                covers.push((subsets[mask].clone(), subsets[mask | (1 << bit)].clone()));
            }
        }
    }

    FinitePoset::from_covers(subsets, covers).expect("powerset covers reference generated subsets")
}

/// Boolean lattice of dimension `n`: the powerset of `{0, …, n-1}`.
pub fn boolean_lattice(n: usize) -> FinitePoset<BTreeSet<usize>> {
    powerset_lattice((0..n).collect())
}

/// Divisors of `n` ordered by divisibility.
///
/// Built from the full divisibility relation; the cover derivation recovers
/// the prime-quotient edges. `meet` is gcd and `join` is lcm once wrapped in
/// a lattice.
pub fn divisor_lattice(n: u64) -> FinitePoset<u64> {
    assert!(n > 0, "divisor lattice requires a positive integer");
    let divisors: Vec<u64> = (1..=n).filter(|d| n % d == 0).collect();
    let mut pairs = Vec::new();
    for &d in &divisors {
        for &e in &divisors {
            if e % d == 0 {
                pairs.push((d, e));
            }
        }
    }
    FinitePoset::from_relation(divisors, pairs)
        .expect("divisibility on a finite divisor set is a partial order")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_is_total() {
        let c = chain(5);
        assert_eq!(c.len(), 5);
        for x in c.elements() {
            for y in c.elements() {
                assert!(c.is_comparable(x, y).unwrap());
            }
        }
        for i in 0..4 {
            assert!(c.lt(&i, &(i + 1)).unwrap());
        }
    }

    #[test]
    fn chain_of_one_and_zero() {
        assert_eq!(chain(1).len(), 1);
        assert_eq!(chain(0).len(), 0);
    }

    #[test]
    fn antichain_is_discrete() {
        let a = antichain(vec![10, 20, 30, 40, 50]);
        for x in a.elements() {
            for y in a.elements() {
                assert_eq!(a.le(x, y).unwrap(), x == y);
            }
        }
    }

    #[test]
    fn powerset_has_all_subsets_ordered_by_inclusion() {
        let p = powerset_lattice(BTreeSet::from([1, 2, 3]));
        assert_eq!(p.len(), 8);

        let empty = BTreeSet::new();
        let s1 = BTreeSet::from([1]);
        let s2 = BTreeSet::from([2]);
        let s12 = BTreeSet::from([1, 2]);
        let s123 = BTreeSet::from([1, 2, 3]);

        assert!(p.le(&empty, &s1).unwrap());
        assert!(p.le(&s1, &s12).unwrap());
        assert!(p.le(&s12, &s123).unwrap());
        assert!(!p.le(&s1, &s2).unwrap());
        assert!(p.lt(&empty, &s1).unwrap());
        assert!(!p.is_comparable(&s1, &s2).unwrap());

        // le must coincide with subset inclusion everywhere.
        for x in p.elements() {
            for y in p.elements() {
                assert_eq!(p.le(x, y).unwrap(), x.is_subset(y));
            }
        }
    }

    #[test]
    fn boolean_lattice_dimension() {
        assert_eq!(boolean_lattice(3).len(), 8);
        assert_eq!(boolean_lattice(0).len(), 1);
    }

    #[test]
    fn divisor_lattice_structure() {
        let d = divisor_lattice(12);
        assert_eq!(d.elements(), &[1, 2, 3, 4, 6, 12]);
        assert_eq!(d.upper_covers(&1).unwrap(), vec![2, 3]);
        assert_eq!(d.upper_covers(&2).unwrap(), vec![4, 6]);
        assert_eq!(d.lower_covers(&12).unwrap(), vec![4, 6]);
        assert_eq!(d.lower_covers(&6).unwrap(), vec![2, 3]);
        assert_eq!(d.minimal_elements(), vec![1]);
        assert_eq!(d.maximal_elements(), vec![12]);
    }
}
