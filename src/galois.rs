//! Galois connection verifier and the operators an adjunction induces.
//!
//! A [`GaloisConnection`] holds a lower adjoint `f: P → Q` and an upper
//! adjoint `g: Q → P` between two finite posets, validated exhaustively at
//! construction: for every `x ∈ P` and `y ∈ Q`, `f(x) ≤_Q y ⇔ x ≤_P g(y)`.
//! Domains here are finite, so no sampling mode is offered.
//!
//! Once verified, `g∘f` is a closure operator on `P` and `f∘g` a kernel
//! operator on `Q` — a theorem, not something re-checked — and both are
//! handed back as framework operators from the closure/kernel module.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::debug;

use crate::closure::{ClosureAxioms, ClosureOperator, KernelOperator};
use crate::element::{Element, render};
use crate::error::{ClosureError, GaloisError};
use crate::order::FinitePoset;

/// Result type for Galois operations.
pub type GaloisResult<T> = std::result::Result<T, GaloisError>;

/// A verified adjoint pair of monotone maps between two finite posets.
#[derive(Debug)]
pub struct GaloisConnection<P: Element, Q: Element> {
    domain: FinitePoset<P>,
    codomain: FinitePoset<Q>,
    /// Lower adjoint image by domain index: `f_image[i]` is the codomain
    /// index of `f(domain[i])`.
    f_image: Vec<usize>,
    /// Upper adjoint image by codomain index.
    g_image: Vec<usize>,
}

impl<P: Element + 'static, Q: Element + 'static> GaloisConnection<P, Q> {
    /// Verify the adjunction law over the full finite grid.
    ///
    /// Both maps are evaluated once per element up front (failing with an
    /// unknown-element error when a map leaves its target poset), then every
    /// `(x, y)` pair is checked in parallel. The first violation found is
    /// returned as [`GaloisError::Adjunction`] with both witnesses.
    pub fn verify(
        domain: FinitePoset<P>,
        codomain: FinitePoset<Q>,
        lower: impl Fn(&P) -> Q,
        upper: impl Fn(&Q) -> P,
    ) -> GaloisResult<Self> {
        let mut f_image = Vec::with_capacity(domain.len());
        for x in domain.elements() {
            let fx = lower(x);
            f_image.push(codomain.index_of(&fx)?);
        }
        let mut g_image = Vec::with_capacity(codomain.len());
        for y in codomain.elements() {
            let gy = upper(y);
            g_image.push(domain.index_of(&gy)?);
        }

        let violation = (0..domain.len())
            .into_par_iter()
            .find_map_any(|i| {
                (0..codomain.len()).find_map(|j| {
                    let f_below = codomain.le_idx(f_image[i], j);
                    let g_above = domain.le_idx(i, g_image[j]);
                    (f_below != g_above).then_some((i, j))
                })
            });

        if let Some((i, j)) = violation {
            return Err(GaloisError::Adjunction {
                x: render(domain.element_at(i)),
                y: render(codomain.element_at(j)),
            });
        }
        debug!(
            domain = domain.len(),
            codomain = codomain.len(),
            "adjunction verified"
        );
        Ok(Self {
            domain,
            codomain,
            f_image,
            g_image,
        })
    }

    /// The domain poset `P`.
    pub fn domain(&self) -> &FinitePoset<P> {
        &self.domain
    }

    /// The codomain poset `Q`.
    pub fn codomain(&self) -> &FinitePoset<Q> {
        &self.codomain
    }

    /// Apply the lower adjoint `f`.
    pub fn lower(&self, x: &P) -> GaloisResult<Q> {
        let i = self.domain.index_of(x)?;
        Ok(self.codomain.element_at(self.f_image[i]).clone())
    }

    /// Apply the upper adjoint `g`.
    pub fn upper(&self, y: &Q) -> GaloisResult<P> {
        let j = self.codomain.index_of(y)?;
        Ok(self.domain.element_at(self.g_image[j]).clone())
    }

    /// Pointwise closure `g(f(x))` on the domain.
    pub fn closure_of(&self, x: &P) -> GaloisResult<P> {
        let i = self.domain.index_of(x)?;
        Ok(self
            .domain
            .element_at(self.g_image[self.f_image[i]])
            .clone())
    }

    /// Pointwise kernel `f(g(y))` on the codomain.
    pub fn kernel_of(&self, y: &Q) -> GaloisResult<Q> {
        let j = self.codomain.index_of(y)?;
        Ok(self
            .codomain
            .element_at(self.f_image[self.g_image[j]])
            .clone())
    }

    /// `g∘f` lifted to subsets of `P` as a framework closure operator:
    /// `cl(S) = S ∪ gf[S]`. Extensive, idempotent, and monotone by the
    /// adjunction; declared, not re-verified.
    pub fn closure_operator(&self) -> ClosureOperator<P> {
        let poset = self.domain.clone();
        let composite: Vec<usize> = self.f_image.iter().map(|&fi| self.g_image[fi]).collect();
        ClosureOperator::new(
            "galois-closure",
            ClosureAxioms::closure(),
            move |seed: &HashSet<P>| {
                let mut added = HashSet::new();
                for x in seed {
                    let i = poset
                        .index_of(x)
                        .map_err(|_| ClosureError::UnknownElement { element: render(x) })?;
                    let image = poset.element_at(composite[i]);
                    if !seed.contains(image) {
                        added.insert(image.clone());
                    }
                }
                Ok(added)
            },
        )
    }

    /// `f∘g` lifted to subsets of `Q` as a framework kernel operator:
    /// `k(S) = S ∩ fg[S]`. Intensive, idempotent, and monotone by the
    /// adjunction; declared, not re-verified.
    pub fn kernel_operator(&self) -> KernelOperator<Q> {
        let poset = self.codomain.clone();
        let composite: Vec<usize> = self.g_image.iter().map(|&gj| self.f_image[gj]).collect();
        KernelOperator::new(
            "galois-kernel",
            ClosureAxioms::kernel(),
            move |seed: &HashSet<Q>| {
                let mut kept = HashSet::new();
                for y in seed {
                    let j = poset
                        .index_of(y)
                        .map_err(|_| ClosureError::UnknownElement { element: render(y) })?;
                    let image = poset.element_at(composite[j]);
                    if seed.contains(image) {
                        kept.insert(image.clone());
                    }
                }
                Ok(kept)
            },
        )
    }

    /// Domain elements fixed by `g∘f`, by direct evaluation.
    pub fn fixed_points_domain(&self) -> Vec<P> {
        (0..self.domain.len())
            .filter(|&i| self.g_image[self.f_image[i]] == i)
            .map(|i| self.domain.element_at(i).clone())
            .collect()
    }

    /// Codomain elements fixed by `f∘g`, by direct evaluation.
    pub fn fixed_points_codomain(&self) -> Vec<Q> {
        (0..self.codomain.len())
            .filter(|&j| self.f_image[self.g_image[j]] == j)
            .map(|j| self.codomain.element_at(j).clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::factories::chain;

    /// Truncation f(x) = min(x, 2) from chain(5) into chain(3); its upper
    /// adjoint sends y to the largest x that truncates below y, so the top of
    /// the codomain maps back to the top of the domain.
    fn truncation() -> GaloisConnection<usize, usize> {
        GaloisConnection::verify(
            chain(5),
            chain(3),
            |&x| x.min(2),
            |&y| if y == 2 { 4 } else { y },
        )
        .unwrap()
    }

    #[test]
    fn truncation_is_an_adjunction() {
        let gc = truncation();
        assert_eq!(gc.lower(&4).unwrap(), 2);
        assert_eq!(gc.upper(&1).unwrap(), 1);
        assert_eq!(gc.upper(&2).unwrap(), 4);
        // f(x) ≤ y ⇔ x ≤ g(y), spot-checked on the grid edges.
        for x in 0..5usize {
            for y in 0..3usize {
                let lhs = gc.codomain().le(&gc.lower(&x).unwrap(), &y).unwrap();
                let rhs = gc.domain().le(&x, &gc.upper(&y).unwrap()).unwrap();
                assert_eq!(lhs, rhs);
            }
        }
    }

    #[test]
    fn broken_adjunction_names_a_witness() {
        // g(y) = 0 destroys the adjunction: f(1) = 1 ≤ 1 but 1 ≰ g(1) = 0.
        let err =
            GaloisConnection::verify(chain(5), chain(3), |&x| x.min(2), |_| 0usize).unwrap_err();
        assert!(matches!(err, GaloisError::Adjunction { .. }));
    }

    #[test]
    fn map_leaving_codomain_is_unknown() {
        let err = GaloisConnection::verify(chain(5), chain(3), |&x| x, |&y| y).unwrap_err();
        assert!(matches!(err, GaloisError::Order(_)));
    }

    #[test]
    fn pointwise_closure_and_kernel() {
        let gc = truncation();
        // gf fixes 0 and 1 and sends everything from 2 upward to 4;
        // fg is the identity on the codomain.
        assert_eq!(gc.closure_of(&1).unwrap(), 1);
        assert_eq!(gc.closure_of(&2).unwrap(), 4);
        assert_eq!(gc.closure_of(&4).unwrap(), 4);
        assert_eq!(gc.kernel_of(&2).unwrap(), 2);
    }

    #[test]
    fn fixed_points_by_direct_evaluation() {
        let gc = truncation();
        assert_eq!(gc.fixed_points_domain(), vec![0, 1, 4]);
        assert_eq!(gc.fixed_points_codomain(), vec![0, 1, 2]);
    }

    #[test]
    fn induced_closure_operator_obeys_the_laws() {
        let gc = truncation();
        let cl = gc.closure_operator();
        let seed: HashSet<usize> = [2, 3].into_iter().collect();
        let closed = cl.apply(&seed).unwrap();
        // 2 and 3 both close onto 4, which joins the set.
        assert_eq!(closed, [2, 3, 4].into_iter().collect());
        assert!(cl.is_extensive_on(&seed).unwrap());
        assert!(cl.is_idempotent_on(&seed).unwrap());
    }

    #[test]
    fn induced_kernel_operator_obeys_the_laws() {
        let gc = truncation();
        let k = gc.kernel_operator();
        let seed: HashSet<usize> = [0, 1, 2].into_iter().collect();
        // fg is the identity on chain(3): the kernel keeps everything.
        assert_eq!(k.apply(&seed).unwrap(), seed);
        assert!(k.is_intensive_on(&seed).unwrap());
        assert!(k.is_idempotent_on(&seed).unwrap());
    }
}
