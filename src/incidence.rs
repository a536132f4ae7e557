//! Incidence algebra: zeta matrix, Möbius inversion, convolution.
//!
//! Matrices are indexed by a fixed linear extension of the poset, which makes
//! the zeta matrix upper-triangular with unit diagonal. Its inverse — the
//! Möbius matrix — is therefore computed by triangular back-substitution over
//! exact `i64` arithmetic, never by general elimination: μ(x,x) = 1 and for
//! x < y, μ(x,y) = −Σ_{x≤z<y} μ(x,z). The recurrence and the matrix inverse
//! agree exactly; `zeta · mobius == identity` holds in integer arithmetic
//! with no tolerance.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::element::Element;
use crate::order::{FinitePoset, OrderResult};

/// A square integer matrix indexed by linear-extension position.
///
/// Flat row-major storage; all arithmetic is exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidenceMatrix {
    n: usize,
    entries: Vec<i64>,
}

impl IncidenceMatrix {
    /// The zero matrix of dimension `n`.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            entries: vec![0; n * n],
        }
    }

    /// The identity matrix of dimension `n`.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m.set(i, i, 1);
        }
        m
    }

    /// Matrix dimension.
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.entries[row * self.n + col]
    }

    /// Set entry at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: i64) {
        self.entries[row * self.n + col] = value;
    }

    /// Exact matrix product.
    ///
    /// Panics when dimensions differ; matrices from different algebras must
    /// not be mixed.
    pub fn multiply(&self, other: &Self) -> Self {
        assert_eq!(self.n, other.n, "incidence matrices of different posets");
        let mut out = Self::zeros(self.n);
        for i in 0..self.n {
            for k in 0..self.n {
                let a = self.get(i, k);
                if a == 0 {
                    continue;
                }
                for j in 0..self.n {
                    let v = out.get(i, j) + a * other.get(k, j);
                    out.set(i, j, v);
                }
            }
        }
        out
    }

    /// True iff this is exactly the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity(self.n)
    }
}

/// The incidence algebra of a finite poset.
///
/// Owns the poset and the fixed linear extension used for indexing; the zeta
/// and Möbius matrices are derived on first use and cached for the life of
/// the instance (the poset is immutable, so the caches never invalidate).
pub struct IncidenceAlgebra<E: Element> {
    poset: FinitePoset<E>,
    extension: Vec<E>,
    rank: HashMap<E, usize>,
    zeta: OnceLock<IncidenceMatrix>,
    mobius: OnceLock<IncidenceMatrix>,
}

impl<E: Element> IncidenceAlgebra<E> {
    /// Build the algebra over a poset.
    pub fn new(poset: FinitePoset<E>) -> Self {
        let extension = poset.linear_extension();
        let rank = extension
            .iter()
            .enumerate()
            .map(|(i, e)| (e.clone(), i))
            .collect();
        Self {
            poset,
            extension,
            rank,
            zeta: OnceLock::new(),
            mobius: OnceLock::new(),
        }
    }

    /// The underlying poset.
    pub fn poset(&self) -> &FinitePoset<E> {
        &self.poset
    }

    /// The linear extension indexing every matrix of this algebra.
    pub fn extension(&self) -> &[E] {
        &self.extension
    }

    fn rank_of(&self, element: &E) -> OrderResult<usize> {
        // Membership failure is the same error the poset itself reports.
        self.poset.index_of(element)?;
        Ok(self.rank[element])
    }

    fn le_rank(&self, i: usize, j: usize) -> bool {
        self.zeta_matrix().get(i, j) == 1
    }

    /// The zeta matrix: entry `(i, j)` is 1 iff `extension[i] ≤ extension[j]`.
    ///
    /// Upper-triangular with unit diagonal because the indexing order is a
    /// linear extension.
    pub fn zeta_matrix(&self) -> &IncidenceMatrix {
        self.zeta.get_or_init(|| {
            let n = self.extension.len();
            let mut zeta = IncidenceMatrix::zeros(n);
            for i in 0..n {
                for j in 0..n {
                    let le = self
                        .poset
                        .le(&self.extension[i], &self.extension[j])
                        .expect("extension elements belong to the poset");
                    if le {
                        zeta.set(i, j, 1);
                    }
                }
            }
            debug!(n, "zeta matrix built");
            zeta
        })
    }

    /// The Möbius matrix: the exact inverse of the zeta matrix, computed by
    /// triangular back-substitution.
    pub fn mobius_matrix(&self) -> &IncidenceMatrix {
        self.mobius.get_or_init(|| {
            let zeta = self.zeta_matrix();
            let n = zeta.dim();
            let mut mobius = IncidenceMatrix::zeros(n);
            for i in 0..n {
                mobius.set(i, i, 1);
                // Columns strictly after i in extension order; anything not
                // above extension[i] stays zero.
                for j in (i + 1)..n {
                    if zeta.get(i, j) == 0 {
                        continue;
                    }
                    let mut sum = 0i64;
                    for k in i..j {
                        if zeta.get(i, k) == 1 && zeta.get(k, j) == 1 {
                            sum += mobius.get(i, k);
                        }
                    }
                    mobius.set(i, j, -sum);
                }
            }
            debug!(n, "mobius matrix built");
            mobius
        })
    }

    /// Möbius function value `μ(x, y)`, zero whenever `x ≰ y`.
    pub fn mobius(&self, x: &E, y: &E) -> OrderResult<i64> {
        let (i, j) = (self.rank_of(x)?, self.rank_of(y)?);
        Ok(self.mobius_matrix().get(i, j))
    }

    /// The delta (identity) function of the algebra.
    pub fn delta(&self) -> IncidenceMatrix {
        IncidenceMatrix::identity(self.extension.len())
    }

    /// Convolution `(f ∗ g)(x, y) = Σ_{x≤z≤y} f(x, z) · g(z, y)`, zero
    /// outside the order (entries at `x ≰ y` never contribute and are never
    /// produced).
    pub fn convolve(&self, f: &IncidenceMatrix, g: &IncidenceMatrix) -> IncidenceMatrix {
        let n = self.extension.len();
        let mut out = IncidenceMatrix::zeros(n);
        for i in 0..n {
            for j in 0..n {
                if !self.le_rank(i, j) {
                    continue;
                }
                let mut sum = 0i64;
                for k in i..=j {
                    if self.le_rank(i, k) && self.le_rank(k, j) {
                        sum += f.get(i, k) * g.get(k, j);
                    }
                }
                out.set(i, j, sum);
            }
        }
        out
    }

    /// Value of an incidence function at an element pair.
    pub fn value(&self, f: &IncidenceMatrix, x: &E, y: &E) -> OrderResult<i64> {
        let (i, j) = (self.rank_of(x)?, self.rank_of(y)?);
        Ok(f.get(i, j))
    }

    /// The indicator of the interval `[lo, hi]`: entry `(u, v)` is 1 iff
    /// `lo ≤ u ≤ v ≤ hi`.
    pub fn characteristic_function(&self, lo: &E, hi: &E) -> OrderResult<IncidenceMatrix> {
        let (l, h) = (self.rank_of(lo)?, self.rank_of(hi)?);
        let n = self.extension.len();
        let mut out = IncidenceMatrix::zeros(n);
        for u in 0..n {
            for v in 0..n {
                if self.le_rank(l, u) && self.le_rank(u, v) && self.le_rank(v, h) {
                    out.set(u, v, 1);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::order::factories::{boolean_lattice, chain, divisor_lattice};

    #[test]
    fn zeta_is_upper_triangular_with_unit_diagonal() {
        let alg = IncidenceAlgebra::new(divisor_lattice(12));
        let zeta = alg.zeta_matrix();
        for i in 0..zeta.dim() {
            assert_eq!(zeta.get(i, i), 1);
            for j in 0..i {
                assert_eq!(zeta.get(i, j), 0);
            }
        }
    }

    #[test]
    fn mobius_of_chain_three() {
        let alg = IncidenceAlgebra::new(chain(3));
        for x in 0..3usize {
            assert_eq!(alg.mobius(&x, &x).unwrap(), 1);
        }
        assert_eq!(alg.mobius(&0, &1).unwrap(), -1);
        assert_eq!(alg.mobius(&1, &2).unwrap(), -1);
        assert_eq!(alg.mobius(&0, &2).unwrap(), 0);
        assert_eq!(alg.mobius(&2, &0).unwrap(), 0);
    }

    #[test]
    fn zeta_times_mobius_is_identity_exactly() {
        for n in [12u64, 30, 36] {
            let alg = IncidenceAlgebra::new(divisor_lattice(n));
            let product = alg.zeta_matrix().multiply(alg.mobius_matrix());
            assert!(product.is_identity());
            let reversed = alg.mobius_matrix().multiply(alg.zeta_matrix());
            assert!(reversed.is_identity());
        }
        let alg = IncidenceAlgebra::new(chain(6));
        assert!(alg.zeta_matrix().multiply(alg.mobius_matrix()).is_identity());
    }

    #[test]
    fn mobius_identity_holds_on_the_boolean_lattice() {
        let alg = IncidenceAlgebra::new(boolean_lattice(3));
        let product = alg.zeta_matrix().multiply(alg.mobius_matrix());
        assert!(product.is_identity());

        // μ(S, T) = (−1)^{|T \ S|} on subset intervals.
        let empty = BTreeSet::new();
        let full = BTreeSet::from([0, 1, 2]);
        let pair = BTreeSet::from([0, 1]);
        assert_eq!(alg.mobius(&empty, &full).unwrap(), -1);
        assert_eq!(alg.mobius(&empty, &pair).unwrap(), 1);
    }

    #[test]
    fn number_theoretic_mobius_on_divisors() {
        let alg = IncidenceAlgebra::new(divisor_lattice(12));
        // μ(1, d) matches the classical Möbius function of d.
        assert_eq!(alg.mobius(&1, &2).unwrap(), -1);
        assert_eq!(alg.mobius(&1, &6).unwrap(), 1);
        assert_eq!(alg.mobius(&1, &4).unwrap(), 0);
        assert_eq!(alg.mobius(&1, &12).unwrap(), 0);
    }

    #[test]
    fn convolving_zeta_with_itself_counts_intervals() {
        let alg = IncidenceAlgebra::new(chain(4));
        let zeta = alg.zeta_matrix().clone();
        let counts = alg.convolve(&zeta, &zeta);
        // (ζ ∗ ζ)(x, y) = |[x, y]|.
        assert_eq!(alg.value(&counts, &0, &3).unwrap(), 4);
        assert_eq!(alg.value(&counts, &1, &2).unwrap(), 2);
        assert_eq!(alg.value(&counts, &2, &2).unwrap(), 1);
        assert_eq!(alg.value(&counts, &3, &0).unwrap(), 0);
    }

    #[test]
    fn delta_is_the_convolution_identity() {
        let alg = IncidenceAlgebra::new(divisor_lattice(12));
        let zeta = alg.zeta_matrix().clone();
        assert_eq!(alg.convolve(&alg.delta(), &zeta), zeta);
        assert_eq!(alg.convolve(&zeta, &alg.delta()), zeta);
    }

    #[test]
    fn mobius_convolved_with_zeta_is_delta() {
        let alg = IncidenceAlgebra::new(divisor_lattice(30));
        let zeta = alg.zeta_matrix().clone();
        let mobius = alg.mobius_matrix().clone();
        assert_eq!(alg.convolve(&mobius, &zeta), alg.delta());
        assert_eq!(alg.convolve(&zeta, &mobius), alg.delta());
    }

    #[test]
    fn characteristic_function_marks_the_interval() {
        let alg = IncidenceAlgebra::new(chain(4));
        let kappa = alg.characteristic_function(&1, &3).unwrap();
        assert_eq!(alg.value(&kappa, &1, &3).unwrap(), 1);
        assert_eq!(alg.value(&kappa, &2, &3).unwrap(), 1);
        assert_eq!(alg.value(&kappa, &0, &3).unwrap(), 0);
        assert_eq!(alg.value(&kappa, &3, &1).unwrap(), 0);

        let point = alg.characteristic_function(&2, &2).unwrap();
        assert_eq!(alg.value(&point, &2, &2).unwrap(), 1);
        assert_eq!(alg.value(&point, &1, &2).unwrap(), 0);
    }

    #[test]
    fn unknown_elements_are_rejected() {
        let alg = IncidenceAlgebra::new(chain(3));
        assert!(alg.mobius(&0, &9).is_err());
        assert!(alg.characteristic_function(&9, &0).is_err());
    }
}
