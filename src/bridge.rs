//! Bridge seam for external computer-algebra backends.
//!
//! The core has no hard dependency on any CAS. This module provides an
//! [`OrderBackend`] trait with a runtime-checked selection strategy:
//! [`select_backend`] picks the first registered backend that reports itself
//! available and falls back to the built-in [`NativeBackend`] otherwise.
//! Results are keyed by the same element identities the caller passed in.
//!
//! Backends are never trusted blindly — wherever both a bridge and the native
//! implementation are defined they must produce identical results, and
//! [`check_backend_agreement`] makes that invariant testable instead of
//! assumed.

use std::collections::HashMap;

use tracing::debug;

use crate::element::Element;
use crate::error::BridgeError;
use crate::incidence::IncidenceAlgebra;
use crate::order::FinitePoset;

/// Result type for bridge operations.
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;

/// An order-theory computation backend, native or bridged.
pub trait OrderBackend<E: Element>: Send + Sync {
    /// Backend name, used in diagnostics and selection logs.
    fn name(&self) -> &str;

    /// Whether this backend can currently serve requests.
    fn is_available(&self) -> bool;

    /// Möbius function values for every comparable pair `(x, y)` with
    /// `x ≤ y`, keyed by the element identities of the input poset.
    fn mobius_values(&self, poset: &FinitePoset<E>) -> BridgeResult<HashMap<(E, E), i64>>;

    /// A linear extension of the poset's order.
    fn linear_extension(&self, poset: &FinitePoset<E>) -> BridgeResult<Vec<E>>;
}

/// The built-in fallback: triangular Möbius inversion and Kahn extension
/// from the core, always available.
pub struct NativeBackend;

impl<E: Element> OrderBackend<E> for NativeBackend {
    fn name(&self) -> &str {
        "native"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn mobius_values(&self, poset: &FinitePoset<E>) -> BridgeResult<HashMap<(E, E), i64>> {
        let alg = IncidenceAlgebra::new(poset.clone());
        let extension = alg.extension().to_vec();
        let mobius = alg.mobius_matrix();
        let zeta = alg.zeta_matrix();
        let mut values = HashMap::new();
        for i in 0..extension.len() {
            for j in i..extension.len() {
                if zeta.get(i, j) == 1 {
                    values.insert(
                        (extension[i].clone(), extension[j].clone()),
                        mobius.get(i, j),
                    );
                }
            }
        }
        Ok(values)
    }

    fn linear_extension(&self, poset: &FinitePoset<E>) -> BridgeResult<Vec<E>> {
        Ok(poset.linear_extension())
    }
}

static NATIVE: NativeBackend = NativeBackend;

/// Pick the first available registered backend, falling back to the native
/// implementation when none is.
pub fn select_backend<'a, E: Element>(
    registered: &[&'a dyn OrderBackend<E>],
) -> &'a dyn OrderBackend<E> {
    for &backend in registered {
        if backend.is_available() {
            debug!(backend = backend.name(), "backend selected");
            return backend;
        }
    }
    debug!("no bridge available, using native backend");
    &NATIVE
}

/// Verify that a backend agrees with the native implementation on a poset.
///
/// Möbius values must match exactly. Linear extensions may legitimately
/// differ between backends, so the bridge's extension is checked for
/// validity (a permutation of the elements that respects the order) rather
/// than for equality.
pub fn check_backend_agreement<E: Element>(
    backend: &dyn OrderBackend<E>,
    poset: &FinitePoset<E>,
) -> BridgeResult<()> {
    if !backend.is_available() {
        return Err(BridgeError::Unavailable {
            backend: backend.name().to_string(),
        });
    }

    let native_mobius = NATIVE.mobius_values(poset)?;
    let bridge_mobius = backend.mobius_values(poset)?;
    if native_mobius != bridge_mobius {
        return Err(BridgeError::Disagreement {
            backend: backend.name().to_string(),
            context: "mobius values".to_string(),
        });
    }

    let extension = backend.linear_extension(poset)?;
    let valid_permutation = extension.len() == poset.len()
        && poset.elements().iter().all(|e| extension.contains(e));
    let rank: HashMap<&E, usize> = extension.iter().enumerate().map(|(i, e)| (e, i)).collect();
    let respects_order = valid_permutation
        && poset
            .relation_pairs()
            .iter()
            .all(|(lo, hi)| rank[lo] <= rank[hi]);
    if !respects_order {
        return Err(BridgeError::Disagreement {
            backend: backend.name().to_string(),
            context: "linear extension".to_string(),
        });
    }

    Ok(())
}
