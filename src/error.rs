//! Rich diagnostic error types for the hasse engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so callers know exactly which order-theoretic
//! contract was violated. A wrong order answer is a correctness bug, not a transient
//! fault: nothing here is retried or downgraded — every error surfaces at the point
//! of detection.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the hasse engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum HasseError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lattice(#[from] LatticeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Closure(#[from] ClosureError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Galois(#[from] GaloisError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Bridge(#[from] BridgeError),
}

// ---------------------------------------------------------------------------
// Order errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum OrderError {
    #[error("element {element} is not in the poset")]
    #[diagnostic(
        code(hasse::order::unknown_element),
        help(
            "Every query argument must belong to the element set the poset was \
             constructed with. Posets are immutable: elements cannot be added \
             after construction, so check the element value or rebuild the poset."
        )
    )]
    UnknownElement { element: String },

    #[error("relation is not antisymmetrizable: {x} ≤ {y} and {y} ≤ {x} for distinct elements")]
    #[diagnostic(
        code(hasse::order::malformed_relation),
        help(
            "The transitive closure of the input relation contains a cycle through \
             the named pair. Strict partial orders are acyclic; remove the cycle \
             from the generating pairs. Detection is exhaustive for `from_relation`, \
             but cover inputs to `from_covers` are trusted and a cyclic cover set \
             has undefined behavior."
        )
    )]
    MalformedRelation { x: String, y: String },

    #[error("cannot materialize an element source tagged as infinite")]
    #[diagnostic(
        code(hasse::order::infinite_source),
        help(
            "Poset construction, meet/join, and Möbius inversion require the full \
             element set. Tag the stream `Finitude::Finite` if it is actually \
             finite, or restrict it to a finite window before construction."
        )
    )]
    InfiniteSource,
}

// ---------------------------------------------------------------------------
// Lattice errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LatticeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Order(#[from] OrderError),

    #[error("not a lattice: {bound} is not unique for elements {x} and {y}")]
    #[diagnostic(
        code(hasse::lattice::not_a_lattice),
        help(
            "The named pair has common bounds, but no single greatest lower bound \
             (or least upper bound) among them. This poset is not a lattice; use \
             the poset API directly, or repair the order relation."
        )
    )]
    NotALattice {
        x: String,
        y: String,
        bound: BoundKind,
    },

    #[error("lattice has no unique {bound} element")]
    #[diagnostic(
        code(hasse::lattice::no_bound),
        help(
            "top()/bottom() require exactly one maximal/minimal element. \
             Use maximal_elements()/minimal_elements() on the underlying poset \
             to inspect the candidates."
        )
    )]
    NoBound { bound: BoundKind },
}

/// Which bound a lattice error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    /// Greatest lower bound (meet / bottom).
    Meet,
    /// Least upper bound (join / top).
    Join,
}

impl std::fmt::Display for BoundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundKind::Meet => write!(f, "meet"),
            BoundKind::Join => write!(f, "join"),
        }
    }
}

// ---------------------------------------------------------------------------
// Closure errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ClosureError {
    #[error("closure did not converge within {passes} passes (operator `{operator}`)")]
    #[diagnostic(
        code(hasse::closure::divergence),
        help(
            "The fixpoint driver hit its iteration cap before a pass produced no \
             new elements. Over a finite universe this means the cap is too low \
             for the seed (raise it with `with_cap`); over a generator set it \
             usually means the one-step rule keeps producing fresh values and the \
             closure genuinely does not converge at this cap."
        )
    )]
    Divergence { operator: String, passes: usize },

    #[error("element {element} is outside the closure operator's universe")]
    #[diagnostic(
        code(hasse::closure::unknown_element),
        help(
            "Seeds must be drawn from the fixed universe the operator was built \
             over. Rebuild the operator over a universe containing the element."
        )
    )]
    UnknownElement { element: String },
}

// ---------------------------------------------------------------------------
// Galois errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GaloisError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Order(#[from] OrderError),

    #[error("adjunction law violated at x = {x}, y = {y}")]
    #[diagnostic(
        code(hasse::galois::adjunction),
        help(
            "A Galois connection requires f(x) ≤ y ⇔ x ≤ g(y) for every x in the \
             domain and y in the codomain. The named pair is a counterexample; \
             the maps are not adjoint between these posets."
        )
    )]
    Adjunction { x: String, y: String },
}

// ---------------------------------------------------------------------------
// Bridge errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum BridgeError {
    #[error("backend `{backend}` is not available")]
    #[diagnostic(
        code(hasse::bridge::unavailable),
        help(
            "The selected computer-algebra backend reported itself unavailable. \
             `select_backend` falls back to the native implementation automatically; \
             calling an unavailable backend directly is a caller bug."
        )
    )]
    Unavailable { backend: String },

    #[error("backend `{backend}` disagrees with the native result for {context}")]
    #[diagnostic(
        code(hasse::bridge::disagreement),
        help(
            "Bridge backends must produce results identical to the native fallback \
             wherever both are defined. A disagreement means one side is wrong — \
             do not trust either result until the discrepancy is resolved."
        )
    )]
    Disagreement { backend: String, context: String },
}

/// Result alias for operations that can fail anywhere in the engine.
pub type HasseResult<T> = std::result::Result<T, HasseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_error_wraps_into_top_level() {
        let err = OrderError::UnknownElement {
            element: "42".into(),
        };
        let top: HasseError = err.into();
        assert!(matches!(top, HasseError::Order(_)));
    }

    #[test]
    fn lattice_error_display_names_pair() {
        let err = LatticeError::NotALattice {
            x: "\"a\"".into(),
            y: "\"b\"".into(),
            bound: BoundKind::Meet,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("\"a\""));
        assert!(rendered.contains("\"b\""));
        assert!(rendered.contains("meet"));
    }

    #[test]
    fn divergence_reports_pass_count() {
        let err = ClosureError::Divergence {
            operator: "composition".into(),
            passes: 64,
        };
        assert!(err.to_string().contains("64"));
    }
}
