// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # hasse
//!
//! A finite partial-order and lattice algebra engine: comparability queries,
//! meets and joins, closure operators, Galois connections, and exact Möbius
//! inversion over the incidence algebra.
//!
//! ## Architecture
//!
//! - **Order core** (`order`): interned elements, fixpoint transitive closure,
//!   the transitively-reduced cover digraph, reachability and extrema
//! - **Lattice engine** (`lattice`): memoized meet/join over any finite poset
//! - **Closure/kernel framework** (`closure`): capped fixpoint driver with
//!   order-ideal/filter, composition, Moore, and polar closures
//! - **Galois verifier** (`galois`): exhaustive adjunction checking and the
//!   induced closure/kernel operators
//! - **Incidence algebra** (`incidence`): zeta matrix, triangular Möbius
//!   inversion, convolution — exact integer arithmetic throughout
//! - **Bridge seam** (`bridge`): capability-checked backend selection with a
//!   native fallback that external CAS adapters must agree with
//!
//! ## Library usage
//!
//! ```
//! use hasse::incidence::IncidenceAlgebra;
//! use hasse::lattice::FiniteLattice;
//! use hasse::order::factories::divisor_lattice;
//!
//! let lattice = FiniteLattice::new(divisor_lattice(12))?;
//! assert_eq!(lattice.meet(&6, &4)?, Some(2)); // gcd
//! assert_eq!(lattice.join(&6, &4)?, Some(12)); // lcm
//!
//! let algebra = IncidenceAlgebra::new(lattice.poset().clone());
//! assert_eq!(algebra.mobius(&1, &6)?, 1);
//! # Ok::<(), hasse::error::HasseError>(())
//! ```

pub mod bridge;
pub mod closure;
pub mod element;
pub mod error;
pub mod export;
pub mod galois;
pub mod incidence;
pub mod lattice;
pub mod order;
