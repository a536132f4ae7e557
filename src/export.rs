//! Adapter surface for serialization and diagram tooling.
//!
//! The core owns no file format. [`PosetSpec`] is the minimal serializable
//! description an external adapter needs — the element enumeration plus the
//! cover pairs — and reconstructing from it preserves `le` for every pair.
//! The DOT emitter consumes only `elements()` and `upper_covers()`, the same
//! read-only interface any visualization adapter gets; rendering the text is
//! someone else's job.

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::order::{FinitePoset, OrderResult};

/// A poset reduced to its reconstruction surface: elements in enumeration
/// order and the cover relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosetSpec<E> {
    /// The fixed element enumeration.
    pub elements: Vec<E>,
    /// Cover pairs `(lower, upper)`.
    pub covers: Vec<(E, E)>,
}

impl<E: Element> FinitePoset<E> {
    /// Project this poset onto its serializable spec.
    pub fn to_spec(&self) -> PosetSpec<E> {
        PosetSpec {
            elements: self.elements().to_vec(),
            covers: self.cover_relation_pairs(),
        }
    }

    /// Rebuild a poset from a spec. The round trip through
    /// [`to_spec`](Self::to_spec) yields an order-equivalent poset.
    pub fn from_spec(spec: PosetSpec<E>) -> OrderResult<Self> {
        Self::from_covers(spec.elements, spec.covers)
    }
}

/// Emit the Hasse diagram as Graphviz DOT text, labeling nodes with their
/// debug rendering.
pub fn to_dot<E: Element>(poset: &FinitePoset<E>, name: &str) -> String {
    to_dot_with(poset, name, |e| format!("{e:?}"))
}

/// Emit DOT text with caller-supplied node labels.
///
/// Edges run bottom-to-top (`rankdir=BT`) so the drawing matches the usual
/// Hasse convention of greater elements above.
pub fn to_dot_with<E: Element>(
    poset: &FinitePoset<E>,
    name: &str,
    label: impl Fn(&E) -> String,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("digraph {name} {{\n"));
    out.push_str("  rankdir=BT;\n");
    out.push_str("  node [shape=plaintext];\n");
    for (i, e) in poset.elements().iter().enumerate() {
        let text = label(e).replace('"', "\\\"");
        out.push_str(&format!("  n{i} [label=\"{text}\"];\n"));
    }
    for (i, e) in poset.elements().iter().enumerate() {
        let uppers = poset
            .upper_covers(e)
            .expect("element from the poset's own enumeration");
        for upper in uppers {
            let j = poset
                .elements()
                .iter()
                .position(|x| *x == upper)
                .expect("cover target from the poset's own enumeration");
            out.push_str(&format!("  n{i} -> n{j};\n"));
        }
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::factories::{chain, divisor_lattice};

    #[test]
    fn spec_round_trip_preserves_le() {
        let original = divisor_lattice(12);
        let json = serde_json::to_string(&original.to_spec()).unwrap();
        let spec: PosetSpec<u64> = serde_json::from_str(&json).unwrap();
        let rebuilt = FinitePoset::from_spec(spec).unwrap();

        assert_eq!(original.elements(), rebuilt.elements());
        for x in original.elements() {
            for y in original.elements() {
                assert_eq!(original.le(x, y).unwrap(), rebuilt.le(x, y).unwrap());
            }
        }
    }

    #[test]
    fn dot_output_contains_nodes_and_cover_edges() {
        let c = chain(3);
        let dot = to_dot(&c, "chain3");
        assert!(dot.starts_with("digraph chain3 {"));
        assert!(dot.contains("rankdir=BT"));
        assert!(dot.contains("n0 [label=\"0\"]"));
        assert!(dot.contains("n0 -> n1;"));
        assert!(dot.contains("n1 -> n2;"));
        // No transitive edge in a Hasse diagram.
        assert!(!dot.contains("n0 -> n2;"));
    }

    #[test]
    fn dot_custom_labels_and_escaping() {
        let p = FinitePoset::from_covers(vec!["lo", "hi"], vec![("lo", "hi")]).unwrap();
        let dot = to_dot_with(&p, "quoted", |e| format!("\"{e}\""));
        assert!(dot.contains("label=\"\\\"lo\\\"\""));
    }
}
