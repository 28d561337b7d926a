//! Analyzer summary model
//!
//! ```text
//! summary  = [disjunct]
//! disjunct = [label, content | null]
//! label    = [text, [start_line, end_line]]
//! content  = { post: {heap, stack, attrs},
//!              path_condition: { both: {linear_eqs, atoms}, pruned },
//!              full_trace }
//! ```
//!
//! The envelope is typed with serde. Heap, stack, attribute and atom
//! entries are heterogeneous JSON arrays; they are decoded by hand and an
//! entry outside the supported vocabulary is skipped, never fatal.

use super::label::DisjunctLabel;
use crate::errors::{EffixError, Result};
use crate::features::clause::domain::RelationKind;
use crate::features::heap_resolution::domain::{
    Attribute, AttributeEntry, EdgeLabel, HeapEntry, StackBinding, SymbolicState,
};
use serde::Deserialize;
use serde_json::Value;

/// Integer that may arrive as a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IntLike {
    Int(i64),
    Text(String),
}

impl IntLike {
    pub fn value(&self) -> Option<i64> {
        match self {
            IntLike::Int(v) => Some(*v),
            IntLike::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLabel(pub String, pub (IntLike, IntLike));

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawState {
    pub heap: Vec<Value>,
    pub stack: Vec<Value>,
    pub attrs: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConjunction {
    pub linear_eqs: Vec<Value>,
    pub atoms: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPathCondition {
    /// Conjunction of every fact known on the branch
    pub both: RawConjunction,
    /// Conditions assumed by the branch itself
    pub pruned: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawContent {
    pub post: RawState,
    pub path_condition: RawPathCondition,
    pub full_trace: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDisjunct(pub RawLabel, pub Option<RawContent>);

impl RawDisjunct {
    pub fn label(&self) -> Result<DisjunctLabel> {
        let RawLabel(text, (start, end)) = &self.0;
        let start_line = start.value().ok_or_else(|| {
            EffixError::parse_error(format!("Bad start line {:?} for label {}", start, text))
        })?;
        let end_line = end.value().ok_or_else(|| {
            EffixError::parse_error(format!("Bad end line {:?} for label {}", end, text))
        })?;
        Ok(DisjunctLabel::new(text.clone(), start_line, end_line))
    }

    pub fn content(&self) -> Option<&RawContent> {
        self.1.as_ref()
    }

    /// Executed source lines; empty when the branch has no content
    pub fn trace(&self) -> Vec<i64> {
        self.content()
            .map(|content| content.full_trace.iter().filter_map(int_like).collect())
            .unwrap_or_default()
    }
}

/// Linear sum `Σ cᵢ·lvarᵢ + c₀` over raw logical names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinArith {
    pub vars: Vec<(String, i64)>,
    pub constant: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Const(i64),
    Linear(LinArith),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub kind: RelationKind,
    pub lhs: Term,
    pub rhs: Term,
}

/// `lvar = linear sum`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearEquation {
    pub lhs: String,
    pub rhs: LinArith,
}

/// Decoded path condition; unsupported entries already dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathCondition {
    pub linear_eqs: Vec<LinearEquation>,
    pub atoms: Vec<Atom>,
    pub pruned: Vec<Atom>,
}

impl RawState {
    pub fn decode(&self) -> SymbolicState {
        SymbolicState {
            heap: decode_all(&self.heap, decode_heap_entry, "heap"),
            stack: decode_all(&self.stack, decode_stack_entry, "stack"),
            attrs: decode_all(&self.attrs, decode_attr_entry, "attrs"),
        }
    }
}

impl RawPathCondition {
    pub fn decode(&self) -> PathCondition {
        PathCondition {
            linear_eqs: decode_all(&self.both.linear_eqs, decode_linear_eq, "linear_eqs"),
            atoms: decode_all(&self.both.atoms, decode_atom, "atoms"),
            pruned: decode_all(&self.pruned, decode_atom, "pruned"),
        }
    }
}

fn decode_all<T>(entries: &[Value], decode: fn(&Value) -> Option<T>, section: &str) -> Vec<T> {
    entries
        .iter()
        .filter_map(|entry| {
            let decoded = decode(entry);
            if decoded.is_none() {
                tracing::debug!("Skipping unsupported {} entry: {}", section, entry);
            }
            decoded
        })
        .collect()
}

fn int_like(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `{num, den}` with floor division; a zero denominator yields 0
pub fn decode_rational(value: &Value) -> Option<i64> {
    let num = int_like(value.get("num")?)?;
    let den = int_like(value.get("den")?)?;
    if den == 0 {
        return Some(0);
    }
    let quotient = num.checked_div(den)?;
    if num % den != 0 && ((num < 0) != (den < 0)) {
        Some(quotient - 1)
    } else {
        Some(quotient)
    }
}

fn plain_program_var(meta: &Value) -> Option<String> {
    let tag = meta.get(0)?.as_str()?;
    if tag != "ProgramVar" {
        return None;
    }
    meta.get(1)?.get("plain")?.as_str().map(str::to_string)
}

/// `[lvar, [[[kind, meta], [child, ..]], ..]]`
fn decode_heap_entry(entry: &Value) -> Option<HeapEntry> {
    let parent = entry.get(0)?.as_str()?.to_string();
    let edges = entry
        .get(1)?
        .as_array()?
        .iter()
        .filter_map(|edge| {
            let access = edge.get(0)?;
            let child = edge.get(1)?.get(0)?.as_str()?.to_string();
            let label = match access.get(0)?.as_str()? {
                "Dereference" => EdgeLabel::Dereference,
                "FieldAccess" => {
                    EdgeLabel::Field(access.get(1)?.get("field_name")?.as_str()?.to_string())
                }
                _ => return None,
            };
            Some((label, child))
        })
        .collect();
    Some(HeapEntry { parent, edges })
}

/// `[["ProgramVar", {"plain": pvar}], [lvar, ..]]`
fn decode_stack_entry(entry: &Value) -> Option<StackBinding> {
    let pvar = plain_program_var(entry.get(0)?)?;
    let lvar = entry.get(1)?.get(0)?.as_str()?.to_string();
    Some(StackBinding { pvar, lvar })
}

fn decode_attribute(attr: &Value) -> Attribute {
    let tag = attr.get(0).and_then(Value::as_str).unwrap_or_default();
    match tag {
        "AddressOfStackVariable" => match attr.get(1).and_then(plain_program_var) {
            Some(pvar) => Attribute::AddressOfStackVariable(pvar),
            None => Attribute::Unrecognized(tag.to_string()),
        },
        "Allocated" => Attribute::Allocated,
        "Invalid" => Attribute::Invalid {
            reason: attr
                .get(1)
                .and_then(|info| info.get(0))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        other => Attribute::Unrecognized(other.to_string()),
    }
}

/// `[lvar, [attr, ..]]`
fn decode_attr_entry(entry: &Value) -> Option<AttributeEntry> {
    let lvar = entry.get(0)?.as_str()?.to_string();
    let attributes = entry.get(1)?.as_array()?.iter().map(decode_attribute).collect();
    Some(AttributeEntry { lvar, attributes })
}

/// `[[[lvar, rational], ..], rational]`
fn decode_lin_arith(value: &Value) -> Option<LinArith> {
    let vars = value
        .get(0)?
        .as_array()?
        .iter()
        .map(|component| {
            let lvar = component.get(0)?.as_str()?.to_string();
            let coefficient = decode_rational(component.get(1)?)?;
            Some((lvar, coefficient))
        })
        .collect::<Option<Vec<_>>>()?;
    let constant = decode_rational(value.get(1)?)?;
    Some(LinArith { vars, constant })
}

/// `["Const", rational]` or `["Linear", lin_arith]`; other term kinds unsupported
fn decode_term(value: &Value) -> Option<Term> {
    match value.get(0)?.as_str()? {
        "Const" => decode_rational(value.get(1)?).map(Term::Const),
        "Linear" => decode_lin_arith(value.get(1)?).map(Term::Linear),
        _ => None,
    }
}

/// `[kind, lhs_term, rhs_term]`
fn decode_atom(value: &Value) -> Option<Atom> {
    let kind = RelationKind::from_tag(value.get(0)?.as_str()?);
    let lhs = decode_term(value.get(1)?)?;
    let rhs = decode_term(value.get(2)?)?;
    Some(Atom { kind, lhs, rhs })
}

/// `[lvar, lin_arith]`
fn decode_linear_eq(value: &Value) -> Option<LinearEquation> {
    let lhs = value.get(0)?.as_str()?.to_string();
    let rhs = decode_lin_arith(value.get(1)?)?;
    Some(LinearEquation { lhs, rhs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_rational_floor_division() {
        assert_eq!(decode_rational(&json!({"num": 7, "den": 2})), Some(3));
        assert_eq!(decode_rational(&json!({"num": -7, "den": 2})), Some(-4));
        assert_eq!(decode_rational(&json!({"num": "5", "den": "1"})), Some(5));
        assert_eq!(decode_rational(&json!({"num": 5, "den": 0})), Some(0));
        assert_eq!(decode_rational(&json!({"num": "x", "den": 1})), None);
    }

    #[test]
    fn test_label_with_string_lines() {
        let raw: RawDisjunct = serde_json::from_value(json!([["Ok", ["10", 12]], null])).unwrap();
        assert_eq!(raw.label().unwrap(), DisjunctLabel::new("Ok", 10, 12));
        assert!(raw.content().is_none());
        assert!(raw.trace().is_empty());
    }

    #[test]
    fn test_bad_label_line_is_error() {
        let raw: RawDisjunct = serde_json::from_value(json!([["Ok", ["ten", 12]], null])).unwrap();
        assert!(raw.label().is_err());
    }

    #[test]
    fn test_state_decoding() {
        let state: RawState = serde_json::from_value(json!({
            "heap": [
                ["v1", [[["Dereference", {}], ["v2", {}]]]],
                ["v2", [
                    [["FieldAccess", {"field_name": "next"}], ["v3"]],
                    [["ArrayAccess", {}], ["v4"]]
                ]]
            ],
            "stack": [
                [["ProgramVar", {"plain": "p"}], ["v1", {}]],
                [["LogicalVar", {}], ["v9"]]
            ],
            "attrs": [
                ["v2", [["Allocated", ["CMalloc"]], ["Invalid", ["CFree", {}]]]],
                ["v5", [["AddressOfStackVariable", ["ProgramVar", {"plain": "buf"}]], ["MustBeValid"]]]
            ]
        }))
        .unwrap();

        let decoded = state.decode();
        assert_eq!(decoded.heap.len(), 2);
        assert_eq!(decoded.heap[1].edges, vec![(EdgeLabel::Field("next".into()), "v3".to_string())]);
        assert_eq!(
            decoded.stack,
            vec![StackBinding {
                pvar: "p".into(),
                lvar: "v1".into()
            }]
        );
        assert!(decoded.attrs[0].is_deallocated());
        assert_eq!(decoded.attrs[1].stack_roots().collect::<Vec<_>>(), vec!["buf"]);
        assert_eq!(
            decoded.attrs[1].attributes[1],
            Attribute::Unrecognized("MustBeValid".into())
        );
    }

    #[test]
    fn test_path_condition_decoding_skips_unsupported_terms() {
        let pc: RawPathCondition = serde_json::from_value(json!({
            "both": {
                "linear_eqs": [["v3", [[["v1", {"num": 1, "den": 1}]], {"num": 4, "den": 1}]]],
                "atoms": [
                    ["LessEqual", ["Const", {"num": 0, "den": 1}], ["Linear", [[["v1", {"num": 1, "den": 1}]], {"num": 0, "den": 1}]]],
                    ["LessThan", ["Mult", []], ["Const", {"num": 0, "den": 1}]]
                ]
            },
            "pruned": [["NotEqual", ["Linear", [[["v2", {"num": 1, "den": 1}]], {"num": 0, "den": 1}]], ["Const", {"num": 0, "den": 1}]]]
        }))
        .unwrap();

        let decoded = pc.decode();
        assert_eq!(
            decoded.linear_eqs,
            vec![LinearEquation {
                lhs: "v3".into(),
                rhs: LinArith {
                    vars: vec![("v1".into(), 1)],
                    constant: 4
                }
            }]
        );
        assert_eq!(decoded.atoms.len(), 1);
        assert_eq!(decoded.atoms[0].kind, RelationKind::LessEqual);
        assert_eq!(decoded.pruned[0].rhs, Term::Const(0));
    }

    #[test]
    fn test_content_defaults() {
        let raw: RawDisjunct = serde_json::from_value(json!([["ErrorException", [1, 1]], {}])).unwrap();
        let content = raw.content().unwrap();
        assert!(content.post.decode().heap.is_empty());
        assert_eq!(content.path_condition.decode(), PathCondition::default());
    }

    #[test]
    fn test_trace() {
        let raw: RawDisjunct =
            serde_json::from_value(json!([["Ok", [1, 9]], {"full_trace": [3, "4", null, 9]}])).unwrap();
        assert_eq!(raw.trace(), vec![3, 4, 9]);
    }
}
