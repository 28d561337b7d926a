//! Test data builders
//!
//! Builders producing analyzer-shaped summary JSON.

use serde_json::{json, Value};

/// `{num, den}` with den 1
pub fn rational(value: i64) -> Value {
    json!({"num": value, "den": 1})
}

pub fn const_term(value: i64) -> Value {
    json!(["Const", rational(value)])
}

/// `["Linear", [[[lvar, coeff], ..], constant]]`
pub fn linear_term(vars: &[(&str, i64)], constant: i64) -> Value {
    json!(["Linear", lin_arith(vars, constant)])
}

pub fn lin_arith(vars: &[(&str, i64)], constant: i64) -> Value {
    let vars: Vec<Value> = vars.iter().map(|(v, c)| json!([v, rational(*c)])).collect();
    json!([vars, rational(constant)])
}

/// Builder for one `[label, content]` disjunct
#[derive(Debug, Clone)]
pub struct DisjunctBuilder {
    text: String,
    start: i64,
    end: i64,
    empty: bool,
    heap: Vec<(String, Vec<Value>)>,
    stack: Vec<Value>,
    attrs: Vec<(String, Vec<Value>)>,
    linear_eqs: Vec<Value>,
    atoms: Vec<Value>,
    pruned: Vec<Value>,
    trace: Vec<i64>,
}

impl DisjunctBuilder {
    pub fn new(text: &str, start: i64, end: i64) -> Self {
        Self {
            text: text.to_string(),
            start,
            end,
            empty: false,
            heap: Vec::new(),
            stack: Vec::new(),
            attrs: Vec::new(),
            linear_eqs: Vec::new(),
            atoms: Vec::new(),
            pruned: Vec::new(),
            trace: Vec::new(),
        }
    }

    /// Disjunct whose content is `null`
    pub fn without_content(mut self) -> Self {
        self.empty = true;
        self
    }

    fn edge(mut self, parent: &str, edge: Value) -> Self {
        match self.heap.iter_mut().find(|(p, _)| p == parent) {
            Some((_, edges)) => edges.push(edge),
            None => self.heap.push((parent.to_string(), vec![edge])),
        }
        self
    }

    pub fn deref(self, parent: &str, child: &str) -> Self {
        self.edge(parent, json!([["Dereference", {}], [child, {}]]))
    }

    pub fn field(self, parent: &str, field: &str, child: &str) -> Self {
        self.edge(parent, json!([["FieldAccess", {"field_name": field}], [child, {}]]))
    }

    pub fn stack(mut self, pvar: &str, lvar: &str) -> Self {
        self.stack
            .push(json!([["ProgramVar", {"plain": pvar}], [lvar, {}]]));
        self
    }

    fn attr(mut self, lvar: &str, attr: Value) -> Self {
        match self.attrs.iter_mut().find(|(l, _)| l == lvar) {
            Some((_, attrs)) => attrs.push(attr),
            None => self.attrs.push((lvar.to_string(), vec![attr])),
        }
        self
    }

    pub fn allocated(self, lvar: &str) -> Self {
        self.attr(lvar, json!(["Allocated", ["CMalloc", {}]]))
    }

    pub fn freed(self, lvar: &str) -> Self {
        self.attr(lvar, json!(["Invalid", ["CFree", {}]]))
    }

    pub fn stack_address(self, lvar: &str, pvar: &str) -> Self {
        self.attr(
            lvar,
            json!(["AddressOfStackVariable", ["ProgramVar", {"plain": pvar}], {}]),
        )
    }

    pub fn atom(mut self, kind: &str, lhs: Value, rhs: Value) -> Self {
        self.atoms.push(json!([kind, lhs, rhs]));
        self
    }

    pub fn pruned(mut self, kind: &str, lhs: Value, rhs: Value) -> Self {
        self.pruned.push(json!([kind, lhs, rhs]));
        self
    }

    pub fn linear_eq(mut self, lvar: &str, vars: &[(&str, i64)], constant: i64) -> Self {
        self.linear_eqs.push(json!([lvar, lin_arith(vars, constant)]));
        self
    }

    pub fn trace(mut self, lines: &[i64]) -> Self {
        self.trace = lines.to_vec();
        self
    }

    pub fn build(self) -> Value {
        let label = json!([self.text, [self.start, self.end]]);
        if self.empty {
            return json!([label, null]);
        }
        let heap: Vec<Value> = self.heap.into_iter().map(|(p, e)| json!([p, e])).collect();
        let attrs: Vec<Value> = self.attrs.into_iter().map(|(l, a)| json!([l, a])).collect();
        json!([
            label,
            {
                "post": {"heap": heap, "stack": self.stack, "attrs": attrs},
                "path_condition": {
                    "both": {"linear_eqs": self.linear_eqs, "atoms": self.atoms},
                    "pruned": self.pruned
                },
                "full_trace": self.trace
            }
        ])
    }
}

/// Builder for a whole summary document
#[derive(Debug, Clone, Default)]
pub struct SummaryBuilder {
    disjuncts: Vec<Value>,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, disjunct: DisjunctBuilder) -> Self {
        self.disjuncts.push(disjunct.build());
        self
    }

    pub fn build(self) -> String {
        Value::Array(self.disjuncts).to_string()
    }
}
