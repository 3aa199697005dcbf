//! Operator tree documents
//!
//! ```json
//! {
//!   "op": "cartesian",
//!   "inputs": [
//!     { "node": { "op": "values", "vars": ["a"], "rows": [[{"type": "iri", "value": "e1"}]] } },
//!     { "optional": true, "node": { "op": "values", "vars": ["b"], "rows": [] } }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::solution::{Term, VarNames};

use super::errors::{PlanError, PlanResult};

/// One node of an operator tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PlanNode {
    /// Literal table; `null` cells are unbound
    Values {
        vars: VarNames,
        #[serde(default)]
        rows: Vec<Vec<Option<Term>>>,
    },
    /// Fan-in through the configured executor
    Union { inputs: Vec<PlanNode> },
    /// Fan-in by concatenation, in input order
    Concat { inputs: Vec<PlanNode> },
    Project {
        vars: VarNames,
        input: Box<PlanNode>,
    },
    Filter {
        predicates: Vec<PredicateSpec>,
        input: Box<PlanNode>,
    },
    /// Windowed distinct unless `exact`
    Distinct {
        input: Box<PlanNode>,
        #[serde(default)]
        exact: bool,
        #[serde(default)]
        window: Option<usize>,
    },
    Limit { n: usize, input: Box<PlanNode> },
    Cartesian { inputs: Vec<CartesianSpec> },
    Ask { input: Box<PlanNode> },
}

/// One dimension of a `cartesian` node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartesianSpec {
    #[serde(default)]
    pub optional: bool,
    pub node: PlanNode,
}

/// Filter predicates over a single variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredicateSpec {
    Bound { var: String },
    Unbound { var: String },
    Equals { var: String, value: Term },
    /// Regular expression over the lexical form
    Matches { var: String, pattern: String },
}

impl PredicateSpec {
    pub fn var(&self) -> &str {
        match self {
            PredicateSpec::Bound { var }
            | PredicateSpec::Unbound { var }
            | PredicateSpec::Equals { var, .. }
            | PredicateSpec::Matches { var, .. } => var,
        }
    }
}

impl PlanNode {
    pub fn load(path: &Path) -> PlanResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| PlanError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> PlanResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Operator name as written in documents
    pub fn op(&self) -> &'static str {
        match self {
            PlanNode::Values { .. } => "values",
            PlanNode::Union { .. } => "union",
            PlanNode::Concat { .. } => "concat",
            PlanNode::Project { .. } => "project",
            PlanNode::Filter { .. } => "filter",
            PlanNode::Distinct { .. } => "distinct",
            PlanNode::Limit { .. } => "limit",
            PlanNode::Cartesian { .. } => "cartesian",
            PlanNode::Ask { .. } => "ask",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_plan() {
        let plan = PlanNode::from_json(
            r#"{
                "op": "limit",
                "n": 2,
                "input": {
                    "op": "filter",
                    "predicates": [{"kind": "matches", "var": "x", "pattern": "^a"}],
                    "input": {"op": "values", "vars": ["x"], "rows": [[{"type": "literal", "value": "ab"}], [null]]}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(plan.op(), "limit");
        let PlanNode::Limit { input, .. } = plan else {
            panic!("not a limit");
        };
        let PlanNode::Filter { predicates, input } = *input else {
            panic!("not a filter");
        };
        assert_eq!(predicates[0].var(), "x");
        let PlanNode::Values { rows, .. } = *input else {
            panic!("not values");
        };
        assert_eq!(rows[1], vec![None]);
    }

    #[test]
    fn test_duplicate_vars_rejected() {
        assert!(PlanNode::from_json(r#"{"op": "values", "vars": ["x", "x"]}"#).is_err());
    }

    #[test]
    fn test_unknown_op_rejected() {
        let err = PlanNode::from_json(r#"{"op": "sort", "input": null}"#).unwrap_err();
        assert_eq!(err.code(), "FED_PLAN_PARSE");
    }
}
