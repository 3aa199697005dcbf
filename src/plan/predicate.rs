//! Compilation of filter predicates

use regex::Regex;

use crate::solution::{Solution, Term, VarNames};
use crate::transform::SolutionPredicate;

use super::errors::{PlanError, PlanResult};
use super::node::PredicateSpec;

struct Bound {
    var: String,
}

impl SolutionPredicate for Bound {
    fn test(&self, solution: &Solution) -> bool {
        solution.is_bound(&self.var)
    }
}

struct Unbound {
    var: String,
}

impl SolutionPredicate for Unbound {
    fn test(&self, solution: &Solution) -> bool {
        !solution.is_bound(&self.var)
    }
}

struct Equals {
    var: String,
    value: Term,
}

impl SolutionPredicate for Equals {
    fn test(&self, solution: &Solution) -> bool {
        solution.get(&self.var) == Some(&self.value)
    }
}

/// Unbound values never match
struct Matches {
    var: String,
    regex: Regex,
}

impl SolutionPredicate for Matches {
    fn test(&self, solution: &Solution) -> bool {
        solution
            .get(&self.var)
            .is_some_and(|term| self.regex.is_match(term.lexical()))
    }
}

/// Compile `spec` against the variables of its input
pub fn compile(spec: &PredicateSpec, vars: &VarNames) -> PlanResult<Box<dyn SolutionPredicate>> {
    if !vars.contains(spec.var()) {
        return Err(PlanError::UnknownVariable {
            var: spec.var().to_string(),
            available: vars.to_string(),
        });
    }
    Ok(match spec {
        PredicateSpec::Bound { var } => Box::new(Bound { var: var.clone() }),
        PredicateSpec::Unbound { var } => Box::new(Unbound { var: var.clone() }),
        PredicateSpec::Equals { var, value } => Box::new(Equals {
            var: var.clone(),
            value: value.clone(),
        }),
        PredicateSpec::Matches { var, pattern } => {
            let regex = Regex::new(pattern).map_err(|e| PlanError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
            Box::new(Matches {
                var: var.clone(),
                regex,
            })
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(value: Option<Term>) -> Solution {
        Solution::new(VarNames::new(["x"]).unwrap(), vec![value]).unwrap()
    }

    #[test]
    fn test_bound_and_unbound() {
        let vars = VarNames::new(["x"]).unwrap();
        let bound = compile(&PredicateSpec::Bound { var: "x".into() }, &vars).unwrap();
        let unbound = compile(&PredicateSpec::Unbound { var: "x".into() }, &vars).unwrap();

        assert!(bound.test(&row(Some(Term::iri("a")))));
        assert!(!bound.test(&row(None)));
        assert!(unbound.test(&row(None)));
    }

    #[test]
    fn test_matches_lexical_form() {
        let vars = VarNames::new(["x"]).unwrap();
        let spec = PredicateSpec::Matches {
            var: "x".into(),
            pattern: "^http://".into(),
        };
        let p = compile(&spec, &vars).unwrap();

        assert!(p.test(&row(Some(Term::iri("http://example.org/a")))));
        assert!(!p.test(&row(Some(Term::literal("ftp://x")))));
        assert!(!p.test(&row(None)));
    }

    #[test]
    fn test_equals() {
        let vars = VarNames::new(["x"]).unwrap();
        let spec = PredicateSpec::Equals {
            var: "x".into(),
            value: Term::from(3),
        };
        let p = compile(&spec, &vars).unwrap();
        assert!(p.test(&row(Some(Term::from(3)))));
        assert!(!p.test(&row(Some(Term::literal("3")))));
    }

    #[test]
    fn test_unknown_variable_and_bad_pattern() {
        let vars = VarNames::new(["x"]).unwrap();
        let err = compile(&PredicateSpec::Bound { var: "y".into() }, &vars)
            .err()
            .unwrap();
        assert_eq!(err.code(), "FED_PLAN_UNKNOWN_VARIABLE");

        let spec = PredicateSpec::Matches {
            var: "x".into(),
            pattern: "(".into(),
        };
        assert_eq!(compile(&spec, &vars).err().unwrap().code(), "FED_PLAN_INVALID_PATTERN");
    }
}
