//! Index-based solution assembly
//!
//! Projection and cartesian assembly both build solutions over a fixed output
//! shape from one or more input solutions. The position of every input
//! variable in the output is computed once, when the factory is built, so the
//! per-solution work is a straight copy of values.

use super::solution::Solution;
use super::vars::VarNames;

/// Where the variables of one input shape land in the output
#[derive(Debug, Clone)]
struct InputShape {
    vars: VarNames,
    /// For each input position, the output position it fills (if kept)
    targets: Vec<Option<usize>>,
}

impl InputShape {
    fn new(vars: VarNames, output: &VarNames) -> Self {
        let targets = vars.iter().map(|name| output.index_of(name)).collect();
        Self { vars, targets }
    }
}

/// Builds solutions of one output shape from solutions of known input shapes
#[derive(Debug, Clone)]
pub struct SolutionFactory {
    output: VarNames,
    inputs: Vec<InputShape>,
}

impl SolutionFactory {
    /// Factory for re-expressing `input` solutions over `output`
    pub fn projection(input: VarNames, output: VarNames) -> Self {
        Self::with_output(vec![input], output)
    }

    /// Factory whose output is the union of `inputs`, in input order
    pub fn composition(inputs: Vec<VarNames>) -> Self {
        let output = inputs
            .iter()
            .fold(VarNames::empty(), |acc, vars| acc.union(vars));
        Self::with_output(inputs, output)
    }

    pub fn with_output(inputs: Vec<VarNames>, output: VarNames) -> Self {
        let inputs = inputs
            .into_iter()
            .map(|vars| InputShape::new(vars, &output))
            .collect();
        Self { output, inputs }
    }

    pub fn output(&self) -> &VarNames {
        &self.output
    }

    /// Re-express a single solution over the output shape
    pub fn project(&self, solution: &Solution) -> Solution {
        self.compose(&[solution])
    }

    /// Combine one solution per input shape into an output solution
    ///
    /// A part whose names differ from the shape the factory was built for
    /// (a source that did not honour its declared order) is mapped by name.
    pub fn compose(&self, parts: &[&Solution]) -> Solution {
        debug_assert_eq!(parts.len(), self.inputs.len());
        let mut values = vec![None; self.output.len()];

        for (shape, part) in self.inputs.iter().zip(parts) {
            let names = part.var_names();
            if names.ptr_eq(&shape.vars) || *names == shape.vars {
                for (value, target) in part.values().iter().zip(&shape.targets) {
                    if let (Some(target), Some(term)) = (target, value) {
                        values[*target] = Some(term.clone());
                    }
                }
            } else {
                for (target, name) in self.output.iter().enumerate() {
                    if let Some(term) = part.get(name) {
                        values[target] = Some(term.clone());
                    }
                }
            }
        }

        Solution::from_parts(self.output.clone(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::Term;

    fn vars(names: &[&str]) -> VarNames {
        VarNames::new(names.iter().copied()).unwrap()
    }

    #[test]
    fn test_projection_narrows_and_reorders() {
        let input = vars(&["a", "b", "c"]);
        let factory = SolutionFactory::projection(input.clone(), vars(&["c", "a"]));
        let s = Solution::new(
            input,
            vec![Some(Term::from(1)), Some(Term::from(2)), Some(Term::from(3))],
        )
        .unwrap();

        let out = factory.project(&s);
        assert_eq!(out.values(), &[Some(Term::from(3)), Some(Term::from(1))]);
    }

    #[test]
    fn test_projection_of_missing_variable_is_unbound() {
        let input = vars(&["a"]);
        let factory = SolutionFactory::projection(input.clone(), vars(&["a", "z"]));
        let s = Solution::new(input, vec![Some(Term::from(1))]).unwrap();

        assert_eq!(factory.project(&s).get("z"), None);
    }

    #[test]
    fn test_composition_concatenates() {
        let left = vars(&["a"]);
        let right = vars(&["b"]);
        let factory = SolutionFactory::composition(vec![left.clone(), right.clone()]);
        let l = Solution::new(left, vec![Some(Term::from(1))]).unwrap();
        let r = Solution::new(right, vec![Some(Term::from(2))]).unwrap();

        let out = factory.compose(&[&l, &r]);
        assert_eq!(&**out.var_names(), &["a".to_string(), "b".to_string()]);
        assert_eq!(out.get("b"), Some(&Term::from(2)));
    }

    #[test]
    fn test_mismatched_shape_falls_back_to_names() {
        let factory = SolutionFactory::projection(vars(&["a", "b"]), vars(&["b"]));
        let reordered =
            Solution::new(vars(&["b", "a"]), vec![Some(Term::from(9)), Some(Term::from(8))])
                .unwrap();

        assert_eq!(factory.project(&reordered).get("b"), Some(&Term::from(9)));
    }
}
