//! Operator tree construction

use std::sync::Arc;

use crate::buffer::LimitResults;
use crate::cartesian::{CartesianInput, LazyCartesianResults};
use crate::config::ExecutionConfig;
use crate::distinct::{HashDistinctResults, WindowDistinctResults};
use crate::executor::{ResultsExecutor, SequentialResultsExecutor};
use crate::results::{BoxedResults, CloseErrors, CollectionResults, Results};
use crate::solution::{Solution, VarNames};
use crate::transform::{AskResults, FilteredResults, ProjectionResults};

use super::errors::PlanResult;
use super::node::PlanNode;
use super::predicate;

/// Turns plan documents into results trees
///
/// `union` nodes fan in through the builder's executor; every other node
/// maps to one combinator running on the caller's thread. Nothing is
/// pulled while building, but a buffered `union` starts its producers.
pub struct PlanBuilder {
    executor: Arc<dyn ResultsExecutor>,
    buffer_size: usize,
    window_size: usize,
}

impl PlanBuilder {
    pub fn new(executor: Arc<dyn ResultsExecutor>, config: &ExecutionConfig) -> Self {
        Self {
            executor,
            buffer_size: config.buffer_size,
            window_size: config.window_size,
        }
    }

    /// Builder with the executor `config` names
    pub fn from_config(config: &ExecutionConfig) -> PlanResult<Self> {
        Ok(Self::new(config.build_executor()?, config))
    }

    /// Builder that never starts threads, for validation
    pub fn sequential(config: &ExecutionConfig) -> Self {
        Self::new(Arc::new(SequentialResultsExecutor::new()), config)
    }

    pub fn executor(&self) -> &Arc<dyn ResultsExecutor> {
        &self.executor
    }

    pub fn build(&self, node: &PlanNode) -> PlanResult<BoxedResults> {
        match node {
            PlanNode::Values { vars, rows } => {
                let items = rows
                    .iter()
                    .map(|row| Solution::new(vars.clone(), row.clone()))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Box::new(CollectionResults::new(vars.clone(), items)))
            }
            PlanNode::Union { inputs } => {
                let (children, vars) = self.build_aligned(inputs)?;
                Ok(self.executor.merge(children, vars, self.buffer_size))
            }
            PlanNode::Concat { inputs } => {
                let (children, vars) = self.build_aligned(inputs)?;
                Ok(SequentialResultsExecutor::new().merge(children, vars, self.buffer_size))
            }
            PlanNode::Project { vars, input } => {
                let source = self.build(input)?;
                Ok(Box::new(ProjectionResults::new(source, vars.clone())))
            }
            PlanNode::Filter { predicates, input } => {
                let mut source = self.build(input)?;
                let compiled = predicates
                    .iter()
                    .map(|spec| predicate::compile(spec, source.var_names()))
                    .collect::<PlanResult<Vec<_>>>();
                match compiled {
                    Ok(compiled) => Ok(Box::new(FilteredResults::new(source, compiled))),
                    Err(err) => {
                        let _ = source.close();
                        Err(err)
                    }
                }
            }
            PlanNode::Distinct {
                input,
                exact,
                window,
            } => {
                let source = self.build(input)?;
                if *exact {
                    Ok(Box::new(HashDistinctResults::new(source)))
                } else {
                    let window = window.unwrap_or(self.window_size);
                    Ok(Box::new(WindowDistinctResults::with_window(source, window)))
                }
            }
            PlanNode::Limit { n, input } => {
                Ok(Box::new(LimitResults::new(self.build(input)?, *n)))
            }
            PlanNode::Cartesian { inputs } => {
                let mut built = Vec::with_capacity(inputs.len());
                for spec in inputs {
                    match self.build(&spec.node) {
                        Ok(results) => built.push(CartesianInput {
                            results,
                            optional: spec.optional,
                        }),
                        Err(err) => {
                            close_quietly(built.into_iter().map(|input| input.results));
                            return Err(err);
                        }
                    }
                }
                Ok(Box::new(LazyCartesianResults::new(built)?))
            }
            PlanNode::Ask { input } => Ok(Box::new(AskResults::new(self.build(input)?))),
        }
    }

    /// Build every input and project each onto the union of their variables
    fn build_aligned(&self, inputs: &[PlanNode]) -> PlanResult<(Vec<BoxedResults>, VarNames)> {
        let mut built: Vec<BoxedResults> = Vec::with_capacity(inputs.len());
        for node in inputs {
            match self.build(node) {
                Ok(results) => built.push(results),
                Err(err) => {
                    close_quietly(built);
                    return Err(err);
                }
            }
        }

        let vars = built
            .iter()
            .fold(VarNames::empty(), |acc, child| acc.union(child.var_names()));
        let aligned = built
            .into_iter()
            .map(|child| -> BoxedResults {
                if *child.var_names() == vars {
                    child
                } else {
                    Box::new(ProjectionResults::new(child, vars.clone()))
                }
            })
            .collect();
        Ok((aligned, vars))
    }
}

/// Release subtrees built before a failure; the failure is what gets reported
fn close_quietly<I: IntoIterator<Item = BoxedResults>>(children: I) {
    let mut errors = CloseErrors::new();
    for mut child in children {
        errors.close(&mut child);
    }
    let _ = errors.into_result();
}
