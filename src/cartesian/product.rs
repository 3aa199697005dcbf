//! Lazy cartesian product
//!
//! Enumerates the product like an odometer: the last input turns fastest,
//! and when it runs out it is rewound and the one before it steps once.
//! The first input is read a single time; every other input is replayed
//! from its own recording, so no source is pulled twice. Inputs are made
//! distinct on the way in, which makes the product distinct.

use std::cell::Cell;
use std::mem;

use crate::buffer::ListBufferedResults;
use crate::distinct::HashDistinctResults;
use crate::observability::{log_event_with_fields, Event};
use crate::results::{
    BoxedResettable, BoxedResults, CloseErrors, CollectionResults, Results, ResultsError,
    ResultsResult,
};
use crate::solution::{Solution, SolutionFactory, VarNames};

/// One dimension of a cartesian product
pub struct CartesianInput {
    pub results: BoxedResults,
    /// An empty optional input yields one unbound filler instead of
    /// emptying the whole product
    pub optional: bool,
}

impl CartesianInput {
    pub fn required(results: BoxedResults) -> Self {
        Self {
            results,
            optional: false,
        }
    }

    pub fn optional(results: BoxedResults) -> Self {
        Self {
            results,
            optional: true,
        }
    }
}

/// Cursor over one dimension. Only inner dimensions are ever rewound.
enum Dimension {
    Outer(BoxedResults),
    Inner(BoxedResettable),
}

impl Dimension {
    fn has_next(&mut self) -> ResultsResult<bool> {
        match self {
            Dimension::Outer(r) => r.has_next(),
            Dimension::Inner(r) => r.has_next(),
        }
    }

    fn next(&mut self) -> ResultsResult<Solution> {
        match self {
            Dimension::Outer(r) => r.next(),
            Dimension::Inner(r) => r.next(),
        }
    }

    fn rewind(&mut self) -> ResultsResult<()> {
        match self {
            // The outer dimension is never rewound.
            Dimension::Outer(_) => Ok(()),
            Dimension::Inner(r) => r.reset(true),
        }
    }

    fn ready_count(&self) -> usize {
        match self {
            Dimension::Outer(r) => r.ready_count(),
            Dimension::Inner(r) => r.ready_count(),
        }
    }

    fn waits_on_producers(&self) -> bool {
        match self {
            Dimension::Outer(r) => r.waits_on_producers(),
            Dimension::Inner(r) => r.waits_on_producers(),
        }
    }

    fn is_ordered(&self) -> bool {
        match self {
            Dimension::Outer(r) => r.is_ordered(),
            Dimension::Inner(r) => r.is_ordered(),
        }
    }

    fn var_names(&self) -> &VarNames {
        match self {
            Dimension::Outer(r) => r.var_names(),
            Dimension::Inner(r) => r.var_names(),
        }
    }

    fn close(&mut self) -> ResultsResult<()> {
        match self {
            Dimension::Outer(r) => r.close(),
            Dimension::Inner(r) => r.close(),
        }
    }

    /// One-shot stream holding `filler`, in the same position
    fn filler(&self, filler: Solution) -> Dimension {
        let stream = CollectionResults::singleton(filler);
        match self {
            Dimension::Outer(_) => Dimension::Outer(Box::new(stream)),
            Dimension::Inner(_) => Dimension::Inner(Box::new(stream)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Running,
    Exhausted,
}

/// Cartesian product of disjoint inputs, enumerated lazily
pub struct LazyCartesianResults {
    factory: SolutionFactory,
    dimensions: Vec<Dimension>,
    optional: Vec<bool>,
    current: Vec<Option<Solution>>,
    /// Empty optional inputs swapped out for fillers, closed with the rest
    replaced: Vec<Dimension>,
    pending: Option<Solution>,
    state: State,
    ordered: bool,
    overflow_warned: Cell<bool>,
    closed: bool,
}

impl LazyCartesianResults {
    /// Build the product; nothing is pulled until the first `has_next`
    ///
    /// Fails with `OverlappingVariables` if two inputs share a variable.
    /// The inputs are closed in that case.
    pub fn new(inputs: Vec<CartesianInput>) -> ResultsResult<Self> {
        let mut seen = VarNames::empty();
        let mut overlapping: Vec<String> = Vec::new();
        for input in &inputs {
            let vars = input.results.var_names();
            for name in seen.intersection(vars) {
                if !overlapping.contains(&name) {
                    overlapping.push(name);
                }
            }
            seen = seen.union(vars);
        }
        if !overlapping.is_empty() {
            let mut errors = CloseErrors::new();
            for mut input in inputs {
                errors.close(&mut input.results);
            }
            let _ = errors.into_result();
            return Err(ResultsError::OverlappingVariables(overlapping));
        }

        let mut dimensions = Vec::with_capacity(inputs.len());
        let mut optional = Vec::with_capacity(inputs.len());
        for (index, input) in inputs.into_iter().enumerate() {
            optional.push(input.optional);
            dimensions.push(wrap(index, input.results));
        }

        let factory = SolutionFactory::composition(
            dimensions.iter().map(|d| d.var_names().clone()).collect(),
        );
        let ordered = dimensions.iter().all(Dimension::is_ordered);

        Ok(Self {
            factory,
            current: vec![None; dimensions.len()],
            dimensions,
            optional,
            replaced: Vec::new(),
            pending: None,
            state: State::Fresh,
            ordered,
            overflow_warned: Cell::new(false),
            closed: false,
        })
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions.len()
    }

    /// Pull the first solution of every dimension, in order
    fn initialize(&mut self) -> ResultsResult<bool> {
        for index in 0..self.dimensions.len() {
            if self.dimensions[index].has_next()? {
                self.current[index] = Some(self.dimensions[index].next()?);
                continue;
            }
            if !self.optional[index] {
                log_event_with_fields(
                    Event::CartesianEmptyDimension,
                    &[("dimension", &index.to_string())],
                );
                return Ok(false);
            }

            let filler = Solution::unbound(self.dimensions[index].var_names().clone());
            let replacement = self.dimensions[index].filler(filler);
            let original = mem::replace(&mut self.dimensions[index], replacement);
            self.replaced.push(original);
            self.current[index] = Some(self.dimensions[index].next()?);
        }
        Ok(true)
    }

    /// Odometer step: innermost dimension first, carrying leftwards
    fn advance(&mut self) -> ResultsResult<bool> {
        for index in (0..self.dimensions.len()).rev() {
            if self.dimensions[index].has_next()? {
                self.current[index] = Some(self.dimensions[index].next()?);
                return Ok(true);
            }
            if index == 0 {
                return Ok(false);
            }
            self.dimensions[index].rewind()?;
            if !self.dimensions[index].has_next()? {
                return Ok(false);
            }
            self.current[index] = Some(self.dimensions[index].next()?);
        }
        Ok(false)
    }

    fn assemble(&self) -> Solution {
        let parts: Vec<&Solution> = self.current.iter().flatten().collect();
        self.factory.compose(&parts)
    }
}

/// Make an input distinct, and replayable unless it is the outer one
fn wrap(index: usize, results: BoxedResults) -> Dimension {
    let distinct = results.is_distinct();
    if index == 0 {
        if distinct {
            Dimension::Outer(results)
        } else {
            Dimension::Outer(Box::new(HashDistinctResults::new(results)))
        }
    } else if distinct {
        Dimension::Inner(Box::new(ListBufferedResults::new(results)))
    } else {
        Dimension::Inner(Box::new(HashDistinctResults::new(results)))
    }
}

impl Results for LazyCartesianResults {
    fn var_names(&self) -> &VarNames {
        self.factory.output()
    }

    fn has_next(&mut self) -> ResultsResult<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        if self.closed {
            return Ok(false);
        }
        let found = match self.state {
            State::Exhausted => return Ok(false),
            State::Fresh => {
                self.state = State::Running;
                self.initialize()?
            }
            State::Running => self.advance()?,
        };
        if found {
            self.pending = Some(self.assemble());
        } else {
            self.state = State::Exhausted;
        }
        Ok(found)
    }

    fn next(&mut self) -> ResultsResult<Solution> {
        if !self.has_next()? {
            return Err(ResultsError::EmptyStream);
        }
        self.pending.take().ok_or(ResultsError::EmptyStream)
    }

    fn ready_count(&self) -> usize {
        let product = self
            .dimensions
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(d.ready_count()));
        match product {
            Some(count) => count,
            None => {
                if !self.overflow_warned.replace(true) {
                    log_event_with_fields(
                        Event::CartesianReadyOverflow,
                        &[("dimensions", &self.dimensions.len().to_string())],
                    );
                }
                usize::MAX
            }
        }
    }

    fn waits_on_producers(&self) -> bool {
        self.dimensions.iter().any(Dimension::waits_on_producers)
    }

    fn is_ordered(&self) -> bool {
        self.ordered
    }

    fn is_distinct(&self) -> bool {
        true
    }

    fn close(&mut self) -> ResultsResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.pending = None;
        self.state = State::Exhausted;

        let mut errors = CloseErrors::new();
        for dimension in self.dimensions.iter_mut().chain(self.replaced.iter_mut()) {
            errors.record(dimension.close());
        }
        errors.into_result()
    }
}
