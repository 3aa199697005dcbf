//! Stream properties that hold for every combinator
//!
//! Test Categories:
//! 1. Idempotent has_next
//! 2. Cartesian enumeration
//! 3. Duplicate elimination
//! 4. Limit and replay
//! 5. Close after partial consumption

mod common;

use common::{int_of, ints, vars, Probe, TrackedSource};

use fedstream::buffer::{LimitResults, ListBufferedResults};
use fedstream::cartesian::{CartesianInput, LazyCartesianResults};
use fedstream::distinct::{HashDistinctResults, WindowDistinctResults};
use fedstream::executor::{ResultsExecutor, SequentialResultsExecutor};
use fedstream::results::{
    drain, BoxedResults, CollectionResults, ResettableResults, Results, ResultsError,
    ResultsResult,
};
use fedstream::solution::Solution;
use fedstream::transform::{
    AskResults, FilteredResults, FlatMapResults, ProjectionResults, TransformedResults,
};

fn source(name: &str, values: &[i64], probe: &Probe) -> BoxedResults {
    Box::new(TrackedSource::ints(name, values, probe))
}

fn values_of(items: &[Solution], name: &str) -> Vec<Option<i64>> {
    items.iter().map(|s| int_of(s, name)).collect()
}

// =============================================================================
// IDEMPOTENT has_next
// =============================================================================

fn boxed<R: Results + 'static>(results: R) -> BoxedResults {
    Box::new(results)
}

/// Every combinator, freshly built over 3-item sources
fn every_combinator(probe: &Probe) -> Vec<(&'static str, BoxedResults)> {
    let x = vars(&["x"]);
    let src = |values: &[i64]| source("x", values, probe);

    let inner = |s: &Solution| -> ResultsResult<BoxedResults> {
        let item = s.clone();
        Ok(boxed(CollectionResults::new(item.var_names().clone(), vec![item])))
    };

    vec![
        ("list", boxed(ListBufferedResults::new(src(&[1, 2, 3])))),
        ("limit", boxed(LimitResults::new(src(&[1, 2, 3]), 2))),
        ("hash", boxed(HashDistinctResults::new(src(&[1, 2, 3])))),
        ("window", boxed(WindowDistinctResults::with_window(src(&[1, 2, 3]), 2))),
        ("project", boxed(ProjectionResults::new(src(&[1, 2, 3]), x.clone()))),
        (
            "filter",
            boxed(FilteredResults::with_predicate(src(&[1, 2, 3]), |_: &Solution| true)),
        ),
        (
            "transform",
            boxed(TransformedResults::new(src(&[1, 2, 3]), x.clone(), |s: &Solution| s.clone())),
        ),
        ("ask", boxed(AskResults::new(src(&[1, 2, 3])))),
        (
            "sequential",
            SequentialResultsExecutor::new().merge(vec![src(&[1]), src(&[2, 3])], x.clone(), 4),
        ),
        (
            "cartesian",
            boxed(
                LazyCartesianResults::new(vec![
                    CartesianInput::required(src(&[1, 2, 3])),
                    CartesianInput::required(source("y", &[7], probe)),
                ])
                .unwrap(),
            ),
        ),
        ("flat_map", boxed(FlatMapResults::new(src(&[1, 2, 3]), x, inner))),
    ]
}

#[test]
fn test_repeated_has_next_is_idempotent() {
    let probe = Probe::default();
    for (name, mut results) in every_combinator(&probe) {
        assert!(results.has_next().unwrap(), "{name} empty");
        let pulls = probe.pulls();
        for _ in 0..5 {
            assert!(results.has_next().unwrap(), "{name} changed its answer");
        }
        assert_eq!(probe.pulls(), pulls, "{name} pulled on a repeated has_next");

        let first = results.next().unwrap();
        assert_eq!(first.var_names(), results.var_names(), "{name}");
        results.close().unwrap();
    }
}

// =============================================================================
// CARTESIAN ENUMERATION
// =============================================================================

#[test]
fn test_cartesian_odometer_order() {
    let probe = Probe::default();
    let mut product = LazyCartesianResults::new(vec![
        CartesianInput::required(source("v1", &[1, 2], &probe)),
        CartesianInput::required(source("v2", &[10, 20, 30], &probe)),
    ])
    .unwrap();

    let items = drain(&mut product).unwrap();
    let pairs: Vec<(Option<i64>, Option<i64>)> = items
        .iter()
        .map(|s| (int_of(s, "v1"), int_of(s, "v2")))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (Some(1), Some(10)),
            (Some(1), Some(20)),
            (Some(1), Some(30)),
            (Some(2), Some(10)),
            (Some(2), Some(20)),
            (Some(2), Some(30)),
        ]
    );

    // Each source is pulled once; the inner one is replayed from memory.
    assert_eq!(probe.pulls(), 5);
    product.close().unwrap();
    assert_eq!(probe.closes(), 2);
}

#[test]
fn test_cartesian_empty_required_dimension() {
    let probe = Probe::default();
    let mut product = LazyCartesianResults::new(vec![
        CartesianInput::required(source("a", &[1, 2, 3, 4], &probe)),
        CartesianInput::required(source("b", &[], &probe)),
        CartesianInput::required(source("c", &[5, 6], &probe)),
    ])
    .unwrap();

    assert!(drain(&mut product).unwrap().is_empty());
    product.close().unwrap();
    assert_eq!(probe.closes(), 3);
}

#[test]
fn test_cartesian_empty_optional_dimension() {
    let probe = Probe::default();
    let mut product = LazyCartesianResults::new(vec![
        CartesianInput::required(source("a", &[1, 2, 3], &probe)),
        CartesianInput::optional(source("b", &[], &probe)),
    ])
    .unwrap();

    let items = drain(&mut product).unwrap();
    assert_eq!(items.len(), 3);
    for item in &items {
        assert!(item.var_names().contains("b"));
        assert!(!item.is_bound("b"));
        assert!(item.is_bound("a"));
    }
    product.close().unwrap();
    assert_eq!(probe.closes(), 2);
}

#[test]
fn test_cartesian_overlap_closes_inputs() {
    let probe = Probe::default();
    let err = LazyCartesianResults::new(vec![
        CartesianInput::required(source("a", &[1], &probe)),
        CartesianInput::required(source("a", &[2], &probe)),
    ])
    .err()
    .unwrap();

    assert!(matches!(err, ResultsError::OverlappingVariables(ref names) if names == &["a".to_string()]));
    assert_eq!(probe.closes(), 2);
}

// =============================================================================
// DUPLICATE ELIMINATION
// =============================================================================

#[test]
fn test_hash_distinct_first_occurrence_order() {
    let probe = Probe::default();
    let mut distinct = HashDistinctResults::new(source("x", &[1, 2, 1, 3, 2], &probe));

    let items = drain(&mut distinct).unwrap();
    assert_eq!(values_of(&items, "x"), vec![Some(1), Some(2), Some(3)]);
    assert!(distinct.is_distinct());
    distinct.close().unwrap();
}

#[test]
fn test_window_distinct_forgets_evicted_entries() {
    let probe = Probe::default();
    let mut distinct = WindowDistinctResults::with_window(source("x", &[1, 2, 3, 1], &probe), 2);

    let items = drain(&mut distinct).unwrap();
    assert_eq!(values_of(&items, "x"), vec![Some(1), Some(2), Some(3), Some(1)]);
    assert!(!distinct.is_distinct());
    distinct.close().unwrap();
}

#[test]
fn test_window_distinct_within_window() {
    let probe = Probe::default();
    let mut distinct = WindowDistinctResults::with_window(source("x", &[1, 2, 1, 2, 3], &probe), 2);

    let items = drain(&mut distinct).unwrap();
    assert_eq!(values_of(&items, "x"), vec![Some(1), Some(2), Some(3)]);
    distinct.close().unwrap();
}

#[test]
fn test_hash_distinct_replay() {
    let probe = Probe::default();
    let mut distinct = HashDistinctResults::new(source("x", &[4, 4, 5], &probe));

    assert_eq!(drain(&mut distinct).unwrap().len(), 2);
    distinct.reset(true).unwrap();
    assert_eq!(probe.closes(), 1);

    let replayed = drain(&mut distinct).unwrap();
    assert_eq!(values_of(&replayed, "x"), vec![Some(4), Some(5)]);
    assert_eq!(probe.pulls(), 3);
    distinct.close().unwrap();
    assert_eq!(probe.closes(), 1);
}

// =============================================================================
// LIMIT AND REPLAY
// =============================================================================

#[test]
fn test_limit_then_replay_without_repulling() {
    let probe = Probe::default();
    let mut limit = LimitResults::new(source("x", &[1, 2, 3, 4, 5], &probe), 2);

    let first = drain(&mut limit).unwrap();
    assert_eq!(values_of(&first, "x"), vec![Some(1), Some(2)]);
    assert_eq!(probe.pulls(), 2);

    limit.reset(true).unwrap();
    let again = drain(&mut limit).unwrap();
    assert_eq!(again, first);
    assert_eq!(probe.pulls(), 2);

    limit.close().unwrap();
    assert_eq!(probe.closes(), 1);
}

#[test]
fn test_list_buffer_refuses_early_reset() {
    let probe = Probe::default();
    let mut list = ListBufferedResults::new(source("x", &[1, 2, 3], &probe));

    list.next().unwrap();
    let err = list.reset(true).unwrap_err();
    assert!(matches!(err, ResultsError::IncompleteReplay));

    // Still live; finishing the source makes the reset legal.
    assert_eq!(drain(&mut list).unwrap().len(), 2);
    list.reset(true).unwrap();
    assert_eq!(drain(&mut list).unwrap().len(), 3);
    list.close().unwrap();
    assert_eq!(probe.closes(), 1);
}

// =============================================================================
// CLOSE AFTER PARTIAL CONSUMPTION
// =============================================================================

#[test]
fn test_close_after_partial_consumption() {
    for consumed in 0..2 {
        let probe = Probe::default();
        let combinators = every_combinator(&probe);
        let built = combinators.len();

        for (name, mut results) in combinators {
            for _ in 0..consumed {
                results.next().unwrap_or_else(|e| panic!("{name}: {e}"));
            }
            results.close().unwrap_or_else(|e| panic!("{name}: {e}"));
            results.close().unwrap_or_else(|e| panic!("{name} second close: {e}"));
        }

        // sequential and cartesian each own two tracked sources.
        assert_eq!(probe.closes(), built + 2, "consumed {consumed}");
    }
}

#[test]
fn test_ask_pulls_one_solution() {
    let probe = Probe::default();
    let mut ask = AskResults::new(source("x", &[1, 2, 3], &probe));

    assert_eq!(drain(&mut ask).unwrap(), vec![Solution::empty()]);
    assert_eq!(probe.pulls(), 1);
    ask.close().unwrap();

    let mut empty = AskResults::new(Box::new(CollectionResults::new(vars(&["x"]), ints("x", &[]))));
    assert!(drain(&mut empty).unwrap().is_empty());
}
