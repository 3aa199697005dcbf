//! CLI command implementations
//!
//! `run` builds the plan, streams every solution to stdout and always
//! closes the root stream and the executor before reporting. `check`
//! builds the plan on the sequential executor, so no producer threads
//! start, and closes it without pulling.

use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use uuid::Uuid;

use crate::config::ExecutionConfig;
use crate::observability::{Logger, MetricsSnapshot, ObservationScope};
use crate::plan::{PlanBuilder, PlanNode};
use crate::results::{BoxedResults, Results, ResultsIter};
use crate::solution::VarNames;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::write_line;

/// Final line of a `run`
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub count: u64,
    pub vars: VarNames,
    pub metrics: MetricsSnapshot,
}

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a parsed command against stdout
pub fn run_command(cmd: Command) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cmd {
        Command::Run { plan, config } => {
            let config = load_config(config.as_deref())?;
            let plan = PlanNode::load(&plan)?;
            execute(&plan, &config, &mut out)?;
        }
        Command::Check { plan, config } => {
            let config = load_config(config.as_deref())?;
            let plan = PlanNode::load(&plan)?;
            let vars = check(&plan, &config)?;
            write_line(
                &mut out,
                &serde_json::json!({ "status": "ok", "op": plan.op(), "vars": vars }),
            )?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Load the configuration (defaults without a file) and apply its log level
fn load_config(path: Option<&Path>) -> CliResult<ExecutionConfig> {
    let config = match path {
        Some(path) => ExecutionConfig::load(path)?,
        None => ExecutionConfig::default(),
    };
    Logger::set_min_severity(config.severity()?);
    Ok(config)
}

/// Stream `plan` to `out` as JSON lines, followed by the summary line
pub fn execute<W: Write>(
    plan: &PlanNode,
    config: &ExecutionConfig,
    out: &mut W,
) -> CliResult<RunSummary> {
    let run_id = Uuid::new_v4();
    let run_id_str = run_id.to_string();
    let scope = ObservationScope::with_fields("RUN", &[("op", plan.op()), ("run_id", &run_id_str)]);

    let outcome = PlanBuilder::from_config(config)
        .map_err(CliError::from)
        .and_then(|builder| {
            let streamed = stream(&builder, plan, &mut *out);
            builder.executor().close();
            streamed.map(|(count, vars)| RunSummary {
                run_id,
                count,
                vars,
                metrics: builder.executor().metrics(),
            })
        })
        .and_then(|summary| write_line(&mut *out, &summary).map(|()| summary));

    match outcome {
        Ok(summary) => {
            scope.complete_with_fields(&[("count", &summary.count.to_string())]);
            Ok(summary)
        }
        Err(err) => {
            scope.fail(&err.to_string());
            Err(err)
        }
    }
}

/// Build `plan` without running it and return its output variables
pub fn check(plan: &PlanNode, config: &ExecutionConfig) -> CliResult<VarNames> {
    let builder = PlanBuilder::sequential(config);
    let mut root = builder.build(plan)?;
    let vars = root.var_names().clone();
    root.close()?;
    Ok(vars)
}

fn stream<W: Write>(
    builder: &PlanBuilder,
    plan: &PlanNode,
    out: &mut W,
) -> CliResult<(u64, VarNames)> {
    let mut root = builder.build(plan)?;
    let vars = root.var_names().clone();

    let written = write_all(&mut root, out);
    let closed = root.close();

    let count = written?;
    closed?;
    Ok((count, vars))
}

fn write_all<W: Write>(root: &mut BoxedResults, out: &mut W) -> CliResult<u64> {
    let mut count = 0;
    for solution in ResultsIter::new(root) {
        write_line(out, &solution?)?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutorKind;
    use crate::executor::FaultPolicy;

    fn config(executor: ExecutorKind) -> ExecutionConfig {
        ExecutionConfig {
            executor,
            worker_threads: 2,
            ..ExecutionConfig::default()
        }
    }

    const PLAN: &str = r#"{
        "op": "project",
        "vars": ["b", "a"],
        "input": {
            "op": "cartesian",
            "inputs": [
                {"node": {"op": "values", "vars": ["a"], "rows": [[{"type": "iri", "value": "a1"}], [{"type": "iri", "value": "a2"}]]}},
                {"node": {"op": "values", "vars": ["b"], "rows": [[{"type": "literal", "value": "b1"}]]}}
            ]
        }
    }"#;

    #[test]
    fn test_execute_writes_solutions_then_summary() {
        let plan = PlanNode::from_json(PLAN).unwrap();
        let mut out = Vec::new();

        let summary = execute(&plan, &config(ExecutorKind::Sequential), &mut out).unwrap();
        assert_eq!(summary.count, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["a"]["value"], "a1");
        assert_eq!(lines[0]["b"]["value"], "b1");
        assert_eq!(lines[2]["count"], 2);
        assert_eq!(lines[2]["vars"], serde_json::json!(["b", "a"]));
        assert_eq!(lines[2]["run_id"], summary.run_id.to_string());
    }

    #[test]
    fn test_execute_union_on_buffered_executor() {
        let plan = PlanNode::from_json(
            r#"{"op": "union", "inputs": [
                {"op": "values", "vars": ["x"], "rows": [[{"type": "blank", "value": "n1"}], [{"type": "blank", "value": "n2"}]]},
                {"op": "values", "vars": ["x"], "rows": [[{"type": "blank", "value": "n3"}]]}
            ]}"#,
        )
        .unwrap();
        let mut out = Vec::new();

        let summary = execute(&plan, &config(ExecutorKind::Buffered), &mut out).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.metrics.merges, 1);
        assert_eq!(summary.metrics.solutions_delivered, 3);
    }

    #[test]
    fn test_check_reports_vars_without_pulling() {
        let plan = PlanNode::from_json(PLAN).unwrap();
        let vars = check(&plan, &config(ExecutorKind::Buffered)).unwrap();
        assert_eq!(vars.to_string(), "[b, a]");
    }

    #[test]
    fn test_build_failure_is_a_plan_error() {
        let plan = PlanNode::from_json(
            r#"{"op": "filter", "predicates": [{"kind": "bound", "var": "missing"}],
                "input": {"op": "values", "vars": ["x"], "rows": []}}"#,
        )
        .unwrap();
        let mut out = Vec::new();

        let err = execute(&plan, &config(ExecutorKind::Sequential), &mut out).unwrap_err();
        assert_eq!(err.code_str(), "FED_CLI_PLAN_ERROR");
        assert!(out.is_empty());
    }

    #[test]
    fn test_propagated_policy_in_config() {
        let config = ExecutionConfig {
            fault_policy: FaultPolicy::Propagate,
            ..config(ExecutorKind::Buffered)
        };
        let plan = PlanNode::from_json(r#"{"op": "values", "vars": [], "rows": [[]]}"#).unwrap();
        let mut out = Vec::new();

        let summary = execute(&plan, &config, &mut out).unwrap();
        assert_eq!(summary.count, 1);
    }
}
