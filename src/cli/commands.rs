//! CLI command implementations
//!
//! The CLI is a thin host harness around [`SyncHook`]. It loads the
//! configuration once, builds the policy, and feeds revisions through the
//! hook. Decisions go to stdout; observer logs go to stderr.

use std::io::{self, BufRead, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::config::RouterConfig;
use crate::observability::{Event, LogObserver, Logger, RevisionObserver};
use crate::routing::{
    Clock, DocumentRevision, FixedClock, ResurrectionPolicy, RevisionMetadata,
    RoutingDecisionEngine, SyncHook, SystemClock,
};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{
    decode_line, read_json_file, read_lines, write_error, write_response, RevisionInput,
};

/// Counters for a `run` session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines routed
    pub routed: usize,
    /// Of which took the soft-delete path
    pub resurrections: usize,
    /// Lines answered with an error response
    pub rejected: usize,
}

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Check { config } => check(&config, &mut io::stdout()),
        Command::Evaluate {
            config,
            doc,
            old_doc,
            meta,
            now,
        } => evaluate(
            &config,
            &doc,
            old_doc.as_deref(),
            meta.as_deref(),
            now.as_deref(),
            &mut io::stdout(),
        ),
        Command::Run { config } => run(&config),
    }
}

/// Load config, print the effective policy
pub fn check<W: Write>(config_path: &Path, writer: &mut W) -> CliResult<()> {
    let config = RouterConfig::load(config_path)?;
    let policy = config.to_policy()?;

    write_response(writer, policy_json(&config, &policy))
}

/// Route one revision read from files
pub fn evaluate<W: Write>(
    config_path: &Path,
    doc_path: &Path,
    old_doc_path: Option<&Path>,
    meta_path: Option<&Path>,
    now: Option<&str>,
    writer: &mut W,
) -> CliResult<()> {
    let (config, policy) = load_policy(config_path)?;

    let doc = DocumentRevision::from_value(read_json_file(doc_path)?)?;
    let old_doc = match old_doc_path {
        Some(path) => Some(DocumentRevision::from_value(read_json_file(path)?)?),
        None => None,
    };
    let meta = match meta_path {
        Some(path) => RevisionMetadata::from_value(read_json_file(path)?)?,
        None => RevisionMetadata::default(),
    };

    let observer = LogObserver::new(Logger::stderr(config.log_severity()?));
    let engine = RoutingDecisionEngine::new(policy);
    let decision = match now {
        Some(ts) => {
            let clock = FixedClock::new(parse_now(ts)?);
            SyncHook::with_parts(engine, clock, observer).on_revision(&doc, old_doc.as_ref(), &meta)
        }
        None => SyncHook::with_parts(engine, SystemClock, observer)
            .on_revision(&doc, old_doc.as_ref(), &meta),
    };

    write_response(writer, serde_json::to_value(&decision)?)
}

/// Route JSON lines from stdin until EOF
pub fn run(config_path: &Path) -> CliResult<()> {
    let (config, policy) = load_policy(config_path)?;
    let logger = Logger::stderr(config.log_severity()?);
    let hook = SyncHook::with_parts(
        RoutingDecisionEngine::new(policy),
        SystemClock,
        LogObserver::new(logger),
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = route_stream(&hook, stdin.lock(), &mut stdout.lock())?;

    hook.observer().logger().info(
        Event::StreamComplete,
        &[
            ("routed", json!(summary.routed)),
            ("resurrections", json!(summary.resurrections)),
            ("rejected", json!(summary.rejected)),
        ],
    );
    Ok(())
}

/// Routes every line of `reader`, answering each on `writer`.
///
/// A malformed or non-UTF-8 line gets an error response; processing
/// continues. Only read failures abort the stream.
pub fn route_stream<C, O, R, W>(
    hook: &SyncHook<C, O>,
    reader: R,
    writer: &mut W,
) -> CliResult<RunSummary>
where
    C: Clock,
    O: RevisionObserver,
    R: BufRead,
    W: Write,
{
    let mut summary = RunSummary::default();

    for line in read_lines(reader) {
        let bytes = line?;
        match decode_line(&bytes).and_then(|line| RevisionInput::parse(&line)) {
            Ok(input) => {
                let decision = hook.on_revision(&input.doc, input.old_doc.as_ref(), &input.meta);
                if decision.short_circuited {
                    summary.resurrections += 1;
                }
                summary.routed += 1;
                write_response(writer, serde_json::to_value(&decision)?)?;
            }
            Err(e) => {
                summary.rejected += 1;
                hook.observer().input_rejected(e.message());
                write_error(writer, e.code_str(), e.message())?;
            }
        }
    }

    Ok(summary)
}

fn load_policy(config_path: &Path) -> CliResult<(RouterConfig, ResurrectionPolicy)> {
    let config = RouterConfig::load(config_path)?;
    let policy = config.to_policy()?;

    Logger::stderr(config.log_severity()?).info(
        Event::PolicyLoaded,
        &[
            ("window_ms", json!(policy.window_ms())),
            ("soft_delete_channel", json!(policy.soft_delete_channel())),
            ("soft_delete_ttl_secs", json!(policy.soft_delete_ttl_secs())),
        ],
    );

    Ok((config, policy))
}

fn policy_json(config: &RouterConfig, policy: &ResurrectionPolicy) -> serde_json::Value {
    json!({
        "profile": config.profile,
        "window_ms": policy.window_ms(),
        "soft_delete_channel": policy.soft_delete_channel(),
        "soft_delete_ttl_secs": policy.soft_delete_ttl_secs(),
        "log_level": config.log_level,
    })
}

fn parse_now(value: &str) -> CliResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| CliError::invalid_timestamp(value, e))
}
