use tracing_subscriber::prelude::*;
use std::fs;
use std::path::Path;
use tracing::info;

pub mod common;
pub mod config;
pub mod sql;

pub use common::{QueryError, QueryResult, SyntaxError};
pub use sql::{
    AstNode, GrammarEngine, ParseDriver, QueryGrammar, parse_batch, parse_statement,
    parse_statement_list, read_all, render, render_at, render_flat,
};

/// Installs the global log subscriber: ANSI output on stdout plus a daily
/// rolling file next to `log_path`. Can only succeed once per process.
pub fn init_log(log_path: &Path) -> QueryResult<()> {
    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    let log_filename = log_path
        .file_name()
        .ok_or_else(|| QueryError::Logging(format!("log path {:?} has no file name", log_path)))?;
    fs::create_dir_all(log_dir)?;

    let stdout_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_thread_names(true)
        .with_level(true);

    let file_appender = tracing_appender::rolling::daily(log_dir, log_filename);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let file_log = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_thread_names(true)
        .with_level(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config::LOG_LEVEL));

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_log)
        .with(file_log)
        .try_init()
        .map_err(|e| QueryError::Logging(e.to_string()))?;

    // the writer thread must outlive every log call
    Box::leak(Box::new(_guard));

    info!("{} {} logging to {:?}", config::_NAME, config::_VERSION, log_path);
    Ok(())
}
