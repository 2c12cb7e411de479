//! # Runtime
//!
//! A specialized orchestration layer for the [Tokio](https://tokio.rs) async runtime.
//!
//! This crate provides standardized runtime configurations (profiles) used across
//! the workspace to ensure predictable performance and resource usage.
//!
//! ## Example
//!
//! ```rust
//! use cpark_runtime::{RuntimeConfig, build_runtime};
//!
//! fn main() -> anyhow::Result<()> {
//!     let rt = build_runtime(&RuntimeConfig::high_performance())?;
//!     rt.block_on(async { Ok(()) })
//! }
//! ```

pub use anyhow::Result;

use anyhow::Context;
use std::{sync::OnceLock, thread::available_parallelism, time::Duration};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// The default number of worker threads if detection fails.
const DEFAULT_WORKER_THREADS: usize = 4;
/// The default stack size for threads (3 `MiB`).
const DEFAULT_STACK_SIZE: usize = 3 * 1024 * 1024;
/// Minimum allowed stack size (1 `MiB`).
const MIN_STACK_SIZE: usize = 1024 * 1024;
/// Maximum allowed stack size (16 `MiB`).
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;
/// How long an idle thread stays alive.
const THREAD_KEEP_ALIVE: Duration = Duration::from_secs(60);

static WORKER_THREADS: OnceLock<usize> = OnceLock::new();

/// Detects the optimal number of worker threads based on environment variables or hardware.
fn get_worker_threads() -> usize {
    *WORKER_THREADS.get_or_init(|| {
        std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0 && n <= 1024)
            .unwrap_or_else(|| {
                available_parallelism()
                    .map(std::num::NonZero::get)
                    .unwrap_or(DEFAULT_WORKER_THREADS)
            })
    })
}

/// Configuration for the Tokio runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: get_worker_threads(),
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: "cpark-worker".to_owned(),
            thread_keep_alive: THREAD_KEEP_ALIVE,
        }
    }
}

impl RuntimeConfig {
    /// Server-side preset: all cores, larger stacks, long keep-alive.
    #[must_use]
    pub fn high_performance() -> Self {
        Self {
            stack_size: 4 * 1024 * 1024,
            thread_keep_alive: Duration::from_secs(120),
            ..Self::default()
        }
    }
}

/// Builds a multi-threaded Tokio runtime from the given configuration.
///
/// Out-of-range values are clamped rather than rejected, so a misconfigured
/// environment degrades to a usable runtime instead of failing startup.
///
/// # Errors
/// Returns an error if the underlying Tokio builder fails to spawn the runtime.
pub fn build_runtime(config: &RuntimeConfig) -> Result<Runtime> {
    let worker_threads = config.worker_threads.clamp(1, 1024);
    let stack_size = config.stack_size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
    let thread_name = if config.thread_name.trim().is_empty() {
        "cpark-worker".to_owned()
    } else {
        config.thread_name.clone()
    };

    debug!(worker_threads, stack_size, thread_name, "Building Tokio runtime");

    Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .thread_stack_size(stack_size)
        .thread_name(thread_name)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_bounded() {
        let config = RuntimeConfig::default();
        assert!(config.worker_threads >= 1);
        assert_eq!(config.stack_size, DEFAULT_STACK_SIZE);
    }

    #[test]
    fn builds_runtime_with_clamped_values() {
        let config = RuntimeConfig {
            worker_threads: 1,
            stack_size: 1, // clamped up to MIN_STACK_SIZE
            thread_name: String::new(),
            thread_keep_alive: Duration::from_secs(1),
        };

        let rt = build_runtime(&config).expect("runtime builds");
        let answer = rt.block_on(async { 41 + 1 });
        assert_eq!(answer, 42);
    }
}
