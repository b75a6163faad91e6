// src/observability/mod.rs
//! Logging and metrics
//!
//! - **Tracing**: `tracing-subscriber` fmt output filtered by `RUST_LOG`
//! - **Metrics**: interception counters through the `metrics` facade; no
//!   exporter is installed here, the embedding application picks one

use crate::interception::path_matcher::MatchKind;
use crate::utils::errors::{ProxyError, Result};
use metrics::counter;
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

/// Counter of intercepted operations, labelled by `op`
pub const INTERCEPTIONS_TOTAL: &str = "recursive_proxy_interceptions_total";

/// Counter of rule matches, labelled by `op` and `match`
pub const RULE_HITS_TOTAL: &str = "recursive_proxy_rule_hits_total";

static TRACING: OnceCell<()> = OnceCell::new();

/// Install a plain-text subscriber (no-op when already installed)
pub fn init_tracing() -> Result<()> {
    install_subscriber(false)
}

/// Install a JSON subscriber (no-op when already installed)
pub fn init_json_tracing() -> Result<()> {
    install_subscriber(true)
}

fn install_subscriber(json: bool) -> Result<()> {
    TRACING
        .get_or_try_init(|| {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            let builder = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true);

            let installed = if json {
                builder.json().try_init()
            } else {
                builder.try_init()
            };
            installed.map_err(|e| ProxyError::Observability(e.to_string()))
        })
        .map(|_| ())
}

/// Count one intercepted operation
pub fn record_interception(op: &'static str) {
    counter!(INTERCEPTIONS_TOTAL, "op" => op).increment(1);
}

/// Count one rule match
pub fn record_rule_hit(op: &'static str, kind: MatchKind) {
    counter!(RULE_HITS_TOTAL, "op" => op, "match" => kind.as_str()).increment(1);
}
