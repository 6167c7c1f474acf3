//! Tracing setup.
//!
//! Off unless `CARBON_LOG` (or, failing that, `RUST_LOG`) holds a filter,
//! e.g. `CARBON_LOG=carbon_eval=debug`. Output is an indented span tree on
//! stderr.

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use tracing_tree::HierarchicalLayer;

pub const LOG_ENV: &str = "CARBON_LOG";

pub fn init_tracing() {
    let Ok(directives) = std::env::var(LOG_ENV).or_else(|_| std::env::var("RUST_LOG")) else {
        return;
    };
    let layer = HierarchicalLayer::new(2)
        .with_writer(std::io::stderr)
        .with_targets(true)
        .with_bracketed_fields(true);
    // a subscriber installed by an embedding host wins
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(directives))
        .with(layer)
        .try_init();
}
