// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::error;

use crate::error::FeedResult;

pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// Mutations by operation name and outcome (`ok` or the error kind)
pub static OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new("feed_operations_total", "Feed mutations by operation and outcome"),
        &["operation", "outcome"],
    )
    .expect("metric definition is valid");
    if let Err(e) = REGISTRY.register(Box::new(counter.clone())) {
        error!("Failed to register feed_operations_total: {}", e);
    }
    counter
});

/// Count the outcome of a mutation and hand the result back unchanged
pub fn track<T>(operation: &str, result: FeedResult<T>) -> FeedResult<T> {
    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
    result
}

/// Render the registry in the Prometheus text format
pub fn render() -> String {
    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer) {
        error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}
