//! Readiness aggregation: probe every monitored component concurrently, report one flag per name.

use crate::components::Component;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A monitored component and the name it is reported under.
pub type Probe = (&'static str, Arc<dyn Component>);

pub type ReadinessReport = BTreeMap<&'static str, bool>;

/// Run all probes concurrently and wait for every one of them.
/// A probe that errors or panics is reported as `false`; it never aborts the report.
pub async fn check(probes: &[Probe]) -> ReadinessReport {
    let handles: Vec<_> = probes
        .iter()
        .map(|(name, component)| {
            let component = Arc::clone(component);
            (*name, tokio::spawn(async move { component.is_alive().await }))
        })
        .collect();

    let mut report = ReadinessReport::new();
    for (name, handle) in handles {
        let alive = match handle.await {
            Ok(Ok(alive)) => alive,
            Ok(Err(e)) => {
                tracing::warn!(component = name, error = %e, "readiness probe failed");
                false
            }
            Err(e) => {
                tracing::warn!(component = name, error = %e, "readiness probe aborted");
                false
            }
        };
        report.insert(name, alive);
    }
    report
}
