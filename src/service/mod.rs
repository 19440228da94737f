//! Service logic behind the HTTP handlers.

mod readiness;
pub use readiness::{check, Probe, ReadinessReport};
