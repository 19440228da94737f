//! Backing resources with an explicit lifecycle, owned by `AppContext`.

mod postgres;
mod storage;

pub use postgres::Postgres;
pub use storage::ObjectStorage;

use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait Component: Send + Sync {
    /// Acquire the underlying resource (connect, build client). Must be called before use.
    async fn start(&self) -> Result<(), AppError>;

    /// Release the resource. Safe to call when not started.
    async fn stop(&self);

    /// Cheap round trip against the resource. `Err` means the probe itself could not run.
    async fn is_alive(&self) -> Result<bool, AppError>;
}
