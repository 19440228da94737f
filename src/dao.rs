//! Data access object over the shared pool. Each call borrows one pooled connection for its duration.

use crate::error::AppError;
use crate::models::BaseSearch;
use sqlx::postgres::{PgQueryResult, PgRow};
use sqlx::{FromRow, PgPool};

#[derive(Clone)]
pub struct Dao {
    pool: PgPool,
    schema: String,
}

impl Dao {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        Dao {
            pool,
            schema: schema.into(),
        }
    }

    /// Run one statement and return its rows as-is.
    pub async fn fetch(&self, sql: &str) -> Result<Vec<PgRow>, AppError> {
        tracing::debug!(sql = %sql, "query");
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(sql).fetch_all(&mut *conn).await?;
        Ok(rows)
    }

    /// Run `script` as a single batch through the simple query protocol (multiple statements allowed).
    pub async fn execute_script(&self, script: &str) -> Result<PgQueryResult, AppError> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::raw_sql(script).execute(&mut *conn).await?;
        Ok(result)
    }

    /// Page through `table` in the configured schema.
    pub async fn search<T>(&self, table: &str, search: &BaseSearch) -> Result<Vec<T>, AppError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut qb = search.query(&self.schema, table)?;
        let rows = qb.build_query_as::<T>().fetch_all(&self.pool).await?;
        Ok(rows)
    }
}
