//! Base record layout shared by application tables, and the paged search over it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::AppError;
use crate::settings::is_identifier;

/// Columns every application table carries: server-generated id and timestamps, soft-delete flag.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct BaseRecord {
    pub id: Uuid,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub archived: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseSearch {
    pub limit: i64,
    pub offset: i64,
    pub created_ge: Option<DateTime<Utc>>,
    pub created_le: Option<DateTime<Utc>>,
    pub archived: bool,
}

impl Default for BaseSearch {
    fn default() -> Self {
        BaseSearch {
            limit: 100,
            offset: 0,
            created_ge: None,
            created_le: None,
            archived: false,
        }
    }
}

impl BaseSearch {
    /// `SELECT *` over `schema.table` filtered by this search, newest first.
    /// Identifiers must be plain; values are bound as parameters.
    pub fn query<'a>(&self, schema: &str, table: &str) -> Result<QueryBuilder<'a, Postgres>, AppError> {
        for ident in [schema, table] {
            if !is_identifier(ident) {
                return Err(AppError::BadRequest(format!("invalid identifier: {}", ident)));
            }
        }
        if self.limit < 0 || self.offset < 0 {
            return Err(AppError::BadRequest("limit and offset must be non-negative".into()));
        }
        let mut qb = QueryBuilder::new(format!("SELECT * FROM \"{}\".\"{}\" WHERE archived = ", schema, table));
        qb.push_bind(self.archived);
        if let Some(ge) = self.created_ge {
            qb.push(" AND created >= ").push_bind(ge);
        }
        if let Some(le) = self.created_le {
            qb.push(" AND created <= ").push_bind(le);
        }
        qb.push(" ORDER BY created DESC LIMIT ")
            .push_bind(self.limit)
            .push(" OFFSET ")
            .push_bind(self.offset);
        Ok(qb)
    }
}
