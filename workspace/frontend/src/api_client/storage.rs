//! Table service calls: select, insert, update by id.

use async_trait::async_trait;
use model::RowId;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use super::SupabaseClient;
use crate::backend::{AuthService, Order, StorageService, Table};
use crate::error::ClientError;

impl SupabaseClient {
    /// Access token of the usable session, if any.
    async fn access_token(&self) -> Option<String> {
        self.current_session().await.map(|s| s.access_token)
    }
}

#[async_trait]
impl StorageService for SupabaseClient {
    #[instrument(skip(self))]
    async fn select_all(&self, table: Table, order: Order) -> Result<Vec<Value>, ClientError> {
        let url = self.settings.rest_url(&format!("/{}", table));
        let token = self.access_token().await;
        let request = self
            .authorize(self.http.get(&url), token.as_deref())
            .query(&[("select", "*".to_string()), ("order", order.to_query())]);

        let response = self.send("GET", &url, request).await?;
        let rows: Option<Vec<Value>> = Self::parse("GET", &url, response).await?;
        let rows = rows.unwrap_or_default();
        debug!(table = %table, count = rows.len(), "Fetched rows");
        Ok(rows)
    }

    #[instrument(skip(self, row))]
    async fn insert(&self, table: Table, row: Value) -> Result<(), ClientError> {
        let url = self.settings.rest_url(&format!("/{}", table));
        let token = self.access_token().await;
        trace!(table = %table, "Inserting row: {}", row);
        let request = self
            .authorize(self.http.post(&url), token.as_deref())
            .header("Prefer", "return=minimal")
            .json(&[row]);

        self.send("POST", &url, request).await?;
        Ok(())
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, table: Table, patch: Value, id: &RowId) -> Result<(), ClientError> {
        let url = self.settings.rest_url(&format!("/{}", table));
        let token = self.access_token().await;
        trace!(table = %table, id = %id, "Patching row: {}", patch);
        let request = self
            .authorize(self.http.patch(&url), token.as_deref())
            .header("Prefer", "return=minimal")
            .query(&[("id", format!("eq.{}", id))])
            .json(&patch);

        self.send("PATCH", &url, request).await?;
        Ok(())
    }
}
