//! Hosted store speaking the PostgREST dialect (`/rest/v1/<table>` with
//! `eq.` filters).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::HeaderMap, header::HeaderValue, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::utils::describe_body;

use super::{
    DailyNoteRow, FlockRow, ProfilePatch, ProfileRow, RecordStore, StoreError, StoreResult, Table,
    TransactionRow,
};

const NEWEST_FIRST: &str = "date.desc";
const PREFER_REPRESENTATION: &str = "return=representation";
const PREFER_MERGE: &str = "resolution=merge-duplicates,return=minimal";

/// Error body the store returns on a failed request.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    details: Option<Value>,
    hint: Option<Value>,
    code: Option<Value>,
}

fn text_field(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) if text.is_empty() || text == "null" => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// PostgREST bodies keep their fields; any other body is condensed into
/// one readable line.
fn error_from_body(status: u16, body: &str) -> StoreError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody {
            message: Some(message),
            details,
            hint,
            code,
        }) if !message.is_empty() => StoreError::Api {
            message,
            details: text_field(details),
            hint: text_field(hint),
            code: text_field(code),
        },
        _ => StoreError::Http {
            status,
            message: describe_body(body),
        },
    }
}

#[derive(Debug, Serialize)]
struct QuantityPatch {
    quantity: u32,
}

#[derive(Debug, Clone)]
pub struct RestStore {
    http: Client,
    base_url: String,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Option<Duration>) -> StoreResult<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|err| StoreError::Transport(format!("invalid store key: {err}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|err| StoreError::Transport(format!("invalid store key: {err}")))?;
        headers.insert("apikey", key);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("coop_core/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    fn request(&self, method: Method, table: Table) -> RequestBuilder {
        self.http.request(method, self.table_url(table))
    }

    async fn send(&self, table: Table, builder: RequestBuilder) -> StoreResult<Response> {
        debug!(table = table.name(), "store request");
        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() {
                StoreError::Timeout
            } else {
                StoreError::Transport(err.to_string())
            }
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_from_body(status.as_u16(), &body))
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: Table,
        filters: &[(&str, String)],
        order: Option<&str>,
    ) -> StoreResult<Vec<T>> {
        let mut query: Vec<(&str, String)> = vec![("select", "*".to_string())];
        query.extend(filters.iter().cloned());
        if let Some(order) = order {
            query.push(("order", order.to_string()));
        }
        let response = self
            .send(table, self.request(Method::GET, table).query(&query))
            .await?;
        let text = response
            .text()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn insert<T: Serialize + Sync>(&self, table: Table, row: &T) -> StoreResult<()> {
        let builder = self
            .request(Method::POST, table)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&[row]);
        self.send(table, builder).await?;
        Ok(())
    }

    async fn patch<T: Serialize + Sync>(
        &self,
        table: Table,
        filter: (&str, String),
        body: &T,
    ) -> StoreResult<()> {
        let builder = self
            .request(Method::PATCH, table)
            .query(&[filter])
            .json(body);
        self.send(table, builder).await?;
        Ok(())
    }

    async fn delete(&self, table: Table, filter: (&str, String)) -> StoreResult<()> {
        let builder = self.request(Method::DELETE, table).query(&[filter]);
        self.send(table, builder).await?;
        Ok(())
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl RecordStore for RestStore {
    async fn fetch_profile(&self, email: &str) -> StoreResult<Option<ProfileRow>> {
        let rows: Vec<ProfileRow> = self
            .select(Table::Profiles, &[("email", eq(email))], None)
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert_profile(&self, row: &ProfileRow) -> StoreResult<()> {
        let builder = self
            .request(Method::POST, Table::Profiles)
            .query(&[("on_conflict", "email")])
            .header("Prefer", PREFER_MERGE)
            .json(&[row]);
        self.send(Table::Profiles, builder).await?;
        Ok(())
    }

    async fn update_profile(&self, email: &str, patch: &ProfilePatch) -> StoreResult<()> {
        self.patch(Table::Profiles, ("email", eq(email)), patch).await
    }

    async fn list_flocks(&self, email: &str) -> StoreResult<Vec<FlockRow>> {
        self.select(Table::Flocks, &[("user_email", eq(email))], None)
            .await
    }

    async fn insert_flock(&self, row: &FlockRow) -> StoreResult<()> {
        self.insert(Table::Flocks, row).await
    }

    async fn update_flock_quantity(&self, id: Uuid, quantity: u32) -> StoreResult<()> {
        self.patch(Table::Flocks, ("id", eq(id)), &QuantityPatch { quantity })
            .await
    }

    async fn delete_flock(&self, id: Uuid) -> StoreResult<()> {
        self.delete(Table::Flocks, ("id", eq(id))).await
    }

    async fn list_transactions(&self, email: &str) -> StoreResult<Vec<TransactionRow>> {
        self.select(
            Table::Transactions,
            &[("user_email", eq(email))],
            Some(NEWEST_FIRST),
        )
        .await
    }

    async fn insert_transaction(&self, row: &TransactionRow) -> StoreResult<()> {
        self.insert(Table::Transactions, row).await
    }

    async fn delete_transaction(&self, id: Uuid) -> StoreResult<()> {
        self.delete(Table::Transactions, ("id", eq(id))).await
    }

    async fn list_notes(&self, email: &str) -> StoreResult<Vec<DailyNoteRow>> {
        self.select(
            Table::DailyNotes,
            &[("user_email", eq(email))],
            Some(NEWEST_FIRST),
        )
        .await
    }

    async fn insert_note(&self, row: &DailyNoteRow) -> StoreResult<()> {
        self.insert(Table::DailyNotes, row).await
    }

    fn describe(&self) -> String {
        format!("hosted store {}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_urls_follow_rest_v1_layout() {
        let store = RestStore::new("https://example.supabase.co/", "anon-key", None).unwrap();
        assert_eq!(
            store.table_url(Table::DailyNotes),
            "https://example.supabase.co/rest/v1/daily_notes"
        );
    }

    #[test]
    fn error_fields_drop_null_markers() {
        assert_eq!(text_field(Some(Value::String("null".into()))), None);
        assert_eq!(text_field(Some(Value::Null)), None);
        assert_eq!(
            text_field(Some(serde_json::json!(23505))).as_deref(),
            Some("23505")
        );
    }

    #[test]
    fn postgrest_bodies_keep_their_fields() {
        let body = r#"{"message":"duplicate key","details":"Key (id) exists.","hint":null,"code":"23505"}"#;
        match error_from_body(409, body) {
            StoreError::Api { message, details, hint, code } => {
                assert_eq!(message, "duplicate key");
                assert_eq!(details.as_deref(), Some("Key (id) exists."));
                assert_eq!(hint, None);
                assert_eq!(code.as_deref(), Some("23505"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn other_bodies_are_described_readably() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid JWT"}"#;
        let err = error_from_body(401, body);
        assert!(matches!(&err, StoreError::Http { status: 401, message } if message == "Invalid JWT"));
        assert_eq!(err.to_string(), "http 401: Invalid JWT");

        let err = error_from_body(502, "<html>Bad Gateway</html>");
        assert!(matches!(err, StoreError::Http { message, .. } if message == "<html>Bad Gateway</html>"));
    }

    #[test]
    fn eq_filters_are_prefixed() {
        assert_eq!(eq("a@farm.br"), "eq.a@farm.br");
    }
}
