use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::graphql::cache::{FetchPolicy, ResponseCache};
use crate::graphql::error::GraphqlError;
use crate::graphql::operations::Operation;
use crate::session::SecureString;

#[derive(Serialize)]
struct RequestBody<'a> {
    query: &'a str,
    #[serde(rename = "operationName")]
    operation_name: &'a str,
    variables: &'a Value,
}

#[derive(Deserialize)]
struct ResponseBody {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<ResponseErrorEntry>,
}

#[derive(Deserialize)]
struct ResponseErrorEntry {
    message: String,
}

/// HTTP GraphQL client with a shared response cache.
///
/// Clones share the connection pool, the cache and the access token, so a
/// login performed through one handle authenticates every other handle.
#[derive(Clone)]
pub struct GraphqlClient {
    http: Client,
    endpoint: String,
    timeout: Duration,
    cache: ResponseCache,
    access_token: Arc<RwLock<Option<SecureString>>>,
}

impl GraphqlClient {
    pub fn new(config: &BackendConfig) -> Result<Self, GraphqlError> {
        let timeout = Duration::from_secs(u64::from(config.timeout_seconds));
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(u64::from(
                config.connect_timeout_seconds,
            )))
            .timeout(timeout)
            .build()
            .map_err(GraphqlError::Build)?;

        Ok(Self {
            http,
            endpoint: config.graphql_url.clone(),
            timeout,
            cache: ResponseCache::new(),
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Set or clear the bearer token attached to every request.
    ///
    /// Cached responses may belong to the previous identity, so the cache
    /// is cleared whenever the token actually changes.
    pub fn set_access_token(&self, token: Option<SecureString>) {
        let token = token.filter(|t| !t.is_empty());
        let mut slot = self.access_token.write();
        let changed = slot.as_ref().map(SecureString::expose) != token.as_ref().map(SecureString::expose);
        *slot = token;
        drop(slot);
        if changed {
            let evicted = self.cache.len();
            self.cache.clear();
            tracing::debug!(evicted, "Access token changed, response cache cleared");
        }
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.read().is_some()
    }

    /// Run a query and decode `data.<field>`.
    ///
    /// A missing or null field decodes as `None` when `T` is an `Option`,
    /// and fails with `MissingData` otherwise.
    pub async fn query<V, T>(
        &self,
        operation: &Operation,
        field: &str,
        variables: &V,
        policy: FetchPolicy,
    ) -> Result<T, GraphqlError>
    where
        V: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let variables = serde_json::to_value(variables)?;
        let key = ResponseCache::key(operation.name, &variables);

        if policy.reads_cache() {
            if let Some(data) = self.cache.get(&key) {
                tracing::debug!(operation = operation.name, "GraphQL cache hit");
                return decode_field(data, field);
            }
        }

        let data = self.execute(operation, &variables).await?;
        if policy.writes_cache() {
            self.cache.insert(key, data.clone());
        }
        decode_field(data, field)
    }

    /// Run a mutation and decode `data.<field>`. Mutations bypass the cache.
    pub async fn mutate<V, T>(
        &self,
        operation: &Operation,
        field: &str,
        variables: &V,
    ) -> Result<T, GraphqlError>
    where
        V: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let variables = serde_json::to_value(variables)?;
        let data = self.execute(operation, &variables).await?;
        decode_field(data, field)
    }

    async fn execute(&self, operation: &Operation, variables: &Value) -> Result<Value, GraphqlError> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let body = RequestBody {
            query: operation.document,
            operation_name: operation.name,
            variables,
        };

        let mut builder = self.http.post(&self.endpoint).json(&body);
        let token = self.access_token.read().clone();
        if let Some(token) = token {
            builder = builder.bearer_auth(token.expose());
        }

        tracing::debug!(
            request_id = %request_id,
            operation = operation.name,
            "Sending GraphQL request"
        );

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        let elapsed_ms = started.elapsed().as_millis() as u64;

        if !status.is_success() {
            tracing::warn!(
                request_id = %request_id,
                operation = operation.name,
                status = status.as_u16(),
                elapsed_ms,
                "GraphQL request failed"
            );
            // Servers commonly report validation failures as 400 with an errors array.
            if let Ok(parsed) = serde_json::from_str::<ResponseBody>(&text) {
                if !parsed.errors.is_empty() {
                    return Err(GraphqlError::Response {
                        messages: parsed.errors.into_iter().map(|e| e.message).collect(),
                    });
                }
            }
            return Err(GraphqlError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ResponseBody = serde_json::from_str(&text)?;

        tracing::debug!(
            request_id = %request_id,
            operation = operation.name,
            elapsed_ms,
            errors = parsed.errors.len(),
            "GraphQL response received"
        );

        if !parsed.errors.is_empty() {
            return Err(GraphqlError::Response {
                messages: parsed.errors.into_iter().map(|e| e.message).collect(),
            });
        }

        match parsed.data {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(GraphqlError::MissingData {
                field: "data".to_string(),
            }),
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> GraphqlError {
        if err.is_timeout() {
            GraphqlError::Timeout {
                duration: self.timeout.as_secs(),
            }
        } else {
            GraphqlError::Connection {
                endpoint: self.endpoint.clone(),
                source: err,
            }
        }
    }
}

fn decode_field<T: DeserializeOwned>(data: Value, field: &str) -> Result<T, GraphqlError> {
    let value = match data {
        Value::Object(mut map) => map.remove(field).unwrap_or(Value::Null),
        _ => Value::Null,
    };
    let was_null = value.is_null();
    serde_json::from_value(value).map_err(|e| {
        if was_null {
            GraphqlError::MissingData {
                field: field.to_string(),
            }
        } else {
            GraphqlError::Decode(e)
        }
    })
}
