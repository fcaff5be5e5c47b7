//! REST implementation of the composition store
//!
//! Talks to the `/compositions` and `/feed-items` endpoints of the feed mill
//! API. Non-2xx answers are turned into [`ClientError`] variants by status.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use shared::{
    Composition, CompositionId, CompositionMember, CompositionNameInput, CompositionSummary,
    FeedItem, ReplaceCompositionInput,
};

use super::CompositionStore;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Composition store backed by the REST API
#[derive(Clone)]
pub struct HttpCompositionStore {
    client: Client,
    base_url: String,
}

/// Error body produced by the API: `{"error": {"code", "message", "field"}}`
///
/// Only the message and field are used here.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    field: Option<String>,
}

impl HttpCompositionStore {
    /// Create a store from client configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(4)
            .build()?;

        Ok(Self::with_client(client, &config.base_url))
    }

    /// Create a store around an existing reqwest client
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> ClientResult<T> {
        let response = request.send().await?;
        let response = check_status(response, resource).await?;
        Ok(response.json().await?)
    }
}

/// Pass 2xx responses through, map everything else to an error
async fn check_status(response: Response, resource: &str) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(error_from_status(status, &body, resource))
}

/// Map an unsuccessful status (and the API error body, if any) to a client error
pub(crate) fn error_from_status(status: StatusCode, body: &str, resource: &str) -> ClientError {
    let detail = serde_json::from_str::<ApiErrorBody>(body).ok().map(|b| b.error);

    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(resource.to_string()),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => match detail {
            Some(detail) => ClientError::Validation {
                field: detail.field,
                message: detail.message,
            },
            None => ClientError::Validation {
                field: None,
                message: format!("{} was rejected as invalid", resource),
            },
        },
        StatusCode::CONFLICT => ClientError::Conflict(
            detail
                .map(|d| d.message)
                .unwrap_or_else(|| format!("{} conflicts with existing data", resource)),
        ),
        _ => {
            let message = detail.map(|d| d.message).unwrap_or_else(|| body.to_string());
            if message.is_empty() {
                ClientError::Transport(format!("server answered {}", status))
            } else {
                ClientError::Transport(format!("server answered {}: {}", status, message))
            }
        }
    }
}

#[async_trait]
impl CompositionStore for HttpCompositionStore {
    async fn list_compositions(&self) -> ClientResult<Vec<CompositionSummary>> {
        tracing::debug!("listing compositions");
        self.send(self.client.get(self.url("/compositions")), "Compositions")
            .await
    }

    async fn get_composition(&self, id: CompositionId) -> ClientResult<Composition> {
        tracing::debug!(composition_id = id, "fetching composition");
        self.send(
            self.client.get(self.url(&format!("/compositions/{}", id))),
            &format!("Composition {}", id),
        )
        .await
    }

    async fn create_composition(&self, name: &str) -> ClientResult<Composition> {
        tracing::debug!(name, "creating composition");
        let body = CompositionNameInput {
            name: name.to_string(),
        };
        self.send(
            self.client.post(self.url("/compositions")).json(&body),
            "Composition",
        )
        .await
    }

    async fn replace_composition(
        &self,
        id: CompositionId,
        name: &str,
        members: &[CompositionMember],
    ) -> ClientResult<Composition> {
        tracing::debug!(composition_id = id, members = members.len(), "replacing composition");
        let body = ReplaceCompositionInput {
            name: name.to_string(),
            members: members.to_vec(),
        };
        self.send(
            self.client
                .put(self.url(&format!("/compositions/{}", id)))
                .json(&body),
            &format!("Composition {}", id),
        )
        .await
    }

    async fn rename_composition(&self, id: CompositionId, name: &str) -> ClientResult<Composition> {
        tracing::debug!(composition_id = id, name, "renaming composition");
        let body = CompositionNameInput {
            name: name.to_string(),
        };
        self.send(
            self.client
                .patch(self.url(&format!("/compositions/{}/name", id)))
                .json(&body),
            &format!("Composition {}", id),
        )
        .await
    }

    async fn list_feed_items(&self) -> ClientResult<Vec<FeedItem>> {
        tracing::debug!("listing feed items");
        self.send(self.client.get(self.url("/feed-items")), "Feed items")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = HttpCompositionStore::with_client(Client::new(), "http://mill.local/api/v1/");
        assert_eq!(store.base_url(), "http://mill.local/api/v1");
        assert_eq!(store.url("/compositions"), "http://mill.local/api/v1/compositions");
    }

    #[test]
    fn test_not_found_status() {
        let err = error_from_status(StatusCode::NOT_FOUND, "", "Composition 7");
        assert_eq!(err, ClientError::NotFound("Composition 7".to_string()));
    }

    #[test]
    fn test_unprocessable_uses_api_message() {
        let body = r#"{"error":{"code":"VALIDATION_ERROR","message":"Composition name cannot be empty","field":"name"}}"#;
        let err = error_from_status(StatusCode::UNPROCESSABLE_ENTITY, body, "Composition");
        assert_eq!(
            err,
            ClientError::Validation {
                field: Some("name".to_string()),
                message: "Composition name cannot be empty".to_string(),
            }
        );
    }

    #[test]
    fn test_unprocessable_without_body() {
        let err = error_from_status(StatusCode::UNPROCESSABLE_ENTITY, "", "Composition");
        assert!(err.is_validation());
    }

    #[test]
    fn test_conflict_status() {
        let body = r#"{"error":{"code":"DUPLICATE_ENTRY","message":"A composition named Grower already exists","field":"name"}}"#;
        let err = error_from_status(StatusCode::CONFLICT, body, "Composition");
        assert_eq!(
            err,
            ClientError::Conflict("A composition named Grower already exists".to_string())
        );
    }

    #[test]
    fn test_server_error_is_transport() {
        let err = error_from_status(StatusCode::BAD_GATEWAY, "upstream down", "Compositions");
        assert_eq!(
            err,
            ClientError::Transport("server answered 502 Bad Gateway: upstream down".to_string())
        );

        let err = error_from_status(StatusCode::INTERNAL_SERVER_ERROR, "", "Compositions");
        assert_eq!(
            err,
            ClientError::Transport("server answered 500 Internal Server Error".to_string())
        );
    }
}
