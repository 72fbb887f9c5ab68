//! HTTP implementation of `Backend` using reqwest.

use std::sync::Arc;

use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::auth::CredentialProvider;
use crate::error::ApiError;
use crate::remote::Backend;

/// Wrapper the API puts around every successful JSON payload.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// The console's HTTP client. The bearer credential is supplied by an
/// injected provider; this client never reads token storage itself.
pub struct HttpBackend {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        let mut request = self.client.request(method, url);
        if let Some(token) = self.credentials.token() {
            request = request.bearer_auth(token);
        }
        request
    }
}

/// Map a non-success response to `ApiError::Rejected`, pulling a
/// human-readable message out of the body when the server sent one.
pub(crate) async fn into_api_result(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    Err(ApiError::rejected(status.as_u16(), message))
}

impl Backend for HttpBackend {
    async fn list(&self, collection: &str) -> Result<Vec<Value>, ApiError> {
        debug!("GET /{collection}");
        let response = self.request(Method::GET, collection).send().await?;
        let envelope: Envelope<Vec<Value>> = into_api_result(response).await?.json().await?;
        Ok(envelope.data)
    }

    async fn create(&self, collection: &str, body: &Value) -> Result<Value, ApiError> {
        debug!("POST /{collection}");
        let response = self
            .request(Method::POST, collection)
            .json(body)
            .send()
            .await?;
        let envelope: Envelope<Value> = into_api_result(response).await?.json().await?;
        Ok(envelope.data)
    }

    async fn update(&self, collection: &str, id: &str, body: &Value) -> Result<Value, ApiError> {
        debug!("PUT /{collection}/{id}");
        let path = format!("{collection}/{id}");
        let response = self.request(Method::PUT, &path).json(body).send().await?;
        let envelope: Envelope<Value> = into_api_result(response).await?.json().await?;
        Ok(envelope.data)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), ApiError> {
        debug!("DELETE /{collection}/{id}");
        let path = format!("{collection}/{id}");
        let response = self.request(Method::DELETE, &path).send().await?;
        into_api_result(response).await?;
        Ok(())
    }
}
