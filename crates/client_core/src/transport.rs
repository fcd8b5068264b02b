use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::{
    error::ServiceError,
    protocol::{Endpoint, Method},
};
use tracing::debug;
use url::Url;

use crate::error::{TransportError, TransportErrorKind};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, endpoint: Endpoint, body: Option<Value>)
        -> Result<Value, TransportError>;

    async fn upload(&self, endpoint: Endpoint, file: UploadFile)
        -> Result<Value, TransportError>;
}

pub async fn fetch<T: DeserializeOwned>(
    transport: &dyn Transport,
    endpoint: Endpoint,
    body: Option<Value>,
) -> Result<T, TransportError> {
    let value = transport.request(endpoint, body).await?;
    decode(endpoint, value)
}

pub async fn send_json<B, T>(
    transport: &dyn Transport,
    endpoint: Endpoint,
    body: &B,
) -> Result<T, TransportError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let body = serde_json::to_value(body).map_err(|err| {
        TransportError::malformed(format!("cannot encode {} request: {err}", endpoint.name()))
    })?;
    fetch(transport, endpoint, Some(body)).await
}

pub(crate) fn decode<T: DeserializeOwned>(
    endpoint: Endpoint,
    value: Value,
) -> Result<T, TransportError> {
    serde_json::from_value(value).map_err(|err| {
        TransportError::malformed(format!(
            "unexpected {} payload: {err}",
            endpoint.name()
        ))
    })
}

pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError::network(format!("failed to build http client: {err}")))?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url).map_err(|err| {
            TransportError::network(format!("invalid service url '{base_url}': {err}"))
        })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, endpoint: Endpoint) -> Result<Url, TransportError> {
        self.base_url.join(endpoint.path()).map_err(|err| {
            TransportError::network(format!("cannot resolve {}: {err}", endpoint.name()))
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        endpoint: Endpoint,
        body: Option<Value>,
    ) -> Result<Value, TransportError> {
        let url = self.url_for(endpoint)?;
        debug!(endpoint = endpoint.name(), %url, "sending request");

        let builder = match endpoint.method() {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
        };
        let builder = match body {
            Some(body) => builder.json(&body),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::network(err.to_string()))?;
        read_json(endpoint, response).await
    }

    async fn upload(&self, endpoint: Endpoint, file: UploadFile) -> Result<Value, TransportError> {
        let url = self.url_for(endpoint)?;
        debug!(
            endpoint = endpoint.name(),
            file_name = %file.file_name,
            size_bytes = file.bytes.len(),
            "uploading file"
        );

        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str("application/json")
            .map_err(|err| TransportError::network(err.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| TransportError::network(err.to_string()))?;
        read_json(endpoint, response).await
    }
}

async fn read_json(endpoint: Endpoint, response: Response) -> Result<Value, TransportError> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|err| TransportError::network(err.to_string()))?;
    let parsed = serde_json::from_slice::<Value>(&bytes);

    if !status.is_success() {
        let message = parsed
            .ok()
            .and_then(|body| ServiceError::from_body(&body))
            .map(|err| err.error)
            .unwrap_or_else(|| format!("{} failed with status {status}", endpoint.name()));
        return Err(TransportError::new(
            TransportErrorKind::StatusCode(status.as_u16()),
            message,
        ));
    }

    let body = parsed.map_err(|err| {
        TransportError::malformed(format!("{} returned non-JSON body: {err}", endpoint.name()))
    })?;
    if let Some(service_error) = ServiceError::from_body(&body) {
        return Err(TransportError::server_error(service_error.error));
    }
    Ok(body)
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
