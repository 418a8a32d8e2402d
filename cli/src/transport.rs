//! `reqwest` implementation of the API transport.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use chamasys::{ApiError, ApiRequest, ApiResponse, Method, Transport};
use reqwest::header::AUTHORIZATION;

#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = self.client.request(http_method(request.method), &request.url);
        if let Some(value) = request.authorization.as_deref() {
            builder = builder.header(AUTHORIZATION, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder.send().await.map_err(|error| ApiError::Transport(error.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|error| ApiError::Transport(error.to_string()))?;
        tracing::debug!(method = request.method.as_str(), url = %request.url, status, "api call");
        Ok(ApiResponse { status, body })
    }
}
