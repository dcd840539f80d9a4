//! HTTP transport boundary.
//!
//! The pipeline only needs "give me the bytes and the status code for this
//! URL"; everything else (status interpretation, payload decoding) belongs
//! to the per-endpoint mappers. Keeping the trait this narrow lets tests
//! script responses without a socket.

use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

use crate::error::LoadError;

/// Raw response from the transport: status code plus body bytes.
#[derive(Debug, Clone)]
pub struct HttpResponse {
  pub status: u16,
  pub body: Vec<u8>,
}

/// Minimal GET-only client contract.
///
/// A transport failure (DNS, TCP, TLS, timeout) is `LoadError::Connectivity`.
/// Non-success status codes are NOT errors at this layer; mappers decide.
#[async_trait]
pub trait HttpClient: Send + Sync {
  async fn get(&self, url: &Url) -> Result<HttpResponse, LoadError>;
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
  async fn get(&self, url: &Url) -> Result<HttpResponse, LoadError> {
    (**self).get(url).await
  }
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for &T {
  async fn get(&self, url: &Url) -> Result<HttpResponse, LoadError> {
    (**self).get(url).await
  }
}

/// `reqwest`-backed client.
#[derive(Clone)]
pub struct ReqwestHttpClient {
  client: reqwest::Client,
}

impl ReqwestHttpClient {
  pub fn new() -> Self {
    Self {
      client: reqwest::Client::new(),
    }
  }
}

impl Default for ReqwestHttpClient {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
  async fn get(&self, url: &Url) -> Result<HttpResponse, LoadError> {
    let response = self
      .client
      .get(url.clone())
      .send()
      .await
      .map_err(|_| LoadError::Connectivity)?;

    let status = response.status().as_u16();
    let body = response
      .bytes()
      .await
      .map_err(|_| LoadError::Connectivity)?
      .to_vec();

    Ok(HttpResponse { status, body })
  }
}
