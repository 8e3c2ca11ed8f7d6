//! Thin async HTTP client, grounded on `pkg/sdk`'s `resty`-backed `Client`
//! (`c.get`/`c.post`/`c.put`/`c.delete` helpers around a shared base URL and
//! `X-API-Key` header) — reimplemented on `reqwest` with the `{data: T}`
//! envelope every control-plane response uses.

use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type SdkResult<T> = Result<T, SdkError>;

#[derive(serde::Deserialize)]
struct Envelope<T> {
    data: T,
}

/// A handle to one control-plane endpoint, authenticated with a single API
/// key. Cheap to clone — `reqwest::Client` is `Arc`-backed internally.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Client {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn check_status(resp: reqwest::Response) -> SdkResult<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        Err(SdkError::Api { status, message })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> SdkResult<T> {
        let resp = self
            .http
            .get(self.url(path))
            .header("X-API-Key", &self.api_key)
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        Ok(resp.json::<Envelope<T>>().await?.data)
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> SdkResult<T> {
        let resp = self
            .http
            .post(self.url(path))
            .header("X-API-Key", &self.api_key)
            .json(body)
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        Ok(resp.json::<Envelope<T>>().await?.data)
    }

    pub(crate) async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> SdkResult<T> {
        let resp = self
            .http
            .put(self.url(path))
            .header("X-API-Key", &self.api_key)
            .json(body)
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        Ok(resp.json::<Envelope<T>>().await?.data)
    }

    pub(crate) async fn delete(&self, path: &str) -> SdkResult<()> {
        let resp = self
            .http
            .delete(self.url(path))
            .header("X-API-Key", &self.api_key)
            .send()
            .await?;
        Self::check_status(resp).await?;
        Ok(())
    }
}
