//! Typed client for the CRM backend REST endpoints.

use crate::error::ApiError;
use crate::models::{CatalogEntity, ClientSearchRequest, ClientSearchResponse, Identity, LineKind};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const CLIENT_SEARCH_PATH: &str = "/client/client/search";

#[derive(Debug, Clone)]
pub struct CrmApi {
    http: Client,
    base_url: String,
}

impl CrmApi {
    /// Builds a client for `base_url`; a trailing `/` is ignored.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET {domain}/drugs/drugs/get` or `GET {domain}/procedure/procedures/get`.
    pub async fn fetch_catalog(
        &self,
        kind: LineKind,
        identity: &Identity,
    ) -> Result<Vec<CatalogEntity>, ApiError> {
        let url = self.endpoint(kind.catalog_path());
        debug!(%url, ?kind, "fetching catalog");
        let response = self
            .http
            .get(&url)
            .header("sub", identity.as_str())
            .send()
            .await?;
        read_json(response).await
    }

    /// `POST {domain}/client/client/search` with `{ sub, name }`.
    pub async fn search_clients(
        &self,
        identity: &Identity,
        name: &str,
    ) -> Result<ClientSearchResponse, ApiError> {
        let url = self.endpoint(CLIENT_SEARCH_PATH);
        debug!(%url, name, "searching clients");
        let body = ClientSearchRequest {
            sub: identity.as_str(),
            name,
        };
        let response = self.http.post(&url).json(&body).send().await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()));
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let api = CrmApi::new("https://crm.example.com/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "https://crm.example.com");
        assert_eq!(
            api.endpoint(LineKind::Medicine.catalog_path()),
            "https://crm.example.com/drugs/drugs/get"
        );
        assert_eq!(
            api.endpoint(LineKind::Procedure.catalog_path()),
            "https://crm.example.com/procedure/procedures/get"
        );
        assert_eq!(
            api.endpoint(CLIENT_SEARCH_PATH),
            "https://crm.example.com/client/client/search"
        );
    }
}
