//! Hetzner Cloud REST client

use crate::{
    Connector, FloatingIp, Firewall, LoadBalancer, Network, ProviderError, Resource,
    ResourceKind, ResourceProvider, Result, Server, SnapshotInfo, Volume,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.hetzner.cloud/v1";

const PER_PAGE: u32 = 50;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated client for one project
pub struct HcloudClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HcloudClient {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(token, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(token: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ProviderError::ConfigError("API token is empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("lazyhcloud/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    /// GET a JSON document. 404 is reported as `Ok(None)`.
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Option<Value>> {
        tracing::debug!("GET {}", path);
        let resp = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(Some(serde_json::from_str(&body)?))
    }

    async fn post_json(&self, path: &str, payload: &Value) -> Result<Value> {
        tracing::debug!("POST {}", path);
        let resp = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch every page of a collection endpoint
    async fn list_all<T: DeserializeOwned>(&self, kind: ResourceKind) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1u64;

        loop {
            let query = [("page", page.to_string()), ("per_page", PER_PAGE.to_string())];
            let body = self
                .get_json(kind.api_path(), &query)
                .await?
                .ok_or_else(|| ProviderError::NotFound(format!("/{}", kind.api_path())))?;

            let (mut batch, next) = decode_page::<T>(body, kind.api_path())?;
            items.append(&mut batch);

            match next {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        tracing::debug!("Listed {} {}", items.len(), kind.api_path());
        Ok(items)
    }

    async fn get_one<T: DeserializeOwned>(&self, kind: ResourceKind, id: u64) -> Result<Option<T>> {
        let path = format!("{}/{}", kind.api_path(), id);
        match self.get_json(&path, &[]).await? {
            Some(body) => decode_item(body, kind.api_item_key()).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ResourceProvider for HcloudClient {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>> {
        let items = match kind {
            ResourceKind::Servers => wrap(self.list_all::<Server>(kind).await?, Resource::Server),
            ResourceKind::Networks => wrap(self.list_all::<Network>(kind).await?, Resource::Network),
            ResourceKind::LoadBalancers => {
                wrap(self.list_all::<LoadBalancer>(kind).await?, Resource::LoadBalancer)
            }
            ResourceKind::FloatingIps => {
                wrap(self.list_all::<FloatingIp>(kind).await?, Resource::FloatingIp)
            }
            ResourceKind::Firewalls => wrap(self.list_all::<Firewall>(kind).await?, Resource::Firewall),
            ResourceKind::Volumes => wrap(self.list_all::<Volume>(kind).await?, Resource::Volume),
        };
        Ok(items)
    }

    async fn get(&self, kind: ResourceKind, id: u64) -> Result<Option<Resource>> {
        let item = match kind {
            ResourceKind::Servers => self.get_one::<Server>(kind, id).await?.map(Resource::Server),
            ResourceKind::Networks => self.get_one::<Network>(kind, id).await?.map(Resource::Network),
            ResourceKind::LoadBalancers => self
                .get_one::<LoadBalancer>(kind, id)
                .await?
                .map(Resource::LoadBalancer),
            ResourceKind::FloatingIps => self
                .get_one::<FloatingIp>(kind, id)
                .await?
                .map(Resource::FloatingIp),
            ResourceKind::Firewalls => self.get_one::<Firewall>(kind, id).await?.map(Resource::Firewall),
            ResourceKind::Volumes => self.get_one::<Volume>(kind, id).await?.map(Resource::Volume),
        };
        Ok(item)
    }

    async fn create_snapshot(&self, server_id: u64, description: &str) -> Result<SnapshotInfo> {
        let payload = serde_json::json!({
            "type": "snapshot",
            "description": description,
        });
        let body = self
            .post_json(&format!("servers/{}/actions/create_image", server_id), &payload)
            .await?;

        let image = body.get("image").cloned().unwrap_or(Value::Null);
        Ok(SnapshotInfo {
            image_id: image.get("id").and_then(Value::as_u64).unwrap_or_default(),
            description: image
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

fn wrap<T>(items: Vec<T>, f: fn(T) -> Resource) -> Vec<Resource> {
    items.into_iter().map(f).collect()
}

/// Split a collection response into its items and the next page number
fn decode_page<T: DeserializeOwned>(mut body: Value, key: &str) -> Result<(Vec<T>, Option<u64>)> {
    let next = body
        .pointer("/meta/pagination/next_page")
        .and_then(Value::as_u64);
    let items = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| ProviderError::DecodeError(format!("response has no \"{}\" field", key)))?;
    Ok((serde_json::from_value(items)?, next))
}

fn decode_item<T: DeserializeOwned>(mut body: Value, key: &str) -> Result<T> {
    let item = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| ProviderError::DecodeError(format!("response has no \"{}\" field", key)))?;
    Ok(serde_json::from_value(item)?)
}

/// Map an error response body (`{"error": {"code": .., "message": ..}}`)
fn api_error(status: u16, body: &str) -> ProviderError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.pointer(&format!("/error/{}", name)))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    ProviderError::Api {
        status,
        code: field("code").unwrap_or_else(|| "http_error".to_string()),
        message: field("message").unwrap_or_else(|| body.trim().to_string()),
    }
}

/// Connector that builds [`HcloudClient`]s against one endpoint
#[derive(Debug, Clone)]
pub struct HcloudConnector {
    endpoint: String,
}

impl HcloudConnector {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for HcloudConnector {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl Connector for HcloudConnector {
    fn connect(&self, token: &str) -> Result<Arc<dyn ResourceProvider>> {
        tracing::info!("Connecting to {}", self.endpoint);
        Ok(Arc::new(HcloudClient::with_endpoint(token, self.endpoint.clone())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_page_with_next() {
        let body = serde_json::json!({
            "networks": [
                {"id": 1, "name": "a", "ip_range": "10.0.0.0/16", "subnets": [], "labels": {}},
                {"id": 2, "name": "b", "ip_range": "10.1.0.0/16", "subnets": [], "labels": {}}
            ],
            "meta": {"pagination": {"page": 1, "per_page": 2, "next_page": 2, "last_page": 2}}
        });
        let (items, next) = decode_page::<Network>(body, "networks").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].ip_range, "10.1.0.0/16");
        assert_eq!(next, Some(2));
    }

    #[test]
    fn test_decode_last_page() {
        let body = serde_json::json!({
            "volumes": [],
            "meta": {"pagination": {"page": 1, "next_page": null}}
        });
        let (items, next) = decode_page::<Volume>(body, "volumes").unwrap();
        assert!(items.is_empty());
        assert_eq!(next, None);
    }

    #[test]
    fn test_decode_page_missing_key() {
        let body = serde_json::json!({"meta": {}});
        let err = decode_page::<Volume>(body, "volumes").unwrap_err();
        assert!(matches!(err, ProviderError::DecodeError(_)));
    }

    #[test]
    fn test_decode_item() {
        let body = serde_json::json!({
            "floating_ip": {"id": 4, "name": "", "ip": "1.1.1.1", "type": "ipv4", "server": 42, "blocked": false, "labels": {}}
        });
        let fip: FloatingIp = decode_item(body, "floating_ip").unwrap();
        assert_eq!(fip.server, Some(42));
        assert_eq!(fip.server_name, None);
        assert_eq!(fip.display_name(), "1.1.1.1");
    }

    #[test]
    fn test_api_error_body() {
        let err = api_error(
            401,
            r#"{"error": {"code": "unauthorized", "message": "unable to authenticate"}}"#,
        );
        match err {
            ProviderError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 401);
                assert_eq!(code, "unauthorized");
                assert_eq!(message, "unable to authenticate");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_non_json_body() {
        let err = api_error(502, "Bad Gateway\n");
        assert_eq!(err.to_string(), "API error (502): http_error: Bad Gateway");
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            HcloudClient::new("   "),
            Err(ProviderError::ConfigError(_))
        ));
    }

    #[test]
    fn test_connector_trims_endpoint() {
        let client = HcloudClient::with_endpoint("t", "http://localhost:4000/v1/").unwrap();
        assert_eq!(client.url("servers"), "http://localhost:4000/v1/servers");
    }
}
