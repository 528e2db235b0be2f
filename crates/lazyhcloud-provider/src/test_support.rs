//! Test support utilities for lazyhcloud-provider
//!
//! Provides an in-memory MockProvider and resource fixtures so the runtime
//! can be tested without network access.

use crate::*;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Records which methods were called on the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    List { kind: ResourceKind },
    Get { kind: ResourceKind, id: u64 },
    CreateSnapshot { server_id: u64, description: String },
}

/// Configurable in-memory provider
///
/// `list` and `get` answer from `resources`; setting `error` makes every
/// call fail with a copy of it.
#[derive(Clone, Default)]
pub struct MockProvider {
    pub calls: Arc<Mutex<Vec<MockCall>>>,
    pub resources: Arc<Mutex<Vec<Resource>>>,
    pub error: Arc<Mutex<Option<ProviderError>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resources(resources: Vec<Resource>) -> Self {
        let mock = Self::new();
        *mock.resources.lock().unwrap() = resources;
        mock
    }

    /// Replace a stored resource with the same kind and ID, or add it
    pub fn upsert(&self, resource: Resource) {
        let mut resources = self.resources.lock().unwrap();
        match resources
            .iter_mut()
            .find(|r| r.kind() == resource.kind() && r.id() == resource.id())
        {
            Some(existing) => *existing = resource,
            None => resources.push(resource),
        }
    }

    pub fn remove(&self, kind: ResourceKind, id: u64) {
        self.resources
            .lock()
            .unwrap()
            .retain(|r| !(r.kind() == kind && r.id() == id));
    }

    pub fn fail_with(&self, error: ProviderError) {
        *self.error.lock().unwrap() = Some(error);
    }

    fn record(&self, call: MockCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match &*self.error.lock().unwrap() {
            Some(e) => Err(clone_provider_error(e)),
            None => Ok(()),
        }
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if a specific call was made
    pub fn was_called(&self, call: &MockCall) -> bool {
        self.calls.lock().unwrap().contains(call)
    }
}

#[async_trait]
impl ResourceProvider for MockProvider {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>> {
        self.record(MockCall::List { kind })?;
        Ok(self
            .resources
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.kind() == kind)
            .cloned()
            .collect())
    }

    async fn get(&self, kind: ResourceKind, id: u64) -> Result<Option<Resource>> {
        self.record(MockCall::Get { kind, id })?;
        Ok(self
            .resources
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.kind() == kind && r.id() == id)
            .cloned())
    }

    async fn create_snapshot(&self, server_id: u64, description: &str) -> Result<SnapshotInfo> {
        self.record(MockCall::CreateSnapshot {
            server_id,
            description: description.to_string(),
        })?;
        Ok(SnapshotInfo {
            image_id: 9000 + server_id,
            description: Some(description.to_string()),
        })
    }
}

/// Connector that hands out the same mock for every token
#[derive(Clone, Default)]
pub struct MockConnector {
    pub provider: MockProvider,
    pub tokens: Arc<Mutex<Vec<String>>>,
}

impl MockConnector {
    pub fn new(provider: MockProvider) -> Self {
        Self {
            provider,
            tokens: Arc::default(),
        }
    }
}

impl Connector for MockConnector {
    fn connect(&self, token: &str) -> Result<Arc<dyn ResourceProvider>> {
        self.tokens.lock().unwrap().push(token.to_string());
        Ok(Arc::new(self.provider.clone()))
    }
}

/// Clone a ProviderError (thiserror types don't implement Clone)
pub fn clone_provider_error(e: &ProviderError) -> ProviderError {
    match e {
        ProviderError::ConnectionError(s) => ProviderError::ConnectionError(s.clone()),
        ProviderError::Api {
            status,
            code,
            message,
        } => ProviderError::Api {
            status: *status,
            code: code.clone(),
            message: message.clone(),
        },
        ProviderError::NotFound(s) => ProviderError::NotFound(s.clone()),
        ProviderError::DecodeError(s) => ProviderError::DecodeError(s.clone()),
        ProviderError::ConfigError(s) => ProviderError::ConfigError(s.clone()),
        ProviderError::Unsupported(s) => ProviderError::Unsupported(s.clone()),
    }
}

/// A running server with a public IPv4 and one private network
pub fn mock_server(id: u64, name: &str) -> Server {
    Server {
        id,
        name: name.to_string(),
        status: ServerStatus::Running,
        public_net: PublicNet {
            ipv4: Some(PublicIp {
                ip: format!("203.0.113.{}", id % 250),
                ..Default::default()
            }),
            ipv6: Some(PublicIp {
                ip: "2001:db8::/64".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        },
        private_net: vec![PrivateNet {
            network: 1,
            ip: format!("10.0.0.{}", id % 250),
            ..Default::default()
        }],
        server_type: Some(ServerType {
            name: "cx22".to_string(),
            cores: 2,
            memory: 4.0,
            disk: 40,
        }),
        ..Default::default()
    }
}

pub fn mock_network(id: u64, name: &str) -> Network {
    Network {
        id,
        name: name.to_string(),
        ip_range: "10.0.0.0/16".to_string(),
        subnets: vec![Subnet {
            subnet_type: "cloud".to_string(),
            ip_range: Some("10.0.1.0/24".to_string()),
            network_zone: "eu-central".to_string(),
            gateway: Some("10.0.0.1".to_string()),
        }],
        ..Default::default()
    }
}

pub fn mock_volume(id: u64, name: &str, server: Option<u64>) -> Volume {
    Volume {
        id,
        name: name.to_string(),
        size: 10,
        server,
        status: "available".to_string(),
        ..Default::default()
    }
}

pub fn mock_floating_ip(id: u64, ip: &str, server: Option<u64>) -> FloatingIp {
    FloatingIp {
        id,
        ip: ip.to_string(),
        ip_type: "ipv4".to_string(),
        server,
        ..Default::default()
    }
}

pub fn mock_firewall(id: u64, name: &str, rules: Vec<FirewallRule>) -> Firewall {
    Firewall {
        id,
        name: name.to_string(),
        rules,
        ..Default::default()
    }
}

pub fn mock_load_balancer(id: u64, name: &str) -> LoadBalancer {
    LoadBalancer {
        id,
        name: name.to_string(),
        public_net: LoadBalancerPublicNet {
            enabled: true,
            ipv4: OptionalIp {
                ip: Some("198.51.100.7".to_string()),
            },
            ipv6: OptionalIp { ip: None },
        },
        ..Default::default()
    }
}
