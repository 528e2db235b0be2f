//! Resource types returned by the cloud API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Labels attached to a resource, kept sorted by key
pub type Labels = BTreeMap<String, String>;

/// The kinds of resource shown as tabs, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Servers,
    Networks,
    LoadBalancers,
    FloatingIps,
    Firewalls,
    Volumes,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Servers,
        ResourceKind::Networks,
        ResourceKind::LoadBalancers,
        ResourceKind::FloatingIps,
        ResourceKind::Firewalls,
        ResourceKind::Volumes,
    ];

    /// Tab label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Servers => "Servers",
            Self::Networks => "Networks",
            Self::LoadBalancers => "Load Balancers",
            Self::FloatingIps => "Floating IPs",
            Self::Firewalls => "Firewalls",
            Self::Volumes => "Volumes",
        }
    }

    /// Singular noun used in notices ("No labels found for this server.")
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Servers => "server",
            Self::Networks => "network",
            Self::LoadBalancers => "load balancer",
            Self::FloatingIps => "floating IP",
            Self::Firewalls => "firewall",
            Self::Volumes => "volume",
        }
    }

    /// Collection path segment in the API (`/servers`, `/load_balancers`, ...)
    pub fn api_path(&self) -> &'static str {
        match self {
            Self::Servers => "servers",
            Self::Networks => "networks",
            Self::LoadBalancers => "load_balancers",
            Self::FloatingIps => "floating_ips",
            Self::Firewalls => "firewalls",
            Self::Volumes => "volumes",
        }
    }

    /// JSON key of a single object in a get-by-ID response
    pub fn api_item_key(&self) -> &'static str {
        match self {
            Self::Servers => "server",
            Self::Networks => "network",
            Self::LoadBalancers => "load_balancer",
            Self::FloatingIps => "floating_ip",
            Self::Firewalls => "firewall",
            Self::Volumes => "volume",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Servers => 0,
            Self::Networks => 1,
            Self::LoadBalancers => 2,
            Self::FloatingIps => 3,
            Self::Firewalls => 4,
            Self::Volumes => 5,
        }
    }

    /// Next kind in tab order, wrapping around
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous kind in tab order, wrapping around
    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "servers" | "server" => Ok(Self::Servers),
            "networks" | "network" => Ok(Self::Networks),
            "load_balancers" | "load_balancer" | "lb" => Ok(Self::LoadBalancers),
            "floating_ips" | "floating_ip" | "fip" => Ok(Self::FloatingIps),
            "firewalls" | "firewall" => Ok(Self::Firewalls),
            "volumes" | "volume" => Ok(Self::Volumes),
            _ => Err(format!("Unknown resource kind: {}", s)),
        }
    }
}

/// Server status as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Running,
    Initializing,
    Starting,
    Stopping,
    Off,
    Deleting,
    Migrating,
    Rebuilding,
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Initializing => write!(f, "initializing"),
            Self::Starting => write!(f, "starting"),
            Self::Stopping => write!(f, "stopping"),
            Self::Off => write!(f, "off"),
            Self::Deleting => write!(f, "deleting"),
            Self::Migrating => write!(f, "migrating"),
            Self::Rebuilding => write!(f, "rebuilding"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Server {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub status: ServerStatus,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub public_net: PublicNet,
    #[serde(default)]
    pub private_net: Vec<PrivateNet>,
    #[serde(default)]
    pub server_type: Option<ServerType>,
    #[serde(default)]
    pub datacenter: Option<Datacenter>,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub load_balancers: Vec<u64>,
    #[serde(default)]
    pub volumes: Vec<u64>,
}

impl Server {
    pub fn public_ipv4(&self) -> Option<&str> {
        self.public_net
            .ipv4
            .as_ref()
            .map(|net| net.ip.as_str())
            .filter(|ip| !ip.is_empty())
    }

    pub fn public_ipv6(&self) -> Option<&str> {
        self.public_net
            .ipv6
            .as_ref()
            .map(|net| net.ip.as_str())
            .filter(|ip| !ip.is_empty())
    }

    /// First private network address, if attached to any network
    pub fn private_ip(&self) -> Option<&str> {
        self.private_net
            .iter()
            .map(|net| net.ip.as_str())
            .find(|ip| !ip.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PublicNet {
    #[serde(default)]
    pub ipv4: Option<PublicIp>,
    #[serde(default)]
    pub ipv6: Option<PublicIp>,
    #[serde(default)]
    pub floating_ips: Vec<u64>,
    #[serde(default)]
    pub firewalls: Vec<AppliedFirewall>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PublicIp {
    pub ip: String,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub dns_ptr: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppliedFirewall {
    pub id: u64,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PrivateNet {
    pub network: u64,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub alias_ips: Vec<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServerType {
    pub name: String,
    #[serde(default)]
    pub cores: u32,
    #[serde(default)]
    pub memory: f64,
    #[serde(default)]
    pub disk: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Datacenter {
    pub name: String,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Network {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub ip_range: String,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
    #[serde(default)]
    pub servers: Vec<u64>,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Subnet {
    #[serde(rename = "type", default)]
    pub subnet_type: String,
    #[serde(default)]
    pub ip_range: Option<String>,
    #[serde(default)]
    pub network_zone: String,
    #[serde(default)]
    pub gateway: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub public_net: LoadBalancerPublicNet,
    #[serde(default)]
    pub private_net: Vec<LoadBalancerPrivateNet>,
    #[serde(default)]
    pub targets: Vec<LoadBalancerTarget>,
    #[serde(default)]
    pub services: Vec<LoadBalancerService>,
    #[serde(default)]
    pub load_balancer_type: Option<NamedRef>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub labels: Labels,
}

impl LoadBalancer {
    pub fn public_ipv4(&self) -> Option<&str> {
        self.public_net.ipv4.ip.as_deref().filter(|ip| !ip.is_empty())
    }

    pub fn public_ipv6(&self) -> Option<&str> {
        self.public_net.ipv6.ip.as_deref().filter(|ip| !ip.is_empty())
    }

    pub fn private_ip(&self) -> Option<&str> {
        self.private_net
            .iter()
            .map(|net| net.ip.as_str())
            .find(|ip| !ip.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadBalancerPublicNet {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub ipv4: OptionalIp,
    #[serde(default)]
    pub ipv6: OptionalIp,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OptionalIp {
    #[serde(default)]
    pub ip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadBalancerPrivateNet {
    pub network: u64,
    #[serde(default)]
    pub ip: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadBalancerTarget {
    #[serde(rename = "type", default)]
    pub target_type: String,
    #[serde(default)]
    pub server: Option<IdRef>,
    #[serde(default)]
    pub label_selector: Option<LabelSelector>,
    #[serde(default)]
    pub ip: Option<OptionalIp>,
    #[serde(default)]
    pub use_private_ip: bool,
    #[serde(default)]
    pub health_status: Vec<HealthStatus>,
}

impl LoadBalancerTarget {
    /// Human readable target: server ID, label selector or IP
    pub fn describe(&self) -> String {
        if let Some(server) = &self.server {
            return format!("server {}", server.id);
        }
        if let Some(selector) = &self.label_selector {
            return format!("label selector {}", selector.selector);
        }
        if let Some(ip) = self.ip.as_ref().and_then(|ip| ip.ip.as_deref()) {
            return format!("ip {}", ip);
        }
        self.target_type.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HealthStatus {
    pub listen_port: u16,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadBalancerService {
    pub protocol: String,
    pub listen_port: u16,
    pub destination_port: u16,
    #[serde(default)]
    pub proxyprotocol: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FloatingIp {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ip: String,
    #[serde(rename = "type", default)]
    pub ip_type: String,
    #[serde(default)]
    pub server: Option<u64>,
    /// Name of the attached server, filled in after a separate lookup
    #[serde(skip)]
    pub server_name: Option<String>,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub home_location: Option<Location>,
    #[serde(default)]
    pub labels: Labels,
}

impl FloatingIp {
    /// Name, falling back to the address and then to the ID
    pub fn display_name(&self) -> String {
        if !self.name.is_empty() {
            self.name.clone()
        } else if !self.ip.is_empty() {
            self.ip.clone()
        } else {
            format!("Floating IP {}", self.id)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Firewall {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub rules: Vec<FirewallRule>,
    #[serde(default)]
    pub applied_to: Vec<FirewallResource>,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FirewallRule {
    pub direction: String,
    pub protocol: String,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub source_ips: Vec<String>,
    #[serde(default)]
    pub destination_ips: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FirewallResource {
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default)]
    pub server: Option<IdRef>,
    #[serde(default)]
    pub label_selector: Option<LabelSelector>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Volume {
    pub id: u64,
    pub name: String,
    /// Size in GB
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub server: Option<u64>,
    /// Name of the attached server, filled in after a separate lookup
    #[serde(skip)]
    pub server_name: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub linux_device: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IdRef {
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelSelector {
    pub selector: String,
}

/// Result of a snapshot creation request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnapshotInfo {
    pub image_id: u64,
    pub description: Option<String>,
}

/// Any resource shown in the browser
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Server(Server),
    Network(Network),
    LoadBalancer(LoadBalancer),
    FloatingIp(FloatingIp),
    Firewall(Firewall),
    Volume(Volume),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Server(_) => ResourceKind::Servers,
            Self::Network(_) => ResourceKind::Networks,
            Self::LoadBalancer(_) => ResourceKind::LoadBalancers,
            Self::FloatingIp(_) => ResourceKind::FloatingIps,
            Self::Firewall(_) => ResourceKind::Firewalls,
            Self::Volume(_) => ResourceKind::Volumes,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Self::Server(s) => s.id,
            Self::Network(n) => n.id,
            Self::LoadBalancer(lb) => lb.id,
            Self::FloatingIp(fip) => fip.id,
            Self::Firewall(fw) => fw.id,
            Self::Volume(v) => v.id,
        }
    }

    /// Name shown in lists and detail titles
    pub fn display_name(&self) -> String {
        match self {
            Self::Server(s) => s.name.clone(),
            Self::Network(n) => n.name.clone(),
            Self::LoadBalancer(lb) => lb.name.clone(),
            Self::FloatingIp(fip) => fip.display_name(),
            Self::Firewall(fw) => fw.name.clone(),
            Self::Volume(v) => v.name.clone(),
        }
    }

    pub fn labels(&self) -> &Labels {
        match self {
            Self::Server(s) => &s.labels,
            Self::Network(n) => &n.labels,
            Self::LoadBalancer(lb) => &lb.labels,
            Self::FloatingIp(fip) => &fip.labels,
            Self::Firewall(fw) => &fw.labels,
            Self::Volume(v) => &v.labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_cycle_wraps() {
        assert_eq!(ResourceKind::Servers.next(), ResourceKind::Networks);
        assert_eq!(ResourceKind::Volumes.next(), ResourceKind::Servers);
        assert_eq!(ResourceKind::Servers.prev(), ResourceKind::Volumes);
        for kind in ResourceKind::ALL {
            assert_eq!(kind.next().prev(), kind);
            assert_eq!(ResourceKind::ALL[kind.index()], kind);
        }
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("servers".parse::<ResourceKind>().unwrap(), ResourceKind::Servers);
        assert_eq!(
            "Load Balancers".parse::<ResourceKind>().unwrap(),
            ResourceKind::LoadBalancers
        );
        assert_eq!(
            "floating-ip".parse::<ResourceKind>().unwrap(),
            ResourceKind::FloatingIps
        );
        assert!("buckets".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_parse_server() {
        let json = r#"{
            "id": 42,
            "name": "web-1",
            "status": "running",
            "created": "2024-01-30T23:50:00+00:00",
            "public_net": {
                "ipv4": {"ip": "1.2.3.4", "blocked": false, "dns_ptr": "static.example"},
                "ipv6": {"ip": "2001:db8::/64", "blocked": false, "dns_ptr": []},
                "floating_ips": [7],
                "firewalls": [{"id": 3, "status": "applied"}]
            },
            "private_net": [{"network": 9, "ip": "10.0.0.2", "alias_ips": [], "mac_address": "86:00:00:2a:7d:e0"}],
            "server_type": {"name": "cx22", "cores": 2, "memory": 4.0, "disk": 40},
            "datacenter": {"name": "fsn1-dc14", "location": {"name": "fsn1", "city": "Falkenstein"}},
            "image": {"name": "ubuntu-24.04", "description": "Ubuntu 24.04"},
            "labels": {"env": "prod", "app": "web"},
            "load_balancers": [],
            "volumes": [11],
            "rescue_enabled": false
        }"#;

        let server: Server = serde_json::from_str(json).unwrap();
        assert_eq!(server.id, 42);
        assert_eq!(server.status, ServerStatus::Running);
        assert_eq!(server.public_ipv4(), Some("1.2.3.4"));
        assert_eq!(server.public_ipv6(), Some("2001:db8::/64"));
        assert_eq!(server.private_ip(), Some("10.0.0.2"));
        assert_eq!(server.labels.keys().collect::<Vec<_>>(), vec!["app", "env"]);
        assert_eq!(server.datacenter.unwrap().location.unwrap().city.as_deref(), Some("Falkenstein"));
        assert!(server.created.is_some());
    }

    #[test]
    fn test_parse_server_without_public_ip() {
        let json = r#"{"id": 1, "name": "private", "status": "off",
            "public_net": {"ipv4": null, "ipv6": null, "floating_ips": [], "firewalls": []}}"#;
        let server: Server = serde_json::from_str(json).unwrap();
        assert_eq!(server.public_ipv4(), None);
        assert_eq!(server.public_ipv6(), None);
        assert_eq!(server.private_ip(), None);
        assert_eq!(server.status, ServerStatus::Off);
    }

    #[test]
    fn test_unknown_server_status() {
        let json = r#"{"id": 1, "name": "x", "status": "teleporting"}"#;
        let server: Server = serde_json::from_str(json).unwrap();
        assert_eq!(server.status, ServerStatus::Unknown);
    }

    #[test]
    fn test_parse_load_balancer_targets() {
        let json = r#"{
            "id": 5, "name": "lb",
            "public_net": {"enabled": true, "ipv4": {"ip": "5.6.7.8"}, "ipv6": {"ip": null}},
            "private_net": [{"network": 2, "ip": "10.0.0.5"}],
            "targets": [
                {"type": "server", "server": {"id": 42}, "use_private_ip": true,
                 "health_status": [{"listen_port": 80, "status": "healthy"}]},
                {"type": "label_selector", "label_selector": {"selector": "env=prod"}},
                {"type": "ip", "ip": {"ip": "203.0.113.1"}}
            ],
            "services": [{"protocol": "http", "listen_port": 80, "destination_port": 8080, "proxyprotocol": false}]
        }"#;

        let lb: LoadBalancer = serde_json::from_str(json).unwrap();
        assert_eq!(lb.public_ipv4(), Some("5.6.7.8"));
        assert_eq!(lb.public_ipv6(), None);
        assert_eq!(lb.private_ip(), Some("10.0.0.5"));
        let described: Vec<String> = lb.targets.iter().map(|t| t.describe()).collect();
        assert_eq!(
            described,
            vec!["server 42", "label selector env=prod", "ip 203.0.113.1"]
        );
        assert_eq!(lb.services[0].destination_port, 8080);
    }

    #[test]
    fn test_floating_ip_display_name_fallback() {
        let mut fip = FloatingIp {
            id: 77,
            name: "edge".to_string(),
            ip: "9.9.9.9".to_string(),
            ..Default::default()
        };
        assert_eq!(fip.display_name(), "edge");
        fip.name.clear();
        assert_eq!(fip.display_name(), "9.9.9.9");
        fip.ip.clear();
        assert_eq!(fip.display_name(), "Floating IP 77");
    }

    #[test]
    fn test_resource_accessors() {
        let res = Resource::Volume(Volume {
            id: 3,
            name: "data".to_string(),
            ..Default::default()
        });
        assert_eq!(res.kind(), ResourceKind::Volumes);
        assert_eq!(res.id(), 3);
        assert_eq!(res.display_name(), "data");
        assert!(res.labels().is_empty());
    }
}
