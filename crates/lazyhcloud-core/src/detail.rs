//! Read-only secondary views opened from a context menu

use crate::Phase;
use lazyhcloud_provider::{
    FirewallRule, LoadBalancerService, LoadBalancerTarget, Network, ResourceKind, Server, Subnet,
};

/// Payload of the active detail view
#[derive(Debug, Clone, PartialEq)]
pub enum DetailView {
    Labels {
        kind: ResourceKind,
        name: String,
        labels: Vec<(String, String)>,
    },
    ServerDetail {
        server: Box<Server>,
        /// Private networks the server is attached to, as far as they could be fetched
        networks: Vec<Network>,
    },
    NetworkSubnets {
        name: String,
        ip_range: String,
        subnets: Vec<Subnet>,
    },
    FirewallRules {
        name: String,
        rules: Vec<FirewallRule>,
    },
    LoadBalancerTargets {
        name: String,
        targets: Vec<LoadBalancerTarget>,
    },
    LoadBalancerServices {
        name: String,
        services: Vec<LoadBalancerService>,
    },
}

impl DetailView {
    /// Phase that displays this view
    pub fn phase(&self) -> Phase {
        match self {
            Self::Labels { .. } => Phase::LabelView,
            Self::ServerDetail { .. } => Phase::ServerDetailView,
            Self::NetworkSubnets { .. } => Phase::NetworkSubnetView,
            Self::FirewallRules { .. } => Phase::FirewallRuleView,
            Self::LoadBalancerTargets { .. } => Phase::LoadBalancerTargetView,
            Self::LoadBalancerServices { .. } => Phase::LoadBalancerServiceView,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::Labels { name, .. } => format!("Labels: {}", name),
            Self::ServerDetail { server, .. } => format!("Server: {}", server.name),
            Self::NetworkSubnets { name, .. } => format!("Subnets: {}", name),
            Self::FirewallRules { name, .. } => format!("Firewall rules: {}", name),
            Self::LoadBalancerTargets { name, .. } => format!("Targets: {}", name),
            Self::LoadBalancerServices { name, .. } => format!("Services: {}", name),
        }
    }

    /// Number of scrollable rows
    pub fn row_count(&self) -> usize {
        match self {
            Self::Labels { labels, .. } => labels.len(),
            Self::ServerDetail { networks, .. } => networks.len(),
            Self::NetworkSubnets { subnets, .. } => subnets.len(),
            Self::FirewallRules { rules, .. } => rules.len(),
            Self::LoadBalancerTargets { targets, .. } => targets.len(),
            Self::LoadBalancerServices { services, .. } => services.len(),
        }
    }
}
