//! Context menus: per-kind action lists and action resolution
//!
//! A menu only remembers the kind and ID of the resource it was opened for.
//! Actions are resolved by [`resolve`] against a freshly fetched copy of the
//! resource, never against the list row the menu was opened from.

use crate::{DetailView, Multiplexer};
use lazyhcloud_provider::{Resource, ResourceKind};

/// A field that can be copied to the clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyField {
    Id,
    Name,
    PublicIpv4,
    PublicIpv6,
    PrivateIp,
    IpRange,
    Address,
    AttachedServerId,
    AttachedServerName,
}

/// Ways of opening an SSH session to a server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellVariant {
    TmuxWindow,
    TmuxPane,
    ZellijTab,
    ZellijPane,
    NewTerminal,
    CurrentTerminal,
}

impl ShellVariant {
    /// Variants offered for a multiplexer, in menu order
    pub fn available(multiplexer: Multiplexer) -> Vec<ShellVariant> {
        let mut variants = match multiplexer {
            Multiplexer::Tmux => vec![Self::TmuxWindow, Self::TmuxPane],
            Multiplexer::Zellij => vec![Self::ZellijTab, Self::ZellijPane],
            Multiplexer::None => Vec::new(),
        };
        variants.extend([Self::NewTerminal, Self::CurrentTerminal]);
        variants
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::TmuxWindow => "SSH in new tmux window",
            Self::TmuxPane => "SSH in new tmux pane",
            Self::ZellijTab => "SSH in new zellij tab",
            Self::ZellijPane => "SSH in new zellij pane",
            Self::NewTerminal => "SSH in new terminal",
            Self::CurrentTerminal => "SSH in current terminal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Cancel,
    ViewDetails,
    ViewLabels,
    ViewSubnets,
    ViewRules,
    ViewTargets,
    ViewServices,
    Copy(CopyField),
    Shell(ShellVariant),
    CreateSnapshot,
}

impl MenuAction {
    pub fn label(&self, kind: ResourceKind) -> String {
        let text = match self {
            Self::Cancel => "Cancel",
            Self::ViewDetails => "View Details",
            Self::ViewLabels => "View Labels",
            Self::ViewSubnets => "View Subnets",
            Self::ViewRules => "View Rules",
            Self::ViewTargets => "View Targets",
            Self::ViewServices => "View Services",
            Self::CreateSnapshot => "Create Snapshot",
            Self::Shell(variant) => variant.label(),
            Self::Copy(field) => match (field, kind) {
                (CopyField::Id, _) => "Copy ID",
                (CopyField::Name, _) => "Copy Name",
                (CopyField::PublicIpv4, ResourceKind::Servers) => "Copy Public IP",
                (CopyField::PublicIpv4, _) => "Copy Public IPv4",
                (CopyField::PublicIpv6, _) => "Copy Public IPv6",
                (CopyField::PrivateIp, _) => "Copy Private IP",
                (CopyField::IpRange, _) => "Copy IP Range",
                (CopyField::Address, _) => "Copy Address",
                (CopyField::AttachedServerId, _) => "Copy Attached Server ID",
                (CopyField::AttachedServerName, _) => "Copy Attached Server Name",
            },
        };
        text.to_string()
    }
}

/// Actions offered for a kind, in menu order. `Cancel` is always first.
pub fn menu_actions(kind: ResourceKind, multiplexer: Multiplexer) -> Vec<MenuAction> {
    use CopyField::*;
    use MenuAction::*;

    match kind {
        ResourceKind::Servers => {
            let mut actions = vec![Cancel, ViewLabels, Copy(PublicIpv4), Copy(PrivateIp)];
            actions.extend(
                ShellVariant::available(multiplexer)
                    .into_iter()
                    .map(MenuAction::Shell),
            );
            actions.extend([ViewDetails, Copy(PublicIpv6), Copy(Id), Copy(Name), CreateSnapshot]);
            actions
        }
        ResourceKind::Networks => vec![
            Cancel,
            ViewSubnets,
            ViewLabels,
            Copy(Id),
            Copy(Name),
            Copy(IpRange),
        ],
        ResourceKind::LoadBalancers => vec![
            Cancel,
            ViewLabels,
            Copy(Id),
            Copy(Name),
            Copy(PublicIpv4),
            Copy(PublicIpv6),
            Copy(PrivateIp),
            ViewTargets,
            ViewServices,
        ],
        ResourceKind::FloatingIps => vec![
            Cancel,
            ViewLabels,
            Copy(Id),
            Copy(Name),
            Copy(Address),
            Copy(AttachedServerId),
            Copy(AttachedServerName),
        ],
        ResourceKind::Firewalls => vec![Cancel, ViewRules, ViewLabels, Copy(Id), Copy(Name)],
        ResourceKind::Volumes => vec![
            Cancel,
            ViewLabels,
            Copy(Id),
            Copy(Name),
            Copy(AttachedServerId),
            Copy(AttachedServerName),
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub action: MenuAction,
}

/// Modal action list bound to one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    pub kind: ResourceKind,
    pub resource_id: u64,
    pub items: Vec<MenuItem>,
    pub selected: usize,
}

impl ContextMenu {
    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.items.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.items.len() - 1);
        }
    }

    pub fn selected_action(&self) -> Option<MenuAction> {
        self.items.get(self.selected).map(|item| item.action)
    }

    /// Item index for a number key: `1`-`9` are items 0-8, `0` is item 9
    pub fn shortcut_index(&self, key: char) -> Option<usize> {
        let digit = key.to_digit(10)? as usize;
        let idx = if digit == 0 { 9 } else { digit - 1 };
        (idx < self.items.len()).then_some(idx)
    }

    /// Label of the number key that selects `idx`, if it has one
    pub fn shortcut_label(idx: usize) -> Option<char> {
        match idx {
            0..=8 => char::from_digit(idx as u32 + 1, 10),
            9 => Some('0'),
            _ => None,
        }
    }
}

/// Build the menu for a resource. Deterministic in its inputs.
pub fn build_menu(kind: ResourceKind, resource_id: u64, multiplexer: Multiplexer) -> ContextMenu {
    let items = menu_actions(kind, multiplexer)
        .into_iter()
        .map(|action| MenuItem {
            label: action.label(kind),
            action,
        })
        .collect();

    ContextMenu {
        kind,
        resource_id,
        items,
        selected: 0,
    }
}

/// What executing an action against a fresh resource amounts to
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// Put `text` on the clipboard
    Copy { text: String, what: String },
    /// The requested field is null or empty
    MissingField(String),
    /// Informational notice, e.g. an empty collection
    Notice(String),
    OpenDetail(DetailView),
    Launch {
        variant: ShellVariant,
        host: String,
        server_name: String,
    },
    Nothing,
}

/// Resolve an action against a freshly fetched resource
pub fn resolve(action: MenuAction, resource: &Resource) -> ActionOutcome {
    let kind = resource.kind();
    match action {
        MenuAction::Cancel | MenuAction::CreateSnapshot => ActionOutcome::Nothing,
        MenuAction::Copy(field) => match copy_value(field, resource) {
            Ok((text, what)) => ActionOutcome::Copy { text, what },
            Err(missing) => ActionOutcome::MissingField(missing),
        },
        MenuAction::ViewLabels => {
            let labels: Vec<(String, String)> = resource
                .labels()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            if labels.is_empty() {
                return empty_notice("labels", kind);
            }
            ActionOutcome::OpenDetail(DetailView::Labels {
                kind,
                name: resource.display_name(),
                labels,
            })
        }
        MenuAction::ViewDetails => match resource {
            Resource::Server(server) => ActionOutcome::OpenDetail(DetailView::ServerDetail {
                server: Box::new(server.clone()),
                networks: Vec::new(),
            }),
            _ => unsupported(action, kind),
        },
        MenuAction::ViewSubnets => match resource {
            Resource::Network(net) if net.subnets.is_empty() => empty_notice("subnets", kind),
            Resource::Network(net) => ActionOutcome::OpenDetail(DetailView::NetworkSubnets {
                name: net.name.clone(),
                ip_range: net.ip_range.clone(),
                subnets: net.subnets.clone(),
            }),
            _ => unsupported(action, kind),
        },
        MenuAction::ViewRules => match resource {
            Resource::Firewall(fw) if fw.rules.is_empty() => empty_notice("rules", kind),
            Resource::Firewall(fw) => ActionOutcome::OpenDetail(DetailView::FirewallRules {
                name: fw.name.clone(),
                rules: fw.rules.clone(),
            }),
            _ => unsupported(action, kind),
        },
        MenuAction::ViewTargets => match resource {
            Resource::LoadBalancer(lb) if lb.targets.is_empty() => empty_notice("targets", kind),
            Resource::LoadBalancer(lb) => {
                ActionOutcome::OpenDetail(DetailView::LoadBalancerTargets {
                    name: lb.name.clone(),
                    targets: lb.targets.clone(),
                })
            }
            _ => unsupported(action, kind),
        },
        MenuAction::ViewServices => match resource {
            Resource::LoadBalancer(lb) if lb.services.is_empty() => {
                empty_notice("services", kind)
            }
            Resource::LoadBalancer(lb) => {
                ActionOutcome::OpenDetail(DetailView::LoadBalancerServices {
                    name: lb.name.clone(),
                    services: lb.services.clone(),
                })
            }
            _ => unsupported(action, kind),
        },
        MenuAction::Shell(variant) => match resource {
            Resource::Server(server) => match server.public_ipv4() {
                Some(ip) => ActionOutcome::Launch {
                    variant,
                    host: ip.to_string(),
                    server_name: server.name.clone(),
                },
                None => ActionOutcome::MissingField("server has no public IP".to_string()),
            },
            _ => unsupported(action, kind),
        },
    }
}

fn empty_notice(what: &str, kind: ResourceKind) -> ActionOutcome {
    ActionOutcome::Notice(format!("No {} found for this {}.", what, kind.noun()))
}

fn unsupported(action: MenuAction, kind: ResourceKind) -> ActionOutcome {
    ActionOutcome::Notice(format!(
        "{} is not available for a {}",
        action.label(kind),
        kind.noun()
    ))
}

fn non_empty<S: AsRef<str>>(value: Option<S>) -> Option<String> {
    value
        .map(|v| v.as_ref().trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Extract a copyable field: `Ok((value, description))` or the missing-field notice
fn copy_value(field: CopyField, resource: &Resource) -> Result<(String, String), String> {
    let noun = resource.kind().noun();
    let missing = |what: &str| format!("{} has no {}", noun, what);

    let (value, what) = match (field, resource) {
        (CopyField::Id, _) => (Some(resource.id().to_string()), "ID"),
        (CopyField::Name, Resource::FloatingIp(fip)) => (non_empty(Some(&fip.name)), "name"),
        (CopyField::Name, _) => (non_empty(Some(resource.display_name())), "name"),

        (CopyField::PublicIpv4, Resource::Server(s)) => (non_empty(s.public_ipv4()), "public IP"),
        (CopyField::PublicIpv4, Resource::LoadBalancer(lb)) => {
            (non_empty(lb.public_ipv4()), "public IPv4")
        }
        (CopyField::PublicIpv6, Resource::Server(s)) => (non_empty(s.public_ipv6()), "public IPv6"),
        (CopyField::PublicIpv6, Resource::LoadBalancer(lb)) => {
            (non_empty(lb.public_ipv6()), "public IPv6")
        }
        (CopyField::PrivateIp, Resource::Server(s)) => (non_empty(s.private_ip()), "private IP"),
        (CopyField::PrivateIp, Resource::LoadBalancer(lb)) => {
            (non_empty(lb.private_ip()), "private IP")
        }
        (CopyField::IpRange, Resource::Network(n)) => (non_empty(Some(&n.ip_range)), "IP range"),
        (CopyField::Address, Resource::FloatingIp(fip)) => (non_empty(Some(&fip.ip)), "address"),

        (CopyField::AttachedServerId, Resource::FloatingIp(fip)) => {
            return attached_id(fip.server, noun)
        }
        (CopyField::AttachedServerId, Resource::Volume(v)) => return attached_id(v.server, noun),
        (CopyField::AttachedServerName, Resource::FloatingIp(fip)) => {
            return attached_name(fip.server, fip.server_name.as_deref(), noun)
        }
        (CopyField::AttachedServerName, Resource::Volume(v)) => {
            return attached_name(v.server, v.server_name.as_deref(), noun)
        }

        _ => {
            return Err(format!(
                "{} is not available for a {}",
                MenuAction::Copy(field).label(resource.kind()),
                noun
            ))
        }
    };

    match value {
        Some(value) => Ok((value, format!("{} {}", noun, what))),
        None => Err(missing(what)),
    }
}

fn attached_id(server: Option<u64>, noun: &str) -> Result<(String, String), String> {
    server
        .map(|id| (id.to_string(), "attached server ID".to_string()))
        .ok_or_else(|| format!("{} is not attached to a server", noun))
}

fn attached_name(
    server: Option<u64>,
    name: Option<&str>,
    noun: &str,
) -> Result<(String, String), String> {
    let id = server.ok_or_else(|| format!("{} is not attached to a server", noun))?;
    non_empty(name)
        .map(|name| (name, "attached server name".to_string()))
        .ok_or_else(|| format!("name of attached server {} is unavailable", id))
}
