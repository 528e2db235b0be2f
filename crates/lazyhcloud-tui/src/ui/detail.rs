use super::*;
use lazyhcloud_core::DetailView;
use lazyhcloud_provider::{Server, Subnet};

pub(super) fn draw_detail(frame: &mut Frame, state: &AppState, area: Rect) {
    let Some(view) = &state.detail else {
        return;
    };

    let block = Block::default()
        .title(format!(" {} ", view.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = match view {
        DetailView::Labels { labels, .. } => labels
            .iter()
            .map(|(key, value)| {
                Line::from(vec![
                    Span::styled(format!(" {}", key), Style::default().fg(Color::Cyan)),
                    Span::raw(" = "),
                    Span::raw(value.clone()),
                ])
            })
            .collect(),
        DetailView::ServerDetail { server, networks } => {
            let mut lines = server_lines(server);
            lines.push(Line::from(""));
            lines.push(section("Private networks"));
            if networks.is_empty() {
                lines.push(Line::from(Span::styled(
                    "   (none)",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            for network in networks {
                lines.push(Line::from(vec![
                    Span::styled(format!("   {}", network.name), Style::default().bold()),
                    Span::raw(format!("  {}", network.ip_range)),
                ]));
                lines.extend(network.subnets.iter().map(|s| subnet_line(s, "     ")));
            }
            lines
        }
        DetailView::NetworkSubnets {
            ip_range, subnets, ..
        } => {
            let mut lines = vec![field("IP range", ip_range.clone()), Line::from("")];
            lines.extend(subnets.iter().map(|s| subnet_line(s, " ")));
            lines
        }
        DetailView::FirewallRules { rules, .. } => rules
            .iter()
            .map(|rule| {
                let peers = if rule.direction == "in" {
                    &rule.source_ips
                } else {
                    &rule.destination_ips
                };
                let mut spans = vec![
                    Span::styled(
                        format!(" {:<4}", rule.direction),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(format!(
                        "{:<6} {:<12} {}",
                        rule.protocol,
                        rule.port.as_deref().unwrap_or("any"),
                        peers.join(", ")
                    )),
                ];
                if let Some(desc) = rule.description.as_deref().filter(|d| !d.is_empty()) {
                    spans.push(Span::styled(
                        format!("  # {}", desc),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                Line::from(spans)
            })
            .collect(),
        DetailView::LoadBalancerTargets { targets, .. } => targets
            .iter()
            .map(|target| {
                let health = target
                    .health_status
                    .iter()
                    .map(|h| format!("{}:{}", h.listen_port, h.status))
                    .collect::<Vec<_>>()
                    .join(" ");
                Line::from(vec![
                    Span::styled(
                        format!(" {:<32}", target.describe()),
                        Style::default().bold(),
                    ),
                    Span::styled(health, Style::default().fg(Color::Green)),
                ])
            })
            .collect(),
        DetailView::LoadBalancerServices { services, .. } => services
            .iter()
            .map(|service| {
                Line::from(vec![
                    Span::styled(
                        format!(" {:<6}", service.protocol),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(format!(
                        "{} -> {}",
                        service.listen_port, service.destination_port
                    )),
                ])
            })
            .collect::<Vec<_>>(),
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((state.detail_scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {}", title),
        Style::default().fg(Color::Cyan).bold(),
    ))
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {:<14}", label), Style::default().fg(Color::Gray)),
        Span::raw(value),
    ])
}

fn subnet_line(subnet: &Subnet, indent: &str) -> Line<'static> {
    Line::from(format!(
        "{}{:<8} {:<18} {:<12} gw {}",
        indent,
        subnet.subnet_type,
        subnet.ip_range.as_deref().unwrap_or("-"),
        subnet.network_zone,
        subnet.gateway.as_deref().unwrap_or("-"),
    ))
}

fn server_lines(server: &Server) -> Vec<Line<'static>> {
    let dash = |v: Option<&str>| v.unwrap_or("-").to_string();
    vec![
        field("ID", server.id.to_string()),
        field("Status", server.status.to_string()),
        field("Public IPv4", dash(server.public_ipv4())),
        field("Public IPv6", dash(server.public_ipv6())),
        field("Private IP", dash(server.private_ip())),
        field(
            "Type",
            server
                .server_type
                .as_ref()
                .map(|t| format!("{} ({} vCPU, {} GB RAM, {} GB disk)", t.name, t.cores, t.memory, t.disk))
                .unwrap_or_else(|| "-".to_string()),
        ),
        field(
            "Datacenter",
            dash(server.datacenter.as_ref().map(|dc| dc.name.as_str())),
        ),
        field(
            "Image",
            dash(server.image.as_ref().and_then(|i| i.name.as_deref())),
        ),
        field(
            "Created",
            server
                .created
                .map(|c| c.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
    ]
}
