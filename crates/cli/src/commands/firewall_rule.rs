//! Firewall Rule Commands

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use dpservice_client::{Client, DpdkService};
use dpservice_common::{
    FirewallAction, FirewallRule, FirewallRuleSpec, IcmpFilter, Object, PortFilter, PortRange,
    ProtocolFilter, TrafficDirection,
};
use ipnetwork::IpNetwork;

use crate::output::{Output, View};

#[derive(Subcommand)]
pub enum FirewallRuleCommands {
    /// Get a firewall rule of an interface
    Get {
        /// Interface ID
        interface_id: String,

        /// Rule ID
        #[arg(long)]
        rule_id: String,
    },

    /// List the firewall rules of an interface
    List {
        /// Interface ID
        interface_id: String,
    },

    /// Install a firewall rule on an interface
    Create(FirewallRuleArgs),

    /// Remove a firewall rule from an interface
    Delete {
        /// Interface ID
        interface_id: String,

        /// Rule ID
        #[arg(long)]
        rule_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterProtocol {
    Icmp,
    Tcp,
    Udp,
}

#[derive(Args)]
pub struct FirewallRuleArgs {
    /// Interface ID
    pub interface_id: String,

    /// Rule ID
    #[arg(long)]
    pub rule_id: String,

    /// Traffic direction (ingress, egress)
    #[arg(long, default_value = "ingress")]
    pub direction: TrafficDirection,

    /// Action on match (accept, drop)
    #[arg(long, default_value = "accept")]
    pub action: FirewallAction,

    /// Lower values are evaluated first
    #[arg(long, default_value_t = 1000)]
    pub priority: u32,

    /// Source prefix
    #[arg(long, default_value = "0.0.0.0/0")]
    pub src: IpNetwork,

    /// Destination prefix
    #[arg(long, default_value = "0.0.0.0/0")]
    pub dst: IpNetwork,

    /// Protocol to match, any when unset
    #[arg(long, value_enum)]
    pub protocol: Option<FilterProtocol>,

    /// Source ports, e.g. 1024-65535
    #[arg(long)]
    pub src_ports: Option<PortRange>,

    /// Destination ports, e.g. 443
    #[arg(long)]
    pub dst_ports: Option<PortRange>,

    /// ICMP type
    #[arg(long)]
    pub icmp_type: Option<u8>,

    /// ICMP code
    #[arg(long)]
    pub icmp_code: Option<u8>,
}

impl FirewallRuleArgs {
    fn protocol_filter(&self) -> Result<Option<ProtocolFilter>> {
        let has_ports = self.src_ports.is_some() || self.dst_ports.is_some();
        let has_icmp = self.icmp_type.is_some() || self.icmp_code.is_some();
        let ports = PortFilter {
            src_ports: self.src_ports,
            dst_ports: self.dst_ports,
        };

        match self.protocol {
            None if has_ports || has_icmp => bail!("port and ICMP filters need --protocol"),
            None => Ok(None),
            Some(FilterProtocol::Icmp) if has_ports => bail!("ICMP rules have no ports"),
            Some(FilterProtocol::Icmp) => Ok(Some(ProtocolFilter::Icmp(IcmpFilter {
                icmp_type: self.icmp_type,
                icmp_code: self.icmp_code,
            }))),
            Some(_) if has_icmp => bail!("ICMP type and code only apply to --protocol icmp"),
            Some(FilterProtocol::Tcp) => Ok(Some(ProtocolFilter::Tcp(ports))),
            Some(FilterProtocol::Udp) => Ok(Some(ProtocolFilter::Udp(ports))),
        }
    }

    pub fn rule(&self) -> Result<FirewallRule> {
        Ok(FirewallRule::new(
            self.interface_id.as_str(),
            self.rule_id.as_str(),
            FirewallRuleSpec {
                direction: self.direction,
                action: self.action,
                priority: self.priority,
                source_prefix: self.src,
                destination_prefix: self.dst,
                protocol_filter: self.protocol_filter()?,
            },
        ))
    }
}

pub async fn execute<S: DpdkService>(
    cmd: FirewallRuleCommands,
    client: &mut Client<S>,
    output: &Output,
) -> Result<()> {
    match cmd {
        FirewallRuleCommands::Get {
            interface_id,
            rule_id,
        } => {
            let rule = client
                .get_firewall_rule(&interface_id, &rule_id)
                .await
                .with_context(|| {
                    format!("error getting firewall rule {rule_id} of interface {interface_id}")
                })?;
            output.render(&View::object(&rule)?, None)?;
        }

        FirewallRuleCommands::List { interface_id } => {
            let rules = client
                .list_firewall_rules(&interface_id)
                .await
                .with_context(|| {
                    format!("error listing firewall rules of interface {interface_id}")
                })?;
            output.render(&View::list(&rules)?, None)?;
        }

        FirewallRuleCommands::Create(args) => {
            let rule = args.rule()?;
            let created = client.create_firewall_rule(&rule).await.with_context(|| {
                format!(
                    "error adding firewall rule {} to interface {}",
                    rule.meta.rule_id, rule.meta.interface_id
                )
            })?;
            output.render(&View::object(&created)?, Some("created"))?;
        }

        FirewallRuleCommands::Delete {
            interface_id,
            rule_id,
        } => {
            client
                .delete_firewall_rule(&interface_id, &rule_id)
                .await
                .with_context(|| {
                    format!("error deleting firewall rule {rule_id} of interface {interface_id}")
                })?;
            output.deleted(FirewallRule::KIND, rule_id)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn args(protocol: Option<FilterProtocol>) -> FirewallRuleArgs {
        FirewallRuleArgs {
            interface_id: "vm-1".to_string(),
            rule_id: "fw-1".to_string(),
            direction: TrafficDirection::Ingress,
            action: FirewallAction::Accept,
            priority: 1000,
            src: "0.0.0.0/0".parse().unwrap(),
            dst: "10.0.0.0/24".parse().unwrap(),
            protocol,
            src_ports: None,
            dst_ports: None,
            icmp_type: None,
            icmp_code: None,
        }
    }

    #[test]
    fn test_rule_without_protocol_matches_any() {
        let rule = args(None).rule().unwrap();
        assert_eq!(rule.meta.rule_id, "fw-1");
        assert_eq!(rule.spec.protocol_filter, None);
    }

    #[test]
    fn test_tcp_rule_keeps_ports() {
        let mut args = args(Some(FilterProtocol::Tcp));
        args.dst_ports = Some("443".parse().unwrap());
        let filter = args.rule().unwrap().spec.protocol_filter;
        assert_eq!(
            filter,
            Some(ProtocolFilter::Tcp(PortFilter {
                src_ports: None,
                dst_ports: Some(PortRange {
                    lower: 443,
                    upper: 443
                }),
            }))
        );
    }

    #[test]
    fn test_icmp_rule() {
        let mut args = args(Some(FilterProtocol::Icmp));
        args.icmp_type = Some(8);
        let filter = args.rule().unwrap().spec.protocol_filter;
        assert_eq!(
            filter,
            Some(ProtocolFilter::Icmp(IcmpFilter {
                icmp_type: Some(8),
                icmp_code: None,
            }))
        );
    }

    #[test_case(None, true, false ; "ports without protocol")]
    #[test_case(None, false, true ; "icmp type without protocol")]
    #[test_case(Some(FilterProtocol::Icmp), true, false ; "icmp with ports")]
    #[test_case(Some(FilterProtocol::Udp), false, true ; "udp with icmp type")]
    fn test_inconsistent_filters_are_rejected(
        protocol: Option<FilterProtocol>,
        ports: bool,
        icmp: bool,
    ) {
        let mut args = args(protocol);
        if ports {
            args.src_ports = Some("1024-65535".parse().unwrap());
        }
        if icmp {
            args.icmp_type = Some(0);
        }
        assert!(args.rule().is_err());
    }
}
