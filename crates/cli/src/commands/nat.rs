//! NAT Commands

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use dpservice_client::{Client, DpdkService};
use dpservice_common::{List, Nat, NatEntry, NatInfoKind, NatSpec, Object};
use std::net::IpAddr;

use crate::output::{Output, View};

#[derive(Subcommand)]
pub enum NatCommands {
    /// Get the NAT of an interface
    Get {
        /// Interface ID
        interface_id: String,
    },

    /// List the NAT entries known for a NAT IP
    List {
        /// NAT IP to list entries for
        #[arg(long)]
        nat_ip: IpAddr,

        /// Entry kind: any (0), local (1) or neighbor (2)
        #[arg(long, default_value = "any")]
        nat_type: NatInfoKind,

        /// Column to sort by
        #[arg(long, value_enum)]
        sort_by: Option<NatSortKey>,
    },

    /// Put an interface behind a NAT IP and port range
    Create {
        /// Interface ID
        interface_id: String,

        /// NAT IP
        #[arg(long)]
        nat_ip: IpAddr,

        /// First port of the range
        #[arg(long)]
        min_port: u16,

        /// Last port of the range
        #[arg(long)]
        max_port: u16,
    },

    /// Remove the NAT of an interface
    Delete {
        /// Interface ID
        interface_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NatSortKey {
    Ip,
    MinPort,
    MaxPort,
    Vni,
    UnderlayRoute,
}

pub fn sort(entries: &mut List<NatEntry>, key: NatSortKey) {
    let items = &mut entries.items;
    match key {
        NatSortKey::Ip => items.sort_by_key(|e| e.spec.ip),
        NatSortKey::MinPort => items.sort_by_key(|e| e.spec.min_port),
        NatSortKey::MaxPort => items.sort_by_key(|e| e.spec.max_port),
        NatSortKey::Vni => items.sort_by_key(|e| e.spec.vni),
        NatSortKey::UnderlayRoute => items.sort_by_key(|e| e.status.underlay_route),
    }
}

pub async fn execute<S: DpdkService>(
    cmd: NatCommands,
    client: &mut Client<S>,
    output: &Output,
) -> Result<()> {
    match cmd {
        NatCommands::Get { interface_id } => {
            let nat = client
                .get_nat(&interface_id)
                .await
                .with_context(|| format!("error getting NAT of interface {interface_id}"))?;
            output.render(&View::object(&nat)?, None)?;
        }

        NatCommands::List {
            nat_ip,
            nat_type,
            sort_by,
        } => {
            let mut entries = client
                .list_nats(nat_ip, nat_type)
                .await
                .with_context(|| format!("error listing NAT entries of {nat_ip}"))?;
            if let Some(key) = sort_by {
                sort(&mut entries, key);
            }
            output.render(&View::list(&entries)?, None)?;
        }

        NatCommands::Create {
            interface_id,
            nat_ip,
            min_port,
            max_port,
        } => {
            anyhow::ensure!(
                min_port <= max_port,
                "min port {min_port} is above max port {max_port}"
            );
            let nat = Nat::new(
                interface_id.as_str(),
                NatSpec {
                    nat_ip,
                    min_port,
                    max_port,
                },
            );
            let created = client
                .create_nat(&nat)
                .await
                .with_context(|| format!("error adding NAT to interface {interface_id}"))?;
            output.render(&View::object(&created)?, Some("created"))?;
        }

        NatCommands::Delete { interface_id } => {
            client
                .delete_nat(&interface_id)
                .await
                .with_context(|| format!("error deleting NAT of interface {interface_id}"))?;
            output.deleted(Nat::KIND, interface_id)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpservice_common::{NatEntryMeta, NatEntrySpec, Status};
    use test_case::test_case;

    fn entry(ip: Option<&str>, min_port: u16, vni: u32, underlay: Option<&str>) -> NatEntry {
        NatEntry {
            meta: NatEntryMeta {
                nat_ip: "10.20.30.40".parse().unwrap(),
            },
            spec: NatEntrySpec {
                kind: if ip.is_some() {
                    NatInfoKind::Local
                } else {
                    NatInfoKind::Neighbor
                },
                ip: ip.map(|ip| ip.parse().unwrap()),
                min_port,
                max_port: min_port + 999,
                vni,
            },
            status: Status {
                underlay_route: underlay.map(|u| u.parse().unwrap()),
                ..Default::default()
            },
        }
    }

    fn entries() -> List<NatEntry> {
        List::new(vec![
            entry(Some("10.0.0.2"), 2000, 100, None),
            entry(None, 3000, 300, Some("ff80::9")),
            entry(Some("10.0.0.1"), 1000, 200, None),
        ])
    }

    #[test_case(NatSortKey::MinPort, vec![1000, 2000, 3000] ; "by min port")]
    #[test_case(NatSortKey::MaxPort, vec![1000, 2000, 3000] ; "by max port")]
    #[test_case(NatSortKey::Vni, vec![2000, 1000, 3000] ; "by vni")]
    #[test_case(NatSortKey::Ip, vec![3000, 1000, 2000] ; "neighbor entries without ip first")]
    #[test_case(NatSortKey::UnderlayRoute, vec![2000, 1000, 3000] ; "by underlay route stable")]
    fn test_sort(key: NatSortKey, expected_min_ports: Vec<u16>) {
        let mut list = entries();
        sort(&mut list, key);
        let min_ports: Vec<u16> = list.items.iter().map(|e| e.spec.min_port).collect();
        assert_eq!(min_ports, expected_min_ports);
    }
}
