//! Interface Commands

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use dpservice_client::{Client, DpdkService};
use dpservice_common::{Interface, InterfaceSpec, List, Object};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::output::{Output, View};

#[derive(Subcommand)]
pub enum InterfaceCommands {
    /// Get interface details
    Get {
        /// Interface ID
        id: String,
    },

    /// List all interfaces
    List {
        /// Column to sort by
        #[arg(long, value_enum)]
        sort_by: Option<InterfaceSortKey>,
    },

    /// Create a new interface
    Create {
        /// Interface ID
        id: String,

        /// Virtual network identifier
        #[arg(long)]
        vni: u32,

        /// Device name, e.g. net_tap3
        #[arg(long)]
        device: String,

        /// Primary IPv4 address
        #[arg(long)]
        ipv4: Ipv4Addr,

        /// Primary IPv6 address
        #[arg(long)]
        ipv6: Option<Ipv6Addr>,
    },

    /// Delete an interface
    Delete {
        /// Interface ID
        id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InterfaceSortKey {
    Id,
    Vni,
    Device,
    UnderlayRoute,
}

pub fn sort(interfaces: &mut List<Interface>, key: InterfaceSortKey) {
    let items = &mut interfaces.items;
    match key {
        InterfaceSortKey::Id => items.sort_by(|a, b| a.meta.id.cmp(&b.meta.id)),
        InterfaceSortKey::Vni => items.sort_by_key(|i| i.spec.vni),
        InterfaceSortKey::Device => items.sort_by(|a, b| a.spec.device.cmp(&b.spec.device)),
        InterfaceSortKey::UnderlayRoute => items.sort_by_key(|i| i.status.underlay_route),
    }
}

pub async fn execute<S: DpdkService>(
    cmd: InterfaceCommands,
    client: &mut Client<S>,
    output: &Output,
) -> Result<()> {
    match cmd {
        InterfaceCommands::Get { id } => {
            let iface = client
                .get_interface(&id)
                .await
                .with_context(|| format!("error getting interface {id}"))?;
            output.render(&View::object(&iface)?, None)?;
        }

        InterfaceCommands::List { sort_by } => {
            let mut interfaces = client
                .list_interfaces()
                .await
                .context("error listing interfaces")?;
            if let Some(key) = sort_by {
                sort(&mut interfaces, key);
            }
            output.render(&View::list(&interfaces)?, None)?;
        }

        InterfaceCommands::Create {
            id,
            vni,
            device,
            ipv4,
            ipv6,
        } => {
            let mut ips = vec![IpAddr::V4(ipv4)];
            ips.extend(ipv6.map(IpAddr::V6));

            let iface = Interface::new(id, InterfaceSpec { vni, device, ips });
            let created = client
                .create_interface(&iface)
                .await
                .with_context(|| format!("error creating interface {}", iface.meta.id))?;
            output.render(&View::object(&created)?, Some("created"))?;
        }

        InterfaceCommands::Delete { id } => {
            client
                .delete_interface(&id)
                .await
                .with_context(|| format!("error deleting interface {id}"))?;
            output.deleted(Interface::KIND, id)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn iface(id: &str, vni: u32, device: &str) -> Interface {
        Interface::new(
            id,
            InterfaceSpec {
                vni,
                device: device.to_string(),
                ips: Vec::new(),
            },
        )
    }

    fn ids(list: &List<Interface>) -> Vec<&str> {
        list.items.iter().map(|i| i.meta.id.as_str()).collect()
    }

    #[test_case(InterfaceSortKey::Id, vec!["a", "b", "c"] ; "by id")]
    #[test_case(InterfaceSortKey::Vni, vec!["b", "c", "a"] ; "by vni stable")]
    #[test_case(InterfaceSortKey::Device, vec!["c", "a", "b"] ; "by device")]
    fn test_sort(key: InterfaceSortKey, expected: Vec<&str>) {
        let mut list = List::new(vec![
            iface("b", 100, "tap2"),
            iface("c", 100, "tap0"),
            iface("a", 200, "tap1"),
        ]);
        sort(&mut list, key);
        assert_eq!(ids(&list), expected);
    }
}
