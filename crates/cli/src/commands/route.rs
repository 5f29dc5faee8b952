//! Route Commands

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use dpservice_client::{Client, DpdkService};
use dpservice_common::{List, Object, Route};
use ipnetwork::IpNetwork;
use std::net::IpAddr;

use crate::output::{Output, View};

#[derive(Subcommand)]
pub enum RouteCommands {
    /// List the routes of a VNI
    List {
        /// Virtual network identifier
        #[arg(long)]
        vni: u32,

        /// Column to sort by
        #[arg(long, value_enum)]
        sort_by: Option<RouteSortKey>,
    },

    /// Add a route to a VNI
    Create(RouteArgs),

    /// Delete a route from a VNI
    Delete(RouteArgs),
}

/// Full identity of a route.
#[derive(Args)]
pub struct RouteArgs {
    /// Virtual network identifier
    #[arg(long)]
    pub vni: u32,

    /// Destination prefix in CIDR notation
    #[arg(long)]
    pub prefix: IpNetwork,

    /// VNI of the next hop
    #[arg(long)]
    pub next_hop_vni: u32,

    /// Underlay address of the next hop
    #[arg(long)]
    pub next_hop_ip: IpAddr,
}

impl RouteArgs {
    fn route(&self) -> Route {
        Route::new(self.vni, self.prefix, self.next_hop_vni, self.next_hop_ip)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RouteSortKey {
    Prefix,
    NextHopVni,
    NextHopIp,
}

pub fn sort(routes: &mut List<Route>, key: RouteSortKey) {
    let items = &mut routes.items;
    match key {
        RouteSortKey::Prefix => {
            items.sort_by_key(|r| (r.spec.prefix.ip(), r.spec.prefix.prefix()))
        }
        RouteSortKey::NextHopVni => items.sort_by_key(|r| r.spec.next_hop.vni),
        RouteSortKey::NextHopIp => items.sort_by_key(|r| r.spec.next_hop.ip),
    }
}

pub async fn execute<S: DpdkService>(
    cmd: RouteCommands,
    client: &mut Client<S>,
    output: &Output,
) -> Result<()> {
    match cmd {
        RouteCommands::List { vni, sort_by } => {
            let mut routes = client
                .list_routes(vni)
                .await
                .with_context(|| format!("error listing routes of VNI {vni}"))?;
            if let Some(key) = sort_by {
                sort(&mut routes, key);
            }
            output.render(&View::list(&routes)?, None)?;
        }

        RouteCommands::Create(args) => {
            let route = args.route();
            let created = client
                .create_route(&route)
                .await
                .with_context(|| format!("error adding route {} to VNI {}", route.name(), args.vni))?;
            output.render(&View::object(&created)?, Some("created"))?;
        }

        RouteCommands::Delete(args) => {
            let route = args.route();
            client
                .delete_route(args.vni, args.prefix, args.next_hop_vni, args.next_hop_ip)
                .await
                .with_context(|| {
                    format!("error deleting route {} from VNI {}", route.name(), args.vni)
                })?;
            output.deleted(Route::KIND, route.name())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(prefix: &str, next_hop_vni: u32, next_hop_ip: &str) -> Route {
        Route::new(
            100,
            prefix.parse().unwrap(),
            next_hop_vni,
            next_hop_ip.parse().unwrap(),
        )
    }

    #[test]
    fn test_sort_by_prefix_orders_addresses_numerically() {
        let mut routes = List::new(vec![
            route("10.0.10.0/24", 200, "ff80::1"),
            route("10.0.9.0/24", 200, "ff80::1"),
            route("10.0.9.0/16", 200, "ff80::1"),
        ]);
        sort(&mut routes, RouteSortKey::Prefix);
        let prefixes: Vec<String> = routes
            .items
            .iter()
            .map(|r| r.spec.prefix.to_string())
            .collect();
        assert_eq!(prefixes, vec!["10.0.9.0/16", "10.0.9.0/24", "10.0.10.0/24"]);
    }

    #[test]
    fn test_sort_by_next_hop() {
        let mut routes = List::new(vec![
            route("10.0.1.0/24", 300, "ff80::1"),
            route("10.0.2.0/24", 200, "ff80::2"),
        ]);
        sort(&mut routes, RouteSortKey::NextHopVni);
        assert_eq!(routes.items[0].spec.next_hop.vni, 200);

        sort(&mut routes, RouteSortKey::NextHopIp);
        assert_eq!(routes.items[0].spec.next_hop.ip, "ff80::1".parse::<IpAddr>().unwrap());
    }
}
