//! Load Balancer Prefix Commands

use anyhow::{Context, Result};
use clap::Subcommand;
use dpservice_client::{Client, DpdkService};
use dpservice_common::{Object, Prefix};
use ipnetwork::IpNetwork;

use crate::output::{Output, View};

#[derive(Subcommand)]
pub enum LbPrefixCommands {
    /// List the load balancer prefixes of an interface
    List {
        /// Interface ID
        interface_id: String,
    },

    /// Add a load balancer prefix to an interface
    Create {
        /// Interface ID
        interface_id: String,

        /// Prefix in CIDR notation
        #[arg(long)]
        prefix: IpNetwork,
    },

    /// Remove a load balancer prefix from an interface
    Delete {
        /// Interface ID
        interface_id: String,

        /// Prefix in CIDR notation
        #[arg(long)]
        prefix: IpNetwork,
    },
}

pub async fn execute<S: DpdkService>(
    cmd: LbPrefixCommands,
    client: &mut Client<S>,
    output: &Output,
) -> Result<()> {
    match cmd {
        LbPrefixCommands::List { interface_id } => {
            let prefixes = client
                .list_load_balancer_prefixes(&interface_id)
                .await
                .with_context(|| {
                    format!("error listing load balancer prefixes of interface {interface_id}")
                })?;
            output.render(&View::list(&prefixes)?, None)?;
        }

        LbPrefixCommands::Create {
            interface_id,
            prefix,
        } => {
            let created = client
                .create_load_balancer_prefix(&Prefix::new(interface_id.as_str(), prefix))
                .await
                .with_context(|| {
                    format!("error adding load balancer prefix {prefix} to interface {interface_id}")
                })?;
            output.render(&View::object(&created)?, Some("created"))?;
        }

        LbPrefixCommands::Delete {
            interface_id,
            prefix,
        } => {
            client
                .delete_load_balancer_prefix(&interface_id, prefix)
                .await
                .with_context(|| {
                    format!("error deleting load balancer prefix {prefix} of interface {interface_id}")
                })?;
            output.deleted(Prefix::KIND, prefix.to_string())?;
        }
    }

    Ok(())
}
