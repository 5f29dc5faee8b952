//! Prefix Commands

use anyhow::{Context, Result};
use clap::Subcommand;
use dpservice_client::{Client, DpdkService};
use dpservice_common::{Object, Prefix};
use ipnetwork::IpNetwork;

use crate::output::{Output, View};

#[derive(Subcommand)]
pub enum PrefixCommands {
    /// List the prefixes routed to an interface
    List {
        /// Interface ID
        interface_id: String,
    },

    /// Route a prefix to an interface
    Create {
        /// Interface ID
        interface_id: String,

        /// Prefix in CIDR notation, e.g. 10.0.10.0/24
        #[arg(long)]
        prefix: IpNetwork,
    },

    /// Remove a prefix from an interface
    Delete {
        /// Interface ID
        interface_id: String,

        /// Prefix in CIDR notation
        #[arg(long)]
        prefix: IpNetwork,
    },
}

pub async fn execute<S: DpdkService>(
    cmd: PrefixCommands,
    client: &mut Client<S>,
    output: &Output,
) -> Result<()> {
    match cmd {
        PrefixCommands::List { interface_id } => {
            let prefixes = client
                .list_prefixes(&interface_id)
                .await
                .with_context(|| format!("error listing prefixes of interface {interface_id}"))?;
            output.render(&View::list(&prefixes)?, None)?;
        }

        PrefixCommands::Create {
            interface_id,
            prefix,
        } => {
            let created = client
                .create_prefix(&Prefix::new(interface_id.as_str(), prefix))
                .await
                .with_context(|| format!("error adding prefix {prefix} to interface {interface_id}"))?;
            output.render(&View::object(&created)?, Some("created"))?;
        }

        PrefixCommands::Delete {
            interface_id,
            prefix,
        } => {
            client
                .delete_prefix(&interface_id, prefix)
                .await
                .with_context(|| {
                    format!("error deleting prefix {prefix} of interface {interface_id}")
                })?;
            output.deleted(Prefix::KIND, prefix.to_string())?;
        }
    }

    Ok(())
}
