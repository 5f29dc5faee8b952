//! Virtual IP Commands

use anyhow::{Context, Result};
use clap::Subcommand;
use dpservice_client::{Client, DpdkService};
use dpservice_common::{Object, VirtualIp};
use std::net::IpAddr;

use crate::output::{Output, View};

#[derive(Subcommand)]
pub enum VirtualIpCommands {
    /// Get the virtual IP of an interface
    Get {
        /// Interface ID
        interface_id: String,
    },

    /// Assign a virtual IP to an interface
    Create {
        /// Interface ID
        interface_id: String,

        /// Virtual IP address
        #[arg(long)]
        vip: IpAddr,
    },

    /// Remove the virtual IP of an interface
    Delete {
        /// Interface ID
        interface_id: String,
    },
}

pub async fn execute<S: DpdkService>(
    cmd: VirtualIpCommands,
    client: &mut Client<S>,
    output: &Output,
) -> Result<()> {
    match cmd {
        VirtualIpCommands::Get { interface_id } => {
            let vip = client
                .get_virtual_ip(&interface_id)
                .await
                .with_context(|| format!("error getting virtual IP of interface {interface_id}"))?;
            output.render(&View::object(&vip)?, None)?;
        }

        VirtualIpCommands::Create { interface_id, vip } => {
            let created = client
                .create_virtual_ip(&VirtualIp::new(interface_id.as_str(), vip))
                .await
                .with_context(|| format!("error adding virtual IP to interface {interface_id}"))?;
            output.render(&View::object(&created)?, Some("created"))?;
        }

        VirtualIpCommands::Delete { interface_id } => {
            client
                .delete_virtual_ip(&interface_id)
                .await
                .with_context(|| {
                    format!("error deleting virtual IP of interface {interface_id}")
                })?;
            output.deleted(VirtualIp::KIND, interface_id)?;
        }
    }

    Ok(())
}
