//! Load Balancer Target Commands

use anyhow::{Context, Result};
use clap::Subcommand;
use dpservice_client::{Client, DpdkService};
use dpservice_common::{LoadBalancerTarget, Object};
use std::net::IpAddr;

use crate::output::{Output, View};

#[derive(Subcommand)]
pub enum LbTargetCommands {
    /// List the targets of a load balancer
    List {
        /// Load balancer ID
        load_balancer_id: String,
    },

    /// Add a target to a load balancer
    Create {
        /// Load balancer ID
        load_balancer_id: String,

        /// Underlay address of the target
        #[arg(long)]
        target_ip: IpAddr,
    },

    /// Remove a target from a load balancer
    Delete {
        /// Load balancer ID
        load_balancer_id: String,

        /// Underlay address of the target
        #[arg(long)]
        target_ip: IpAddr,
    },
}

pub async fn execute<S: DpdkService>(
    cmd: LbTargetCommands,
    client: &mut Client<S>,
    output: &Output,
) -> Result<()> {
    match cmd {
        LbTargetCommands::List { load_balancer_id } => {
            let targets = client
                .list_load_balancer_targets(&load_balancer_id)
                .await
                .with_context(|| {
                    format!("error listing targets of load balancer {load_balancer_id}")
                })?;
            output.render(&View::list(&targets)?, None)?;
        }

        LbTargetCommands::Create {
            load_balancer_id,
            target_ip,
        } => {
            let target = LoadBalancerTarget::new(load_balancer_id.as_str(), target_ip);
            let created = client
                .create_load_balancer_target(&target)
                .await
                .with_context(|| {
                    format!("error adding target {target_ip} to load balancer {load_balancer_id}")
                })?;
            output.render(&View::object(&created)?, Some("created"))?;
        }

        LbTargetCommands::Delete {
            load_balancer_id,
            target_ip,
        } => {
            client
                .delete_load_balancer_target(&load_balancer_id, target_ip)
                .await
                .with_context(|| {
                    format!("error deleting target {target_ip} of load balancer {load_balancer_id}")
                })?;
            output.deleted(LoadBalancerTarget::KIND, target_ip.to_string())?;
        }
    }

    Ok(())
}
