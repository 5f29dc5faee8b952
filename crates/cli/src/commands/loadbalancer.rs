//! Load Balancer Commands

use anyhow::{Context, Result};
use clap::Subcommand;
use dpservice_client::{Client, DpdkService};
use dpservice_common::{LbPort, LoadBalancer, LoadBalancerSpec, Object};
use std::net::IpAddr;

use crate::output::{Output, View};

#[derive(Subcommand)]
pub enum LoadBalancerCommands {
    /// Get load balancer details
    Get {
        /// Load balancer ID
        id: String,
    },

    /// Create a new load balancer
    Create {
        /// Load balancer ID
        id: String,

        /// Virtual network identifier
        #[arg(long)]
        vni: u32,

        /// Virtual IP of the load balancer
        #[arg(long)]
        vip: IpAddr,

        /// Exposed ports, e.g. TCP/443,UDP/53
        #[arg(long, value_delimiter = ',')]
        lbports: Vec<LbPort>,
    },

    /// Delete a load balancer
    Delete {
        /// Load balancer ID
        id: String,
    },
}

pub async fn execute<S: DpdkService>(
    cmd: LoadBalancerCommands,
    client: &mut Client<S>,
    output: &Output,
) -> Result<()> {
    match cmd {
        LoadBalancerCommands::Get { id } => {
            let lb = client
                .get_load_balancer(&id)
                .await
                .with_context(|| format!("error getting load balancer {id}"))?;
            output.render(&View::object(&lb)?, None)?;
        }

        LoadBalancerCommands::Create {
            id,
            vni,
            vip,
            lbports,
        } => {
            let lb = LoadBalancer::new(
                id,
                LoadBalancerSpec {
                    vni,
                    vip,
                    ports: lbports,
                },
            );
            let created = client
                .create_load_balancer(&lb)
                .await
                .with_context(|| format!("error creating load balancer {}", lb.meta.id))?;
            output.render(&View::object(&created)?, Some("created"))?;
        }

        LoadBalancerCommands::Delete { id } => {
            client
                .delete_load_balancer(&id)
                .await
                .with_context(|| format!("error deleting load balancer {id}"))?;
            output.deleted(LoadBalancer::KIND, id)?;
        }
    }

    Ok(())
}
