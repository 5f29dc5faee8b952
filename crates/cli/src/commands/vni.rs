//! VNI Commands

use anyhow::{Context, Result};
use clap::Subcommand;
use dpservice_client::{Client, DpdkService};
use dpservice_common::{Object, Vni, VniKind};

use crate::output::{Output, View};

#[derive(Subcommand)]
pub enum VniCommands {
    /// Check whether a VNI is in use
    Get {
        /// Virtual network identifier
        vni: u32,

        /// Address family (ipv4, ipv6, both)
        #[arg(long, default_value = "ipv4")]
        vni_type: VniKind,
    },

    /// Reset the routing tables of a VNI
    Reset {
        /// Virtual network identifier
        vni: u32,

        /// Address family (ipv4, ipv6, both)
        #[arg(long, default_value = "ipv4")]
        vni_type: VniKind,
    },
}

pub async fn execute<S: DpdkService>(
    cmd: VniCommands,
    client: &mut Client<S>,
    output: &Output,
) -> Result<()> {
    match cmd {
        VniCommands::Get { vni, vni_type } => {
            let vni = client
                .get_vni(vni, vni_type)
                .await
                .with_context(|| format!("error getting vni {vni}"))?;
            output.render(&View::object(&vni)?, None)?;
        }

        VniCommands::Reset { vni, vni_type } => {
            client
                .reset_vni(vni, vni_type)
                .await
                .with_context(|| format!("error resetting vni {vni}"))?;
            output.render(&View::identity(Vni::KIND, vni.to_string()), Some("reset"))?;
        }
    }

    Ok(())
}
