//! Init Commands

use anyhow::{Context, Result};
use clap::Subcommand;
use dpservice_client::{Client, DpdkService};

use crate::output::{Output, View};

#[derive(Subcommand)]
pub enum InitCommands {
    /// Show whether dpservice is initialized and its UUID
    Get,

    /// Initialize dpservice
    Create,
}

pub async fn execute<S: DpdkService>(
    cmd: InitCommands,
    client: &mut Client<S>,
    output: &Output,
) -> Result<()> {
    match cmd {
        InitCommands::Get => {
            let init = client
                .get_init()
                .await
                .context("error checking dpservice initialization")?;
            output.render(&View::object(&init)?, None)?;
        }

        InitCommands::Create => {
            let init = client
                .initialize()
                .await
                .context("error initializing dpservice")?;
            output.render(&View::object(&init)?, Some("created"))?;
        }
    }

    Ok(())
}
