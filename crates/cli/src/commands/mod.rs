//! CLI Commands
//!
//! Every invocation opens one channel, performs one client call, renders
//! the result and drops the channel.

pub mod firewall_rule;
pub mod init;
pub mod interface;
pub mod lb_prefix;
pub mod lb_target;
pub mod loadbalancer;
pub mod nat;
pub mod prefix;
pub mod route;
pub mod virtual_ip;
pub mod vni;

use anyhow::{Context, Result};
use clap::Subcommand;
use dpservice_client::{Client, DpdkService, DpdkGrpcClient};
use tonic::transport::Endpoint;
use tracing::debug;

use crate::config::CliConfig;
use crate::output::{Output, View};

#[derive(Subcommand)]
pub enum Commands {
    /// Manage virtual interfaces
    #[command(subcommand)]
    Interface(interface::InterfaceCommands),

    /// Manage the virtual IP of an interface
    #[command(subcommand)]
    #[command(name = "virtualip")]
    VirtualIp(virtual_ip::VirtualIpCommands),

    /// Manage prefixes routed to interfaces
    #[command(subcommand)]
    Prefix(prefix::PrefixCommands),

    /// Manage load balancer prefixes of interfaces
    #[command(subcommand)]
    #[command(name = "lbprefix")]
    LbPrefix(lb_prefix::LbPrefixCommands),

    /// Manage routes
    #[command(subcommand)]
    Route(route::RouteCommands),

    /// Manage load balancers
    #[command(subcommand)]
    #[command(name = "loadbalancer")]
    LoadBalancer(loadbalancer::LoadBalancerCommands),

    /// Manage load balancer targets
    #[command(subcommand)]
    #[command(name = "lbtarget")]
    LbTarget(lb_target::LbTargetCommands),

    /// Manage NAT
    #[command(subcommand)]
    Nat(nat::NatCommands),

    /// Manage firewall rules of interfaces
    #[command(subcommand)]
    #[command(name = "firewallrule")]
    FirewallRule(firewall_rule::FirewallRuleCommands),

    /// Inspect or reset VNIs
    #[command(subcommand)]
    Vni(vni::VniCommands),

    /// Check or perform dpservice initialization
    #[command(subcommand)]
    Init(init::InitCommands),

    /// Show client and service versions
    Version,
}

/// Open a channel to dpservice with the configured timeouts.
pub async fn connect(config: &CliConfig) -> Result<Client<DpdkGrpcClient>> {
    let uri = config.endpoint_uri()?;
    let endpoint = Endpoint::from_shared(uri.clone())
        .with_context(|| format!("invalid dpservice address {uri:?}"))?
        .connect_timeout(config.connect_timeout())
        .timeout(config.timeout());

    debug!(%uri, "connecting to dpservice");
    let channel = endpoint
        .connect()
        .await
        .with_context(|| format!("error connecting to dpservice at {uri}"))?;
    Ok(Client::new(DpdkGrpcClient::new(channel)))
}

pub async fn execute<S: DpdkService>(
    command: Commands,
    client: &mut Client<S>,
    output: &Output,
) -> Result<()> {
    match command {
        Commands::Interface(cmd) => interface::execute(cmd, client, output).await,
        Commands::VirtualIp(cmd) => virtual_ip::execute(cmd, client, output).await,
        Commands::Prefix(cmd) => prefix::execute(cmd, client, output).await,
        Commands::LbPrefix(cmd) => lb_prefix::execute(cmd, client, output).await,
        Commands::Route(cmd) => route::execute(cmd, client, output).await,
        Commands::LoadBalancer(cmd) => loadbalancer::execute(cmd, client, output).await,
        Commands::LbTarget(cmd) => lb_target::execute(cmd, client, output).await,
        Commands::Nat(cmd) => nat::execute(cmd, client, output).await,
        Commands::FirewallRule(cmd) => firewall_rule::execute(cmd, client, output).await,
        Commands::Vni(cmd) => vni::execute(cmd, client, output).await,
        Commands::Init(cmd) => init::execute(cmd, client, output).await,
        Commands::Version => {
            let version = client
                .get_version(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
                .await
                .context("error getting dpservice version")?;
            output.render(&View::object(&version)?, None)
        }
    }
}
