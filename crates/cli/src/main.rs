//! dpservice CLI - Main Entry Point

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use dpservice_cli::commands::{self, Commands};
use dpservice_cli::config::CliConfig;
use dpservice_cli::output::{Output, Registry};

/// Command-line client for the dpservice dataplane daemon
#[derive(Parser)]
#[command(name = "dpservice-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// dpservice address
    #[arg(long, global = true, env = "DPSERVICE_ADDRESS")]
    address: Option<String>,

    /// Output format (table, json, yaml, name)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Config file (default: ~/.config/dpservice-cli/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// File settings with flag overrides applied.
    fn settings(&self) -> Result<CliConfig> {
        let mut config = CliConfig::resolve(self.config.as_deref())?;
        if let Some(address) = &self.address {
            config.address = address.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if self.pretty {
            config.pretty = true;
        }
        Ok(config)
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.settings()?;
    let output = Output::new(Registry::with_defaults(), config.output.as_str(), config.pretty)?;

    let mut client = commands::connect(&config).await?;
    commands::execute(cli.command, &mut client, &output).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so rendered output stays clean
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use dpservice_cli::commands::firewall_rule::{FilterProtocol, FirewallRuleCommands};
    use dpservice_cli::commands::nat::NatCommands;
    use dpservice_cli::commands::route::RouteCommands;
    use dpservice_cli::commands::vni::VniCommands;
    use dpservice_common::{NatInfoKind, TrafficDirection, VniKind};

    #[test]
    fn test_command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_resource_names() {
        for resource in [
            "interface",
            "virtualip",
            "prefix",
            "lbprefix",
            "route",
            "loadbalancer",
            "lbtarget",
            "nat",
            "firewallrule",
            "vni",
            "init",
            "version",
        ] {
            assert!(
                Cli::command().find_subcommand(resource).is_some(),
                "missing {resource}"
            );
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dpservice-cli",
            "route",
            "delete",
            "--vni",
            "100",
            "--prefix",
            "10.0.0.0/24",
            "--next-hop-vni",
            "200",
            "--next-hop-ip",
            "ff80::1",
            "-o",
            "name",
            "--address",
            "10.0.0.5:1337",
        ])
        .unwrap();

        assert_eq!(cli.output.as_deref(), Some("name"));
        assert_eq!(cli.address.as_deref(), Some("10.0.0.5:1337"));
        match cli.command {
            Commands::Route(RouteCommands::Delete(args)) => {
                assert_eq!(args.vni, 100);
                assert_eq!(args.prefix.prefix(), 24);
                assert_eq!(args.next_hop_vni, 200);
            }
            _ => panic!("parsed the wrong command"),
        }
    }

    #[test]
    fn test_nat_list_defaults_to_any() {
        let cli = Cli::try_parse_from([
            "dpservice-cli",
            "nat",
            "list",
            "--nat-ip",
            "10.20.30.40",
        ])
        .unwrap();
        match cli.command {
            Commands::Nat(NatCommands::List {
                nat_type, sort_by, ..
            }) => {
                assert_eq!(nat_type, NatInfoKind::Any);
                assert!(sort_by.is_none());
            }
            _ => panic!("parsed the wrong command"),
        }
    }

    #[test]
    fn test_firewall_rule_create_flags() {
        let cli = Cli::try_parse_from([
            "dpservice-cli",
            "firewallrule",
            "create",
            "vm-1",
            "--rule-id",
            "fw-1",
            "--direction",
            "egress",
            "--dst",
            "10.0.0.0/24",
            "--protocol",
            "tcp",
            "--dst-ports",
            "443",
        ])
        .unwrap();
        match cli.command {
            Commands::FirewallRule(FirewallRuleCommands::Create(args)) => {
                assert_eq!(args.rule_id, "fw-1");
                assert_eq!(args.direction, TrafficDirection::Egress);
                assert_eq!(args.priority, 1000);
                assert_eq!(args.protocol, Some(FilterProtocol::Tcp));
                assert_eq!(args.src.prefix(), 0);
                let rule = args.rule().unwrap();
                assert_eq!(rule.meta.interface_id, "vm-1");
            }
            _ => panic!("parsed the wrong command"),
        }
    }

    #[test]
    fn test_vni_type_defaults_to_ipv4() {
        let cli = Cli::try_parse_from(["dpservice-cli", "vni", "get", "100"]).unwrap();
        match cli.command {
            Commands::Vni(VniCommands::Get { vni, vni_type }) => {
                assert_eq!(vni, 100);
                assert_eq!(vni_type, VniKind::Ipv4);
            }
            _ => panic!("parsed the wrong command"),
        }
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let lbports = Cli::try_parse_from([
            "dpservice-cli",
            "loadbalancer",
            "create",
            "4",
            "--vni",
            "100",
            "--vip",
            "10.20.30.40",
            "--lbports",
            "TCP/443,GRE/1",
        ]);
        assert!(lbports.is_err());

        let vip = Cli::try_parse_from([
            "dpservice-cli",
            "virtualip",
            "create",
            "vm-1",
            "--vip",
            "10.20.30.400",
        ]);
        assert!(vip.is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "address = \"10.0.0.1:1337\"\noutput = \"yaml\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "dpservice-cli",
            "--config",
            path.to_str().unwrap(),
            "--output",
            "json",
            "interface",
            "list",
        ])
        .unwrap();
        let settings = cli.settings().unwrap();
        assert_eq!(settings.output, "json");
        assert_eq!(settings.address, "10.0.0.1:1337");
    }
}
