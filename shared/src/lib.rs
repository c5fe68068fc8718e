// SPDX-License-Identifier: MIT

// Re‑export the tracing crate so macros can use `$crate::tracing::…`
pub use tracing;

pub mod log;

pub mod artifact;
pub mod chain;
pub mod config;
pub mod envfile;
pub mod error;
pub mod record;
pub mod runner;
pub mod subscription;

pub use error::DeployError;

pub mod utils {
    use clap::{Arg, ArgAction, ArgMatches, Command};
    use std::path::PathBuf;

    use crate::config::DEFAULT_CONFIG_FILE;

    const MAINNET_CHAIN_ID: u64 = 1;
    const SEPOLIA_CHAIN_ID: u64 = 11_155_111;
    const HOLESKY_CHAIN_ID: u64 = 17_000;

    /// Flags shared by every deployment entry point. All of them are optional.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CliArgs {
        pub network: Option<String>,
        pub config: PathBuf,
        pub verbose: bool,
    }

    /// -------------------------------------------
    /// Builds the command line of a deployment entry point.
    /// -------------------------------------------
    pub fn deploy_command(name: &'static str, about: &'static str) -> Command {
        Command::new(name)
            .version(env!("CARGO_PKG_VERSION"))
            .about(about)
            .arg(
                Arg::new("network")
                    .short('n')
                    .long("network")
                    .value_name("NETWORK")
                    .help("Name of the network section to deploy to (defaults to $NETWORK or 'localhost')")
                    .required(false),
            )
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("CONFIG")
                    .help("Path of the network configuration file")
                    .env("DEPLOY_CONFIG")
                    .default_value(DEFAULT_CONFIG_FILE)
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Enable verbose (debug‑level) logging")
                    .action(ArgAction::SetTrue),
            )
    }

    /// -------------------------------------------
    /// Extracts the shared flags from parsed matches.
    /// -------------------------------------------
    pub fn cli_args(matches: &ArgMatches) -> CliArgs {
        CliArgs {
            network: matches.get_one::<String>("network").cloned(),
            config: matches
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
            verbose: matches.get_flag("verbose"),
        }
    }

    /// Turns an address or a transaction hash into a block explorer link on
    /// chains that have one. Anything else is returned unchanged.
    pub fn explorer_link(chain_id: u64, value: &str) -> String {
        let base = match chain_id {
            MAINNET_CHAIN_ID => "https://etherscan.io",
            SEPOLIA_CHAIN_ID => "https://sepolia.etherscan.io",
            HOLESKY_CHAIN_ID => "https://holesky.etherscan.io",
            _ => return value.to_string(),
        };

        if !value.starts_with("0x") {
            return value.to_string();
        }
        match value.len() {
            42 => format!("{base}/address/{value}"),
            66 => format!("{base}/tx/{value}"),
            _ => value.to_string(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn flags_are_optional() {
            let matches = deploy_command("deploy-test", "test")
                .try_get_matches_from(["deploy-test"])
                .unwrap();
            let args = cli_args(&matches);

            assert_eq!(args.network, None);
            assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_FILE));
            assert!(!args.verbose);
        }

        #[test]
        fn flags_override_defaults() {
            let matches = deploy_command("deploy-test", "test")
                .try_get_matches_from(["deploy-test", "-n", "sepolia", "--config", "nets.toml", "-v"])
                .unwrap();
            let args = cli_args(&matches);

            assert_eq!(args.network.as_deref(), Some("sepolia"));
            assert_eq!(args.config, PathBuf::from("nets.toml"));
            assert!(args.verbose);
        }

        #[test]
        fn explorer_links_only_on_public_chains() {
            let address = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
            assert_eq!(explorer_link(31337, address), address);
            assert_eq!(
                explorer_link(SEPOLIA_CHAIN_ID, address),
                format!("https://sepolia.etherscan.io/address/{address}")
            );

            let tx = format!("0x{}", "ab".repeat(32));
            assert_eq!(explorer_link(MAINNET_CHAIN_ID, &tx), format!("https://etherscan.io/tx/{tx}"));
            assert_eq!(explorer_link(HOLESKY_CHAIN_ID, "MYA001"), "MYA001");
        }
    }
}
