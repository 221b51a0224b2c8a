//! Command line arguments of the `deployer` binary. Every flag can also be
//! set through the environment variable of the same name in upper snake
//! case.

use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

/// Deploy a compiled contract to one of the configured networks and print
/// its address.
#[derive(clap::Parser, Debug)]
#[command(version)]
pub struct Arguments {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// Name of the network profile to deploy to.
    #[clap(long, env, default_value = "local")]
    pub network: String,

    /// Contract to deploy, either by name or fully qualified
    /// (`contracts/POANFT.sol:POANFT`).
    #[clap(long, env, default_value = "POANFT")]
    pub contract: String,

    /// Directory containing the compiler output (Hardhat `artifacts` or
    /// Foundry `out`).
    #[clap(long, env, default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// Optional TOML file adding networks or overriding the built-in
    /// configuration.
    #[clap(long, env)]
    pub config: Option<PathBuf>,

    /// The chain ID the node is expected to serve. Checked before anything
    /// gets sent to detect misconfigured RPC URLs. Overrides the chain ID
    /// of the network profile.
    #[clap(long, env)]
    pub chain_id: Option<u64>,
}

#[derive(clap::Parser, Debug)]
pub struct LoggingArguments {
    /// Log output goes to stderr, stdout only carries the deployed address.
    #[clap(long, env, default_value = "warn,deployer=debug,ethrpc=debug")]
    pub log_filter: String,

    /// Output log events as JSON.
    #[clap(long, env, default_value = "false")]
    pub use_json_logs: bool,
}

impl Display for LoggingArguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            log_filter,
            use_json_logs,
        } = self;

        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        Ok(())
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            logging,
            network,
            contract,
            artifacts,
            config,
            chain_id,
        } = self;

        write!(f, "{logging}")?;
        writeln!(f, "network: {network}")?;
        writeln!(f, "contract: {contract}")?;
        writeln!(f, "artifacts: {}", artifacts.display())?;
        display_option(f, "config", &config.as_ref().map(|path| path.display()))?;
        display_option(f, "chain_id", chain_id)?;
        Ok(())
    }
}

pub fn display_secret_option<T>(
    f: &mut Formatter<'_>,
    name: &str,
    option: &Option<T>,
) -> fmt::Result {
    display_option(f, name, &option.as_ref().map(|_| "SECRET"))
}

pub fn display_option(
    f: &mut Formatter<'_>,
    name: &str,
    option: &Option<impl Display>,
) -> fmt::Result {
    write!(f, "{name}: ")?;
    match option {
        Some(display) => writeln!(f, "{display}"),
        None => writeln!(f, "None"),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, clap::Parser};

    #[test]
    fn no_arguments_deploy_poanft_locally() {
        let args = Arguments::try_parse_from(["deployer"]).unwrap();
        // The environment of the test runner may set some of these.
        if std::env::var("NETWORK").is_err() {
            assert_eq!(args.network, "local");
        }
        if std::env::var("CONTRACT").is_err() {
            assert_eq!(args.contract, "POANFT");
        }
        if std::env::var("ARTIFACTS").is_err() {
            assert_eq!(args.artifacts, PathBuf::from("artifacts"));
        }
        if std::env::var("LOG_FILTER").is_err() {
            assert_eq!(args.logging.log_filter, "warn,deployer=debug,ethrpc=debug");
        }
    }

    #[test]
    fn flags_are_parsed() {
        let args = Arguments::try_parse_from([
            "deployer",
            "--network",
            "sepolia",
            "--contract",
            "contracts/POANFT.sol:POANFT",
            "--artifacts",
            "out",
            "--chain-id",
            "11155111",
            "--use-json-logs",
        ])
        .unwrap();
        assert_eq!(args.network, "sepolia");
        assert_eq!(args.contract, "contracts/POANFT.sol:POANFT");
        assert_eq!(args.artifacts, PathBuf::from("out"));
        assert_eq!(args.chain_id, Some(11155111));
        assert!(args.logging.use_json_logs);

        let shown = args.to_string();
        assert!(shown.contains("network: sepolia\n"));
        assert!(shown.contains("chain_id: 11155111\n"));
    }

    #[test]
    fn secrets_are_redacted() {
        struct Shown(Option<String>);
        impl Display for Shown {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                display_secret_option(f, "key", &self.0)
            }
        }
        assert_eq!(Shown(Some("hunter2".into())).to_string(), "key: SECRET\n");
        assert_eq!(Shown(None).to_string(), "key: None\n");
    }
}
