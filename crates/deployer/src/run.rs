use {
    crate::{
        arguments::Arguments,
        artifact::ContractFactory,
        config::{self, Configuration},
        deploy::{self, Deployment},
    },
    anyhow::{Context, Result},
    clap::{Parser, error::ErrorKind},
    ethrpc::alloy::{errors, wallet},
    std::process::ExitCode,
};

/// Parses the arguments, sets up logging and performs the deployment.
/// Prints the address of the new contract on success. Every failure is
/// logged and mapped to exit code 1.
pub async fn start(args: impl Iterator<Item = String>) -> ExitCode {
    let args = match Arguments::try_parse_from(args) {
        Ok(args) => args,
        Err(err) => {
            // Usage errors are printed to stderr, help and version to stdout.
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };
    let obs_config = observe::Config::new(&args.logging.log_filter, args.logging.use_json_logs);
    observe::tracing::initialize(&obs_config);
    tracing::info!("running deployer with validated arguments:\n{}", args);

    match run(args).await {
        Ok(deployment) => {
            println!("{} deployed to : {}", deployment.contract, deployment.address);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(?err, reason = failure_reason(&err), "deployment failed");
            ExitCode::from(1)
        }
    }
}

/// Short label telling an operator whether to look at the node, the
/// transaction or the local setup.
fn failure_reason(err: &anyhow::Error) -> &'static str {
    let Some(err) = err.downcast_ref::<deploy::Error>() else {
        return "setup error";
    };
    match err.transport_error() {
        Some(transport) if errors::is_connection_error(transport) => "node unreachable",
        Some(transport) if errors::is_node_error(transport) => "node error",
        _ if matches!(err, deploy::Error::ChainIdMismatch { .. }) => "node error",
        _ => "transaction error",
    }
}

/// Assumes tracing has already been set up.
pub async fn run(args: Arguments) -> Result<Deployment> {
    let env = |var: &str| std::env::var(var).ok();
    let config = match &args.config {
        Some(path) => Configuration::from_env_and_path(env, path)
            .await
            .context("load configuration")?,
        None => Configuration::from_env(env),
    };
    tracing::debug!("using configuration:\n{config}");
    if config.etherscan_api_key.is_none() {
        tracing::debug!(
            "no block explorer API key configured, set {}",
            config::ETHERSCAN_API_KEY_VAR
        );
    }

    let network = config.network(&args.network).context("select network")?;
    let factory = ContractFactory::load(&args.artifacts, &args.contract)
        .context("load contract artifact")?;
    factory
        .check_compiler(&config.compiler)
        .context("check compiler settings")?;

    let (wallet, deployer) = wallet::from_signers(network.signers).context("set up signers")?;
    tracing::info!(
        network = %network.name,
        %deployer,
        contract = %factory.name,
        "deploying contract"
    );
    let provider = ethrpc::alloy::provider_with_wallet(&network.url, &network.name, wallet);

    if let Some(expected) = args.chain_id.or(network.chain_id) {
        deploy::check_chain_id(&provider, expected)
            .await
            .context("check chain id")?;
    }
    deploy::deploy(&provider, &factory)
        .await
        .with_context(|| format!("deploy {} to {}", factory.name, network.name))
}
