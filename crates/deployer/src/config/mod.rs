use {
    self::{
        compiler::CompilerSettings,
        network::{Network, NetworkProfile},
    },
    std::{
        collections::BTreeMap,
        fmt::{self, Display, Formatter},
        path::{Path, PathBuf},
    },
};

pub mod compiler;
mod file;
pub mod network;

pub const ETHERSCAN_API_KEY_VAR: &str = "APP_ETHERSCAN_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error while reading {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse TOML config at {path:?}: {details}")]
    Parse { path: PathBuf, details: String },
}

/// Everything a deployment needs to know about its environment. Loaded once
/// at start-up and never changed afterwards.
#[derive(Clone, Debug)]
pub struct Configuration {
    pub compiler: CompilerSettings,
    pub networks: BTreeMap<String, NetworkProfile>,
    /// Block explorer key for source verification. Only carried and
    /// reported, nothing in this crate calls the explorer.
    pub etherscan_api_key: Option<String>,
}

impl Configuration {
    /// Builds the built-in configuration: default compiler settings and the
    /// `etherMain`, `sepolia`, `mumbai` and `local` networks. `env` resolves
    /// environment variables, pass `|var| std::env::var(var).ok()` for the
    /// process environment.
    pub fn from_env(env: impl Fn(&str) -> Option<String>) -> Self {
        let networks = [
            NetworkProfile::from_env(
                network::ETHER_MAIN,
                "APP_ETHERMAIN_RPC_URL",
                "OWNER_PRIVATE_KEY",
                &env,
            ),
            NetworkProfile::from_env(
                network::SEPOLIA,
                "APP_SEPOLIA_RPC_URL",
                "APP_PRIVATE_KEY",
                &env,
            ),
            NetworkProfile::from_env(
                network::MUMBAI,
                "APP_MUMBAI_RPC_URL",
                "APP_PRIVATE_KEY",
                &env,
            ),
            NetworkProfile::local(),
        ]
        .into_iter()
        .map(|profile| (profile.name.clone(), profile))
        .collect();

        Self {
            compiler: CompilerSettings::default(),
            networks,
            etherscan_api_key: network::lookup(&env, ETHERSCAN_API_KEY_VAR),
        }
    }

    /// Like [`Configuration::from_env`] but applies the TOML file at `path`
    /// on top of the built-in configuration.
    pub async fn from_env_and_path(
        env: impl Fn(&str) -> Option<String>,
        path: &Path,
    ) -> Result<Self, Error> {
        let data = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let file = match toml::from_str::<file::File>(&data) {
            Ok(file) => file,
            Err(err) if std::env::var("TOML_TRACE_ERROR").is_ok_and(|v| v == "1") => {
                return Err(Error::Parse {
                    path: path.to_path_buf(),
                    details: format!("{err:#?}"),
                });
            }
            Err(_) => {
                return Err(Error::Parse {
                    path: path.to_path_buf(),
                    details: "set TOML_TRACE_ERROR=1 to print the parsing error but this may \
                              leak secrets"
                        .to_string(),
                });
            }
        };

        let mut config = Self::from_env(&env);
        config.apply(file, &env);
        Ok(config)
    }

    fn apply(&mut self, file: file::File, env: &impl Fn(&str) -> Option<String>) {
        if let Some(compiler) = file.compiler {
            self.compiler = compiler;
        }
        for (name, network) in file.networks {
            let profile = network.into_profile(name.clone(), env);
            if self.networks.insert(name.clone(), profile).is_some() {
                tracing::debug!(network = %name, "config file overrides built-in network");
            }
        }
        if let Some(etherscan) = file.etherscan {
            self.etherscan_api_key = etherscan.into_api_key(env).or(self.etherscan_api_key.take());
        }
    }

    /// Selects the network to deploy to and checks that it is complete.
    pub fn network(&self, name: &str) -> Result<Network, network::Error> {
        let profile = self
            .networks
            .get(name)
            .ok_or_else(|| network::Error::UnknownNetwork {
                name: name.to_string(),
                known: self
                    .networks
                    .keys()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;
        profile.validate()
    }
}

impl Display for Configuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "compiler: {}", self.compiler)?;
        for (name, profile) in &self.networks {
            writeln!(f, "network {name}: {profile}")?;
        }
        crate::arguments::display_secret_option(f, "etherscan_api_key", &self.etherscan_api_key)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, maplit::hashmap, std::io::Write};

    fn env() -> impl Fn(&str) -> Option<String> {
        let vars = hashmap! {
            "APP_ETHERMAIN_RPC_URL" => "https://mainnet.example/key",
            "OWNER_PRIVATE_KEY" => network::LOCAL_ACCOUNTS[1],
            "APP_SEPOLIA_RPC_URL" => "https://sepolia.example/key",
            "APP_MUMBAI_RPC_URL" => "https://mumbai.example/key",
            "APP_PRIVATE_KEY" => network::LOCAL_ACCOUNTS[0],
            "APP_ETHERSCAN_API_KEY" => "explorer-key",
        };
        move |var| vars.get(var).map(|value| value.to_string())
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn four_built_in_networks_from_environment() {
        let config = Configuration::from_env(env());
        assert_eq!(
            config.networks.keys().collect::<Vec<_>>(),
            vec!["etherMain", "local", "mumbai", "sepolia"]
        );

        let ether_main = &config.networks["etherMain"];
        assert_eq!(ether_main.url.as_deref(), Some("https://mainnet.example/key"));
        assert_eq!(ether_main.accounts, vec![network::LOCAL_ACCOUNTS[1]]);

        let sepolia = &config.networks["sepolia"];
        assert_eq!(sepolia.url.as_deref(), Some("https://sepolia.example/key"));
        assert_eq!(sepolia.accounts, vec![network::LOCAL_ACCOUNTS[0]]);

        let mumbai = &config.networks["mumbai"];
        assert_eq!(mumbai.url.as_deref(), Some("https://mumbai.example/key"));
        assert_eq!(mumbai.accounts, sepolia.accounts);

        let local = &config.networks["local"];
        assert_eq!(local.url.as_deref(), Some(network::LOCAL_URL));
        assert_eq!(local.accounts, network::LOCAL_ACCOUNTS);

        assert_eq!(config.etherscan_api_key.as_deref(), Some("explorer-key"));
        assert_eq!(config.compiler, CompilerSettings::default());
    }

    #[test]
    fn empty_environment_still_allows_local() {
        let config = Configuration::from_env(|_| None);
        assert_eq!(config.networks.len(), 4);
        assert!(config.networks["sepolia"].url.is_none());
        assert!(config.networks["sepolia"].accounts.is_empty());
        assert!(config.etherscan_api_key.is_none());

        assert!(config.network("local").is_ok());
        let err = config.network("sepolia").unwrap_err();
        assert_eq!(
            err.to_string(),
            "network `sepolia` has no RPC URL (set APP_SEPOLIA_RPC_URL)"
        );
    }

    #[test]
    fn unknown_network_lists_known_ones() {
        let err = Configuration::from_env(env()).network("goerli").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown network `goerli`, configured networks: etherMain, local, mumbai, sepolia"
        );
    }

    #[test]
    fn display_hides_secrets() {
        let shown = Configuration::from_env(env()).to_string();
        assert!(shown.contains("compiler: solc 0.8.17 (optimizer enabled, 200 runs)"));
        assert!(shown.contains("network sepolia: url: SECRET, accounts: 1"));
        assert!(shown.contains("etherscan_api_key: SECRET"));
        assert!(!shown.contains("mainnet.example"));
        assert!(!shown.contains("explorer-key"));
    }

    #[tokio::test]
    async fn file_extends_and_overrides_built_ins() {
        let file = write_config(
            r#"
            [compiler]
            version = "0.8.19"

            [networks.local]
            url = "http://127.0.0.1:9545"
            accounts = ["0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d"]
            chain-id = 1337

            [networks.holesky]
            url-env = "HOLESKY_RPC_URL"
            accounts-env = ["APP_PRIVATE_KEY"]
            "#,
        );
        let config = Configuration::from_env_and_path(env(), file.path())
            .await
            .unwrap();

        assert_eq!(config.compiler.version, "0.8.19");
        assert_eq!(config.networks.len(), 5);

        let local = config.network("local").unwrap();
        assert_eq!(local.url.as_str(), "http://127.0.0.1:9545/");
        assert_eq!(local.signers.len(), 1);
        assert_eq!(local.chain_id, Some(1337));

        let err = config.network("holesky").unwrap_err();
        assert_eq!(
            err.to_string(),
            "network `holesky` has no RPC URL (set HOLESKY_RPC_URL)"
        );
        assert_eq!(config.etherscan_api_key.as_deref(), Some("explorer-key"));
    }

    #[tokio::test]
    async fn parse_errors_do_not_echo_the_file() {
        let file = write_config(r#"networks = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478""#);
        let err = Configuration::from_env_and_path(env(), file.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        if std::env::var("TOML_TRACE_ERROR").is_err() {
            assert!(!err.to_string().contains("0xac0974"));
        }
    }

    #[tokio::test]
    async fn example_file_is_valid() {
        let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/deploy.example.toml"));
        let config = Configuration::from_env_and_path(env(), path).await.unwrap();
        assert_eq!(config.compiler, CompilerSettings::default());
        assert_eq!(config.network("anvil").unwrap().chain_id, Some(31337));
        assert_eq!(config.networks["amoy"].accounts, vec![network::LOCAL_ACCOUNTS[0]]);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let err = Configuration::from_env_and_path(env(), Path::new("/nonexistent/deploy.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
