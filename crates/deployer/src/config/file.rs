//! Optional TOML configuration file that adds networks to, or overrides
//! parts of, the built-in configuration.
//!
//! ```toml
//! [compiler]
//! version = "0.8.17"
//! optimizer = { enabled = true, runs = 200 }
//!
//! [networks.anvil]
//! url = "http://127.0.0.1:8545"
//! accounts-env = ["ANVIL_PRIVATE_KEY"]
//! chain-id = 31337
//!
//! [etherscan]
//! api-key-env = "APP_ETHERSCAN_API_KEY"
//! ```

use {
    super::{
        compiler::CompilerSettings,
        network::{NetworkProfile, Origin, lookup},
    },
    serde::Deserialize,
    std::collections::BTreeMap,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(super) struct File {
    pub compiler: Option<CompilerSettings>,

    #[serde(default)]
    pub networks: BTreeMap<String, Network>,

    pub etherscan: Option<Etherscan>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(super) struct Network {
    /// RPC URL written inline.
    pub url: Option<String>,

    /// Environment variable holding the RPC URL. Takes precedence over
    /// `url` when set.
    pub url_env: Option<String>,

    /// Private keys written inline. Only sensible for development chains.
    #[serde(default)]
    pub accounts: Vec<String>,

    /// Environment variables holding private keys. Their keys are appended
    /// to `accounts`; unset variables are skipped.
    #[serde(default)]
    pub accounts_env: Vec<String>,

    pub chain_id: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(super) struct Etherscan {
    pub api_key: Option<String>,
    pub api_key_env: Option<String>,
}

impl Network {
    pub fn into_profile(
        self,
        name: String,
        env: &impl Fn(&str) -> Option<String>,
    ) -> NetworkProfile {
        let (url, url_origin) = match (self.url_env, self.url) {
            (Some(var), url) => (lookup(env, &var).or(url), Origin::Env(var)),
            (None, url) => (url, Origin::Literal),
        };

        let accounts_origin = match self.accounts_env.as_slice() {
            [] => Origin::Literal,
            vars => Origin::Env(vars.join(", ")),
        };
        let accounts = self
            .accounts
            .into_iter()
            .chain(self.accounts_env.iter().filter_map(|var| lookup(env, var)))
            .collect();

        NetworkProfile {
            name,
            url,
            url_origin,
            accounts,
            accounts_origin,
            chain_id: self.chain_id,
        }
    }
}

impl Etherscan {
    pub fn into_api_key(self, env: &impl Fn(&str) -> Option<String>) -> Option<String> {
        self.api_key_env
            .and_then(|var| lookup(env, &var))
            .or(self.api_key)
    }
}
