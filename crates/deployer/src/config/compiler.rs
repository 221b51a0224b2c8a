use {
    serde::Deserialize,
    std::fmt::{self, Display, Formatter},
};

/// Solidity compiler settings the deployed artifacts are expected to be
/// built with.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CompilerSettings {
    /// Compiler version without the commit suffix, e.g. `0.8.17`.
    pub version: String,

    #[serde(default)]
    pub optimizer: Optimizer,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Optimizer {
    pub enabled: bool,
    pub runs: u32,
}

impl CompilerSettings {
    /// Whether a full compiler version string (`0.8.17+commit.8df45f5f`)
    /// belongs to the configured release.
    pub fn matches_version(&self, full_version: &str) -> bool {
        let release = full_version
            .trim_start_matches('v')
            .split('+')
            .next()
            .unwrap_or_default();
        release == self.version
    }
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            version: "0.8.17".to_string(),
            optimizer: Optimizer::default(),
        }
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self {
            enabled: true,
            runs: 200,
        }
    }
}

impl Display for Optimizer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.enabled {
            write!(f, "optimizer enabled, {} runs", self.runs)
        } else {
            write!(f, "optimizer disabled")
        }
    }
}

impl Display for CompilerSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "solc {} ({})", self.version, self.optimizer)
    }
}
