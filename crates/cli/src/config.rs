//! CLI configuration

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings read from the config file, overridable by global flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// dpservice gRPC address, with or without scheme
    pub address: String,

    /// Default renderer name
    pub output: String,

    /// Pretty-print JSON output
    pub pretty: bool,

    pub connect_timeout_secs: u64,

    /// Per-call deadline
    pub timeout_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            address: "localhost:1337".to_string(),
            output: "table".to_string(),
            pretty: false,
            connect_timeout_secs: 5,
            timeout_secs: 10,
        }
    }
}

impl CliConfig {
    /// `$HOME/.config/dpservice-cli/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("dpservice-cli")
                .join("config.toml")
        })
    }

    /// Load configuration from file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("error reading config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("error parsing config file {}", path.display()))
    }

    /// An explicitly given path must exist; the default one may be absent.
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => {
                anyhow::ensure!(path.exists(), "config file {} not found", path.display());
                Self::load(path)
            }
            None => match Self::default_path() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Address as a URI tonic can connect to. Only plaintext `http` is
    /// supported; the channel carries no TLS.
    pub fn endpoint_uri(&self) -> anyhow::Result<String> {
        match self.address.split_once("://") {
            None => Ok(format!("http://{}", self.address)),
            Some(("http", _)) => Ok(self.address.clone()),
            Some((scheme, _)) => anyhow::bail!(
                "unsupported scheme {scheme:?} in dpservice address {:?}, only plaintext http is supported",
                self.address
            ),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use test_case::test_case;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.address, "localhost:1337");
        assert_eq!(config.output, "table");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "address = \"10.0.0.1:1337\"").unwrap();
        writeln!(file, "output = \"json\"").unwrap();
        writeln!(file, "pretty = true").unwrap();

        let config = CliConfig::load(file.path()).unwrap();
        assert_eq!(config.address, "10.0.0.1:1337");
        assert_eq!(config.output, "json");
        assert!(config.pretty);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = \"soon\"").unwrap();

        let err = CliConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("error parsing config file"));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(CliConfig::resolve(Some(&missing)).is_err());
    }

    #[test_case("localhost:1337", "http://localhost:1337" ; "bare host and port")]
    #[test_case("http://10.0.0.1:1337", "http://10.0.0.1:1337" ; "http scheme kept")]
    #[test_case("[::1]:1337", "http://[::1]:1337" ; "ipv6 host")]
    fn test_endpoint_uri(address: &str, expected: &str) {
        let config = CliConfig {
            address: address.to_string(),
            ..Default::default()
        };
        assert_eq!(config.endpoint_uri().unwrap(), expected);
    }

    #[test_case("https://dp.example:443" ; "https")]
    #[test_case("unix:///run/dpservice.sock" ; "unix socket")]
    fn test_endpoint_uri_rejects_other_schemes(address: &str) {
        let config = CliConfig {
            address: address.to_string(),
            ..Default::default()
        };
        let err = config.endpoint_uri().unwrap_err();
        assert!(err.to_string().contains("only plaintext http"));
    }
}
