use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use lkit_units::Amount;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::network::{NetworkConfig, NetworkId};

/// Harness-wide gas price when neither the file nor `GAS_PRICE` set one:
/// 21 gwei.
pub const DEFAULT_GAS_PRICE: u64 = 21_000_000_000;

const ENV_GAS_PRICE: &str = "GAS_PRICE";
const ENV_DEBUG: [&str; 3] = ["LKIT_DEBUG", "QB_DEBUG", "npm_config_qb_debug"];
const ENV_COVERAGE: &str = "SOLIDITY_COVERAGE";
const ENV_NETWORK: &str = "LKIT_NETWORK";

/// Resolved configuration for a test harness run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Gas price used for transaction cost calculations, in base units.
    pub gas_price: Amount,
    /// Emit per-account debug output from assertion helpers.
    pub debug: bool,
    /// Running under an instrumented coverage node.
    pub coverage: bool,
    /// Network selected when none is named explicitly.
    pub default_network: String,
    pub networks: BTreeMap<String, NetworkConfig>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            "development".to_string(),
            NetworkConfig {
                gas_price: Some(Amount::from(22_000_000_000u64)),
                ..NetworkConfig::local("localhost", 8545)
            },
        );
        networks.insert(
            "coverage".to_string(),
            NetworkConfig {
                gas: Some(0xfff_ffff_ffff),
                gas_price: Some(Amount::from(1u64)),
                ..NetworkConfig::local("localhost", 8555)
            },
        );
        Self {
            gas_price: Amount::from(DEFAULT_GAS_PRICE),
            debug: false,
            coverage: false,
            default_network: "development".to_string(),
            networks,
        }
    }
}

/// On-disk shape: every field optional, networks merged over the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct HarnessFile {
    gas_price: Option<Amount>,
    debug: Option<bool>,
    coverage: Option<bool>,
    default_network: Option<String>,
    networks: BTreeMap<String, NetworkConfig>,
}

impl HarnessConfig {
    /// Parse a TOML document over the defaults.
    ///
    /// The result is not validated: `default_network` may still be replaced
    /// by an environment override. [`HarnessConfig::resolve`] validates.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let file: HarnessFile = toml::from_str(source)?;
        let mut config = Self::default();
        if let Some(gas_price) = file.gas_price {
            config.gas_price = gas_price;
        }
        if let Some(debug) = file.debug {
            config.debug = debug;
        }
        if let Some(coverage) = file.coverage {
            config.coverage = coverage;
        }
        if let Some(network) = file.default_network {
            config.default_network = network;
        }
        config.networks.extend(file.networks);
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        debug!(path = %path.display(), networks = config.networks.len(), "loaded harness config");
        Ok(config)
    }

    /// Defaults overridden from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::resolve(None, |key| std::env::var(key).ok())
    }

    /// Load the optional file, apply environment overrides through `lookup`,
    /// and validate. Call once at startup.
    pub fn resolve<F>(path: Option<&Path>, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env_with(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// An unparsable `GAS_PRICE` is ignored and the configured price kept.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_GAS_PRICE) {
            match Amount::parse(&raw) {
                Ok(price) => self.gas_price = price,
                Err(e) => warn!(value = %raw, error = %e, "ignoring invalid GAS_PRICE"),
            }
        }
        if ENV_DEBUG
            .iter()
            .any(|key| lookup(key).is_some_and(|v| v == "true"))
        {
            self.debug = true;
        }
        if lookup(ENV_COVERAGE).is_some_and(|v| v == "true") {
            self.coverage = true;
        }
        if let Some(network) = lookup(ENV_NETWORK).filter(|v| !v.is_empty()) {
            self.default_network = network;
        }
    }

    /// Fail if the default network has no entry.
    pub fn validate(&self) -> ConfigResult<()> {
        self.network(&self.default_network).map(|_| ())
    }

    pub fn network(&self, name: &str) -> ConfigResult<&NetworkConfig> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }

    /// The entry for [`HarnessConfig::default_network`].
    pub fn active_network(&self) -> ConfigResult<&NetworkConfig> {
        self.network(&self.default_network)
    }

    /// Gas price for `network`: its own price when set, else the harness-wide
    /// one.
    pub fn effective_gas_price(&self, network: &str) -> ConfigResult<Amount> {
        Ok(self.network(network)?.gas_price.unwrap_or(self.gas_price))
    }

    /// Network names accepting the given node-reported id.
    pub fn networks_accepting(&self, id: u64) -> Vec<&str> {
        self.networks
            .iter()
            .filter(|(_, net)| net.network_id.accepts(id) && net.network_id != NetworkId::Any)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let c = HarnessConfig::default();
        assert_eq!(c.gas_price, Amount::from(21_000_000_000u64));
        assert!(!c.debug);
        assert!(!c.coverage);
        assert_eq!(c.default_network, "development");
        let dev = c.active_network().unwrap();
        assert_eq!(dev.port, Some(8545));
        assert_eq!(dev.network_id, NetworkId::Any);
        assert_eq!(c.network("coverage").unwrap().gas, Some(0xfff_ffff_ffff));
    }

    #[test]
    fn toml_merges_over_defaults() {
        let c = HarnessConfig::from_toml_str(
            r#"
            gas_price = "50000000000"

            [networks.staging]
            provider_url = "https://rpc.staging.example.org"
            network_id = 3
            gas = 5700000
            "#,
        )
        .unwrap();
        assert_eq!(c.gas_price, Amount::from(50_000_000_000u64));
        assert!(c.networks.contains_key("development"));
        let staging = c.network("staging").unwrap();
        assert_eq!(staging.network_id, NetworkId::Id(3));
        assert_eq!(staging.gas, Some(5_700_000));
    }

    fn write_config(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("lkit.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn unknown_default_network_is_rejected() {
        let c = HarnessConfig::from_toml_str("default_network = \"mainnet\"").unwrap();
        let err = c.validate().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownNetwork(name) if name == "mainnet"));

        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "default_network = \"mainnet\"");
        let err = HarnessConfig::resolve(Some(&path), env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownNetwork(name) if name == "mainnet"));
    }

    #[test]
    fn env_network_replaces_undefined_file_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "default_network = \"mainnet\"");
        let c = HarnessConfig::resolve(Some(&path), env(&[("LKIT_NETWORK", "coverage")])).unwrap();
        assert_eq!(c.default_network, "coverage");
        assert_eq!(c.active_network().unwrap().port, Some(8555));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = HarnessConfig::from_toml_str("gas_price = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let err = HarnessConfig::from_toml_str("gas_price = \"-3\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides() {
        let mut c = HarnessConfig::default();
        c.apply_env_with(env(&[
            ("GAS_PRICE", "1000"),
            ("QB_DEBUG", "true"),
            ("SOLIDITY_COVERAGE", "true"),
            ("LKIT_NETWORK", "coverage"),
        ]));
        assert_eq!(c.gas_price, Amount::from(1000u64));
        assert!(c.debug);
        assert!(c.coverage);
        assert_eq!(c.active_network().unwrap().port, Some(8555));
    }

    #[test]
    fn invalid_gas_price_env_keeps_default() {
        let mut c = HarnessConfig::default();
        c.apply_env_with(env(&[("GAS_PRICE", "fast"), ("LKIT_DEBUG", "yes")]));
        assert_eq!(c.gas_price, Amount::from(DEFAULT_GAS_PRICE));
        assert!(!c.debug);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn invalid_gas_price_env_is_logged() {
        let logs = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();

        let mut c = HarnessConfig::default();
        tracing::subscriber::with_default(subscriber, || {
            c.apply_env_with(env(&[("GAS_PRICE", "fast")]));
        });

        let output = logs.contents();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("ignoring invalid GAS_PRICE"), "{output}");
        assert!(output.contains("value=fast"), "{output}");
        assert_eq!(c.gas_price, Amount::from(DEFAULT_GAS_PRICE));
    }

    #[test]
    fn valid_gas_price_env_logs_nothing() {
        let logs = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::WARN)
            .finish();

        let mut c = HarnessConfig::default();
        tracing::subscriber::with_default(subscriber, || {
            c.apply_env_with(env(&[("GAS_PRICE", "7")]));
        });
        assert!(logs.contents().is_empty());
    }

    #[test]
    fn resolve_rejects_unknown_env_network() {
        let err = HarnessConfig::resolve(None, env(&[("LKIT_NETWORK", "nowhere")])).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownNetwork(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lkit.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "debug = true").unwrap();
        writeln!(file, "[networks.development]").unwrap();
        writeln!(file, "host = \"127.0.0.1\"").unwrap();
        writeln!(file, "port = 7545").unwrap();
        drop(file);

        let c = HarnessConfig::resolve(Some(&path), env(&[("GAS_PRICE", "0x01")])).unwrap();
        assert!(c.debug);
        assert_eq!(c.gas_price, Amount::from(1u64));
        let dev = c.active_network().unwrap();
        assert_eq!(dev.port, Some(7545));
        // File entries replace default entries of the same name wholesale.
        assert_eq!(dev.gas_price, None);
        assert_eq!(c.effective_gas_price("development").unwrap(), Amount::from(1u64));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = HarnessConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn effective_gas_price_prefers_network() {
        let c = HarnessConfig::default();
        assert_eq!(
            c.effective_gas_price("development").unwrap(),
            Amount::from(22_000_000_000u64)
        );
        assert!(c.effective_gas_price("mainnet").is_err());
    }

    #[test]
    fn networks_accepting_ignores_wildcards() {
        let mut c = HarnessConfig::default();
        c.networks.insert(
            "ropsten".into(),
            NetworkConfig {
                network_id: NetworkId::Id(3),
                ..Default::default()
            },
        );
        assert_eq!(c.networks_accepting(3), vec!["ropsten"]);
        assert!(c.networks_accepting(1).is_empty());
    }
}
