use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Prefix for environment overrides, e.g. `GATEWAY_FAUCET__COOLDOWN_SECS`
pub const ENV_PREFIX: &str = "GATEWAY";

/// Loads configuration from a file into a struct, layered with environment overrides.
/// Supports TOML, YAML, JSON, etc. based on file extension. A missing file is not an
/// error; every field is expected to carry a serde default.
pub fn load_config<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path_str = path.as_ref().to_str().context("Invalid config path")?;

    let settings = Config::builder()
        .add_source(File::with_name(path_str).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    settings.try_deserialize::<T>().context("Failed to deserialize configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;
    use tempfile::TempDir;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default)]
        name: String,
        #[serde(default = "default_port")]
        port: u16,
    }

    fn default_port() -> u16 {
        3000
    }

    #[test]
    fn test_load_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "name = \"gateway\"\nport = 8080").unwrap();

        let sample: Sample = load_config(&path).unwrap();
        assert_eq!(sample.name, "gateway");
        assert_eq!(sample.port, 8080);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let sample: Sample = load_config(dir.path().join("absent.toml")).unwrap();
        assert_eq!(sample.port, 3000);
    }
}
