use anyhow::Context;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

const CONFIG_DIR: &str = "configuration";
const BASE_FILE: &str = "base.yaml";
const TEST_FILE: &str = "test.yaml";
const ENV_PREFIX: &str = "APP";

fn settings_file() -> PathBuf {
    let file = if cfg!(test) { TEST_FILE } else { BASE_FILE };
    PathBuf::from(CONFIG_DIR).join(file)
}

/// Loads the settings from `configuration/base.yaml` (or `test.yaml` under
/// `cfg(test)`), layered with `APP_`-prefixed environment variables so that
/// e.g. `APP_BOOKING__URL` overrides `booking.url`.
pub fn config<Settings: DeserializeOwned>() -> anyhow::Result<Settings> {
    let base_path = std::env::current_dir().context("Failed to determine the current directory")?;
    let settings_path = base_path.join(settings_file());

    let settings = config::Config::builder()
        .add_source(config::File::from(settings_path.clone()))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("Failed to read settings from {}", settings_path.display()))?;

    settings
        .try_deserialize::<Settings>()
        .context("Failed to deserialize settings")
}
