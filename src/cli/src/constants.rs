/// Delay between two polls of the pipeline state.
pub const POLL_INTERVAL_MS: u64 = 2000;

/// Lower bound for `poll_interval_ms`; anything faster hammers the service APIs.
pub const MIN_POLL_INTERVAL_MS: u64 = 200;

/// Prefix of every environment variable the tool reads.
pub const ENV_PREFIX: &str = "PIPELINE_LENS";

/// Environment variable holding the tracing filter directive.
pub const LOG_FILTER_ENV: &str = "PIPELINE_LENS_LOG";

pub const CONFIG_DIR_NAME: &str = "pipeline-lens";
pub const CONFIG_FILE_NAME: &str = "config.toml";
