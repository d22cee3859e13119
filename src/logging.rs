use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SURVEYQC_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

pub fn filter_directive(verbosity: u8, env_value: Option<&str>) -> String {
    match verbosity {
        0 => env_value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_DIRECTIVE)
            .to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

pub fn init_logging(verbosity: u8) {
    let env_value = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok();
    let directive = filter_directive(verbosity, env_value.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
#[path = "../tests/src_inline/logging.rs"]
mod tests;
