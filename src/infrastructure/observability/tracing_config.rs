pub const DEFAULT_DIRECTIVES: &str = "info,docsense=debug,tower_http=debug";

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub default_directives: String,
}

impl TracingConfig {
    /// Applies the `logging` settings on top of the environment-derived defaults.
    pub fn with_settings(mut self, level: &str, json_format: bool) -> Self {
        if !level.trim().is_empty() {
            self.default_directives = level.to_string();
        }
        self.json_format = self.json_format || json_format;
        self
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            default_directives: DEFAULT_DIRECTIVES.to_string(),
        }
    }
}
