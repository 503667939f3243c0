//! Application window and logging settings.

use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub window_title: String,
    pub inner_size: [f32; 2],
    /// Log filter used when `RUST_LOG` is unset or invalid.
    pub log_directive: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "Card Form Editor".to_string(),
            inner_size: [520.0, 760.0],
            log_directive: "form_editor_app=info".to_string(),
        }
    }
}

impl AppConfig {
    /// Builds the log filter from `RUST_LOG`, falling back to the default directive.
    pub fn log_filter(&self) -> EnvFilter {
        self.log_filter_from(std::env::var("RUST_LOG").ok().as_deref())
    }

    pub fn log_filter_from(&self, rust_log: Option<&str>) -> EnvFilter {
        match rust_log.filter(|spec| !spec.trim().is_empty()) {
            Some(spec) => EnvFilter::try_new(spec).unwrap_or_else(|e| {
                eprintln!("Ignoring RUST_LOG '{}': {}", spec, e);
                EnvFilter::new(&self.log_directive)
            }),
            None => EnvFilter::new(&self.log_directive),
        }
    }
}
