use config::{Config, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    core: Core,
    telemetry: Backend,
    ml: Backend,
    cache: Cache,
    ui: Ui,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn telemetry(&self) -> &Backend {
        &self.telemetry
    }

    pub fn ml(&self) -> &Backend {
        &self.ml
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }
}

#[derive(Debug, Deserialize)]
pub struct Core {
    store_buffer_size: usize,
    #[serde(with = "humantime_serde")]
    poll_interval: Duration,
}

impl Core {
    pub fn store_buffer_size(&self) -> usize {
        self.store_buffer_size
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

#[derive(Debug, Deserialize)]
pub struct Backend {
    url: String,
    #[serde(with = "humantime_serde")]
    request_timeout: Duration,
}

impl Backend {
    pub fn url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

#[derive(Debug, Deserialize)]
pub struct Cache {
    directory: String,
    #[serde(with = "humantime_serde")]
    ttl: Duration,
}

impl Cache {
    pub fn directory(&self) -> &Path {
        Path::new(&self.directory)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[derive(Debug, Deserialize)]
pub struct Ui {
    #[serde(with = "humantime_serde")]
    highlight_duration: Duration,
    anomaly_rows: usize,
    history_rows: usize,
    chart_width: usize,
}

impl Ui {
    pub fn highlight_duration(&self) -> Duration {
        self.highlight_duration
    }

    pub fn anomaly_rows(&self) -> usize {
        self.anomaly_rows
    }

    pub fn history_rows(&self) -> usize {
        self.history_rows
    }

    pub fn chart_width(&self) -> usize {
        self.chart_width
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                core: Core {
                    store_buffer_size: 1,
                    poll_interval: Duration::from_secs(60),
                },
                telemetry: Backend {
                    url: "http://telemetry.url".to_string(),
                    request_timeout: Duration::from_secs(1),
                },
                ml: Backend {
                    url: "http://ml.url".to_string(),
                    request_timeout: Duration::from_secs(1),
                },
                cache: Cache {
                    directory: ".cache".to_string(),
                    ttl: Duration::from_secs(15 * 60),
                },
                ui: Ui {
                    highlight_duration: Duration::from_millis(1500),
                    anomaly_rows: 10,
                    history_rows: 5,
                    chart_width: 30,
                },
            },
        }
    }

    pub fn telemetry_url(mut self, url: String) -> Self {
        self.config.telemetry.url = url;
        self
    }

    pub fn ml_url(mut self, url: String) -> Self {
        self.config.ml.url = url;
        self
    }

    pub fn cache_directory(mut self, directory: &Path) -> Self {
        self.config.cache.directory = directory.to_string_lossy().into_owned();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
