//! Distributed tracing backend selection
//!
//! The configuration file names a backend and may carry a sub-block for each
//! of the three supported backends:
//!
//! ```toml
//! [tracing]
//! backend = "jaeger"
//! serviceName = "edge"
//!
//! [tracing.jaeger]
//! samplingType = "probabilistic"
//! samplingParam = 0.1
//! ```
//!
//! Resolution keeps only the selected backend's block (built from defaults if
//! missing). The effective configuration then carries a [`TracingBackend`],
//! so a selector can never disagree with the surviving block.

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const JAEGER_NAME: &str = "jaeger";
pub const ZIPKIN_NAME: &str = "zipkin";
pub const DATADOG_NAME: &str = "datadog";

/// Default service name reported in spans
pub const DEFAULT_SERVICE_NAME: &str = "traefik";

/// Tracing block as written in the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TracingConfig {
    /// Backend selector: "jaeger", "zipkin" or "datadog"
    pub backend: String,
    pub service_name: String,
    /// Truncate span names longer than this; zero means no limit
    pub span_name_limit: usize,
    pub jaeger: Option<JaegerConfig>,
    pub zipkin: Option<ZipkinConfig>,
    pub datadog: Option<DataDogConfig>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            backend: JAEGER_NAME.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            span_name_limit: 0,
            jaeger: None,
            zipkin: None,
            datadog: None,
        }
    }
}

/// Jaeger client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JaegerConfig {
    #[serde(rename = "samplingServerURL")]
    pub sampling_server_url: String,
    /// "const", "probabilistic" or "rateLimiting"
    pub sampling_type: String,
    pub sampling_param: f64,
    pub local_agent_host_port: String,
    /// "jaeger" or "b3"
    pub propagation: String,
    #[serde(rename = "gen128Bit")]
    pub gen128_bit: bool,
}

impl Default for JaegerConfig {
    fn default() -> Self {
        Self {
            sampling_server_url: "http://localhost:5778/sampling".to_string(),
            sampling_type: "const".to_string(),
            sampling_param: 1.0,
            local_agent_host_port: "127.0.0.1:6831".to_string(),
            propagation: "jaeger".to_string(),
            gen128_bit: false,
        }
    }
}

/// Zipkin client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZipkinConfig {
    pub http_endpoint: String,
    pub same_span: bool,
    #[serde(rename = "id128Bit")]
    pub id128_bit: bool,
    pub debug: bool,
    pub sample_rate: f64,
}

impl Default for ZipkinConfig {
    fn default() -> Self {
        Self {
            http_endpoint: "http://localhost:9411/api/v1/spans".to_string(),
            same_span: false,
            id128_bit: true,
            debug: false,
            sample_rate: 1.0,
        }
    }
}

/// DataDog agent settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataDogConfig {
    pub local_agent_host_port: String,
    /// Tag applied to every span, "key:value"
    pub global_tag: String,
    pub debug: bool,
    pub priority_sampling: bool,
}

impl Default for DataDogConfig {
    fn default() -> Self {
        Self {
            local_agent_host_port: "localhost:8126".to_string(),
            global_tag: String::new(),
            debug: false,
            priority_sampling: false,
        }
    }
}

fn discard<T>(slot: &mut Option<T>, label: &str) {
    if slot.take().is_some() {
        warn!(backend = label, "{} configuration will be ignored", label);
    }
}

impl TracingConfig {
    /// Keep only the selected backend's block, creating it from defaults
    /// when absent.
    ///
    /// An unknown selector is reported and every block is left in place.
    pub fn resolve_backend(&mut self) {
        match self.backend.as_str() {
            JAEGER_NAME => {
                self.jaeger.get_or_insert_with(JaegerConfig::default);
                discard(&mut self.zipkin, "Zipkin");
                discard(&mut self.datadog, "DataDog");
            }
            ZIPKIN_NAME => {
                self.zipkin.get_or_insert_with(ZipkinConfig::default);
                discard(&mut self.jaeger, "Jaeger");
                discard(&mut self.datadog, "DataDog");
            }
            DATADOG_NAME => {
                self.datadog.get_or_insert_with(DataDogConfig::default);
                discard(&mut self.zipkin, "Zipkin");
                discard(&mut self.jaeger, "Jaeger");
            }
            unknown => {
                warn!(backend = %unknown, "Unknown tracer {:?}", unknown);
            }
        }
    }
}

/// The tracing backend in effect
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TracingBackend {
    Jaeger(JaegerConfig),
    Zipkin(ZipkinConfig),
    DataDog(DataDogConfig),
    /// Unrecognized selector; the configured blocks are carried untouched
    Unknown {
        name: String,
        jaeger: Option<JaegerConfig>,
        zipkin: Option<ZipkinConfig>,
        datadog: Option<DataDogConfig>,
    },
}

impl TracingBackend {
    pub fn name(&self) -> &str {
        match self {
            TracingBackend::Jaeger(_) => JAEGER_NAME,
            TracingBackend::Zipkin(_) => ZIPKIN_NAME,
            TracingBackend::DataDog(_) => DATADOG_NAME,
            TracingBackend::Unknown { name, .. } => name,
        }
    }
}

/// Effective tracing settings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tracing {
    pub service_name: String,
    pub span_name_limit: usize,
    pub backend: TracingBackend,
}

impl From<TracingConfig> for Tracing {
    /// Collapse a resolved block into its backend. Known selectors with no
    /// block get the built-in defaults.
    fn from(config: TracingConfig) -> Self {
        let backend = match config.backend.as_str() {
            JAEGER_NAME => TracingBackend::Jaeger(config.jaeger.unwrap_or_default()),
            ZIPKIN_NAME => TracingBackend::Zipkin(config.zipkin.unwrap_or_default()),
            DATADOG_NAME => TracingBackend::DataDog(config.datadog.unwrap_or_default()),
            _ => TracingBackend::Unknown {
                name: config.backend,
                jaeger: config.jaeger,
                zipkin: config.zipkin,
                datadog: config.datadog,
            },
        };

        Self {
            service_name: config.service_name,
            span_name_limit: config.span_name_limit,
            backend,
        }
    }
}
