use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MODELS_PATH: &str = "/api/latest/models/";
pub const UPSCALE_PATH: &str = "/api/latest/upscaler/upscale/";
pub const STATISTICS_PATH: &str = "/api/latest/history/statistics";
pub const REPORT_PATH: &str = "/api/latest/history/report";

/// Prefix shared by every upscaling service route.
pub const API_PREFIX: &str = "/api/latest";

/// Multipart field carrying the image bytes.
pub const IMAGE_FIELD: &str = "image";
/// Multipart field carrying the model identifier.
pub const MODEL_FIELD: &str = "model";

/// Joins the deployment base URL with a service path.
///
/// An empty base yields a same-origin path.
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<String>,
}

/// Request history aggregates reported by the service.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct HistoryStatistics {
    /// Model family -> full model name -> share of successful requests, in percent.
    #[serde(default)]
    pub model_usage: BTreeMap<String, BTreeMap<String, f64>>,
    #[serde(default)]
    pub avg_processing_time: BTreeMap<String, f64>,
    #[serde(default)]
    pub avg_file_size: BTreeMap<String, f64>,
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default)]
    pub scale_factors: BTreeMap<String, f64>,
}

impl HistoryStatistics {
    pub fn is_empty(&self) -> bool {
        self.model_usage.is_empty()
            && self.avg_processing_time.is_empty()
            && self.avg_file_size.is_empty()
            && self.scale_factors.is_empty()
            && self.success_rate == 0.0
    }

    /// Scale factor shares ordered by numeric scale; keys that are not integers are dropped.
    pub fn sorted_scale_factors(&self) -> Vec<(u32, f64)> {
        let mut scales: Vec<(u32, f64)> = self
            .scale_factors
            .iter()
            .filter_map(|(scale, share)| scale.parse::<u32>().ok().map(|s| (s, *share)))
            .collect();
        scales.sort_by_key(|(scale, _)| *scale);
        scales
    }
}

/// Renders a byte count the way the statistics panel shows it.
pub fn format_file_size(bytes: f64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;

    if bytes >= MIB {
        format!("{:.1} MB", bytes / MIB)
    } else if bytes >= KIB {
        format!("{:.1} KB", bytes / KIB)
    } else {
        format!("{:.0} B", bytes.max(0.0))
    }
}

/// Deployment configuration published to the browser as `window.CONSTS`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ClientConfig {
    #[serde(rename = "HOST", default)]
    pub host: String,
}

impl ClientConfig {
    pub fn to_script(&self) -> Result<String, serde_json::Error> {
        Ok(format!("window.CONSTS = {};\n", serde_json::to_string(self)?))
    }
}
