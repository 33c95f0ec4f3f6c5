use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api: Option<ApiConfig>,
    pub extraction: Option<ExtractionConfig>,
    pub analysis: Option<AnalysisConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub openai_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub min_font_size: Option<f32>,
    pub reports_dir: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub model: Option<String>,
    pub batch_size: Option<usize>,
    pub request_timeout_secs: Option<u64>,
}

/// Platform config directory path: `<config_dir>/aimscan/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("aimscan").join("config.toml"))
}

/// Load config by cascading CWD `.aimscan.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".aimscan.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        api: Some(ApiConfig {
            openai_key: overlay
                .api
                .as_ref()
                .and_then(|a| a.openai_key.clone())
                .or_else(|| base.api.as_ref().and_then(|a| a.openai_key.clone())),
            base_url: overlay
                .api
                .as_ref()
                .and_then(|a| a.base_url.clone())
                .or_else(|| base.api.as_ref().and_then(|a| a.base_url.clone())),
        }),
        extraction: Some(ExtractionConfig {
            min_font_size: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.min_font_size)
                .or_else(|| base.extraction.as_ref().and_then(|e| e.min_font_size)),
            reports_dir: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.reports_dir.clone())
                .or_else(|| base.extraction.as_ref().and_then(|e| e.reports_dir.clone())),
            output: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.output.clone())
                .or_else(|| base.extraction.as_ref().and_then(|e| e.output.clone())),
        }),
        analysis: Some(AnalysisConfig {
            model: overlay
                .analysis
                .as_ref()
                .and_then(|a| a.model.clone())
                .or_else(|| base.analysis.as_ref().and_then(|a| a.model.clone())),
            batch_size: overlay
                .analysis
                .as_ref()
                .and_then(|a| a.batch_size)
                .or_else(|| base.analysis.as_ref().and_then(|a| a.batch_size)),
            request_timeout_secs: overlay
                .analysis
                .as_ref()
                .and_then(|a| a.request_timeout_secs)
                .or_else(|| {
                    base.analysis
                        .as_ref()
                        .and_then(|a| a.request_timeout_secs)
                }),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_parses() {
        let toml_str = "[analysis]\nbatch_size = 3\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(parsed.analysis.as_ref().unwrap().batch_size, Some(3));
        assert!(parsed.api.is_none());
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            analysis: Some(AnalysisConfig {
                model: Some("gpt-3.5-turbo".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            analysis: Some(AnalysisConfig {
                model: Some("gpt-4o-mini".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        assert_eq!(
            merged.analysis.unwrap().model.unwrap(),
            "gpt-4o-mini"
        );
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            extraction: Some(ExtractionConfig {
                min_font_size: Some(8.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.extraction.unwrap().min_font_size, Some(8.0));
    }

    #[test]
    fn round_trip_toml() {
        let config = ConfigFile {
            api: Some(ApiConfig {
                openai_key: Some("sk-test".to_string()),
                base_url: None,
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.api.unwrap().openai_key.unwrap(), "sk-test");
    }
}
