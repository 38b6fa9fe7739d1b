use std::path::Path;

use jigsaw_cutter_core::CutSettings;
use serde::Deserialize;

/// Contents of a `cut.toml` file. Every key is optional.
///
/// ```toml
/// arc_ratio = 0.08
/// curve_points = 200
/// max_dim = 4096
/// jpeg_quality = 90
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CutConfig {
    #[serde(flatten)]
    pub settings: CutSettings,
    pub max_dim: Option<u32>,
    pub jpeg_quality: Option<u8>,
}

#[derive(Debug, thiserror::Error)]
#[error("config {path}: {message}")]
pub struct ConfigError {
    path: String,
    message: String,
}

impl CutConfig {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let error = |message: String| ConfigError {
            path: path.display().to_string(),
            message,
        };
        let text = std::fs::read_to_string(path).map_err(|err| error(err.to_string()))?;
        Self::parse(&text).map_err(|err| error(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = CutConfig::parse("").expect("parse");
        assert_eq!(config, CutConfig::default());
        assert_eq!(config.settings, CutSettings::default());
    }

    #[test]
    fn settings_and_export_keys_share_the_table() {
        let config = CutConfig::parse(
            r#"
            arc_ratio = 0.1
            curve_points = 120
            max_dim = 2048
            jpeg_quality = 80
            "#,
        )
        .expect("parse");
        assert_eq!(config.settings.arc_ratio, 0.1);
        assert_eq!(config.settings.curve_points, 120);
        assert_eq!(config.settings.connect_ratio, CutSettings::default().connect_ratio);
        assert_eq!(config.max_dim, Some(2048));
        assert_eq!(config.jpeg_quality, Some(80));
    }

    #[test]
    fn load_reports_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cut.toml");
        std::fs::write(&path, "arc_ratio = \"wide\"").expect("write");
        let err = CutConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("cut.toml"));
    }
}
