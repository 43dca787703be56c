use std::path::{Path, PathBuf};

use serde::Deserialize;

use qim_mark::WatermarkConfig;

/// Application configuration loaded from config.yaml
///
/// The embedding contract (canvas, delta, bands) nests the core crate's
/// [`WatermarkConfig`] so the file, the embedder and the scorer all share
/// one definition of the parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Watermark embedding contract
    #[serde(default)]
    pub watermark: WatermarkConfig,

    /// Quality factor for the lossy re-encoding robustness test (0-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Remote compute endpoint; `None` runs the identity capability
    /// in-process
    #[serde(default)]
    pub compute_url: Option<String>,

    /// Directory for watermarked images and results records
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_jpeg_quality() -> u8 {
    50
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            watermark: WatermarkConfig::default(),
            jpeg_quality: default_jpeg_quality(),
            compute_url: None,
            output_dir: default_output_dir(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the `CONFIG_FILE` environment variable, or
    /// fall back to built-in defaults when it is not set.
    ///
    /// A missing variable means defaults; a file that exists but does not
    /// parse is a startup error. Embedding parameters are never silently
    /// substituted, because embed and extract must agree bit-for-bit.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::from_file(Path::new(&path)),
            Err(_) => {
                tracing::info!("CONFIG_FILE not set, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config {}: {e}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse config {}: {e}", path.display()))?;
        tracing::info!(
            canvas = config.watermark.canvas,
            delta = config.watermark.delta,
            bands = config.watermark.bands.len(),
            jpeg_quality = config.jpeg_quality,
            "Loaded configuration"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qim_mark::Band;

    #[test]
    fn defaults_match_reference_parameters() {
        let config = AppConfig::default();
        assert_eq!(config.watermark.canvas, 64);
        assert_eq!(config.watermark.delta, 0.10);
        assert_eq!(config.watermark.bands, vec![Band::new(1, 8, 1, 8)]);
        assert_eq!(config.jpeg_quality, 50);
        assert!(config.compute_url.is_none());
    }

    #[test]
    fn parses_full_yaml() {
        let yaml = r#"
watermark:
  canvas: 32
  delta: 0.2
  bands:
    - { row_min: 1, row_max: 4, col_min: 1, col_max: 4 }
jpeg_quality: 70
compute_url: "http://localhost:3000/api/compute"
output_dir: "/tmp/marks"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.watermark.canvas, 32);
        assert_eq!(config.watermark.delta, 0.2);
        assert_eq!(config.watermark.bands, vec![Band::new(1, 4, 1, 4)]);
        assert_eq!(config.jpeg_quality, 70);
        assert_eq!(
            config.compute_url.as_deref(),
            Some("http://localhost:3000/api/compute")
        );
        assert_eq!(config.output_dir, PathBuf::from("/tmp/marks"));
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "jpeg_quality: 30\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.jpeg_quality, 30);
        assert_eq!(config.watermark.canvas, 64);
        assert_eq!(config.watermark.delta, 0.10);
    }
}
