// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::ConfigError;
use region_balancer_core::BalancerConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Contents of the JSON configuration file.
///
/// ```json
/// { "block_width": 10, "block_height": 10, "pipeline_depth": 4,
///   "workers": ["127.0.0.1:8888", "render-2:8888"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub balancer: BalancerConfig,
    /// Worker roster as `host:port` entries.
    #[serde(default)]
    pub workers: Vec<String>,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let cfg = Config::parse(
            r#"{
                "block_width": 20,
                "block_height": 25,
                "pipeline_depth": 2,
                "workers": ["127.0.0.1:8888", "render-2:9000"]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.balancer.block_width, 20);
        assert_eq!(cfg.balancer.block_height, 25);
        assert_eq!(cfg.balancer.pipeline_depth, 2);
        assert_eq!(cfg.workers, vec!["127.0.0.1:8888", "render-2:9000"]);
    }

    #[test]
    fn parse_empty_object_uses_defaults() {
        let cfg = Config::parse("{}").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.balancer.pipeline_depth, 4);
        assert!(cfg.workers.is_empty());
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = Config::load("/nonexistent/region-balancer.json").unwrap_err();
        match err {
            ConfigError::Read { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/region-balancer.json"))
            }
            other => panic!("Expected read error, got {:?}", other),
        }
    }

    #[test]
    fn load_malformed_file_is_parse_error() {
        let path = std::env::temp_dir().join(format!(
            "region-balancer-config-{}.json",
            std::process::id()
        ));
        fs::write(&path, "{ \"workers\": 42 }").unwrap();
        let err = Config::load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
