//! Game configuration, stored as JSON

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use chessview_anim::AnimationTiming;
use chessview_core::BoardGeometry;
use chessview_engine::EngineConfig;

/// Rule switches
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Reject moves that leave the mover's own king attacked
    pub reject_self_check: bool,
}

/// Everything a game session can be tuned with; missing fields take defaults
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub engine: EngineConfig,
    pub animation: AnimationTiming,
    pub geometry: BoardGeometry,
    pub rules: RulesConfig,
    /// Pause between frames of the play loop
    pub frame_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            animation: AnimationTiming::default(),
            geometry: BoardGeometry::default(),
            rules: RulesConfig::default(),
            frame_interval_ms: 10,
        }
    }
}

impl GameConfig {
    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load from `path` if given and present, otherwise defaults
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                tracing::info!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Save as pretty JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.engine.search_depth, 10);
        assert_eq!(config.animation.lift_height, 2.0);
        assert_eq!(config.geometry.capture_side_offset, 5.0);
        assert!(!config.rules.reject_self_check);
        assert_eq!(config.frame_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: GameConfig = serde_json::from_str(
            r#"{"engine": {"program": "komodo"}, "rules": {"reject_self_check": true}}"#,
        )
        .unwrap();
        assert_eq!(config.engine.program, "komodo");
        assert_eq!(config.engine.search_depth, 10);
        assert!(config.rules.reject_self_check);
        assert_eq!(config.animation, AnimationTiming::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("chessview-config-{}.json", std::process::id()));
        let mut config = GameConfig::default();
        config.engine.move_timeout_ms = Some(5000);
        config.frame_interval_ms = 16;

        config.save(&path).unwrap();
        let loaded = GameConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let path = Path::new("/nonexistent/chessview.json");
        assert_eq!(GameConfig::load_or_default(Some(path)).unwrap(), GameConfig::default());
        assert!(GameConfig::load(path).is_err());
    }
}
