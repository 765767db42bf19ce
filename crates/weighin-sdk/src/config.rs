use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use weighin_gate::{GateConfig, Identity};
use weighin_leaderboard::TieBreak;

use crate::error::{SdkError, SdkResult};

/// Default name of the console configuration file.
pub const CONFIG_FILE: &str = "weighin.toml";

/// Who is operating this console.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    pub name: String,
    /// Grants the editor capability when `true`.
    pub editor: bool,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            name: "scale".into(),
            editor: false,
        }
    }
}

/// Console configuration, read from [`CONFIG_FILE`].
///
/// Relative paths are resolved against the directory holding the file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeighInConfig {
    /// Where ledger snapshots are stored, one JSON file per tournament.
    pub data_dir: PathBuf,
    /// Scoring matrix (TOML, `[[rule]]` tables).
    pub matrix_path: PathBuf,
    /// Tournament details and boat rosters.
    pub event_path: PathBuf,
    pub operator: OperatorConfig,
    pub tie_break: TieBreak,
    pub gate: GateConfig,
}

impl Default for WeighInConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("ledgers"),
            matrix_path: PathBuf::from("matrix.toml"),
            event_path: PathBuf::from("event.toml"),
            operator: OperatorConfig::default(),
            tie_break: TieBreak::default(),
            gate: GateConfig::default(),
        }
    }
}

impl WeighInConfig {
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Read a config file and resolve its relative paths.
    pub fn load(path: &Path) -> SdkResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| SdkError::io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        debug!(path = %path.display(), "loaded console config");
        Ok(config.resolved_against(base))
    }

    /// Write the config as-is (paths are not made relative again).
    pub fn save(&self, path: &Path) -> SdkResult<()> {
        fs::write(path, self.to_toml_string()?).map_err(|e| SdkError::io(path, e))
    }

    pub fn resolved_against(mut self, base: &Path) -> Self {
        for path in [&mut self.data_dir, &mut self.matrix_path, &mut self.event_path] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }

    /// Identity the console acts as.
    pub fn identity(&self) -> Identity {
        if self.operator.editor {
            Identity::editor(&self.operator.name)
        } else {
            Identity::viewer(&self.operator.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = WeighInConfig::default();
        assert_eq!(c.data_dir, PathBuf::from("ledgers"));
        assert_eq!(c.tie_break, TieBreak::Insertion);
        assert!(!c.operator.editor);
        assert!(c.gate.require_roster);
        assert!(!c.identity().can_edit());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let c = WeighInConfig::from_toml_str(
            r#"
            tie_break = "earliest_last_catch"

            [operator]
            name = "director"
            editor = true
            "#,
        )
        .unwrap();
        assert_eq!(c.tie_break, TieBreak::EarliestLastCatch);
        assert_eq!(c.matrix_path, PathBuf::from("matrix.toml"));
        assert!(c.identity().can_edit());
        assert_eq!(c.identity().name, "director");
    }

    #[test]
    fn legacy_permissive_switch_is_ignored() {
        let c = WeighInConfig::from_toml_str("[gate]\npermissive = true\n").unwrap();
        assert!(c.gate.require_roster);
        assert_eq!(c.gate, GateConfig::default());
    }

    #[test]
    fn load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "matrix_path = \"/etc/matrix.toml\"\n").unwrap();

        let c = WeighInConfig::load(&path).unwrap();
        assert_eq!(c.data_dir, dir.path().join("ledgers"));
        assert_eq!(c.event_path, dir.path().join("event.toml"));
        assert_eq!(c.matrix_path, PathBuf::from("/etc/matrix.toml"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut c = WeighInConfig::default();
        c.operator.editor = true;
        c.save(&path).unwrap();

        let loaded = WeighInConfig::load(&path).unwrap();
        assert_eq!(loaded, c.resolved_against(dir.path()));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = WeighInConfig::load(Path::new("/nonexistent/weighin.toml")).unwrap_err();
        assert!(matches!(err, SdkError::Io { .. }));
    }
}
