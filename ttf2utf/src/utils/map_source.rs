// ttf2utf/src/utils/map_source.rs
//! Where the mapping definition comes from.
//!
//! Lookup order: an explicit `--map-file` (or `TTF2UTF_MAP_FILE`), then
//! `<config dir>/ttf2utf/map.json` when it exists, then the embedded default.
//! User files are merged over the embedded default, so they only need to carry
//! the fonts they add or change.

use anyhow::{Context, Result};
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};
use ttf2utf_core::{FontConverter, MapDefinition, merge_definitions};

pub const CONFIG_DIR_NAME: &str = "ttf2utf";
pub const USER_MAP_FILE_NAME: &str = "map.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapSource {
    /// Given on the command line or in the environment.
    Explicit(PathBuf),
    /// Found in the per-user configuration directory.
    UserConfig(PathBuf),
    Embedded,
}

impl MapSource {
    /// Resolves the source from an optional explicit path and a configuration directory.
    pub fn resolve(explicit: Option<&Path>, config_dir: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return MapSource::Explicit(path.to_path_buf());
        }
        match config_dir.map(user_map_path) {
            Some(path) if path.is_file() => MapSource::UserConfig(path),
            _ => MapSource::Embedded,
        }
    }

    /// Resolves against the platform configuration directory.
    pub fn discover(explicit: Option<&Path>) -> Self {
        let config_dir = dirs::config_dir();
        Self::resolve(explicit, config_dir.as_deref())
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            MapSource::Explicit(path) | MapSource::UserConfig(path) => Some(path),
            MapSource::Embedded => None,
        }
    }

    /// The definition this source yields, merged over the embedded default.
    pub fn load_definition(&self) -> ttf2utf_core::Result<MapDefinition> {
        let default_definition = MapDefinition::load_default()?;
        match self.path() {
            Some(path) => {
                let user = MapDefinition::load_from_file(path)?;
                Ok(merge_definitions(default_definition, Some(user)))
            }
            None => Ok(default_definition),
        }
    }
}

impl fmt::Display for MapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapSource::Explicit(path) => write!(f, "map file {}", path.display()),
            MapSource::UserConfig(path) => write!(f, "user map file {}", path.display()),
            MapSource::Embedded => write!(f, "embedded map"),
        }
    }
}

/// `<dir>/ttf2utf/map.json`.
pub fn user_map_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_DIR_NAME).join(USER_MAP_FILE_NAME)
}

/// Builds the converter for this run.
pub fn load_converter(explicit: Option<&Path>) -> Result<FontConverter> {
    let source = MapSource::discover(explicit);
    debug!("Using {}.", source);
    let definition = source
        .load_definition()
        .with_context(|| format!("Failed to load the {}", source))?;
    let converter = FontConverter::new(&definition).with_context(|| format!("Failed to compile the {}", source))?;
    info!("Loaded {} font(s) from the {}.", converter.registry().len(), source);
    Ok(converter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let source = MapSource::resolve(Some(Path::new("custom.json")), Some(dir.path()));
        assert_eq!(source, MapSource::Explicit(PathBuf::from("custom.json")));
    }

    #[test]
    fn user_config_is_used_when_present() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(MapSource::resolve(None, Some(dir.path())), MapSource::Embedded);

        let path = user_map_path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"Toy": {"pre-rules": [], "character-map": {"s": "क"}, "post-rules": []}}"#).unwrap();
        assert_eq!(MapSource::resolve(None, Some(dir.path())), MapSource::UserConfig(path.clone()));

        let definition = MapSource::UserConfig(path).load_definition().unwrap();
        let names: Vec<&str> = definition.font_names().collect();
        assert!(names.contains(&"Toy"));
        assert!(names.contains(&"Preeti"));
    }

    #[test]
    fn no_config_dir_means_embedded() {
        assert_eq!(MapSource::resolve(None, None), MapSource::Embedded);
        assert!(MapSource::Embedded.path().is_none());
    }
}
