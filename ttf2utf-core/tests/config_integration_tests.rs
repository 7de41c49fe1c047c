// ttf2utf-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

use ttf2utf_core::config::{self, MapDefinition};
use ttf2utf_core::{FontConverter, MarkupOptions, Ttf2UtfError};

const USER_JSON: &str = r#"{
    "Sagarmatha": {
        "rules": {
            "pre-rules": [],
            "character-map": { "s": "क", "f": "ा" },
            "post-rules": []
        }
    }
}"#;

const USER_YAML: &str = r#"
Sagarmatha:
  rules:
    pre-rules:
      - ["km", "फ"]
    character-map:
      s: "क"
      f: "ा"
    post-rules: []
"#;

#[test]
fn test_load_default_map() {
    let definition = MapDefinition::load_default().unwrap();
    let fonts: Vec<&str> = definition.font_names().collect();
    assert!(fonts.contains(&"Preeti"));
    assert!(fonts.contains(&"Kantipur"));
    let preeti = &definition.fonts["Preeti"];
    assert_eq!(preeti.character_map["s"], "क");
    assert!(!preeti.pre_rules.is_empty());
    assert!(!preeti.post_rules.is_empty());
    assert_eq!(&definition.fonts["Kantipur"], preeti);
}

#[test]
fn test_load_json_file() -> Result<()> {
    let mut file = Builder::new().suffix(".json").tempfile()?;
    file.write_all(USER_JSON.as_bytes())?;
    let definition = MapDefinition::load_from_file(file.path())?;
    assert_eq!(definition.fonts.len(), 1);
    assert_eq!(definition.fonts["Sagarmatha"].character_map["f"], "ा");
    Ok(())
}

#[test]
fn test_load_yaml_file() -> Result<()> {
    let mut file = Builder::new().suffix(".yaml").tempfile()?;
    file.write_all(USER_YAML.as_bytes())?;
    let definition = MapDefinition::load_from_file(file.path())?;
    let rules = &definition.fonts["Sagarmatha"];
    assert_eq!(rules.pre_rules, vec![("km".to_string(), "फ".to_string())]);
    assert_eq!(rules.character_map.len(), 2);
    Ok(())
}

#[test]
fn test_missing_file_is_map_file_not_found() {
    let err = MapDefinition::load_from_file("/definitely/not/here/map.json").unwrap_err();
    assert!(matches!(err, Ttf2UtfError::MapFileNotFound { .. }));
}

#[test]
fn test_invalid_json_is_invalid_definition() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"{ not json")?;
    let err = MapDefinition::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, Ttf2UtfError::InvalidMapDefinition(_)));
    Ok(())
}

#[test]
fn test_bad_regex_is_rejected_at_load_time() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(br#"{ "Bad": { "pre-rules": [["([", "x"]], "character-map": {}, "post-rules": [] } }"#)?;
    let err = MapDefinition::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, Ttf2UtfError::InvalidMapDefinition(ref msg) if msg.contains("Bad")));
    Ok(())
}

#[test]
fn test_map_file_is_merged_over_default() -> Result<()> {
    let mut file = Builder::new().suffix(".json").tempfile()?;
    file.write_all(USER_JSON.as_bytes())?;
    let converter = FontConverter::from_map_file(file.path())?;
    assert!(converter.is_supported("Preeti"));
    assert!(converter.is_supported("Sagarmatha"));
    assert_eq!(converter.to_unicode("sf", "Sagarmatha", MarkupOptions::plain())?, "का");
    Ok(())
}

#[test]
fn test_merge_without_user_keeps_default() -> Result<()> {
    let default_definition = MapDefinition::load_default()?;
    let merged = config::merge_definitions(default_definition.clone(), None);
    assert_eq!(merged, default_definition);
    Ok(())
}
