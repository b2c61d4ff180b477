//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed files and env vars.

use std::path::{Path, PathBuf};

use accord_config::{AccordConfig, ConfigError};
use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;

#[test]
fn loads_full_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "/srv/accord/accord.db"

[engine]
workers = 6
default_marker = "u"
agent_name = "compat"
agent_revision = "4.4.0"

[repository]
root = "/srv/repo"
area = "gold"

[standalone]
rules = "rules.yaml"
types = "license-types.csv"
"#,
        )?;

        let config: AccordConfig = Figment::from(Serialized::defaults(AccordConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.database.path, PathBuf::from("/srv/accord/accord.db"));
        assert_eq!(config.engine.worker_count(), 6);
        assert_eq!(config.engine.marker().unwrap(), 'u');
        assert_eq!(config.engine.agent_name, "compat");
        assert_eq!(config.engine.agent_revision, "4.4.0");
        assert_eq!(config.repository.root, PathBuf::from("/srv/repo"));
        assert_eq!(config.repository.area, "gold");
        assert!(config.standalone.is_configured());
        Ok(())
    });
}

#[test]
fn partial_section_keeps_other_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[engine]\nworkers = 2\n")?;

        let config: AccordConfig = Figment::from(Serialized::defaults(AccordConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.engine.workers, 2);
        assert_eq!(config.engine.default_marker, "f");
        assert_eq!(config.engine.agent_name, "compatibility");
        assert_eq!(config.repository.area, "files");
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".accord")?;
        jail.create_file(".accord/config.toml", "[repository]\narea = \"project\"\n")?;

        let config = AccordConfig::load().expect("config loads");
        assert_eq!(config.repository.area, "project");
        Ok(())
    });
}

#[test]
fn explicit_file_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".accord")?;
        jail.create_file(".accord/config.toml", "[repository]\narea = \"project\"\n")?;
        jail.create_file("override.toml", "[repository]\narea = \"explicit\"\n")?;

        let config = AccordConfig::load_from(Some(Path::new("override.toml"))).expect("config loads");
        assert_eq!(config.repository.area, "explicit");
        Ok(())
    });
}

#[test]
fn missing_explicit_file_is_an_error() {
    Jail::expect_with(|_jail| {
        let result = AccordConfig::load_from(Some(Path::new("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Figment(_))));
        Ok(())
    });
}

#[test]
fn invalid_marker_in_file_fails_validation() {
    Jail::expect_with(|jail| {
        jail.create_file("bad.toml", "[engine]\ndefault_marker = \"tf\"\n")?;

        let result = AccordConfig::load_from(Some(Path::new("bad.toml")));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        Ok(())
    });
}
