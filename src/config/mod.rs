//! Configuration module for Newsline.
//!
//! Settings are read from a TOML file and then overridden from the environment.

mod settings;

pub use settings::{
    GeneralSettings, ServerSettings, Settings, SnapshotSettings, DEFAULT_SNAPSHOT_URL,
};
