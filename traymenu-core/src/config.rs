// SPDX-License-Identifier: MIT OR Apache-2.0

//! Menu metrics and their TOML configuration files.
//!
//! Files are looked up under the `traymenu` XDG prefix as `menu.toml` and
//! merged in precedence order (later overrides earlier):
//! 1. System data: `$XDG_DATA_DIRS/traymenu/menu.toml`
//! 2. System config: `$XDG_CONFIG_DIRS/traymenu/menu.toml`
//! 3. User config: `$XDG_CONFIG_HOME/traymenu/menu.toml`
//!
//! ```toml
//! item_margin = 8
//!
//! [seeker]
//! expanded_height = 20
//! animation_ms = 80
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use smol::fs;
use xdg::BaseDirectories;

use crate::error::{MenuError, Result};

const XDG_PREFIX: &str = "traymenu";
const CONFIG_FILE: &str = "menu.toml";

/// Metrics of the menu widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuConfig {
    /// Minimum width and height of a container.
    pub min_size: i32,
    /// Padding around the content of an item.
    pub item_margin: i32,
    /// Space between icon, label and arrow of an item.
    pub item_spacing: i32,
    /// Size of an item icon.
    pub icon_size: i32,
    /// Size of the submenu arrow.
    pub arrow_size: i32,
    /// Height of a separator line.
    pub separator_height: i32,
    /// Seek bar metrics.
    pub seeker: SeekerConfig,
}

/// Metrics of the seek bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekerConfig {
    /// Height while the pointer is outside.
    pub collapsed_height: i32,
    /// Height while hovered.
    pub expanded_height: i32,
    /// Duration of the hover animation in milliseconds.
    pub animation_ms: u64,
    /// Fraction added or removed per scroll step.
    pub scroll_step: f64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            min_size: 10,
            item_margin: 10,
            item_spacing: 7,
            icon_size: 16,
            arrow_size: 16,
            separator_height: 1,
            seeker: SeekerConfig::default(),
        }
    }
}

impl Default for SeekerConfig {
    fn default() -> Self {
        Self {
            collapsed_height: 7,
            expanded_height: 16,
            animation_ms: 50,
            scroll_step: 0.05,
        }
    }
}

/// A single config file; absent keys leave the current value alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MenuConfigFile {
    min_size: Option<i32>,
    item_margin: Option<i32>,
    item_spacing: Option<i32>,
    icon_size: Option<i32>,
    arrow_size: Option<i32>,
    separator_height: Option<i32>,
    #[serde(default)]
    seeker: SeekerConfigFile,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeekerConfigFile {
    collapsed_height: Option<i32>,
    expanded_height: Option<i32>,
    animation_ms: Option<u64>,
    scroll_step: Option<f64>,
}

impl MenuConfig {
    /// Parse a config from TOML, starting from the defaults.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut config = Self::default();
        config.merge(toml::from_str(content)?);
        Ok(config)
    }

    /// Load and merge all config files from the XDG locations.
    ///
    /// Unreadable or malformed files are logged and skipped; only a failure to
    /// resolve the XDG directories is an error.
    pub async fn load() -> Result<Self> {
        let xdg_dirs =
            BaseDirectories::with_prefix(XDG_PREFIX).map_err(|e| MenuError::Xdg(e.to_string()))?;

        let mut config = Self::default();

        for path in Self::config_paths(&xdg_dirs) {
            match Self::read_file(&path).await {
                Ok(file) => config.merge(file),
                Err(e @ MenuError::ConfigParse { .. }) => log::warn!("{e}"),
                Err(e) => log::debug!("{e}"),
            }
        }

        Ok(config)
    }

    /// Load a single config file on top of the defaults.
    pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::default();
        config.merge(Self::read_file(path.as_ref()).await?);
        Ok(config)
    }

    fn config_paths(xdg_dirs: &BaseDirectories) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = xdg_dirs.find_data_files(CONFIG_FILE).rev().collect();
        paths.extend(xdg_dirs.find_config_files(CONFIG_FILE).rev());

        let user_config_path = xdg_dirs.get_config_home().join(CONFIG_FILE);
        if !paths.contains(&user_config_path) && user_config_path.exists() {
            paths.push(user_config_path);
        }

        paths
    }

    async fn read_file(path: &Path) -> Result<MenuConfigFile> {
        log::info!("Loading menu config from: {:?}", path);

        let content = fs::read_to_string(path).await.map_err(|source| MenuError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| MenuError::ConfigParse {
            path: path.to_path_buf(),
            details: e.to_string(),
        })
    }

    fn merge(&mut self, other: MenuConfigFile) {
        if let Some(min_size) = other.min_size {
            self.min_size = min_size;
        }
        if let Some(item_margin) = other.item_margin {
            self.item_margin = item_margin;
        }
        if let Some(item_spacing) = other.item_spacing {
            self.item_spacing = item_spacing;
        }
        if let Some(icon_size) = other.icon_size {
            self.icon_size = icon_size;
        }
        if let Some(arrow_size) = other.arrow_size {
            self.arrow_size = arrow_size;
        }
        if let Some(separator_height) = other.separator_height {
            self.separator_height = separator_height;
        }

        // Seeker
        let seeker = other.seeker;
        if let Some(collapsed_height) = seeker.collapsed_height {
            self.seeker.collapsed_height = collapsed_height;
        }
        if let Some(expanded_height) = seeker.expanded_height {
            self.seeker.expanded_height = expanded_height;
        }
        if let Some(animation_ms) = seeker.animation_ms {
            self.seeker.animation_ms = animation_ms;
        }
        if let Some(scroll_step) = seeker.scroll_step {
            self.seeker.scroll_step = scroll_step;
        }
    }
}
