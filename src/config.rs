use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scripts_dir: Option<String>,
    pub shell: String,
    pub editor: String,
    pub popup_width: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scripts_dir: None,
            shell: "powershell.exe".into(),
            editor: "notepad.exe".into(),
            popup_width: 380,
        }
    }
}

impl Config {
    pub fn app_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".into());
            PathBuf::from(appdata).join("quicklaunch")
        }
        #[cfg(not(target_os = "windows"))]
        {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config").join("quicklaunch")
        }
    }

    /// Directory the popup lists scripts from. Lives next to config.toml so
    /// the log and config files never show up as launchable entries.
    pub fn scripts_dir(&self) -> PathBuf {
        match &self.scripts_dir {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => Self::app_dir().join("scripts"),
        }
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            tracing::info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            // Auto-create config directory and default config
            let dir = Self::app_dir();
            if let Err(e) = std::fs::create_dir_all(&dir) {
                tracing::warn!("Failed to create config directory: {}", e);
            } else {
                let default_config = "\
# QuickLaunch configuration

# Directory scanned for *.ps1 scripts (default: scripts/ next to this file)
# scripts_dir = \"\"

# Program used to run a script (invoked as: <shell> -ExecutionPolicy Bypass -File <script>)
# shell = \"powershell.exe\"

# Program used to edit a script
# editor = \"notepad.exe\"

# Popup width in logical pixels (scaled for DPI)
# popup_width = 380
";
                if let Err(e) = std::fs::write(&path, default_config) {
                    tracing::warn!("Failed to write default config: {}", e);
                } else {
                    tracing::info!("Created default config at {}", path.display());
                }
            }
            Ok(Config::default())
        }
    }

    fn config_path() -> PathBuf {
        Self::app_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.shell, "powershell.exe");
        assert_eq!(config.editor, "notepad.exe");
        assert_eq!(config.popup_width, 380);
        assert!(config.scripts_dir.is_none());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config: Config = toml::from_str("editor = \"code.exe\"\n").unwrap();
        assert_eq!(config.editor, "code.exe");
        assert_eq!(config.shell, "powershell.exe");
    }

    #[test]
    fn explicit_scripts_dir_wins() {
        let config: Config = toml::from_str("scripts_dir = \"/tmp/ps\"\n").unwrap();
        assert_eq!(config.scripts_dir(), PathBuf::from("/tmp/ps"));
    }

    #[test]
    fn empty_scripts_dir_falls_back_to_default() {
        let config: Config = toml::from_str("scripts_dir = \"\"\n").unwrap();
        assert_eq!(config.scripts_dir(), Config::app_dir().join("scripts"));
    }
}
