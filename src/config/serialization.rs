//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the full config file, with comments
    pub fn to_toml(&self) -> String {
        format!(
            r#"# fichegen configuration
#
# Environment variables override this file:
#   FICHEGEN_BACKEND_URL, FICHEGEN_EXPORT_DIR, FICHEGEN_THEME
# Runtime-only flags: FICHEGEN_DEMO=1, FICHEGEN_NO_TUI=1

# Product-sheet API, including the /api prefix
backend_url = "{backend_url}"

# Exports and previews are written here
export_dir = "{export_dir}"

# Theme: "auto", "dracula", "nord", "gruvbox"
theme = "{theme}"

[ui]
# "simple" (one line per entry) or "detailed" (cards)
variant = "{variant}"
# Load products/sheets the first time their tab is opened
lazy_tabs = {lazy_tabs}
# Seconds an alert stays on screen
toast_secs = {toast_secs}
# limit sent with list requests (0 = backend default)
list_limit = {list_limit}

[logging]
# trace, debug, info, warn, error (RUST_LOG takes precedence)
level = "{log_level}"
# JSON log files
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
# "hourly", "daily" or "never"
file_rotation = "{log_file_rotation}"
file_prefix = "{log_file_prefix}"
"#,
            backend_url = self.backend_url,
            export_dir = toml_path(&self.export_dir),
            theme = self.theme,
            variant = self.ui.variant.as_str(),
            lazy_tabs = self.ui.lazy_tabs,
            toast_secs = self.ui.toast_secs,
            list_limit = self.ui.list_limit,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = toml_path(&self.logging.file_dir),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<(), std::io::Error> {
        let Some(path) = Self::config_path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config path",
            ));
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, self.to_toml())
    }
}

/// Paths go into basic strings, so backslashes need escaping (Windows)
fn toml_path(path: &std::path::Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}
