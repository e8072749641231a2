//! UI configuration: card variant, tab loading, alert lifetime, list size

use serde::Deserialize;

/// Card presentation in the product and sheet lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardVariant {
    /// One line per entry
    Simple,
    /// Multi-line cards with prices, sizes and colors
    #[default]
    Detailed,
}

impl CardVariant {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "simple" | "compact" => Self::Simple,
            _ => Self::Detailed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Detailed => "detailed",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Simple => Self::Detailed,
            Self::Detailed => Self::Simple,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub variant: CardVariant,
    /// Load Products/Sheets the first time their tab is opened instead of at login
    pub lazy_tabs: bool,
    /// Seconds an alert stays on screen
    pub toast_secs: u64,
    /// `limit` sent with list requests (0 = let the backend decide)
    pub list_limit: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            variant: CardVariant::Detailed,
            lazy_tabs: false,
            toast_secs: 4,
            list_limit: 50,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileUi {
    pub variant: Option<String>,
    pub lazy_tabs: Option<bool>,
    pub toast_secs: Option<u64>,
    pub list_limit: Option<u32>,
}

impl UiConfig {
    pub fn from_file(file: Option<FileUi>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            variant: file
                .variant
                .map(|s| CardVariant::from_str(&s))
                .unwrap_or(defaults.variant),
            lazy_tabs: file.lazy_tabs.unwrap_or(defaults.lazy_tabs),
            toast_secs: file.toast_secs.unwrap_or(defaults.toast_secs),
            list_limit: file.list_limit.unwrap_or(defaults.list_limit),
        }
    }
}
