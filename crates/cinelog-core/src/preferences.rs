use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::KvError;
use crate::kv::KeyValueStore;

/// Key holding the display preference as `"true"` or `"false"`
pub const DARK_MODE_KEY: &str = "isDarkMode";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub background: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub accent: &'static str,
    pub error: &'static str,
    pub success: &'static str,
}

pub const LIGHT_PALETTE: Palette = Palette {
    primary: "#2563EB",
    secondary: "#10B981",
    background: "#FFFFFF",
    surface: "#F3F4F6",
    text: "#1F2937",
    accent: "#F59E0B",
    error: "#EF4444",
    success: "#10B981",
};

pub const DARK_PALETTE: Palette = Palette {
    primary: "#3B82F6",
    secondary: "#34D399",
    background: "#111827",
    surface: "#1F2937",
    text: "#F9FAFB",
    accent: "#FBBF24",
    error: "#F87171",
    success: "#34D399",
};

impl Palette {
    pub fn for_mode(dark: bool) -> Palette {
        if dark {
            DARK_PALETTE
        } else {
            LIGHT_PALETTE
        }
    }

    /// Named entries, in display order
    pub fn entries(&self) -> [(&'static str, &'static str); 8] {
        [
            ("primary", self.primary),
            ("secondary", self.secondary),
            ("background", self.background),
            ("surface", self.surface),
            ("text", self.text),
            ("accent", self.accent),
            ("error", self.error),
            ("success", self.success),
        ]
    }
}

/// User display preferences, stored beside the movie collection
pub struct Preferences {
    backend: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Anything other than a stored `"true"` means light mode
    pub async fn is_dark_mode(&self) -> Result<bool, KvError> {
        let value = self.backend.get_item(DARK_MODE_KEY).await.map_err(|e| {
            warn!("Failed to load theme preference: {}", e);
            e
        })?;
        Ok(value.as_deref() == Some("true"))
    }

    pub async fn set_dark_mode(&self, dark: bool) -> Result<(), KvError> {
        self.backend
            .set_item(DARK_MODE_KEY, if dark { "true" } else { "false" })
            .await
            .map_err(|e| {
                warn!("Failed to save theme preference: {}", e);
                e
            })?;
        debug!("Theme preference saved: dark={}", dark);
        Ok(())
    }

    /// Flip the preference and return the new value
    pub async fn toggle_dark_mode(&self) -> Result<bool, KvError> {
        let dark = !self.is_dark_mode().await?;
        self.set_dark_mode(dark).await?;
        Ok(dark)
    }
}
