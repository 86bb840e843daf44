//! Report font capability
//!
//! The script font (Amiri by default) is looked up once at startup. When it
//! is present and loads, every piece of report text is drawn with it so
//! Arabic and Latin share one face; otherwise the builtin Helvetica faces
//! are used. The result never changes for the life of the process.

use std::path::Path;
use std::sync::Arc;

use super::render::validate_font;

/// Loaded script font bytes
#[derive(Debug)]
pub struct ScriptFont {
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct FontSupport {
    script: Option<Arc<ScriptFont>>,
}

impl FontSupport {
    /// Builtin fonts only
    pub fn builtin() -> Self {
        Self { script: None }
    }

    /// Check the font path once and load it if usable
    pub fn probe(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Script font not found, reports will use the default Latin font"
            );
            return Self::builtin();
        }

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to read script font: {}", e);
                return Self::builtin();
            }
        };

        if let Err(e) = validate_font(&bytes) {
            tracing::warn!(path = %path.display(), "Script font is unusable: {}", e);
            return Self::builtin();
        }

        tracing::info!(path = %path.display(), size = bytes.len(), "Script font loaded");
        Self {
            script: Some(Arc::new(ScriptFont { bytes })),
        }
    }

    pub fn is_available(&self) -> bool {
        self.script.is_some()
    }

    pub fn script(&self) -> Option<&ScriptFont> {
        self.script.as_deref()
    }

    /// Health-check wording
    pub fn status_label(&self) -> &'static str {
        if self.is_available() {
            "Available"
        } else {
            "Not available"
        }
    }
}
