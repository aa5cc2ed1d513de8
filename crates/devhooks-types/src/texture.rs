//! Texture references.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Namespaced name of a texture sprite, e.g. `devhooks:rack/server_front`.
///
/// This is a reference only; resolving it to pixels is the renderer's job.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TextureId(#[ts(as = "String")] String);

impl TextureId {
    /// Wrap a texture name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The full texture name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TextureId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TextureId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_string() {
        let texture = TextureId::from("devhooks:rack/led");
        assert_eq!(texture.to_string(), texture.as_str());
        let json = serde_json::to_string(&texture).ok();
        assert_eq!(json.as_deref(), Some(r#""devhooks:rack/led""#));
    }
}
