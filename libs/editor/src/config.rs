//! Editor settings.

use arcstr::ArcStr;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::tool::ToolRegistry;

/// An error loading an [`EditorConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The text is not valid TOML or has the wrong shape.
    #[error("invalid editor config")]
    Toml(#[from] toml::de::Error),
    /// A setting names a tool that is not registered.
    #[error("unknown tool `{0}` in editor config")]
    UnknownTool(ArcStr),
}

/// Editor settings.
///
/// ```
/// use editor::EditorConfig;
///
/// let config = EditorConfig::from_toml_str(r#"
///     default_tool = "metal"
///     [tool_keys]
///     q = "probe"
/// "#).unwrap();
/// assert_eq!(config.default_tool.as_str(), "metal");
/// assert!(config.default_polarity_n);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// The tool active when the editor starts.
    pub default_tool: ArcStr,
    /// Logical keys that switch to a tool.
    pub tool_keys: IndexMap<ArcStr, ArcStr>,
    /// Whether the primary button paints N-type silicon.
    pub default_polarity_n: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_tool: arcstr::literal!("silicon"),
            tool_keys: [
                ("s", "silicon"),
                ("m", "metal"),
                ("v", "via"),
                ("e", "select"),
                ("t", "probe"),
            ]
            .into_iter()
            .map(|(key, tool)| (ArcStr::from(key), ArcStr::from(tool)))
            .collect(),
            default_polarity_n: true,
        }
    }
}

impl EditorConfig {
    /// Parses a config and checks it against the built-in tools.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = toml::from_str(text)?;
        config.validate(&ToolRegistry::builtin())?;
        Ok(config)
    }

    /// Checks that every tool the config names is registered.
    pub fn validate(&self, registry: &ToolRegistry) -> Result<(), ConfigError> {
        std::iter::once(&self.default_tool)
            .chain(self.tool_keys.values())
            .find(|name| !registry.contains(name))
            .map_or(Ok(()), |name| Err(ConfigError::UnknownTool(name.clone())))
    }
}
