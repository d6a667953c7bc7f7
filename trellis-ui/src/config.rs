use smartstring::{LazyCompact, SmartString};

/// Attribute carrying a widget's style-scope prefix
pub const DEFAULT_SCOPE_ATTRIBUTE: &str = "data-scope";

/// Stash key under which `hot_mount` keeps its mount across reloads
pub const DEFAULT_HOT_KEY: &str = "trellis.hmr.root";

/// Render configuration shared by a mount and all its elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    scope_attribute: SmartString<LazyCompact>,
    hot_key: SmartString<LazyCompact>,
}

impl RenderConfig {
    pub fn new() -> Self {
        Self {
            scope_attribute: DEFAULT_SCOPE_ATTRIBUTE.into(),
            hot_key: DEFAULT_HOT_KEY.into(),
        }
    }

    pub fn with_scope_attribute(mut self, name: &str) -> Self {
        self.scope_attribute = name.into();
        self
    }

    pub fn with_hot_key(mut self, key: &str) -> Self {
        self.hot_key = key.into();
        self
    }

    pub fn scope_attribute(&self) -> &str {
        &self.scope_attribute
    }

    pub fn hot_key(&self) -> &str {
        &self.hot_key
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}
