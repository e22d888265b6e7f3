//! Manifest construction and rendering
//!
//! The manifest starts from a fixed baseline (creator tag, acting user,
//! toolchain version) held in an immutable `ManifestConfig` that is built
//! once per invocation and passed in explicitly, never read from ambient
//! global state. User-declared entries merge in afterwards and override the
//! baseline on key collision.
//!
//! Entry values longer than 70 bytes are hard-wrapped onto continuation
//! lines, each prefixed with a single space, for compatibility with existing
//! archive manifest readers.

/// Fixed first line of every manifest
pub const VERSION_HEADER: &str = "Manifest-Version: 1.0";

const WRAP_BYTES: usize = 70;

/// One manifest key/value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub key: String,
    pub value: String,
}

impl ManifestEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Renders `Key: Value` with the value wrapped at 70 bytes
    pub fn render(&self) -> String {
        format!("{}: {}", self.key, wrap(&self.value))
    }
}

/// Baseline manifest identity, constructed once per packaging invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestConfig {
    /// Creator tag, e.g. `mason 0.1.0`
    pub created_by: String,

    /// Acting user identity
    pub built_by: String,

    /// Active compiler/runtime version
    pub build_toolchain: String,
}

impl ManifestConfig {
    pub fn new(
        created_by: impl Into<String>,
        built_by: impl Into<String>,
        build_toolchain: impl Into<String>,
    ) -> Self {
        Self {
            created_by: created_by.into(),
            built_by: built_by.into(),
            build_toolchain: build_toolchain.into(),
        }
    }

    /// Baseline from the process environment and the given toolchain version
    pub fn detect(toolchain_version: impl Into<String>) -> Self {
        let user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string());

        Self {
            created_by: format!("mason {}", env!("CARGO_PKG_VERSION")),
            built_by: user,
            build_toolchain: toolchain_version.into(),
        }
    }

    fn baseline(&self) -> Vec<ManifestEntry> {
        vec![
            ManifestEntry::new("Created-By", &self.created_by),
            ManifestEntry::new("Built-By", &self.built_by),
            ManifestEntry::new("Build-Toolchain", &self.build_toolchain),
        ]
    }
}

/// Renders the full manifest text: version header, then the baseline merged
/// with the user entries (later entries override on key collision)
pub fn render_manifest(config: &ManifestConfig, user_entries: &[(String, String)]) -> String {
    let mut entries = config.baseline();

    for (key, value) in user_entries {
        match entries.iter_mut().find(|e| &e.key == key) {
            Some(existing) => existing.value = value.clone(),
            None => entries.push(ManifestEntry::new(key.clone(), value.clone())),
        }
    }

    let mut text = String::from(VERSION_HEADER);
    text.push('\n');
    for entry in &entries {
        text.push_str(&entry.render());
        text.push('\n');
    }
    text
}

/// Splits a value into 70-byte chunks joined by newline-plus-space, never
/// splitting inside a UTF-8 sequence
fn wrap(value: &str) -> String {
    if value.len() <= WRAP_BYTES {
        return value.to_string();
    }

    let mut wrapped = String::with_capacity(value.len() + value.len() / WRAP_BYTES * 2);
    let mut line_bytes = 0;

    for ch in value.chars() {
        let width = ch.len_utf8();
        if line_bytes + width > WRAP_BYTES {
            wrapped.push('\n');
            wrapped.push(' ');
            line_bytes = 0;
        }
        wrapped.push(ch);
        line_bytes += width;
    }

    wrapped
}
