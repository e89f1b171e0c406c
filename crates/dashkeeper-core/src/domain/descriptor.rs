//! Configuration descriptor domain entity.
//!
//! A [`ConfigDescriptor`] describes one named configuration file the
//! application manages: its default filename, whether the application can run
//! without it, and the ownership/mode it should carry on disk. The set of
//! descriptors is fixed at startup; only the path a name resolves to can
//! change afterwards (see `storage::manifest`).

/// File extension used for default filenames and for backup records.
pub const DEFAULT_EXTENSION: &str = "yaml";

/// Octal permission mode applied to configuration files after a write.
pub const DEFAULT_MODE: u32 = 0o644;

/// Static description of one managed configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDescriptor {
    /// Unique registry key, e.g. `"bookmarks"`.
    pub name: String,
    /// Default leaf filename, e.g. `"bookmarks.yaml"`.
    pub filename: String,
    /// Required configurations participate in `validate_all`; the application
    /// cannot start without them.
    pub required: bool,
    /// Preferred owning user, if the deployment pins one.
    pub owner: Option<String>,
    /// Preferred owning group, if the deployment pins one.
    pub group: Option<String>,
    /// Permission mode enforced after every successful write.
    pub mode: u32,
    /// Whether writes to this configuration create a backup first.
    pub backup_enabled: bool,
}

impl ConfigDescriptor {
    /// Creates a descriptor with the default filename (`<name>.yaml`), mode
    /// 0644, backups enabled, and no pinned owner or group.
    pub fn new(name: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            filename: format!("{name}.{DEFAULT_EXTENSION}"),
            required,
            owner: None,
            group: None,
            mode: DEFAULT_MODE,
            backup_enabled: true,
        }
    }
}

/// Returns the built-in registry of managed configurations.
///
/// `bookmarks` and `settings` are required; the service-integration files
/// (`docker`, `kubernetes`, `proxmox`) and the optional dashboard sections
/// are not, so a fresh install starts with just the two core files.
pub fn builtin_registry() -> Vec<ConfigDescriptor> {
    vec![
        ConfigDescriptor::new("bookmarks", true),
        ConfigDescriptor::new("settings", true),
        ConfigDescriptor::new("services", false),
        ConfigDescriptor::new("widgets", false),
        ConfigDescriptor::new("docker", false),
        ConfigDescriptor::new("kubernetes", false),
        ConfigDescriptor::new("proxmox", false),
    ]
}

// ── Tests ─────────────────────────────────────────────────────────────────────
