use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use anyhow::{anyhow, Context, Result};

const CONFIG_DIR: &str = "truecraft";
const SETTINGS_FILE: &str = "settings.json";
pub const HOME_ENV: &str = "TRUECRAFT_HOME";

/// Remember-me settings.
///
/// NOTE: the password is stored in cleartext when auto-login is on. That is
/// what the launcher has always done; moving it to an OS keychain means a
/// new `CredentialStore`, not a change here.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RememberedCredentials {
    pub username: String,
    pub password: String,
    pub auto_login: bool,
}

impl RememberedCredentials {
    /// What to persist after a successful login as `username`.
    pub fn after_login(username: &str, password: &str, remember_me: bool) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            auto_login: remember_me,
        }
        .sanitized()
    }

    /// Without auto-login there is no reason to keep the password.
    pub fn sanitized(mut self) -> Self {
        if !self.auto_login {
            self.password.clear();
        }
        self
    }

    /// Keep the username for prefill, drop everything else.
    pub fn forgotten(&self) -> Self {
        Self {
            username: self.username.clone(),
            ..Self::default()
        }
    }

    /// True when a login can be attempted without asking the user anything.
    pub fn can_auto_login(&self) -> bool {
        self.auto_login && !self.username.is_empty() && !self.password.is_empty()
    }
}

pub trait CredentialStore {
    /// Missing settings load as the default (empty, auto-login off).
    fn load(&self) -> Result<RememberedCredentials>;

    /// Persists immediately. Implementations store `remembered.sanitized()`.
    fn save(&self, remembered: &RememberedCredentials) -> Result<()>;

    fn forget(&self) -> Result<RememberedCredentials> {
        let forgotten = self.load()?.forgotten();
        self.save(&forgotten)?;
        Ok(forgotten)
    }
}

/// `settings.json` under the launcher's config directory.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$TRUECRAFT_HOME/settings.json`, else `<config dir>/truecraft/settings.json`.
    pub fn default_location() -> Result<Self> {
        Ok(Self::in_dir(settings_dir()?))
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<RememberedCredentials> {
        if !self.path.exists() {
            return Ok(RememberedCredentials::default());
        }

        let content = fs::read_to_string(&self.path).context("Failed to read settings file")?;
        serde_json::from_str(&content).context("Failed to parse settings file")
    }

    fn save(&self, remembered: &RememberedCredentials) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).context("Failed to create settings directory")?;
        }

        let content = serde_json::to_string_pretty(&remembered.clone().sanitized())?;
        write_private(&self.path, &content).context("Failed to write settings file")
    }
}

/// Keeps settings in memory. Used for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<RememberedCredentials>,
}

impl MemoryCredentialStore {
    pub fn new(initial: RememberedCredentials) -> Self {
        Self {
            inner: Mutex::new(initial.sanitized()),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<RememberedCredentials> {
        let guard = self.inner.lock().map_err(|_| anyhow!("Settings lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, remembered: &RememberedCredentials) -> Result<()> {
        let mut guard = self.inner.lock().map_err(|_| anyhow!("Settings lock poisoned"))?;
        *guard = remembered.clone().sanitized();
        Ok(())
    }
}

fn settings_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            return Ok(PathBuf::from(shellexpand::tilde(home.trim()).to_string()));
        }
    }

    Ok(dirs::config_dir()
        .context("Could not find config directory")?
        .join(CONFIG_DIR))
}

#[cfg(unix)]
fn write_private(path: &Path, content: &str) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; tighten files written by older versions.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(content.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remembered(password: &str, auto_login: bool) -> RememberedCredentials {
        RememberedCredentials {
            username: "alice".into(),
            password: password.into(),
            auto_login,
        }
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::in_dir(dir.path().join("nested"));
        assert_eq!(store.load().unwrap(), RememberedCredentials::default());
    }

    #[test]
    fn load_after_save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::in_dir(dir.path().join("nested"));
        let saved = remembered("hunter2", true);
        store.save(&saved).unwrap();
        assert_eq!(store.load().unwrap(), saved);
    }

    #[test]
    fn password_dropped_without_auto_login() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::in_dir(dir.path());
        store.save(&remembered("hunter2", false)).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.password, "");
        assert!(!fs::read_to_string(store.path()).unwrap().contains("hunter2"));

        let memory = MemoryCredentialStore::default();
        memory.save(&remembered("hunter2", false)).unwrap();
        assert_eq!(memory.load().unwrap().password, "");
    }

    #[test]
    fn after_login_policy() {
        assert_eq!(
            RememberedCredentials::after_login("alice", "hunter2", true),
            remembered("hunter2", true)
        );
        assert_eq!(
            RememberedCredentials::after_login("alice", "hunter2", false),
            remembered("", false)
        );
    }

    #[test]
    fn forget_keeps_username_only() {
        let store = MemoryCredentialStore::new(remembered("hunter2", true));
        let forgotten = store.forget().unwrap();
        assert_eq!(forgotten, remembered("", false));
        assert_eq!(store.load().unwrap(), forgotten);
    }

    #[test]
    fn partial_settings_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::in_dir(dir.path());
        fs::write(store.path(), r#"{"username":"bob"}"#).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.username, "bob");
        assert!(!loaded.auto_login);
        assert!(!loaded.can_auto_login());
    }

    #[cfg(unix)]
    #[test]
    fn settings_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::in_dir(dir.path());
        store.save(&remembered("hunter2", true)).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
