use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::Command;

use crate::config::Config;

const DEFAULT_EDITOR: &str = "nano";

/// Edit `initial` by handing a temporary file to an external editor.
///
/// The file is written, the editor runs as a blocking subprocess against
/// its path, and the final contents are read back. The file is deleted
/// afterward whether or not editing succeeded; deletion failures are
/// reported as warnings, never as errors.
pub fn edit_basic(initial: &str, config: &Config) -> Result<String> {
    let mut file = tempfile::Builder::new()
        .prefix("emendo-")
        .suffix(&config.fallback.suffix)
        .tempfile()
        .context("failed to create temporary file")?;
    file.write_all(initial.as_bytes())
        .context("failed to write temporary file")?;
    file.flush().context("failed to flush temporary file")?;

    // Detach from the guard: deletion is handled manually below so that
    // cleanup failures degrade to warnings instead of errors.
    let path = file
        .into_temp_path()
        .keep()
        .context("failed to persist temporary file")?;

    let result = run_editor(&path, config);
    cleanup(&path);
    result
}

fn run_editor(path: &Path, config: &Config) -> Result<String> {
    let editor = resolve_editor(config);

    eprintln!("\nOpening {} editor...", editor);
    eprintln!("Make your changes and save the file.");
    eprintln!("If using nano: Ctrl+O to save, Ctrl+X to exit");
    eprintln!("If using vim: :w to save, :q to exit");

    // Spawned with an argument vector; the editor setting names a program,
    // not a command line.
    let status = Command::new(&editor)
        .arg(path)
        .status()
        .with_context(|| format!("failed to launch editor '{}'", editor))?;
    if !status.success() {
        log::warn!("Editor '{}' exited with status {}", editor, status);
    }

    fs::read_to_string(path)
        .with_context(|| format!("failed to read edited file: {}", path.display()))
}

/// Editor resolution order: configured override, `EDITOR`, then the default.
pub fn resolve_editor(config: &Config) -> String {
    config
        .fallback
        .command
        .clone()
        .filter(|c| !c.is_empty())
        .or_else(|| env::var("EDITOR").ok().filter(|e| !e.is_empty()))
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

fn cleanup(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            // Already gone, nothing to clean up.
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            eprintln!(
                "Warning: Could not delete temporary file due to permission issues: {}",
                path.display()
            );
            log::warn!("Temp file cleanup denied: {}: {}", path.display(), e);
        }
        Err(e) => {
            eprintln!("Warning: Error deleting temporary file: {}", e);
            eprintln!("Temporary file location: {}", path.display());
            log::warn!("Temp file cleanup failed: {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn with_editor_env<R>(value: Option<&str>, f: impl FnOnce() -> R) -> R {
        let _guard = env_lock().lock().unwrap();
        let previous = env::var("EDITOR").ok();
        match value {
            Some(v) => env::set_var("EDITOR", v),
            None => env::remove_var("EDITOR"),
        }
        let result = f();
        match previous {
            Some(v) => env::set_var("EDITOR", v),
            None => env::remove_var("EDITOR"),
        }
        result
    }

    fn config_with_command(command: &str) -> Config {
        let mut config = Config::default();
        config.fallback.command = Some(command.to_string());
        config
    }

    #[test]
    fn test_resolve_editor_prefers_config_override() {
        with_editor_env(Some("vi"), || {
            let config = config_with_command("myedit");
            assert_eq!(resolve_editor(&config), "myedit");
        });
    }

    #[test]
    fn test_resolve_editor_uses_environment() {
        with_editor_env(Some("vi"), || {
            let config = Config::default();
            assert_eq!(resolve_editor(&config), "vi");
        });
    }

    #[test]
    fn test_resolve_editor_default_when_unset() {
        with_editor_env(None, || {
            let config = Config::default();
            assert_eq!(resolve_editor(&config), "nano");
        });
    }

    #[test]
    fn test_resolve_editor_skips_empty_values() {
        with_editor_env(Some(""), || {
            let config = Config::default();
            assert_eq!(resolve_editor(&config), "nano");
        });
    }

    #[cfg(unix)]
    #[test]
    fn test_unmodified_file_returns_original() {
        // `true` exits immediately without touching the file.
        let config = config_with_command("true");
        let result = edit_basic("print('hello')\n", &config).unwrap();
        assert_eq!(result, "print('hello')\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_changes_are_returned() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("edit.sh");
        fs::write(&script, "#!/bin/sh\nprintf 'edited' > \"$1\"\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let config = config_with_command(script.to_str().unwrap());
        let result = edit_basic("original", &config).unwrap();
        assert_eq!(result, "edited");
    }

    #[cfg(unix)]
    #[test]
    fn test_temp_file_is_removed_after_editing() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("record.sh");
        let recorded = dir.path().join("path.txt");
        fs::write(
            &script,
            format!("#!/bin/sh\nprintf '%s' \"$1\" > {}\n", recorded.display()),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let config = config_with_command(script.to_str().unwrap());
        edit_basic("text", &config).unwrap();

        let temp_path = fs::read_to_string(&recorded).unwrap();
        assert!(temp_path.ends_with(".py"));
        assert!(!Path::new(&temp_path).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_editor_is_an_error() {
        let config = config_with_command("emendo-no-such-editor-on-path");
        let result = edit_basic("original", &config);
        assert!(result.is_err());
    }

    #[test]
    fn test_cleanup_of_missing_file_is_silent() {
        // Must not panic or warn loudly; "already gone" is success.
        cleanup(Path::new("/nonexistent/emendo-cleanup-test.py"));
    }
}
