use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::config::Config;
use crate::shell::{path_contains, Shell};
use crate::{paths, ui};

/// Name the analyzer is installed under in `~/.local/bin`.
pub const COMMAND_NAME: &str = "log-analyzer";

/// Install the running executable as a PATH-reachable command.
///
/// Provisions `~/.local/bin` and `~/.config/log-analyzer`, copies the
/// current executable into the bin directory, marks it executable, and
/// registers the bin directory on PATH via the shell's startup file.
/// Every step is idempotent; re-running updates the binary in place.
pub fn install(shell: Option<&str>) -> Result<()> {
    let shell = resolve_shell(shell)?;

    let bin_dir = paths::bin_dir()?;
    fs::create_dir_all(&bin_dir)
        .with_context(|| format!("Failed to create bin directory {bin_dir:?}"))?;

    let config_dir = paths::config_dir()?;
    fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory {config_dir:?}"))?;

    // Seed a default config on first install so users have something
    // to edit; never overwrite an existing one.
    let config_file = paths::config_file()?;
    if !config_file.exists() {
        Config::default().save(&config_file)?;
        ui::info(format!("Wrote default config to {}", config_file.display()));
    }

    let target = bin_dir.join(COMMAND_NAME);
    install_binary(&target)?;
    ui::success("Installed", target.display());

    register_path(shell, &bin_dir)?;

    ui::success(
        "Done",
        format!(
            "Run '{COMMAND_NAME} <logfile>' to start monitoring (new shells pick up PATH changes)."
        ),
    );
    Ok(())
}

/// Remove the installed binary. The config directory is left in place.
pub fn uninstall() -> Result<()> {
    let target = paths::bin_dir()?.join(COMMAND_NAME);

    if !target.exists() {
        ui::info(format!("{} is not installed", target.display()));
        return Ok(());
    }

    fs::remove_file(&target).with_context(|| format!("Failed to remove {target:?}"))?;
    ui::success("Removed", target.display());
    Ok(())
}

fn resolve_shell(name: Option<&str>) -> Result<Shell> {
    match name {
        Some(name) => Shell::from_name(name)
            .with_context(|| format!("Unsupported shell '{name}' (expected zsh, bash, or fish)")),
        None => Shell::detect().context(
            "Could not detect shell from $SHELL; pass --shell zsh|bash|fish explicitly",
        ),
    }
}

fn install_binary(target: &Path) -> Result<()> {
    let source = env::current_exe().context("Failed to locate the running executable")?;

    // Re-running the installed binary: nothing to copy onto itself.
    if same_file(&source, target) {
        debug!(target = %target.display(), "binary already installed at target path");
        return Ok(());
    }

    fs::copy(&source, target)
        .with_context(|| format!("Failed to copy {source:?} to {target:?}"))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(target, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Failed to mark {target:?} executable"))?;
    }

    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Ensure `bin_dir` is reachable from PATH in new shells.
///
/// If it is already a PATH segment the startup file is left untouched;
/// otherwise exactly one export line is appended, skipped when the line
/// is already present from an earlier run.
fn register_path(shell: Shell, bin_dir: &Path) -> Result<()> {
    if path_contains(bin_dir)? {
        ui::info(format!(
            "{} is already on PATH; leaving shell profile untouched",
            bin_dir.display()
        ));
        return Ok(());
    }

    let home = paths::home_dir()?;
    let profile = shell.profile_path(&home);
    let line = shell.export_line(bin_dir);

    if append_once(&profile, &line)? {
        ui::success(
            "Updated",
            format!("{} ({} PATH export)", profile.display(), shell.as_str()),
        );
    } else {
        ui::warn(format!(
            "{} already contains the PATH export; open a new shell to pick it up",
            profile.display()
        ));
    }
    Ok(())
}

/// Append `line` to `profile` unless it is already present. Returns
/// whether the file was modified.
fn append_once(profile: &Path, line: &str) -> Result<bool> {
    let existing = if profile.exists() {
        fs::read_to_string(profile)
            .with_context(|| format!("Failed to read shell profile {profile:?}"))?
    } else {
        if let Some(parent) = profile.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {parent:?}"))?;
        }
        String::new()
    };

    if existing.lines().any(|l| l.trim() == line) {
        debug!(profile = %profile.display(), "PATH export already present");
        return Ok(false);
    }

    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str("# log-analyzer PATH\n");
    updated.push_str(line);
    updated.push('\n');

    fs::write(profile, updated)
        .with_context(|| format!("Failed to write shell profile {profile:?}"))?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Point HOME (and PATH) at a scratch directory for the duration
    /// of a test.
    struct InstallEnv {
        _temp: TempDir,
        home: PathBuf,
        saved_path: Option<std::ffi::OsString>,
    }

    impl InstallEnv {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let home = temp.path().to_path_buf();
            env::set_var("HOME", &home);
            env::remove_var("XDG_CONFIG_HOME");
            let saved_path = env::var_os("PATH");
            env::set_var("PATH", "/usr/bin:/bin");
            Self {
                _temp: temp,
                home,
                saved_path,
            }
        }

        fn bashrc(&self) -> PathBuf {
            self.home.join(".bashrc")
        }
    }

    impl Drop for InstallEnv {
        fn drop(&mut self) {
            if let Some(path) = self.saved_path.take() {
                env::set_var("PATH", path);
            }
        }
    }

    #[test]
    #[serial]
    fn test_install_provisions_directories_and_binary() {
        let env_guard = InstallEnv::new();

        install(Some("bash")).unwrap();

        let target = env_guard.home.join(".local/bin").join(COMMAND_NAME);
        assert!(target.exists());
        assert!(env_guard.home.join(".config/log-analyzer").is_dir());
        assert!(env_guard
            .home
            .join(".config/log-analyzer/config.toml")
            .exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&target).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[test]
    #[serial]
    fn test_install_appends_export_line_once() {
        let env_guard = InstallEnv::new();

        install(Some("bash")).unwrap();
        install(Some("bash")).unwrap();

        let bashrc = fs::read_to_string(env_guard.bashrc()).unwrap();
        let exports = bashrc
            .lines()
            .filter(|l| l.contains(".local/bin"))
            .count();
        assert_eq!(exports, 1);
    }

    #[test]
    #[serial]
    fn test_install_skips_profile_when_already_on_path() {
        let env_guard = InstallEnv::new();
        let bin_dir = env_guard.home.join(".local/bin");
        env::set_var("PATH", format!("/usr/bin:{}", bin_dir.display()));

        install(Some("bash")).unwrap();

        assert!(!env_guard.bashrc().exists());
    }

    #[test]
    #[serial]
    fn test_install_rejects_unknown_shell() {
        let _env_guard = InstallEnv::new();

        let err = install(Some("powershell")).unwrap_err();
        assert!(err.to_string().contains("Unsupported shell"));
    }

    #[test]
    #[serial]
    fn test_uninstall_removes_binary_but_keeps_config() {
        let env_guard = InstallEnv::new();

        install(Some("bash")).unwrap();
        uninstall().unwrap();

        assert!(!env_guard
            .home
            .join(".local/bin")
            .join(COMMAND_NAME)
            .exists());
        assert!(env_guard.home.join(".config/log-analyzer").is_dir());

        // Uninstalling again is not an error.
        uninstall().unwrap();
    }

    #[test]
    #[serial]
    fn test_append_once_preserves_existing_content() {
        let temp = TempDir::new().unwrap();
        let profile = temp.path().join(".bashrc");
        fs::write(&profile, "alias ll='ls -l'").unwrap();

        append_once(&profile, "export PATH=\"/x/bin:$PATH\"").unwrap();
        append_once(&profile, "export PATH=\"/x/bin:$PATH\"").unwrap();

        let contents = fs::read_to_string(&profile).unwrap();
        assert!(contents.starts_with("alias ll='ls -l'\n"));
        assert_eq!(contents.matches("/x/bin").count(), 1);
    }
}
