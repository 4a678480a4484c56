use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const INTEGRATION_MARKER: &str = "# refract";

/// Shell family used to pick a startup file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Zsh,
    Bash,
    Other,
}

impl Shell {
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "zsh" => Shell::Zsh,
            "bash" => Shell::Bash,
            _ => Shell::Other,
        }
    }

    /// Detect the shell family from a `$SHELL` path such as `/usr/bin/zsh`
    pub fn detect(shell_path: &Path) -> Self {
        shell_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(Self::from_name)
            .unwrap_or(Shell::Other)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Shell::Zsh => "zsh",
            Shell::Bash => "bash",
            Shell::Other => "sh",
        }
    }

    /// Startup file that should receive the PATH export
    ///
    /// Bash prefers whichever of `.bashrc` / `.bash_profile` already exists,
    /// falling back to `.bashrc`.
    pub fn rc_file(self, home: &Path) -> PathBuf {
        match self {
            Shell::Zsh => home.join(".zshrc"),
            Shell::Bash => [".bashrc", ".bash_profile"]
                .iter()
                .map(|name| home.join(name))
                .find(|candidate| candidate.exists())
                .unwrap_or_else(|| home.join(".bashrc")),
            Shell::Other => home.join(".profile"),
        }
    }
}

/// `export PATH=...` line that puts `bin_dir` in front of PATH
pub fn path_export_line(bin_dir: &Path) -> String {
    format!("export PATH=\"{}:$PATH\"", bin_dir.display())
}

/// Append `line` to `rc_file` unless its contents already contain it
///
/// Returns `true` when the file was modified.
pub fn ensure_line(rc_file: &Path, line: &str) -> Result<bool> {
    let existing_content = if rc_file.exists() {
        fs::read_to_string(rc_file).with_context(|| format!("Failed to read {:?}", rc_file))?
    } else {
        String::new()
    };

    if existing_content.contains(line) {
        tracing::debug!(file = ?rc_file, "shell integration already present");
        return Ok(false);
    }

    let new_content = if existing_content.is_empty() || existing_content.ends_with('\n') {
        format!("{existing_content}{INTEGRATION_MARKER}\n{line}\n")
    } else {
        format!("{existing_content}\n{INTEGRATION_MARKER}\n{line}\n")
    };

    if let Some(parent) = rc_file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    fs::write(rc_file, new_content).with_context(|| format!("Failed to write {:?}", rc_file))?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("/bin/zsh", Shell::Zsh)]
    #[case("/usr/local/bin/bash", Shell::Bash)]
    #[case("/bin/BASH", Shell::Bash)]
    #[case("/usr/bin/fish", Shell::Other)]
    #[case("/bin/sh", Shell::Other)]
    #[case("", Shell::Other)]
    fn test_detect(#[case] shell: &str, #[case] expected: Shell) {
        assert_eq!(Shell::detect(Path::new(shell)), expected);
    }

    #[test]
    fn test_rc_file_zsh_and_other() {
        let home = TempDir::new().unwrap();
        assert_eq!(Shell::Zsh.rc_file(home.path()), home.path().join(".zshrc"));
        assert_eq!(Shell::Other.rc_file(home.path()), home.path().join(".profile"));
    }

    #[test]
    fn test_rc_file_bash_falls_back_to_bashrc() {
        let home = TempDir::new().unwrap();
        assert_eq!(Shell::Bash.rc_file(home.path()), home.path().join(".bashrc"));
    }

    #[test]
    fn test_rc_file_bash_prefers_existing_bash_profile() {
        let home = TempDir::new().unwrap();
        fs::write(home.path().join(".bash_profile"), "").unwrap();
        assert_eq!(
            Shell::Bash.rc_file(home.path()),
            home.path().join(".bash_profile")
        );

        fs::write(home.path().join(".bashrc"), "").unwrap();
        assert_eq!(Shell::Bash.rc_file(home.path()), home.path().join(".bashrc"));
    }

    #[test]
    fn test_ensure_line_is_idempotent() {
        let home = TempDir::new().unwrap();
        let rc = home.path().join(".zshrc");
        let line = path_export_line(Path::new("/home/me/.local/bin"));

        assert!(ensure_line(&rc, &line).unwrap());
        assert!(!ensure_line(&rc, &line).unwrap());

        let contents = fs::read_to_string(&rc).unwrap();
        assert_eq!(contents.matches(&line).count(), 1);
        assert_eq!(
            contents,
            "# refract\nexport PATH=\"/home/me/.local/bin:$PATH\"\n"
        );
    }

    #[test]
    fn test_ensure_line_adds_missing_newline() {
        let home = TempDir::new().unwrap();
        let rc = home.path().join(".profile");
        fs::write(&rc, "alias ll='ls -l'").unwrap();

        ensure_line(&rc, "export PATH=\"/x:$PATH\"").unwrap();

        assert_eq!(
            fs::read_to_string(&rc).unwrap(),
            "alias ll='ls -l'\n# refract\nexport PATH=\"/x:$PATH\"\n"
        );
    }

    #[test]
    fn test_ensure_line_preserves_existing_content() {
        let home = TempDir::new().unwrap();
        let rc = home.path().join(".bashrc");
        fs::write(&rc, "set -o vi\n").unwrap();

        ensure_line(&rc, "export PATH=\"/x:$PATH\"").unwrap();

        let contents = fs::read_to_string(&rc).unwrap();
        assert!(contents.starts_with("set -o vi\n"));
        assert!(contents.ends_with("export PATH=\"/x:$PATH\"\n"));
    }
}
