use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Contents of a freshly created script.
const NEW_SCRIPT_TEMPLATE: &str = "# New PowerShell Script\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    /// File name including the .ps1 extension, as shown in the popup.
    pub name: String,
    pub path: PathBuf,
}

pub fn ensure_scripts_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create scripts directory {}", dir.display()))
}

/// Enumerates *.ps1 files in `dir`, sorted by name. Subdirectories and other
/// extensions are skipped. The extension match is case-insensitive; Windows
/// file systems are.
pub fn list_scripts(dir: &Path) -> Result<Vec<ScriptEntry>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read scripts directory {}", dir.display()))?;

    let mut scripts = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() {
            continue;
        }
        let is_ps1 = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ps1"));
        if !is_ps1 {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        scripts.push(ScriptEntry {
            name: name.to_string(),
            path,
        });
    }

    scripts.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(scripts)
}

/// Creates a new script with a name not already taken (NewScript.ps1,
/// NewScript-2.ps1, ...) and returns its path.
pub fn create_new_script(dir: &Path) -> Result<PathBuf> {
    ensure_scripts_dir(dir)?;

    let mut candidate = dir.join("NewScript.ps1");
    let mut counter = 2;
    while candidate.exists() {
        candidate = dir.join(format!("NewScript-{}.ps1", counter));
        counter += 1;
    }

    std::fs::write(&candidate, NEW_SCRIPT_TEMPLATE)
        .with_context(|| format!("failed to create script {}", candidate.display()))?;
    tracing::info!("Created {}", candidate.display());
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "# test").unwrap();
    }

    #[test]
    fn lists_only_ps1_files_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "zeta.ps1");
        touch(tmp.path(), "Alpha.ps1");
        touch(tmp.path(), "notes.txt");
        touch(tmp.path(), "upper.PS1");
        std::fs::create_dir(tmp.path().join("nested.ps1")).unwrap();

        let scripts = list_scripts(tmp.path()).unwrap();
        let names: Vec<&str> = scripts.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Alpha.ps1", "upper.PS1", "zeta.ps1"]);
    }

    #[test]
    fn empty_dir_lists_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(list_scripts(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_dir_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(list_scripts(&tmp.path().join("missing")).is_err());
    }

    #[test]
    fn new_scripts_get_unique_names() {
        let tmp = tempfile::tempdir().unwrap();
        let first = create_new_script(tmp.path()).unwrap();
        let second = create_new_script(tmp.path()).unwrap();
        let third = create_new_script(tmp.path()).unwrap();

        assert_eq!(first.file_name().unwrap(), "NewScript.ps1");
        assert_eq!(second.file_name().unwrap(), "NewScript-2.ps1");
        assert_eq!(third.file_name().unwrap(), "NewScript-3.ps1");
    }

    #[test]
    fn new_script_has_template_content() {
        let tmp = tempfile::tempdir().unwrap();
        let path = create_new_script(tmp.path()).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("# New PowerShell Script"));
    }

    #[test]
    fn create_makes_the_directory_if_needed() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("scripts");
        let path = create_new_script(&dir).unwrap();
        assert!(path.exists());
    }
}
