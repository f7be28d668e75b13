use std::path::Path;
use std::process::Command;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Runs a script through the configured shell. Fire-and-forget: the child
/// outlives the popup and is never waited on.
pub fn run_script(shell: &str, script: &Path) -> Result<(), LaunchError> {
    tracing::info!("Running {}", script.display());
    spawn(shell, &run_args(script))
}

pub fn edit_script(editor: &str, script: &Path) -> Result<(), LaunchError> {
    tracing::info!("Editing {}", script.display());
    spawn(editor, &[script.as_os_str().to_os_string()])
}

pub fn open_folder(dir: &Path) -> Result<(), LaunchError> {
    spawn("explorer.exe", &[dir.as_os_str().to_os_string()])
}

fn run_args(script: &Path) -> Vec<std::ffi::OsString> {
    vec![
        "-ExecutionPolicy".into(),
        "Bypass".into(),
        "-File".into(),
        script.as_os_str().to_os_string(),
    ]
}

fn spawn(program: &str, args: &[std::ffi::OsString]) -> Result<(), LaunchError> {
    Command::new(program)
        .args(args)
        .spawn()
        .map(|_| ())
        .map_err(|source| LaunchError::Spawn {
            program: program.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn run_args_bypass_execution_policy() {
        let args = run_args(&PathBuf::from("C:\\scripts\\deploy.ps1"));
        assert_eq!(args[0], "-ExecutionPolicy");
        assert_eq!(args[1], "Bypass");
        assert_eq!(args[2], "-File");
        assert_eq!(args[3], "C:\\scripts\\deploy.ps1");
    }

    #[test]
    fn spawn_failure_names_the_program() {
        let err = run_script("definitely-not-a-real-shell-9f2c", Path::new("x.ps1"))
            .unwrap_err();
        let LaunchError::Spawn { program, .. } = err;
        assert_eq!(program, "definitely-not-a-real-shell-9f2c");
    }
}
