//! Runs `!command` lines.
use std::path::Path;
use std::process::Command;

use crate::frame::CommandError;

/// Runs `cmd` with `args` in `cwd` and returns its standard output. A
/// non-zero exit status is an error carrying whatever the command printed.
pub fn run_unix_command(cmd: &str, args: &[String], cwd: &Path) -> Result<String, CommandError> {
    trace!("unix: {} {:?} in {}", cmd, args, cwd.display());
    let output = Command::new(cmd)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|err| CommandError::Spawn(cmd.to_owned(), err.to_string()))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let mut message = stdout;
        if !stderr.is_empty() {
            if !message.is_empty() && !message.ends_with('\n') {
                message.push('\n');
            }

            message.push_str(&stderr);
        }

        let status = match output.status.code() {
            Some(code) => code.to_string(),
            None => "signal".to_owned(),
        };

        return Err(CommandError::Failed {
            command: cmd.to_owned(),
            status,
            output: message,
        });
    }

    Ok(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn runs_in_the_given_directory() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("marker.txt")).unwrap();

        let output = run_unix_command("ls", &[], dir.path()).unwrap();
        assert_eq!(output, "marker.txt\n");
    }

    #[test]
    fn failures() {
        let dir = tempdir().unwrap();
        match run_unix_command("ls", &["no-such-file".to_owned()], dir.path()) {
            Err(CommandError::Failed { command, output, .. }) => {
                assert_eq!(command, "ls");
                assert!(output.contains("no-such-file"));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(matches!(
            run_unix_command("dframe-no-such-command", &[], dir.path()),
            Err(CommandError::Spawn(..))
        ));
    }
}
