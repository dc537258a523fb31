//! Builds the host runtime once per requested family.

use crate::config::{Family, Platform, RunConfig};
use crate::error::RegenError;
use crate::exec::{CommandSpec, Executor};
use colored::*;

/// Command that builds `family` on the configured platform.
pub fn build_command(config: &RunConfig, family: Family) -> CommandSpec {
    let layout = &config.layout;
    match config.platform {
        Platform::Posix => {
            let target = config.root.join(&layout.out_dir).join(family.out_dir_name());
            let mut cmd = CommandSpec::new(config.root.join(&layout.build_script));
            if family == Family::NoJit {
                cmd = cmd.arg("--no-jit");
            }
            cmd.args(["--debug", "--static"])
                .arg(format!("--target-path={}", target.display()))
                .arg(format!("-j={}", layout.build_jobs))
        }
        Platform::Windows => {
            let mut cmd = CommandSpec::new("msbuild").args([
                "/P:platform=x64",
                "/P:configuration=debug",
                "/M",
            ]);
            if family == Family::NoJit {
                cmd = cmd.arg("/p:BuildJIT=false");
            }
            cmd.arg(config.root.join(&layout.solution).to_string_lossy())
        }
    }
}

fn failure_message(family: Family) -> String {
    match family {
        Family::NoJit => "No Jit build failed - aborting bytecode generation".to_string(),
        Family::Jit => "Jit build failed - aborting bytecode generation".to_string(),
    }
}

/// Build every requested family, no-jit first. Stops at the first failure.
pub fn build_all(config: &RunConfig, exec: &dyn Executor) -> Result<(), RegenError> {
    if config.skip_build {
        println!("{} Skipping build, using existing binaries", "!".yellow());
        return Ok(());
    }

    for &family in &config.families {
        println!("{} Compiling ChakraCore with {}", "⚙".cyan(), family);
        let cmd = build_command(config, family);
        let status = exec.status(&cmd).map_err(|e| RegenError::BuildFailed {
            message: format!("{} ({}: {})", failure_message(family), cmd.program.display(), e),
        })?;
        if !status.success {
            return Err(RegenError::BuildFailed {
                message: format!("{} ({})", failure_message(family), status.exit_description()),
            });
        }
        println!("{} {} build finished", "✓".green(), family);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Flags, Layout};
    use crate::exec::CommandOutput;
    use std::cell::RefCell;
    use std::io;
    use std::path::PathBuf;

    struct Recorder {
        calls: RefCell<Vec<CommandSpec>>,
        fail_on: Option<usize>,
    }

    impl Recorder {
        fn new(fail_on: Option<usize>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_on,
            }
        }
    }

    impl Executor for Recorder {
        fn status(&self, cmd: &CommandSpec) -> io::Result<CommandOutput> {
            let mut calls = self.calls.borrow_mut();
            let index = calls.len();
            calls.push(cmd.clone());
            Ok(CommandOutput {
                success: self.fail_on != Some(index),
                code: Some(if self.fail_on == Some(index) { 2 } else { 0 }),
                stdout: Vec::new(),
            })
        }

        fn output(&self, cmd: &CommandSpec) -> io::Result<CommandOutput> {
            self.status(cmd)
        }
    }

    fn config(flags: Flags, platform: Platform) -> RunConfig {
        RunConfig::new(flags, PathBuf::from("/repo"), Layout::default(), platform).unwrap()
    }

    #[test]
    fn test_posix_build_commands() {
        let cfg = config(Flags::default(), Platform::Posix);
        assert_eq!(
            build_command(&cfg, Family::NoJit).to_string(),
            "/repo/build.sh --no-jit --debug --static --target-path=/repo/out/noJit -j=8"
        );
        assert_eq!(
            build_command(&cfg, Family::Jit).to_string(),
            "/repo/build.sh --debug --static --target-path=/repo/out/Jit -j=8"
        );
    }

    #[test]
    fn test_windows_build_commands() {
        let cfg = config(Flags::default(), Platform::Windows);
        let no_jit = build_command(&cfg, Family::NoJit);
        assert_eq!(no_jit.program, PathBuf::from("msbuild"));
        assert!(no_jit.args.contains(&"/p:BuildJIT=false".to_string()));
        let jit = build_command(&cfg, Family::Jit);
        assert!(!jit.args.contains(&"/p:BuildJIT=false".to_string()));
        assert_eq!(
            jit.args.last().map(String::as_str),
            Some("/repo/Build/Chakra.Core.sln")
        );
    }

    #[test]
    fn test_builds_no_jit_before_jit() {
        let cfg = config(Flags::default(), Platform::Posix);
        let exec = Recorder::new(None);
        build_all(&cfg, &exec).unwrap();
        let calls = exec.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args[0], "--no-jit");
        assert_ne!(calls[1].args[0], "--no-jit");
    }

    #[test]
    fn test_failure_aborts_remaining_builds() {
        let cfg = config(Flags::default(), Platform::Posix);
        let exec = Recorder::new(Some(0));
        let err = build_all(&cfg, &exec).unwrap_err();
        assert!(err.to_string().starts_with("No Jit build failed"));
        assert!(err.to_string().ends_with("(exit code 2)"));
        assert_eq!(exec.calls.borrow().len(), 1);
    }

    #[test]
    fn test_skip_build_runs_nothing() {
        let cfg = config(
            Flags {
                skip_build: true,
                ..Default::default()
            },
            Platform::Posix,
        );
        let exec = Recorder::new(None);
        build_all(&cfg, &exec).unwrap();
        assert!(exec.calls.borrow().is_empty());
    }
}
