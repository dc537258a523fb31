//! # regen-bytecode CLI Entry Point
//!
//! Parses the command line, assembles a validated [`RunConfig`] and hands it
//! to the pipeline. Exit status is 0 on success (including "nothing changed"
//! and a clean verify) and 1 on any failure or on drift under `--verify`.

use anyhow::{Context, Result};
use bcregen::config::{Flags, Layout, Platform, RunConfig};
use bcregen::exec::SystemExecutor;
use bcregen::pipeline;
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;

#[cfg(windows)]
#[link(name = "kernel32")]
unsafe extern "system" {
    fn SetConsoleOutputCP(wCodePageID: u32) -> i32;
}

#[cfg(windows)]
fn enable_windows_utf8_console() {
    unsafe {
        SetConsoleOutputCP(65001);
    }
}

#[cfg(not(windows))]
fn enable_windows_utf8_console() {}

#[derive(Parser)]
#[command(name = "regen-bytecode")]
#[command(about = "Regenerate embedded library bytecode headers", version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Don't build, generate bytecode with already built binaries
    #[arg(long)]
    skip_build: bool,
    /// Only generate bytecode for the build with jit
    #[arg(long)]
    jit: bool,
    /// Only generate bytecode for the build without jit
    #[arg(long = "noJit")]
    no_jit: bool,
    /// Fail if the generated bytecode differs from the checked-in files (CI mode)
    #[arg(long)]
    verify: bool,
    /// Use a pre-built binary; requires exactly one of --jit or --noJit
    #[arg(long, value_name = "PATH")]
    binary: Option<PathBuf>,
    /// The --binary is an x86 build; only 32-bit bytecode is generated
    #[arg(long)]
    x86: bool,
    /// Repository root all default paths are relative to
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,
}

impl Cli {
    fn flags(&self) -> Flags {
        Flags {
            skip_build: self.skip_build,
            jit: self.jit,
            no_jit: self.no_jit,
            verify: self.verify,
            binary: self.binary.clone(),
            x86: self.x86,
        }
    }
}

fn run(cli: &Cli) -> Result<pipeline::Outcome> {
    let root = std::path::absolute(&cli.root)
        .with_context(|| format!("Invalid repository root {}", cli.root.display()))?;
    let layout = Layout::load(&root)?;
    let config = RunConfig::new(cli.flags(), root, layout, Platform::detect())?;
    pipeline::run(&config, &SystemExecutor)
}

fn main() -> ExitCode {
    enable_windows_utf8_console();

    // Bad flags exit 1 like every other failure; --help and --version exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&cli) {
        Ok(outcome) if outcome.success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            println!("{} {:#}", "x".red(), e);
            ExitCode::FAILURE
        }
    }
}
