//! End-to-end regeneration run.
//!
//! Steps, strictly sequential:
//! 1. list the library scripts, then build every requested family (unless skipped)
//! 2. for each family and width, regenerate the header and record drift
//! 3. in verify mode, fail on drift; otherwise decide whether to restamp

use crate::config::{Family, Platform, RunConfig, Variant};
use crate::drift::{ChangeDetector, DriftReport, RunOutcome};
use crate::exec::Executor;
use crate::header::{self, CodegenCommands, HeaderJob, ScriptSet};
use crate::orchestrator;
use crate::report;
use crate::resolver::resolve_binary;
use crate::stamp::{self, StampDecision};
use anyhow::Result;
use colored::*;

/// How a run ended, short of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `--verify` run; `drift` means the checked-in headers are stale.
    Verified { drift: bool },
    /// Normal run and what the stamper decided.
    Regenerated { stamp: StampDecision },
}

impl Outcome {
    /// Process exit status for this outcome.
    pub fn success(&self) -> bool {
        !matches!(self, Outcome::Verified { drift: true })
    }
}

fn announce(config: &RunConfig) {
    if config.verify {
        println!("######### Verifying generated bytecode #########");
    }

    match config.platform {
        Platform::Posix => println!("OS is Linux or macOS"),
        Platform::Windows => println!("OS is Windows"),
    }

    if !config.all_families() {
        for family in &config.families {
            match family {
                Family::NoJit => println!("Regenerating bytecode for no-jit build only"),
                Family::Jit => println!("Regenerating bytecode for jit build only"),
            }
        }
    }
}

/// Regenerate one header and compare it with what it replaced.
pub fn regenerate(
    config: &RunConfig,
    exec: &dyn Executor,
    scripts: &ScriptSet,
    variant: &Variant,
) -> Result<DriftReport> {
    let out_path = config.output_path(variant);
    if config.verify {
        println!("{} Checking bytecode in file {}", "🔍".magenta(), out_path.display());
    } else {
        println!("{} Generating bytecode in file {}", "⚙".cyan(), out_path.display());
    }

    let binary = resolve_binary(config, variant.family);
    let commands = CodegenCommands::new(&binary, variant.width);
    let error_message = variant.codegen_error();
    let job = HeaderJob {
        scripts,
        commands: &commands,
        error_message: &error_message,
    };

    let detector = ChangeDetector::capture(&out_path, config.platform)?;
    job.write_to(exec, &out_path)?;
    Ok(detector.finish(config.verify)?)
}

/// Run the whole pipeline with `exec` as the process backend.
pub fn run(config: &RunConfig, exec: &dyn Executor) -> Result<Outcome> {
    announce(config);

    // Malformed script names fail here, before any lengthy build
    let scripts = header::discover(
        &config.library_dir(),
        &config.layout.script_extension,
        &config.layout.excluded_script,
    )?;
    orchestrator::build_all(config, exec)?;

    let outcome = config
        .variants()
        .iter()
        .map(|variant| {
            let report = regenerate(config, exec, &scripts, variant)?;
            if config.verify {
                report::print_difference(&report);
            }
            Ok(report)
        })
        .collect::<Result<RunOutcome>>()?;

    if config.verify {
        let clean = report::verify(&outcome);
        return Ok(Outcome::Verified { drift: !clean });
    }

    let decision = stamp::decide(config, outcome.changed());
    stamp::apply(config, decision)?;
    Ok(Outcome::Regenerated { stamp: decision })
}
