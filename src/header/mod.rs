//! Bytecode header assembly.
//!
//! A header is built by streaming fixed scaffolding text into the output file
//! and, for every library script, the stdout of the host binary run in
//! bytecode-emission mode. Scripts are always processed in sorted file name
//! order so that unchanged inputs reproduce the same bytes.

pub mod scripts;
pub mod template;

pub use scripts::{GuardedScript, ScriptSet, SourceScript, discover};

use crate::config::Width;
use crate::error::RegenError;
use crate::exec::{CommandSpec, Executor};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Host binary invocations for one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenCommands {
    pub builtin: CommandSpec,
    pub guarded: CommandSpec,
}

impl CodegenCommands {
    pub fn new(binary: &Path, width: Width) -> Self {
        let mut base = CommandSpec::new(binary).arg("-GenerateLibraryByteCodeHeader");
        if width == Width::Bits32 {
            base = base.arg("-Force32BitByteCode");
        }
        Self {
            builtin: base.clone().args(["-LdChakraLib", "-JsBuiltIn"]),
            guarded: base.arg("-Intl"),
        }
    }
}

/// Everything needed to produce one header document.
pub struct HeaderJob<'a> {
    pub scripts: &'a ScriptSet,
    pub commands: &'a CodegenCommands,
    /// Reported when the host binary fails.
    pub error_message: &'a str,
}

impl HeaderJob<'_> {
    /// Stream the complete header into `out`.
    pub fn render<W: Write>(
        &self,
        exec: &dyn Executor,
        out: &mut W,
        progress: &ProgressBar,
    ) -> Result<(), RegenError> {
        out.write_all(template::PREAMBLE.as_bytes())?;
        for script in &self.scripts.builtins {
            out.write_all(template::macro_entry(script).as_bytes())?;
        }
        out.write_all(template::NAMESPACE_OPEN.as_bytes())?;

        for script in &self.scripts.builtins {
            progress.set_message(script.file_name.clone());
            self.append_bytecode(
                exec,
                out,
                &self.commands.builtin,
                &script.path,
                &script.file_name,
                &script.stem(),
            )?;
            progress.inc(1);
        }

        out.write_all(template::GUARD_SWITCH.as_bytes())?;
        let guarded = &self.scripts.guarded;
        progress.set_message(guarded.file_name.clone());
        self.append_bytecode(
            exec,
            out,
            &self.commands.guarded,
            &guarded.path,
            &guarded.file_name,
            &guarded.stem,
        )?;
        progress.inc(1);

        out.write_all(template::NAMESPACE_CLOSE.as_bytes())?;
        Ok(())
    }

    fn append_bytecode<W: Write>(
        &self,
        exec: &dyn Executor,
        out: &mut W,
        command: &CommandSpec,
        path: &Path,
        file_name: &str,
        stem: &str,
    ) -> Result<(), RegenError> {
        out.write_all(template::artifact_prefix(file_name, stem).as_bytes())?;

        let codegen_failed = |message: String| RegenError::CodegenFailed {
            message,
            file: file_name.to_string(),
        };
        let cmd = command.with_path(path);
        let output = exec.output(&cmd).map_err(|e| {
            codegen_failed(format!(
                "{} ({}: {})",
                self.error_message,
                cmd.program.display(),
                e
            ))
        })?;
        if !output.success {
            return Err(codegen_failed(format!(
                "{} ({})",
                self.error_message,
                output.exit_description()
            )));
        }
        out.write_all(&output.stdout)?;
        Ok(())
    }

    /// Write the header to `path`, replacing any previous content.
    ///
    /// The file is closed on every exit path. A failing host binary leaves it
    /// partially written; the next successful run overwrites it.
    pub fn write_to(&self, exec: &dyn Executor, path: &Path) -> Result<(), RegenError> {
        let progress = ProgressBar::new(self.scripts.script_count() as u64);
        progress.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );

        let mut out = BufWriter::new(File::create(path)?);
        let result = self.render(exec, &mut out, &progress);
        progress.finish_and_clear();
        result?;
        out.flush()?;
        Ok(())
    }
}
