//! Discovery of the library scripts compiled into the header.

use crate::error::RegenError;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A `<module>_<method>.js` builtin script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceScript {
    pub file_name: String,
    pub path: PathBuf,
    pub module: String,
    pub method: String,
}

impl SourceScript {
    /// Parse a builtin script name. The stem must split on `_` into exactly
    /// two non-empty parts.
    pub fn parse(dir: &Path, file_name: &str, extension: &str) -> Result<Self, RegenError> {
        let malformed = || RegenError::MalformedScriptName {
            file: file_name.to_string(),
        };

        let stem = strip_extension(file_name, extension).ok_or_else(malformed)?;
        let parts: Vec<&str> = stem.split('_').collect();
        match parts.as_slice() {
            [module, method] if !module.is_empty() && !method.is_empty() => Ok(Self {
                file_name: file_name.to_string(),
                path: dir.join(file_name),
                module: module.to_string(),
                method: method.to_string(),
            }),
            _ => Err(malformed()),
        }
    }

    pub fn stem(&self) -> String {
        format!("{}_{}", self.module, self.method)
    }
}

/// The script that is kept out of the builtin list and emitted under its own guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedScript {
    pub file_name: String,
    pub path: PathBuf,
    pub stem: String,
}

/// Scripts of one library directory, builtins sorted by file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSet {
    pub builtins: Vec<SourceScript>,
    pub guarded: GuardedScript,
}

impl ScriptSet {
    /// Number of host binary invocations needed for one header.
    pub fn script_count(&self) -> usize {
        self.builtins.len() + 1
    }
}

fn strip_extension<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    file_name
        .strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
}

/// List `dir` (non-recursive), keep files with `extension`, sort them and
/// split off `excluded`.
pub fn discover(dir: &Path, extension: &str, excluded: &str) -> Result<ScriptSet, RegenError> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if strip_extension(&name, extension).is_some() {
            names.push(name);
        }
    }
    names.sort();

    let mut builtins = Vec::new();
    let mut guarded = None;
    for name in names {
        if name == excluded {
            let stem = strip_extension(&name, extension).unwrap_or(&name).to_string();
            guarded = Some(GuardedScript {
                path: dir.join(&name),
                file_name: name,
                stem,
            });
        } else {
            builtins.push(SourceScript::parse(dir, &name, extension)?);
        }
    }

    let guarded = guarded.ok_or_else(|| RegenError::MissingScript {
        file: excluded.to_string(),
        dir: dir.to_path_buf(),
    })?;

    Ok(ScriptSet { builtins, guarded })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn library(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for f in files {
            fs::write(dir.path().join(f), "// script").unwrap();
        }
        dir
    }

    #[test]
    fn test_parse_module_and_method() {
        let script = SourceScript::parse(Path::new("lib"), "mod_methodName.js", "js").unwrap();
        assert_eq!(script.module, "mod");
        assert_eq!(script.method, "methodName");
        assert_eq!(script.stem(), "mod_methodName");
        assert_eq!(script.path, PathBuf::from("lib/mod_methodName.js"));
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        for name in ["Array.js", "a_b_c.js", "_sort.js", "Array_.js"] {
            let err = SourceScript::parse(Path::new("lib"), name, "js").unwrap_err();
            assert!(
                matches!(err, RegenError::MalformedScriptName { ref file } if file == name),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_discover_sorts_and_filters() {
        let dir = library(&["b_two.js", "Intl.js", "a_one.js", "notes.txt", "c_three.jsx"]);
        let set = discover(dir.path(), "js", "Intl.js").unwrap();
        let names: Vec<&str> = set.builtins.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(names, vec!["a_one.js", "b_two.js"]);
        assert_eq!(set.guarded.file_name, "Intl.js");
        assert_eq!(set.guarded.stem, "Intl");
        assert_eq!(set.script_count(), 3);
    }

    #[test]
    fn test_discover_ignores_directories() {
        let dir = library(&["a_one.js", "Intl.js"]);
        fs::create_dir(dir.path().join("x_y.js")).unwrap();
        let set = discover(dir.path(), "js", "Intl.js").unwrap();
        assert_eq!(set.builtins.len(), 1);
    }

    #[test]
    fn test_discover_requires_guarded_script() {
        let dir = library(&["a_one.js"]);
        let err = discover(dir.path(), "js", "Intl.js").unwrap_err();
        assert!(matches!(err, RegenError::MissingScript { .. }));
    }

    #[test]
    fn test_discover_reports_malformed_name() {
        let dir = library(&["Intl.js", "broken.js"]);
        let err = discover(dir.path(), "js", "Intl.js").unwrap_err();
        assert!(err.to_string().contains("broken.js"));
    }
}
