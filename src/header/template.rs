//! Fixed text of the generated bytecode header.
//!
//! Every byte here ends up in checked-in files, so any edit shows up as
//! drift on the next `--verify` run.

use super::scripts::SourceScript;

pub const PREAMBLE: &str = r#"//-------------------------------------------------------------------------------------------------------
// Copyright (C) Microsoft. All rights reserved.
// Copyright (c) 2021 ChakraCore Project Contributors. All rights reserved.
// Licensed under the MIT license. See LICENSE.txt file in the project root for full license information.
//-------------------------------------------------------------------------------------------------------

// Generated Bytecode Header, this file was created by tools/regenByteCode.py
// This file contains:
// a) bytecode for Intl library methods implemented in javascript and
// b) bytecode for other Js library methods, JsBuiltIns, implemented in javascript

#define JsBuiltIns(VALUE)"#;

pub const NAMESPACE_OPEN: &str = "\n\nnamespace js\n{\n\n#ifdef ENABLE_JS_BUILTINS\n\n";

pub const GUARD_SWITCH: &str = "#endif\n\n#ifdef ENABLE_INTL_OBJECT\n\n";

pub const NAMESPACE_CLOSE: &str = "#endif\n\n}\n";

/// One continuation line of the `JsBuiltIns(VALUE)` macro.
pub fn macro_entry(script: &SourceScript) -> String {
    format!(
        " \\\nVALUE({}, {}, {}{})",
        script.module,
        script.method,
        script.module,
        title_case(&script.method)
    )
}

/// Comment and declaration that the binary's output completes.
pub fn artifact_prefix(file_name: &str, stem: &str) -> String {
    format!(
        "//Bytecode generated from {}\nconst char Library_Bytecode_{}",
        file_name, stem
    )
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
