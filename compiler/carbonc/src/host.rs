//! Globals the host provides before any user source runs.
//!
//! They are written through the instruction protocol like any other
//! source, as if the program began with
//!
//! ```text
//! arguments = ['arg0', 'arg1', ..];
//! environment = {'NAME': 'value', ..};
//! ```
//!
//! using raw string atoms, so no escaping is needed.

use carbon_ir::{InstructionKind, InstructionWriter};

pub fn write_bindings(
    out: &mut dyn InstructionWriter,
    arguments: &[String],
    environment: &[(String, String)],
) {
    out.write_atom(InstructionKind::Id, "arguments");
    out.write_instruction(InstructionKind::ArrayBegin);
    for arg in arguments {
        out.write_atom(InstructionKind::Str, arg);
    }
    out.write_instruction(InstructionKind::ArrayEnd);
    out.write_instruction(InstructionKind::Assign);
    out.write_instruction(InstructionKind::EndStatement);

    out.write_atom(InstructionKind::Id, "environment");
    out.write_instruction(InstructionKind::ObjectBegin);
    for (name, value) in environment {
        out.write_atom(InstructionKind::Str, name);
        out.write_atom(InstructionKind::Str, value);
    }
    out.write_instruction(InstructionKind::ObjectEnd);
    out.write_instruction(InstructionKind::Assign);
    out.write_instruction(InstructionKind::EndStatement);
}

/// The process environment as name/value pairs, each entry split at its
/// first `=`. Non-UTF-8 text is replaced lossily.
pub fn process_environment() -> Vec<(String, String)> {
    std::env::vars_os()
        .map(|(name, value)| {
            (
                name.to_string_lossy().into_owned(),
                value.to_string_lossy().into_owned(),
            )
        })
        .collect()
}
