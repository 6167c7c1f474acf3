//! The interactive prompt.
//!
//! A line that leaves a construct open (an unclosed block, call or string)
//! is continued on the next line until the input parses or is abandoned
//! with Ctrl-C.

use carbon_eval::Value;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::diagnostics;
use crate::session::Session;

const PROMPT: &str = "carbon> ";
const CONTINUATION: &str = "   ...> ";
const SOURCE_NAME: &str = "<prompt>";

pub fn run(session: &mut Session, color: bool) -> Result<(), ReadlineError> {
    let mut editor = DefaultEditor::new()?;
    while let Some(input) = read_input(&mut editor)? {
        if input.trim().is_empty() {
            continue;
        }
        match session.run_prompt(&input) {
            Ok(results) => {
                for result in results {
                    match result {
                        Ok(Value::None) => {}
                        Ok(value) => println!("{value}"),
                        Err(err) => eprintln!("error: {err}"),
                    }
                }
            }
            Err(err) => eprint!(
                "{}",
                diagnostics::render_parse_error(SOURCE_NAME, &input, &err, color)
            ),
        }
    }
    Ok(())
}

/// One complete input, or `None` at end of input.
fn read_input(editor: &mut DefaultEditor) -> Result<Option<String>, ReadlineError> {
    let mut buffer = match editor.readline(PROMPT) {
        Ok(line) => line,
        Err(ReadlineError::Eof) => return Ok(None),
        Err(ReadlineError::Interrupted) => return Ok(Some(String::new())),
        Err(err) => return Err(err),
    };
    while needs_continuation(&buffer) {
        match editor.readline(CONTINUATION) {
            Ok(line) => {
                buffer.push('\n');
                buffer.push_str(&line);
            }
            Err(ReadlineError::Interrupted) => return Ok(Some(String::new())),
            // run what there is and let the parser report it
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        }
    }
    let _ = editor.add_history_entry(buffer.as_str());
    Ok(Some(buffer))
}

/// Whether the input fails to parse only because it ends too early.
pub fn needs_continuation(input: &str) -> bool {
    matches!(carbon_parse::parse(input), Err(err) if err.incomplete)
}
