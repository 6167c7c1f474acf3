//! An in-memory instruction stream.
//!
//! The front end writes a whole compilation unit into an
//! [`InstructionBuffer`] first, so a syntax error late in the source never
//! leaves half of it executed. The buffer is then replayed into the real
//! sink with [`transfer`].

use std::fmt;

use crate::instruction::{Instruction, InstructionKind, InstructionReader, InstructionWriter};

/// A recorded instruction stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstructionBuffer {
    instructions: Vec<Instruction>,
}

impl InstructionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn clear(&mut self) {
        self.instructions.clear();
    }

    /// A pull-based cursor over the recorded instructions.
    pub fn reader(&self) -> BufferReader<'_> {
        BufferReader {
            instructions: &self.instructions,
            position: None,
        }
    }

    /// Replay every instruction into `writer`.
    pub fn replay(&self, writer: &mut dyn InstructionWriter) {
        transfer(&mut self.reader(), writer);
    }
}

impl InstructionWriter for InstructionBuffer {
    fn write_instruction(&mut self, kind: InstructionKind) {
        self.instructions.push(Instruction::bare(kind));
    }

    fn write_atom(&mut self, kind: InstructionKind, text: &str) {
        self.instructions.push(Instruction::atom(kind, text));
    }
}

impl fmt::Display for InstructionBuffer {
    /// One instruction per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{instruction}")?;
        }
        Ok(())
    }
}

/// Cursor returned by [`InstructionBuffer::reader`].
///
/// Starts before the first instruction; call `move_next` first.
pub struct BufferReader<'a> {
    instructions: &'a [Instruction],
    position: Option<usize>,
}

impl BufferReader<'_> {
    fn current(&self) -> &Instruction {
        match self.position.and_then(|i| self.instructions.get(i)) {
            Some(instruction) => instruction,
            None => panic!("implementation error: instruction read outside the stream"),
        }
    }
}

impl InstructionReader for BufferReader<'_> {
    fn move_next(&mut self) -> bool {
        let next = self.position.map_or(0, |i| i + 1);
        self.position = Some(next.min(self.instructions.len()));
        next < self.instructions.len()
    }

    fn kind(&self) -> InstructionKind {
        self.current().kind
    }

    fn text(&self) -> &str {
        self.current().text.as_deref().unwrap_or("")
    }
}

/// Pump every remaining instruction from `reader` into `writer`, consulting
/// `requires_text` to decide whether string data is forwarded.
pub fn transfer(reader: &mut dyn InstructionReader, writer: &mut dyn InstructionWriter) {
    while reader.move_next() {
        let kind = reader.kind();
        if kind.requires_text() {
            writer.write_atom(kind, reader.text());
        } else {
            writer.write_instruction(kind);
        }
    }
}
