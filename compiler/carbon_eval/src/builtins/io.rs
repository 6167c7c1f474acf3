//! `print` and bit-granular file access.
//!
//! Files are addressed in bits: bit `i` of a file is bit `i % 8` (least
//! significant first) of byte `i / 8`. Reads and writes touch only the
//! bytes the bit range straddles; a write preserves the bits around its
//! range within the first and last byte.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use carbon_bits::BitSequence;
use carbon_patterns::{integer_overflow, io_error, CallContext, EvalError, EvalResult, NativeFn, Value};

use super::{bits_arg, check_arity, count_arg, string_arg};
use crate::repetition::checked_len;

pub(super) const FUNCTIONS: &[(&str, NativeFn)] = &[("print", print), ("read", read), ("write", write)];

/// Display forms of all arguments, separated by spaces, as one line.
fn print(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let line = args
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    ctx.print_line(&line);
    Ok(Value::None)
}

/// Bytes `first..last` covering bits `offset..offset + size`, as the first
/// byte and the byte count.
fn byte_span(offset: usize, size: usize) -> Result<(u64, usize), EvalError> {
    let end = offset
        .checked_add(size)
        .ok_or_else(|| integer_overflow("bit offset"))?;
    let first = offset / 8;
    Ok((first as u64, end.div_ceil(8) - first))
}

/// `read(size, file)` or `read(size, offset, file)`.
fn read(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("read", args, 2..=3)?;
    let size = count_arg(&args[0])?;
    let offset = if args.len() == 3 { count_arg(&args[1])? } else { 0 };
    let path = string_arg(&args[args.len() - 1])?;
    Ok(Value::bits(read_bits(Path::new(path), offset, size)?))
}

fn read_bits(path: &Path, offset: usize, size: usize) -> Result<BitSequence, EvalError> {
    let mut file = File::open(path).map_err(|err| io_error(&err))?;
    if size == 0 {
        return Ok(BitSequence::new());
    }
    checked_len(1, size, "read size")?;
    let (start, len) = byte_span(offset, size)?;
    let mut bytes = vec![0u8; len];
    file.seek(SeekFrom::Start(start))
        .and_then(|_| file.read_exact(&mut bytes))
        .map_err(|err| {
            if err.kind() == io::ErrorKind::UnexpectedEof {
                EvalError::new(format!(
                    "cannot read {size} bits at bit offset {offset}: file is too short"
                ))
            } else {
                io_error(&err)
            }
        })?;
    Ok(BitSequence::from_bytes(&bytes).subseq(offset % 8, size)?)
}

/// `write(bits, file)` or `write(bits, offset, file)`. Creates the file if
/// missing and returns the number of bits written.
fn write(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("write", args, 2..=3)?;
    let bits = bits_arg(&args[0])?;
    let offset = if args.len() == 3 { count_arg(&args[1])? } else { 0 };
    let path = string_arg(&args[args.len() - 1])?;
    write_bits(Path::new(path), offset, bits)?;
    Ok(Value::Integer(bits.len() as i64))
}

fn write_bits(path: &Path, offset: usize, bits: &BitSequence) -> Result<(), EvalError> {
    if bits.is_empty() {
        return Ok(());
    }
    let (start, len) = byte_span(offset, bits.len())?;
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|err| io_error(&err))?;

    // existing bytes under the range; anything past the end reads as zero
    let mut existing = vec![0u8; len];
    file.seek(SeekFrom::Start(start)).map_err(|err| io_error(&err))?;
    let mut filled = 0;
    while filled < len {
        match file.read(&mut existing[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(io_error(&err)),
        }
    }

    let shift = offset % 8;
    let around = BitSequence::from_bytes(&existing);
    let prefix = around.head(shift)?;
    let suffix = around.subseq(shift + bits.len(), len * 8 - shift - bits.len())?;
    let merged = prefix.concat(bits).concat(&suffix);

    file.seek(SeekFrom::Start(start))
        .and_then(|_| file.write_all(&merged.to_bytes()))
        .map_err(|err| io_error(&err))
}
