use std::{
    cell::Cell,
    fmt::{self, Display},
    iter::FusedIterator,
    ops::Deref,
};

use alloy::primitives::Bytes;
use once_cell::unsync::OnceCell;
use serde_json::Value as JsonValue;
use tracing::debug;
#[cfg(feature = "step-tracing")]
use tracing::trace;

use crate::{
    core::opcodes::{self, push_size},
    error::{Error, Result},
};

/// The [`CodeStream`] struct walks a contract's bytecode for the opcode dispatcher.
///
/// It owns the immutable code, a program counter, and a lazily built classification of which
/// positions start an instruction and which are immediate data of a preceding `PUSHn`.
///
/// The program counter lives in a [`Cell`], so every operation that moves it only needs a
/// shared reference. This lets a jump handler redirect control flow while an [`Opcodes`]
/// iterator over the same stream is alive, and the iterator picks up the new position on its
/// next step. A [`CodeStream`] is owned by a single execution frame and is not [`Sync`].
#[derive(Clone, Debug, Default)]
pub struct CodeStream {
    /// The raw bytecode.
    code: Bytes,

    /// The offset of the next opcode to execute. Always within `0..=code.len()`.
    program_counter: Cell<usize>,

    /// One entry per code position, `true` when the position starts an instruction.
    /// Built on the first validity query.
    valid_positions: OnceCell<Box<[bool]>>,
}

impl CodeStream {
    /// Creates a new [`CodeStream`] over the given bytecode, with the program counter at `0`.
    ///
    /// ```
    /// use evmext_vm::core::code_stream::CodeStream;
    ///
    /// let stream = CodeStream::new(vec![0x60, 0x01, 0x00]);
    /// assert_eq!(stream.len(), 3);
    /// assert_eq!(stream.program_counter(), 0);
    /// ```
    pub fn new(code: impl Into<Bytes>) -> CodeStream {
        CodeStream {
            code: code.into(),
            program_counter: Cell::new(0),
            valid_positions: OnceCell::new(),
        }
    }

    /// Total number of bytes in the code.
    #[inline]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Whether the code is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// The raw bytecode.
    #[inline]
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// Returns the byte at `position` without moving the program counter.
    ///
    /// ```
    /// use evmext_vm::core::code_stream::CodeStream;
    ///
    /// let stream = CodeStream::new(vec![0x01, 0x02, 0x30]);
    /// assert_eq!(stream.index(2).unwrap(), 0x30);
    /// assert!(stream.index(3).is_err());
    /// ```
    pub fn index(&self, position: usize) -> Result<u8> {
        self.code
            .get(position)
            .copied()
            .ok_or(Error::OutOfRange { position, length: self.code.len() })
    }

    /// The current program counter.
    #[inline]
    pub fn program_counter(&self) -> usize {
        self.program_counter.get()
    }

    /// Moves the program counter. Values past the end of the code are clamped to the end,
    /// which behaves as an exhausted stream.
    #[inline]
    pub fn set_program_counter(&self, program_counter: usize) {
        self.program_counter.set(program_counter.min(self.code.len()));
    }

    /// Reads up to `size` bytes starting at the program counter and advances the program
    /// counter past them. Returns fewer bytes (possibly none) near the end of the code.
    ///
    /// ```
    /// use evmext_vm::core::code_stream::CodeStream;
    ///
    /// let stream = CodeStream::new(b"code".to_vec());
    /// assert_eq!(stream.read(2), b"co");
    /// assert_eq!(stream.read(8), b"de");
    /// assert_eq!(stream.read(1), b"");
    /// assert_eq!(stream.program_counter(), 4);
    /// ```
    pub fn read(&self, size: usize) -> &[u8] {
        let start = self.program_counter.get();
        let end = start.saturating_add(size).min(self.code.len());
        self.program_counter.set(end);
        &self.code[start..end]
    }

    /// Returns the opcode at the program counter and advances by one, or [`opcodes::STOP`]
    /// without advancing once the end of the code is reached.
    ///
    /// ```
    /// use evmext_vm::core::{code_stream::CodeStream, opcodes};
    ///
    /// let stream = CodeStream::new(vec![opcodes::ADD]);
    /// assert_eq!(stream.next_opcode(), opcodes::ADD);
    /// assert_eq!(stream.next_opcode(), opcodes::STOP);
    /// assert_eq!(stream.next_opcode(), opcodes::STOP);
    /// assert_eq!(stream.program_counter(), 1);
    /// ```
    #[inline]
    pub fn next_opcode(&self) -> u8 {
        let pc = self.program_counter.get();
        match self.code.get(pc) {
            Some(&opcode) => {
                self.program_counter.set(pc + 1);

                #[cfg(feature = "step-tracing")]
                trace!(pc, opcode = opcodes::opcode_name(opcode), "fetched opcode");

                opcode
            }
            None => opcodes::STOP,
        }
    }

    /// Returns what [`CodeStream::next_opcode`] would return, without moving the program
    /// counter.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.code.get(self.program_counter.get()).copied().unwrap_or(opcodes::STOP)
    }

    /// Returns an iterator of opcodes driven by this stream's program counter.
    ///
    /// ```
    /// use evmext_vm::core::{code_stream::CodeStream, opcodes};
    ///
    /// let stream = CodeStream::new(vec![opcodes::ADD, opcodes::MUL]);
    /// let ops: Vec<u8> = stream.iter().collect();
    /// assert_eq!(ops, vec![opcodes::ADD, opcodes::MUL, opcodes::STOP]);
    /// ```
    pub fn iter(&self) -> Opcodes<'_> {
        Opcodes { stream: self, exhausted: false }
    }

    /// Whether `position` starts an instruction, i.e. is not immediate data of a `PUSHn`.
    /// Positions at or past the end of the code are never valid.
    ///
    /// The first call scans the whole code once. Every later call is a table lookup.
    ///
    /// ```
    /// use evmext_vm::core::code_stream::CodeStream;
    ///
    /// let stream = CodeStream::new(vec![0x02, 0x60, 0x02, 0x04]);
    /// assert!(stream.is_valid_opcode(1));
    /// assert!(!stream.is_valid_opcode(2));
    /// assert!(stream.is_valid_opcode(3));
    /// assert!(!stream.is_valid_opcode(4));
    /// ```
    #[inline]
    pub fn is_valid_opcode(&self, position: usize) -> bool {
        self.valid_positions().get(position).copied().unwrap_or(false)
    }

    /// Returns every position holding a `JUMPDEST` that is a valid instruction start, in
    /// ascending order.
    pub fn jump_destinations(&self) -> impl Iterator<Item = usize> + '_ {
        self.code.iter().enumerate().filter_map(|(position, &opcode)| {
            (opcode == opcodes::JUMPDEST && self.is_valid_opcode(position)).then_some(position)
        })
    }

    /// Temporarily moves the program counter to `program_counter`.
    ///
    /// The previous program counter is restored when the returned [`SeekGuard`] is dropped,
    /// whichever way the enclosing scope is left. Guards may be nested, each one restoring the
    /// position it replaced.
    ///
    /// ```
    /// use evmext_vm::core::code_stream::CodeStream;
    ///
    /// let stream = CodeStream::new(vec![0x01, 0x02, 0x30]);
    /// {
    ///     let stream = stream.seek(1);
    ///     assert_eq!(stream.next_opcode(), 0x02);
    /// }
    /// assert_eq!(stream.program_counter(), 0);
    /// ```
    pub fn seek(&self, program_counter: usize) -> SeekGuard<'_> {
        let anchor = self.program_counter.get();
        self.set_program_counter(program_counter);
        SeekGuard { stream: self, anchor }
    }

    fn valid_positions(&self) -> &[bool] {
        self.valid_positions.get_or_init(|| analyze_valid_positions(&self.code))
    }
}

/// Walks the code once, marking the immediate data of every reachable `PUSHn` as invalid.
/// Operands of a push truncated by the end of the code are clipped to the code length.
fn analyze_valid_positions(code: &[u8]) -> Box<[bool]> {
    let mut valid = vec![true; code.len()].into_boxed_slice();
    let mut invalidated = 0usize;
    let mut position = 0;

    while position < code.len() {
        match push_size(code[position]) {
            Some(size) => {
                let end = position.saturating_add(size + 1).min(code.len());
                valid[position + 1..end].fill(false);
                invalidated += end - position - 1;
                position += size + 1;
            }
            None => position += 1,
        }
    }

    debug!(length = code.len(), invalidated, "built jump destination table");
    valid
}

impl Display for CodeStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CodeStream(pc={}, len={})", self.program_counter.get(), self.code.len())
    }
}

impl From<Vec<u8>> for CodeStream {
    fn from(code: Vec<u8>) -> Self {
        CodeStream::new(code)
    }
}

impl From<Bytes> for CodeStream {
    fn from(code: Bytes) -> Self {
        CodeStream::new(code)
    }
}

impl TryFrom<&JsonValue> for CodeStream {
    type Error = Error;

    /// Builds a [`CodeStream`] from a dynamically typed value. Only an array whose elements
    /// are all integers in `0..=255` is accepted.
    ///
    /// ```
    /// use evmext_vm::{core::code_stream::CodeStream, error::Error};
    /// use serde_json::json;
    ///
    /// let stream = CodeStream::try_from(&json!([2, 96, 2])).unwrap();
    /// assert_eq!(stream.code(), &[0x02, 0x60, 0x02]);
    ///
    /// assert!(matches!(CodeStream::try_from(&json!("1010")), Err(Error::InvalidCodeInput(_))));
    /// ```
    fn try_from(value: &JsonValue) -> Result<Self> {
        let elements = match value {
            JsonValue::Array(elements) => elements,
            other => {
                return Err(Error::InvalidCodeInput(format!(
                    "expected a byte sequence, got {}",
                    json_kind(other)
                )))
            }
        };

        let code = elements
            .iter()
            .enumerate()
            .map(|(i, element)| {
                element.as_u64().and_then(|byte| u8::try_from(byte).ok()).ok_or_else(|| {
                    Error::InvalidCodeInput(format!("element {i} is not a byte: {element}"))
                })
            })
            .collect::<Result<Vec<u8>>>()?;

        Ok(CodeStream::new(code))
    }
}

impl TryFrom<JsonValue> for CodeStream {
    type Error = Error;

    fn try_from(value: JsonValue) -> Result<Self> {
        CodeStream::try_from(&value)
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// An iterator over the opcodes of a [`CodeStream`], equivalent to repeated calls to
/// [`CodeStream::next_opcode`].
///
/// The iterator holds a reference to the stream rather than a copy of its position, so any
/// change made to the program counter between two steps is honored by the next step. It
/// yields a single trailing [`opcodes::STOP`] once the code is exhausted, then ends.
#[derive(Debug, Clone)]
pub struct Opcodes<'a> {
    stream: &'a CodeStream,
    exhausted: bool,
}

impl<'a> Opcodes<'a> {
    /// The stream driving this iterator.
    pub fn stream(&self) -> &'a CodeStream {
        self.stream
    }
}

impl Iterator for Opcodes<'_> {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        if self.exhausted {
            return None;
        }

        let pc = self.stream.program_counter.get();
        match self.stream.code.get(pc) {
            Some(&opcode) => {
                self.stream.program_counter.set(pc + 1);
                Some(opcode)
            }
            None => {
                self.exhausted = true;
                Some(opcodes::STOP)
            }
        }
    }
}

impl FusedIterator for Opcodes<'_> {}

impl<'a> IntoIterator for &'a CodeStream {
    type Item = u8;
    type IntoIter = Opcodes<'a>;

    fn into_iter(self) -> Opcodes<'a> {
        self.iter()
    }
}

/// Restores a [`CodeStream`]'s program counter when dropped. Returned by
/// [`CodeStream::seek`], and dereferences to the stream it guards.
#[derive(Debug)]
#[must_use = "the program counter is restored as soon as the guard is dropped"]
pub struct SeekGuard<'a> {
    stream: &'a CodeStream,
    anchor: usize,
}

impl SeekGuard<'_> {
    /// The program counter that will be restored on drop.
    pub fn anchor(&self) -> usize {
        self.anchor
    }
}

impl Deref for SeekGuard<'_> {
    type Target = CodeStream;

    fn deref(&self) -> &CodeStream {
        self.stream
    }
}

impl Drop for SeekGuard<'_> {
    fn drop(&mut self) {
        self.stream.program_counter.set(self.anchor);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        core::{code_stream::CodeStream, opcodes},
        error::Error,
    };

    #[test]
    fn test_index_does_not_move_program_counter() {
        let stream = CodeStream::new(vec![0x01, 0x02, 0x30]);
        assert_eq!(stream.index(0), Ok(opcodes::ADD));
        assert_eq!(stream.index(1), Ok(opcodes::MUL));
        assert_eq!(stream.index(2), Ok(opcodes::ADDRESS));
        assert_eq!(stream.index(3), Err(Error::OutOfRange { position: 3, length: 3 }));
        assert_eq!(stream.program_counter(), 0);
    }

    #[test]
    fn test_read_clips_at_end() {
        let stream = CodeStream::new(b"code".to_vec());
        assert_eq!(stream.len(), 4);
        assert_eq!(stream.read(2), b"co");
        assert_eq!(stream.program_counter(), 2);
        assert_eq!(stream.read(5), b"de");
        assert_eq!(stream.program_counter(), 4);
        assert!(stream.read(3).is_empty());
        assert_eq!(stream.program_counter(), 4);
        assert!(stream.read(usize::MAX).is_empty());
    }

    #[test]
    fn test_peek_matches_next() {
        let stream = CodeStream::new(vec![0x01, 0x02, 0x30]);
        for _ in 0..5 {
            let peeked = stream.peek();
            assert_eq!(stream.peek(), peeked);
            assert_eq!(stream.next_opcode(), peeked);
        }
        assert_eq!(stream.program_counter(), 3);
    }

    #[test]
    fn test_set_program_counter_clamps() {
        let stream = CodeStream::new(vec![0x01, 0x02]);
        stream.set_program_counter(100);
        assert_eq!(stream.program_counter(), 2);
        assert_eq!(stream.peek(), opcodes::STOP);
    }

    #[test]
    fn test_iterator_observes_jumps_between_steps() {
        // ADD, JUMPDEST, MUL, ADDRESS
        let stream = CodeStream::new(vec![0x01, 0x5b, 0x02, 0x30]);
        let mut iter = stream.iter();

        assert_eq!(iter.next(), Some(opcodes::ADD));
        stream.set_program_counter(3);
        assert_eq!(iter.next(), Some(opcodes::ADDRESS));
        stream.set_program_counter(1);
        assert_eq!(iter.next(), Some(opcodes::JUMPDEST));
        assert_eq!(iter.next(), Some(opcodes::MUL));
        assert_eq!(iter.next(), Some(opcodes::ADDRESS));
        assert_eq!(iter.next(), Some(opcodes::STOP));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_empty_code() {
        let stream = CodeStream::default();
        assert!(stream.is_empty());
        assert_eq!(stream.iter().collect::<Vec<_>>(), vec![opcodes::STOP]);
        assert!(!stream.is_valid_opcode(0));
        assert_eq!(stream.jump_destinations().count(), 0);
    }

    #[test]
    fn test_push0_has_no_immediate() {
        let stream = CodeStream::new(vec![opcodes::PUSH0, opcodes::JUMPDEST]);
        assert!(stream.is_valid_opcode(0));
        assert!(stream.is_valid_opcode(1));
    }

    #[test]
    fn test_jump_destinations_skip_push_data() {
        // PUSH1 0x5b, JUMPDEST, PUSH2 0x5b 0x5b, JUMPDEST
        let stream = CodeStream::new(vec![0x60, 0x5b, 0x5b, 0x61, 0x5b, 0x5b, 0x5b]);
        assert_eq!(stream.jump_destinations().collect::<Vec<_>>(), vec![2, 6]);
    }

    #[test]
    fn test_nested_seek_restores_in_order() {
        let stream = CodeStream::new(vec![0x01, 0x02, 0x30, 0x5b]);
        stream.set_program_counter(1);
        {
            let outer = stream.seek(2);
            assert_eq!(outer.anchor(), 1);
            {
                let inner = outer.seek(3);
                assert_eq!(inner.program_counter(), 3);
                assert_eq!(inner.next_opcode(), opcodes::JUMPDEST);
            }
            assert_eq!(stream.program_counter(), 2);
        }
        assert_eq!(stream.program_counter(), 1);
    }

    #[test]
    fn test_json_rejects_non_byte_values() {
        for value in [
            json!(1010),
            json!("1010"),
            json!(true),
            json!(null),
            json!({ "code": [1] }),
            json!([1, 256]),
            json!([1, -1]),
            json!([1, "2"]),
            json!([1.5]),
        ] {
            assert!(
                matches!(CodeStream::try_from(&value), Err(Error::InvalidCodeInput(_))),
                "accepted {value}"
            );
        }
    }

    #[test]
    fn test_json_accepts_byte_arrays() {
        let stream = CodeStream::try_from(json!([0, 255])).expect("valid bytes");
        assert_eq!(stream.code(), &[0x00, 0xff]);

        let stream = CodeStream::try_from(json!([])).expect("valid bytes");
        assert!(stream.is_empty());
    }

    #[test]
    fn test_display() {
        let stream = CodeStream::new(vec![0x01, 0x02]);
        stream.next_opcode();
        assert_eq!(stream.to_string(), "CodeStream(pc=1, len=2)");
    }
}
