use std::fmt::{self, Display};

use alloy::primitives::{hex, Bytes, U256};

use crate::error::{Error, Result};

/// The EVM's maximum stack depth, used by [`Stack::default`].
pub const DEFAULT_STACK_LIMIT: usize = 1024;

/// The width of an EVM word in bytes.
pub const WORD_SIZE: usize = 32;

/// A single value held by the [`Stack`].
///
/// Opcode handlers either work on 256-bit words or on raw byte strings. Both representations
/// are stored as pushed, and converted on the way out by [`Value::to_uint`] and
/// [`Value::to_bytes`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    /// A 256-bit unsigned word.
    Int(U256),

    /// A big-endian byte string of at most [`WORD_SIZE`] bytes.
    Bytes(Bytes),
}

impl Value {
    /// Interprets the value as a 256-bit word. Byte strings are read big-endian.
    ///
    /// ```
    /// use evmext_vm::core::stack::Value;
    /// use alloy::primitives::U256;
    ///
    /// let value = Value::from(vec![0x01, 0x00]);
    /// assert_eq!(value.to_uint().unwrap(), U256::from(256));
    /// ```
    pub fn to_uint(&self) -> Result<U256> {
        match self {
            Value::Int(value) => Ok(*value),
            Value::Bytes(bytes) if bytes.len() > WORD_SIZE => {
                Err(Error::ValueTooLarge(bytes.len()))
            }
            Value::Bytes(bytes) => Ok(U256::from_be_slice(bytes)),
        }
    }

    /// Interprets the value as a byte string. Words are rendered as their canonical
    /// 32-byte big-endian encoding; byte strings are returned as pushed.
    ///
    /// ```
    /// use evmext_vm::core::stack::Value;
    /// use alloy::primitives::U256;
    ///
    /// let bytes = Value::from(U256::from(1)).to_bytes();
    /// assert_eq!(bytes.len(), 32);
    /// assert_eq!(bytes[31], 1);
    /// ```
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Value::Int(value) => Bytes::copy_from_slice(&value.to_be_bytes::<WORD_SIZE>()),
            Value::Bytes(bytes) => bytes.clone(),
        }
    }

    /// Fails with [`Error::ValueTooLarge`] if the value does not fit in a word.
    fn validate(&self) -> Result<()> {
        match self {
            Value::Bytes(bytes) if bytes.len() > WORD_SIZE => {
                Err(Error::ValueTooLarge(bytes.len()))
            }
            _ => Ok(()),
        }
    }
}

impl From<U256> for Value {
    fn from(value: U256) -> Self {
        Value::Int(value)
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes.into())
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(bytes))
    }
}

impl TryFrom<Value> for U256 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value.to_uint()
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{value:#x}"),
            Value::Bytes(bytes) => write!(f, "{}", hex::encode_prefixed(bytes)),
        }
    }
}

/// The [`Stack`] struct represents the EVM stack.
/// It is a LIFO data structure over [`Value`]s, bounded by a configured maximum depth.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Stack {
    /// The values on the stack. The last element is the top of the stack.
    items: Vec<Value>,

    /// The maximum number of values the stack may hold.
    max_depth: usize,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new(DEFAULT_STACK_LIMIT)
    }
}

impl Stack {
    /// Creates a new, empty [`Stack`] holding at most `max_depth` values.
    ///
    /// ```
    /// use evmext_vm::core::stack::Stack;
    ///
    /// let stack = Stack::new(1024);
    /// assert_eq!(stack.len(), 0);
    /// assert_eq!(stack.max_depth(), 1024);
    /// ```
    pub fn new(max_depth: usize) -> Stack {
        Stack { items: Vec::with_capacity(max_depth.min(DEFAULT_STACK_LIMIT)), max_depth }
    }

    /// Push a value onto the stack.
    ///
    /// ```
    /// use evmext_vm::{core::stack::{Stack, Value}, error::Error};
    /// use alloy::primitives::U256;
    ///
    /// let mut stack = Stack::new(1);
    /// stack.push(Value::from(U256::from(7))).unwrap();
    /// assert_eq!(stack.push(Value::from(U256::ZERO)), Err(Error::StackOverflow { limit: 1 }));
    /// ```
    pub fn push(&mut self, value: Value) -> Result<()> {
        value.validate()?;
        if self.items.len() >= self.max_depth {
            return Err(Error::StackOverflow { limit: self.max_depth });
        }
        self.items.push(value);
        Ok(())
    }

    /// Push a word onto the stack.
    pub fn push_int(&mut self, value: U256) -> Result<()> {
        self.push(Value::Int(value))
    }

    /// Push a byte string onto the stack. Fails with [`Error::ValueTooLarge`] for strings
    /// longer than [`WORD_SIZE`].
    pub fn push_bytes(&mut self, bytes: impl Into<Bytes>) -> Result<()> {
        self.push(Value::Bytes(bytes.into()))
    }

    /// Pop a value off the stack.
    ///
    /// ```
    /// use evmext_vm::core::stack::Stack;
    /// use alloy::primitives::U256;
    ///
    /// let mut stack = Stack::default();
    /// stack.push_int(U256::from(1)).unwrap();
    /// stack.push_int(U256::from(2)).unwrap();
    ///
    /// assert_eq!(stack.pop_int().unwrap(), U256::from(2));
    /// assert_eq!(stack.pop_int().unwrap(), U256::from(1));
    /// assert!(stack.pop().is_err());
    /// ```
    pub fn pop(&mut self) -> Result<Value> {
        self.items.pop().ok_or(Error::StackUnderflow { needed: 1, available: 0 })
    }

    /// Pop a value off the stack, interpreted as a word.
    pub fn pop_int(&mut self) -> Result<U256> {
        self.pop()?.to_uint()
    }

    /// Pop a value off the stack, interpreted as a byte string.
    pub fn pop_bytes(&mut self) -> Result<Bytes> {
        Ok(self.pop()?.to_bytes())
    }

    /// Pop n values off the stack, top first. Nothing is removed if the stack holds fewer
    /// than n values.
    ///
    /// ```
    /// use evmext_vm::core::stack::Stack;
    /// use alloy::primitives::U256;
    ///
    /// let mut stack = Stack::default();
    /// stack.push_int(U256::from(0x00)).unwrap();
    /// stack.push_int(U256::from(0x01)).unwrap();
    /// stack.push_int(U256::from(0x02)).unwrap();
    ///
    /// // stack is now [0x02, 0x01, 0x00]
    /// let values = stack.pop_n(2).unwrap();
    /// assert_eq!(values[0].to_uint().unwrap(), U256::from(0x02));
    /// assert_eq!(values[1].to_uint().unwrap(), U256::from(0x01));
    ///
    /// // stack is now [0x00]
    /// assert!(stack.pop_n(2).is_err());
    /// assert_eq!(stack.len(), 1);
    /// ```
    pub fn pop_n(&mut self, n: usize) -> Result<Vec<Value>> {
        let split = self.depth_below(n)?;
        Ok(self.items.drain(split..).rev().collect())
    }

    /// Pop n values off the stack as words, top first.
    pub fn pop_ints(&mut self, n: usize) -> Result<Vec<U256>> {
        let split = self.depth_below(n)?;

        // validate before draining so a failed conversion leaves the stack untouched
        let values =
            self.items[split..].iter().rev().map(Value::to_uint).collect::<Result<Vec<_>>>()?;
        self.items.truncate(split);
        Ok(values)
    }

    /// Peek at the top value on the stack.
    pub fn peek(&self) -> Result<&Value> {
        self.items.last().ok_or(Error::StackUnderflow { needed: 1, available: 0 })
    }

    /// Peek at the value `index` positions below the top of the stack.
    ///
    /// ```
    /// use evmext_vm::core::stack::Stack;
    /// use alloy::primitives::U256;
    ///
    /// let mut stack = Stack::default();
    /// stack.push_int(U256::from(1)).unwrap();
    /// stack.push_int(U256::from(2)).unwrap();
    ///
    /// assert_eq!(stack.peek_at(1).unwrap().to_uint().unwrap(), U256::from(1));
    /// assert!(stack.peek_at(2).is_err());
    /// ```
    pub fn peek_at(&self, index: usize) -> Result<&Value> {
        let position = self.position_of(index)?;
        Ok(&self.items[position])
    }

    /// Gets the top n values of the stack, top first, without removing them.
    pub fn peek_n(&self, n: usize) -> Result<Vec<&Value>> {
        let split = self.depth_below(n)?;
        Ok(self.items[split..].iter().rev().collect())
    }

    /// Duplicate the nth value on the stack (1 is the top), as DUPn does.
    ///
    /// ```
    /// use evmext_vm::core::stack::Stack;
    /// use alloy::primitives::U256;
    ///
    /// let mut stack = Stack::default();
    /// stack.push_int(U256::from(1)).unwrap();
    /// stack.push_int(U256::from(2)).unwrap();
    ///
    /// // stack is now [2, 1]
    /// stack.dup(2).unwrap();
    ///
    /// // stack is now [1, 2, 1]
    /// assert_eq!(stack.pop_int().unwrap(), U256::from(1));
    /// ```
    pub fn dup(&mut self, n: usize) -> Result<()> {
        if n == 0 {
            return Err(Error::StackUnderflow { needed: 1, available: self.items.len() });
        }
        let position = self.depth_below(n)?;
        let value = self.items[position].clone();
        self.push(value)
    }

    /// Swap the top value and the value n positions below it, as SWAPn does.
    ///
    /// ```
    /// use evmext_vm::core::stack::Stack;
    /// use alloy::primitives::U256;
    ///
    /// let mut stack = Stack::default();
    /// stack.push_int(U256::from(0x00)).unwrap();
    /// stack.push_int(U256::from(0x01)).unwrap();
    ///
    /// // stack is now [0x01, 0x00]
    /// stack.swap(1).unwrap();
    ///
    /// // stack is now [0x00, 0x01]
    /// assert_eq!(stack.pop_int().unwrap(), U256::from(0x00));
    /// assert_eq!(stack.pop_int().unwrap(), U256::from(0x01));
    /// ```
    pub fn swap(&mut self, n: usize) -> Result<()> {
        if n == 0 {
            return Err(Error::StackUnderflow { needed: 2, available: self.items.len() });
        }
        let other = self.position_of(n)?;
        let top = self.items.len() - 1;
        self.items.swap(top, other);
        Ok(())
    }

    /// Get the number of values on the stack.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The maximum number of values the stack may hold.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Iterate over the values on the stack, top first.
    pub fn iter(&self) -> impl Iterator<Item = &Value> + '_ {
        self.items.iter().rev()
    }

    /// The index into `items` below which `n` values from the top sit.
    fn depth_below(&self, n: usize) -> Result<usize> {
        self.items
            .len()
            .checked_sub(n)
            .ok_or(Error::StackUnderflow { needed: n, available: self.items.len() })
    }

    /// The index into `items` of the value `index` positions below the top.
    fn position_of(&self, index: usize) -> Result<usize> {
        let needed = index
            .checked_add(1)
            .ok_or(Error::StackUnderflow { needed: usize::MAX, available: self.items.len() })?;
        self.depth_below(needed)
    }
}

impl Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = String::new();
        for value in self.iter() {
            stack.push_str(&format!("{value}, "));
        }
        write!(f, "[{}]", stack.trim_end_matches(", "))
    }
}
