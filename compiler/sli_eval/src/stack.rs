//! The operand stack.

use crate::errors::{self, SliResult};
use crate::value::{Name, TypeTag, Value};

/// Last-in-first-out data stack manipulated by primitives.
///
/// Positions passed to the accessors count from the top: `0` is the top.
/// Error messages report 1-based positions.
#[derive(Debug, Default)]
pub struct OperandStack {
    items: Vec<Value>,
}

impl OperandStack {
    pub fn new() -> Self {
        OperandStack::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    /// Fail with `StackUnderflow` unless at least `n` operands are present.
    #[inline]
    pub fn require(&self, n: usize) -> SliResult {
        if self.items.len() < n {
            return Err(errors::stack_underflow(n, self.items.len()));
        }
        Ok(())
    }

    pub fn pop(&mut self) -> SliResult<Value> {
        self.items.pop().ok_or_else(|| errors::stack_underflow(1, 0))
    }

    /// Pop `n` operands, returned deepest first.
    pub fn pop_n(&mut self, n: usize) -> SliResult<Vec<Value>> {
        self.require(n)?;
        Ok(self.items.split_off(self.items.len() - n))
    }

    /// Discard `n` operands.
    pub fn drop_n(&mut self, n: usize) -> SliResult {
        self.require(n)?;
        self.items.truncate(self.items.len() - n);
        Ok(())
    }

    /// Operand at `pos` (0 = top).
    #[inline]
    pub fn peek(&self, pos: usize) -> Option<&Value> {
        self.items.len().checked_sub(pos + 1).map(|i| &self.items[i])
    }

    pub fn peek_mut(&mut self, pos: usize) -> Option<&mut Value> {
        let i = self.items.len().checked_sub(pos + 1)?;
        self.items.get_mut(i)
    }

    /// Operand at `pos`, or `StackUnderflow`.
    pub fn pick(&self, pos: usize) -> SliResult<&Value> {
        self.peek(pos)
            .ok_or_else(|| errors::stack_underflow(pos + 1, self.items.len()))
    }

    /// Replace the operand at `pos`.
    pub fn set(&mut self, pos: usize, value: Value) -> SliResult {
        let len = self.items.len();
        let slot = self
            .peek_mut(pos)
            .ok_or_else(|| errors::stack_underflow(pos + 1, len))?;
        *slot = value;
        Ok(())
    }

    /// Type of the operand at `pos`.
    pub fn tag_at(&self, pos: usize) -> Option<TypeTag> {
        self.peek(pos).map(Value::type_tag)
    }

    // Typed accessors: check without consuming.

    pub fn int_at(&self, pos: usize) -> SliResult<i64> {
        let v = self.pick(pos)?;
        v.as_int()
            .ok_or_else(|| errors::argument_type(pos + 1, "an integer", v.type_tag()))
    }

    pub fn number_at(&self, pos: usize) -> SliResult<f64> {
        let v = self.pick(pos)?;
        v.as_number()
            .ok_or_else(|| errors::argument_type(pos + 1, "a number", v.type_tag()))
    }

    pub fn bool_at(&self, pos: usize) -> SliResult<bool> {
        let v = self.pick(pos)?;
        v.as_bool()
            .ok_or_else(|| errors::argument_type(pos + 1, "a boolean", v.type_tag()))
    }

    /// A literal or executable name.
    pub fn name_at(&self, pos: usize) -> SliResult<Name> {
        let v = self.pick(pos)?;
        v.as_name()
            .ok_or_else(|| errors::argument_type(pos + 1, "a name", v.type_tag()))
    }

    /// A non-negative integer usable as a count or index.
    pub fn count_at(&self, pos: usize) -> SliResult<usize> {
        let n = self.int_at(pos)?;
        usize::try_from(n).map_err(|_| errors::positive_integer_expected(n))
    }

    /// Copy of the operand at `pos` after checking its type.
    pub fn expect_at(&self, pos: usize, tag: TypeTag) -> SliResult<Value> {
        let v = self.pick(pos)?;
        if v.type_tag() != tag {
            return Err(errors::argument_type(pos + 1, tag.name(), v.type_tag()));
        }
        Ok(v.clone())
    }

    // Stack manipulation

    /// Push a copy of the operand at `pos` (`index`).
    pub fn index(&mut self, pos: usize) -> SliResult {
        let v = self.pick(pos)?.clone();
        self.items.push(v);
        Ok(())
    }

    /// Duplicate the top `n` operands (`copy`).
    pub fn copy_top(&mut self, n: usize) -> SliResult {
        self.require(n)?;
        let start = self.items.len() - n;
        self.items.extend_from_within(start..);
        Ok(())
    }

    /// Rotate the top `n` operands by `k` positions towards the top (`roll`).
    pub fn roll(&mut self, n: usize, k: i64) -> SliResult {
        self.require(n)?;
        if n == 0 {
            return Ok(());
        }
        let start = self.items.len() - n;
        let n_i64 = i64::try_from(n).map_err(|_| errors::range_check("roll count too large"))?;
        let shift = usize::try_from(k.rem_euclid(n_i64)).unwrap_or(0);
        self.items[start..].rotate_right(shift);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of operands above the nearest mark.
    pub fn count_to_mark(&self) -> Option<usize> {
        self.items
            .iter()
            .rev()
            .position(|v| matches!(v, Value::Mark))
    }

    /// Pop the operands above the nearest mark and the mark itself,
    /// returning the operands deepest first.
    pub fn take_to_mark(&mut self) -> SliResult<Vec<Value>> {
        let n = self.count_to_mark().ok_or_else(errors::unmatched_marker)?;
        let values = self.items.split_off(self.items.len() - n);
        self.items.pop();
        Ok(values)
    }

    /// Operands bottom to top.
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Value> {
        self.items.iter()
    }
}
