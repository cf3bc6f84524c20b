use gleaner_model::{Context, LoaderError, Processor, Result, Value};

/// Returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Processor for Identity {
    fn process(&self, value: Value, _context: &Context) -> Result<Value> {
        Ok(value)
    }
}

/// First truthy element of the batch, or `Null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TakeFirst;

impl Processor for TakeFirst {
    fn process(&self, value: Value, _context: &Context) -> Result<Value> {
        Ok(value
            .into_batch()
            .into_iter()
            .find(Value::is_truthy)
            .unwrap_or(Value::Null))
    }
}

/// Concatenates the batch with a separator.
#[derive(Debug, Clone)]
pub struct Join {
    separator: String,
}

impl Join {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for Join {
    fn default() -> Self {
        Self::new(" ")
    }
}

impl Processor for Join {
    fn process(&self, value: Value, _context: &Context) -> Result<Value> {
        let parts = value
            .into_batch()
            .iter()
            .map(|item| {
                item.to_text().ok_or(LoaderError::TypeMismatch {
                    processor: "Join",
                    expected: "text",
                    found: item.kind(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Text(parts.join(&self.separator)))
    }
}

/// Slice `[start:end)` of the batch.
///
/// Negative bounds count from the end; out-of-range bounds clamp.
#[derive(Debug, Clone, Copy)]
pub struct Take {
    start: isize,
    end: Option<isize>,
}

impl Take {
    pub fn new(start: isize, end: Option<isize>) -> Self {
        Self { start, end }
    }

    /// Everything from `start` on.
    pub fn from(start: isize) -> Self {
        Self::new(start, None)
    }

    /// Resolved `(start, end)` bounds for a batch of `len` elements.
    pub fn bounds(&self, len: usize) -> (usize, usize) {
        let start = clamp_index(self.start, len);
        let end = self.end.map_or(len, |end| clamp_index(end, len));
        (start, end.max(start))
    }
}

fn clamp_index(index: isize, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(index.unsigned_abs())
    } else {
        index.unsigned_abs().min(len)
    }
}

impl Processor for Take {
    fn process(&self, value: Value, _context: &Context) -> Result<Value> {
        let mut batch = value.into_batch();
        let (start, end) = self.bounds(batch.len());
        batch.truncate(end);
        Ok(Value::List(batch.split_off(start)))
    }
}

/// The element at `index`; negative indices count from the end.
#[derive(Debug, Clone, Copy)]
pub struct TakeOne {
    index: isize,
}

impl TakeOne {
    pub fn new(index: isize) -> Self {
        Self { index }
    }
}

impl Processor for TakeOne {
    fn process(&self, value: Value, _context: &Context) -> Result<Value> {
        let mut batch = value.into_batch();
        let len = batch.len();
        let position = if self.index < 0 {
            len.checked_sub(self.index.unsigned_abs())
        } else {
            Some(self.index.unsigned_abs()).filter(|&i| i < len)
        };
        match position {
            Some(i) => Ok(batch.swap_remove(i)),
            None => Err(LoaderError::IndexOutOfRange {
                index: self.index,
                len,
            }),
        }
    }
}
