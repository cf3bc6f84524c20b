use gleaner_model::{Context, Processor, Result, Value};

use super::map_single;

/// Trims both ends of text values.
///
/// Without explicit characters, whitespace is trimmed. Non-text values pass
/// through untouched.
#[derive(Debug, Clone, Default)]
pub struct Strip {
    chars: Option<String>,
}

impl Strip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim any of `chars` instead of whitespace.
    pub fn chars(chars: impl Into<String>) -> Self {
        Self {
            chars: Some(chars.into()),
        }
    }

    fn strip<'a>(&self, text: &'a str) -> &'a str {
        match &self.chars {
            Some(chars) => text.trim_matches(|c: char| chars.contains(c)),
            None => text.trim(),
        }
    }
}

impl Processor for Strip {
    fn process(&self, value: Value, _context: &Context) -> Result<Value> {
        map_single(value, |single| match single {
            Value::Text(text) => Ok(Value::from(self.strip(&text))),
            other => Ok(other),
        })
    }
}
