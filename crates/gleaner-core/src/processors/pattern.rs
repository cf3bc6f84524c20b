use gleaner_model::{Context, Processor, Result, Value};
use gleaner_select::compile;
use regex::Regex;

use super::{expect_text, map_single};

/// Capture groups of the first matching pattern, per element.
///
/// Patterns are tried in order against each text element; the groups of the
/// first one that matches are appended to the output and the remaining
/// patterns are skipped for that element. A group that did not participate
/// in the match is appended as `Null`.
#[derive(Debug, Clone)]
pub struct RegexExtract {
    patterns: Vec<Regex>,
}

impl RegexExtract {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| Ok(compile(pattern.as_ref())?))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }
}

impl Processor for RegexExtract {
    fn process(&self, value: Value, _context: &Context) -> Result<Value> {
        let mut matches = Vec::new();
        for element in value.into_batch() {
            let text = expect_text("RegexExtract", &element)?;
            let Some(caps) = self.patterns.iter().find_map(|re| re.captures(text)) else {
                continue;
            };
            matches.extend(
                caps.iter()
                    .skip(1)
                    .map(|group| Value::from(group.map(|m| m.as_str()))),
            );
        }
        Ok(Value::List(matches))
    }
}

/// Regex substitution of every match.
///
/// The replacement understands `$1` and `${name}` group references.
#[derive(Debug, Clone)]
pub struct Replace {
    pattern: Regex,
    replacement: String,
}

impl Replace {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
            replacement: replacement.into(),
        })
    }

    /// Delete every match.
    pub fn remove(pattern: &str) -> Result<Self> {
        Self::new(pattern, "")
    }
}

impl Processor for Replace {
    fn process(&self, value: Value, _context: &Context) -> Result<Value> {
        map_single(value, |single| {
            let text = expect_text("Replace", &single)?;
            Ok(Value::from(
                self.pattern
                    .replace_all(text, self.replacement.as_str())
                    .into_owned(),
            ))
        })
    }
}

/// Splits text on every match of a pattern.
#[derive(Debug, Clone)]
pub struct Split {
    pattern: Regex,
}

impl Split {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
        })
    }
}

impl Processor for Split {
    fn process(&self, value: Value, _context: &Context) -> Result<Value> {
        map_single(value, |single| {
            let text = expect_text("Split", &single)?;
            Ok(Value::list(self.pattern.split(text)))
        })
    }
}
