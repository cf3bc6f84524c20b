use std::fmt;
use std::sync::Arc;

use gleaner_model::{ContextLayer, ContextValue, Result, Value};
use gleaner_select::compile;
use regex::Regex;

use super::ValueSource;

type SplitFn = dyn Fn(&str) -> Option<(String, String)> + Send + Sync;

/// How a text is split into a key and a value.
#[derive(Clone)]
pub enum KvSplit {
    /// Split on every match of the pattern; exactly two non-empty parts are
    /// required.
    Pattern(Regex),
    /// A custom splitter.
    Custom(Arc<SplitFn>),
}

impl KvSplit {
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Self::Pattern(compile(pattern)?))
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<(String, String)> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Split `text`, or `None` when it has no key/value shape.
    pub fn split(&self, text: &str) -> Option<(String, String)> {
        match self {
            Self::Pattern(separator) => {
                let parts: Vec<&str> = separator.split(text).collect();
                match parts.as_slice() {
                    [key, value] if !key.is_empty() && !value.is_empty() => {
                        Some(((*key).to_string(), (*value).to_string()))
                    }
                    _ => {
                        tracing::warn!(
                            text,
                            separator = separator.as_str(),
                            parts = parts.len(),
                            "text does not split into a key and a value"
                        );
                        None
                    }
                }
            }
            Self::Custom(f) => f(text),
        }
    }
}

impl fmt::Debug for KvSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Values matched by regexes over a fixed batch of texts.
///
/// The texts are exposed in the context under `texts`.
#[derive(Debug, Clone, Default)]
pub struct RegexSource {
    texts: Vec<String>,
    split: Option<KvSplit>,
}

impl RegexSource {
    pub fn new<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            texts: texts.into_iter().map(Into::into).collect(),
            split: None,
        }
    }

    /// Split every text into key and value on `pattern`.
    pub fn with_separator(self, pattern: &str) -> Result<Self> {
        Ok(self.with_split(KvSplit::pattern(pattern)?))
    }

    /// Split every text with a custom function.
    pub fn with_splitter<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> Option<(String, String)> + Send + Sync + 'static,
    {
        self.with_split(KvSplit::custom(f))
    }

    pub fn with_split(mut self, split: KvSplit) -> Self {
        self.split = Some(split);
        self
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn split(&self) -> Option<&KvSplit> {
        self.split.as_ref()
    }

    /// Values matched by `re`, in text order.
    ///
    /// With a splitter, a text yields its value when `re` matches its key.
    /// Otherwise the capture groups of the first match are yielded (the whole
    /// match for a pattern without groups, unmatched groups skipped).
    pub fn get_values(&self, re: &str) -> Result<Vec<Value>> {
        let re = compile(re)?;
        let mut values = Vec::new();
        for text in &self.texts {
            match &self.split {
                Some(split) => {
                    if let Some((key, value)) = split.split(text)
                        && re.is_match(&key)
                    {
                        values.push(Value::from(value));
                    }
                }
                None => {
                    let Some(caps) = re.captures(text) else {
                        continue;
                    };
                    if caps.len() > 1 {
                        let groups = caps.iter().skip(1).flatten();
                        values.extend(groups.map(|m| Value::from(m.as_str())));
                    } else {
                        values.push(Value::from(&caps[0]));
                    }
                }
            }
        }
        Ok(values)
    }
}

impl ValueSource for RegexSource {
    fn context_entries(&self) -> ContextLayer {
        let mut entries = ContextLayer::new();
        entries.insert(
            "texts".to_string(),
            ContextValue::value(Value::list(&self.texts)),
        );
        entries
    }
}

#[cfg(test)]
mod tests {
    use gleaner_model::LoaderError;

    use super::*;

    #[test]
    fn separator_requires_exactly_two_parts() {
        let split = KvSplit::pattern(":").unwrap();
        assert_eq!(
            split.split("name: Alice"),
            Some(("name".to_string(), " Alice".to_string()))
        );
        assert_eq!(split.split("time: 10:30"), None);
        assert_eq!(split.split("name:"), None);
        assert_eq!(split.split("no separator"), None);
    }

    #[test]
    fn invalid_separator_fails_at_construction() {
        let err = RegexSource::new(["a"]).with_separator("[").unwrap_err();
        assert!(matches!(err, LoaderError::InvalidPattern { .. }));
    }

    #[test]
    fn matches_keys_when_splitting() {
        let source = RegexSource::new(["name: Alice", "age: 30", "nickname: Al"])
            .with_separator(":")
            .unwrap();
        assert_eq!(
            source.get_values("^name$").unwrap(),
            vec![Value::from(" Alice")]
        );
        assert_eq!(
            source.get_values("name").unwrap(),
            vec![Value::from(" Alice"), Value::from(" Al")]
        );
    }

    #[test]
    fn custom_splitter() {
        let source = RegexSource::new(["color=red", "size=L"]).with_splitter(|text| {
            text.split_once('=')
                .map(|(k, v)| (k.to_uppercase(), v.to_string()))
        });
        assert_eq!(source.get_values("^SIZE$").unwrap(), vec![Value::from("L")]);
    }

    #[test]
    fn captures_without_splitting() {
        let source = RegexSource::new(["id 42 of 7", "no digits", "id 9"]);
        assert_eq!(
            source.get_values(r"id (\d+)(?: of (\d+))?").unwrap(),
            vec![Value::from("42"), Value::from("7"), Value::from("9")]
        );
        assert_eq!(
            source.get_values(r"\d+").unwrap(),
            vec![Value::from("42"), Value::from("9")]
        );
    }

    #[test]
    fn texts_are_in_context() {
        let entries = RegexSource::new(["a", "b"]).context_entries();
        assert_eq!(
            entries.get("texts").and_then(ContextValue::as_value),
            Some(&Value::list(["a", "b"]))
        );
    }
}
