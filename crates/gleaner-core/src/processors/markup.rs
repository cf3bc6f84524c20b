use std::sync::LazyLock;

use gleaner_model::{Context, LoaderError, Processor, Result, Value};
use gleaner_select::compile;
use regex::{Captures, Regex};

use super::{expect_text, map_single};

/// Any markup tag, comments and doctypes included.
static ANY_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[a-zA-Z/!].*?>").expect("Invalid tag regex"));

/// A start or end tag, capturing the tag name.
static NAMED_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?si)</?([^\s>/]+).*?>").expect("Invalid named tag regex"));

/// Replace every tag in `text` with `replacement`.
pub fn replace_tags(text: &str, replacement: &str) -> String {
    ANY_TAG_REGEX
        .replace_all(text, regex::NoExpand(replacement))
        .into_owned()
}

/// Remove tags, keeping their content.
///
/// With a non-empty `which_ones` only those tags are removed; otherwise every
/// tag not listed in `keep` is. Tag names compare case-insensitively.
pub fn remove_tags(text: &str, which_ones: &[String], keep: &[String]) -> String {
    let listed = |names: &[String], tag: &str| names.iter().any(|n| n.eq_ignore_ascii_case(tag));
    NAMED_TAG_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            let tag = &caps[1];
            let remove = if which_ones.is_empty() {
                !listed(keep, tag)
            } else {
                listed(which_ones, tag)
            };
            if remove {
                String::new()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Remove the listed elements together with everything inside them.
pub fn remove_tags_with_content(text: &str, which_ones: &[String]) -> Result<String> {
    Ok(match content_regex(which_ones)? {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    })
}

fn content_regex(which_ones: &[String]) -> Result<Option<Regex>> {
    if which_ones.is_empty() {
        return Ok(None);
    }
    let alternatives = which_ones
        .iter()
        .map(|tag| {
            let tag = regex::escape(tag);
            format!(r"<{tag}\b.*?</{tag}>|<{tag}\s*/>")
        })
        .collect::<Vec<_>>()
        .join("|");
    Ok(Some(compile(&format!("(?si){alternatives}"))?))
}

/// Replaces every markup tag with a fixed string.
#[derive(Debug, Clone, Default)]
pub struct ReplaceTag {
    replacement: String,
}

impl ReplaceTag {
    pub fn new(replacement: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
        }
    }
}

impl Processor for ReplaceTag {
    fn process(&self, value: Value, _context: &Context) -> Result<Value> {
        map_single(value, |single| {
            let text = expect_text("ReplaceTag", &single)?;
            Ok(Value::from(replace_tags(text, &self.replacement)))
        })
    }
}

/// Strips markup tags, or whole elements when content is not kept.
#[derive(Debug, Clone, Default)]
pub struct RemoveTag {
    which_ones: Vec<String>,
    keep: Vec<String>,
    content: Option<Regex>,
}

impl RemoveTag {
    /// Validate the option combination and build the processor.
    pub fn new<W, K>(which_ones: W, keep: K, keep_content: bool) -> Result<Self>
    where
        W: IntoIterator,
        W::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        let which_ones: Vec<String> = which_ones.into_iter().map(Into::into).collect();
        let keep: Vec<String> = keep.into_iter().map(Into::into).collect();

        if !which_ones.is_empty() && !keep.is_empty() {
            return Err(LoaderError::InvalidProcessor {
                processor: "RemoveTag",
                reason: "`which_ones` and `keep` are mutually exclusive".to_string(),
            });
        }
        if !keep.is_empty() && !keep_content {
            return Err(LoaderError::InvalidProcessor {
                processor: "RemoveTag",
                reason: "`keep` requires `keep_content`".to_string(),
            });
        }

        let content = if keep_content {
            None
        } else {
            content_regex(&which_ones)?
        };
        Ok(Self {
            which_ones,
            keep,
            content,
        })
    }

    /// Remove every tag.
    pub fn all() -> Self {
        Self::default()
    }

    /// Remove only the given tags.
    pub fn only<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            which_ones: tags.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Remove every tag except the given ones.
    pub fn except<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keep: tags.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl Processor for RemoveTag {
    fn process(&self, value: Value, _context: &Context) -> Result<Value> {
        map_single(value, |single| {
            let text = expect_text("RemoveTag", &single)?;
            let cleaned = match &self.content {
                Some(re) => re.replace_all(text, "").into_owned(),
                None => remove_tags(text, &self.which_ones, &self.keep),
            };
            Ok(Value::from(cleaned))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    fn run(p: &dyn Processor, value: Value) -> Value {
        p.process(value, &Context::new()).unwrap()
    }

    #[test]
    fn replace_tags_handles_comments_and_newlines() {
        let text = "a<!-- x\ny -->b<br/>c</p\n>";
        assert_eq!(replace_tags(text, " "), "a b c ");
        assert_eq!(replace_tags("1 < 2", ""), "1 < 2");
    }

    #[test]
    fn replace_tag_maps_lists() {
        let out = run(&ReplaceTag::new("|"), Value::list(["<b>x</b>", "y"]));
        assert_eq!(out, Value::list(["|x|", "y"]));
    }

    #[test]
    fn remove_all_tags() {
        let out = run(&RemoveTag::all(), Value::from("<p>Hello <B>world</B></p>"));
        assert_eq!(out, Value::from("Hello world"));
    }

    #[test]
    fn remove_selected_or_all_but_kept_tags() {
        let html = "<div><b>bold</b> <i>it</i></div>";
        assert_eq!(
            run(&RemoveTag::only(["b"]), Value::from(html)),
            Value::from("<div>bold <i>it</i></div>")
        );
        assert_eq!(
            run(&RemoveTag::except(["I"]), Value::from(html)),
            Value::from("bold <i>it</i>")
        );
    }

    #[test]
    fn tag_names_end_at_any_whitespace() {
        assert_eq!(
            run(&RemoveTag::except(["a"]), Value::from("<p><a\nhref=\"/x\">link</a></p>")),
            Value::from("<a\nhref=\"/x\">link</a>")
        );
        assert_eq!(
            run(&RemoveTag::only(["a"]), Value::from("<p><a\thref=\"/x\">link</a></p>")),
            Value::from("<p>link</p>")
        );
    }

    #[test]
    fn content_removal_matches_whole_tag_names() {
        assert_eq!(
            remove_tags_with_content("<b>x</b><br>y</br><B>z</B>", &["b".to_string()]).unwrap(),
            "<br>y</br>"
        );
    }

    #[test]
    fn remove_elements_with_content() {
        let remover = RemoveTag::new(["script", "br"], NONE, false).unwrap();
        let out = run(
            &remover,
            Value::from("a<script type=\"x\">\nvar s;\n</script>b<br />c"),
        );
        assert_eq!(out, Value::from("abc"));
        assert_eq!(
            remove_tags_with_content("<b>x</b>y", &[]).unwrap(),
            "<b>x</b>y"
        );
    }

    #[test]
    fn incompatible_options_fail_at_construction() {
        let err = RemoveTag::new(["b"], ["i"], true).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidProcessor { processor: "RemoveTag", .. }));
        let err = RemoveTag::new(NONE, ["i"], false).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidProcessor { .. }));
    }
}
