use gleaner_model::{Context, Processor, Result, Value};
use gleaner_select::{HtmlSelector, Selector, compile};
use regex::Regex;

use super::expect_text;

/// Runs selector queries over markup values.
///
/// Every text element of the batch is parsed as a document, each query is
/// evaluated against it in order and the extracted strings (optionally
/// filtered through a regex) are flattened into one list.
#[derive(Debug, Clone)]
pub struct SelectExtract {
    queries: Vec<String>,
    re: Option<Regex>,
}

impl SelectExtract {
    pub fn new<I, S>(queries: I, re: Option<&str>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            queries: queries.into_iter().map(Into::into).collect(),
            re: re.map(compile).transpose()?,
        })
    }
}

impl Processor for SelectExtract {
    fn process(&self, value: Value, _context: &Context) -> Result<Value> {
        let mut extracted = Vec::new();
        for element in value.into_batch() {
            let selector = HtmlSelector::from_text(expect_text("SelectExtract", &element)?);
            for query in &self.queries {
                let list = selector.select(query)?;
                match &self.re {
                    Some(re) => extracted.extend(list.re(re)),
                    None => extracted.extend(list.extract()),
                }
            }
        }
        Ok(Value::list(extracted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_queries_in_order() {
        let html = r#"<ul><li class="a">one</li><li class="b">two 2</li></ul>"#;
        let extract = SelectExtract::new(["li.b::text", "li.a::text"], None).unwrap();
        let out = extract.process(Value::from(html), &Context::new()).unwrap();
        assert_eq!(out, Value::list(["two 2", "one"]));

        let digits = SelectExtract::new(["li::text"], Some(r"\d+")).unwrap();
        let out = digits.process(Value::from(html), &Context::new()).unwrap();
        assert_eq!(out, Value::list(["2"]));
    }
}
