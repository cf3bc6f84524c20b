use std::any::Any;
use std::sync::Arc;

use gleaner_model::{ContextLayer, ContextValue, LoaderError, Result, Value};
use gleaner_select::{HtmlSelector, Response, SelectorRef, compile};

use super::ValueSource;

/// Values extracted by evaluating queries against a selector.
///
/// Context entries: `selector` (a shared [`SelectorRef`]) and, when the
/// source was built from one, `response` (a shared [`Response`]).
#[derive(Debug, Clone)]
pub struct SelectorSource {
    selector: SelectorRef,
    response: Option<Arc<Response>>,
}

impl SelectorSource {
    /// Build from a selector, a response, or both.
    ///
    /// Without a selector, an [`HtmlSelector`] over the response body is used.
    pub fn new(selector: Option<SelectorRef>, response: Option<Response>) -> Result<Self> {
        let response = response.map(Arc::new);
        let selector: SelectorRef = match (selector, &response) {
            (Some(selector), _) => selector,
            (None, Some(response)) => Arc::new(HtmlSelector::from_response(response)),
            (None, None) => return Err(LoaderError::MissingSelector),
        };
        Ok(Self { selector, response })
    }

    pub fn from_selector(selector: SelectorRef) -> Self {
        Self {
            selector,
            response: None,
        }
    }

    pub fn from_response(response: Response) -> Self {
        let selector: SelectorRef = Arc::new(HtmlSelector::from_response(&response));
        Self {
            selector,
            response: Some(Arc::new(response)),
        }
    }

    pub fn selector(&self) -> &SelectorRef {
        &self.selector
    }

    pub fn response(&self) -> Option<&Response> {
        self.response.as_deref()
    }

    /// Evaluate `queries` in order and flatten the extracted strings.
    ///
    /// With `re`, each extracted string goes through regex extraction first.
    pub fn get_values<Q>(&self, queries: Q, re: Option<&str>) -> Result<Vec<Value>>
    where
        Q: IntoIterator,
        Q::Item: AsRef<str>,
    {
        let re = re.map(compile).transpose()?;
        let mut values = Vec::new();
        for query in queries {
            let list = self.selector.select(query.as_ref())?;
            let extracted = match &re {
                Some(re) => list.re(re),
                None => list.extract(),
            };
            values.extend(extracted.into_iter().map(Value::from));
        }
        Ok(values)
    }
}

impl ValueSource for SelectorSource {
    fn context_entries(&self) -> ContextLayer {
        let mut entries = ContextLayer::new();
        entries.insert(
            "selector".to_string(),
            ContextValue::shared(Arc::clone(&self.selector)),
        );
        if let Some(response) = &self.response {
            let handle: Arc<dyn Any + Send + Sync> = response.clone();
            entries.insert("response".to_string(), ContextValue::Shared(handle));
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_model::Context;

    const PAGE: &str = r#"<html><body>
        <h1>Widget</h1>
        <p class="price">Price: 10.50</p><p class="price">Sale: 8.99</p>
    </body></html>"#;

    #[test]
    fn requires_selector_or_response() {
        assert!(matches!(
            SelectorSource::new(None, None).unwrap_err(),
            LoaderError::MissingSelector
        ));
        let source = SelectorSource::new(None, Some(Response::new("http://x", PAGE))).unwrap();
        assert_eq!(source.response().map(|r| r.url.as_str()), Some("http://x"));
    }

    #[test]
    fn flattens_queries_and_regex_matches() {
        let source = SelectorSource::from_selector(Arc::new(HtmlSelector::from_text(PAGE)));
        let values = source.get_values(["h1::text", "p.price::text"], None).unwrap();
        assert_eq!(
            values,
            vec![
                Value::from("Widget"),
                Value::from("Price: 10.50"),
                Value::from("Sale: 8.99")
            ]
        );
        let prices = source
            .get_values(["p.price::text"], Some(r"\d+\.\d+"))
            .unwrap();
        assert_eq!(prices, vec![Value::from("10.50"), Value::from("8.99")]);
    }

    #[test]
    fn exposes_selector_and_response_in_context() {
        let source = SelectorSource::from_response(Response::new("http://x", PAGE));
        let entries = source.context_entries();
        assert!(matches!(entries.get("selector"), Some(ContextValue::Shared(_))));
        assert!(matches!(entries.get("response"), Some(ContextValue::Shared(_))));
    }

    #[test]
    fn response_handle_downcasts_from_context() {
        let source = SelectorSource::from_response(Response::new("http://x", PAGE));
        let ctx = Context::from_loader(source.context_entries());
        let response = ctx.shared::<Response>("response").unwrap();
        assert_eq!(response.url, "http://x");
    }
}
