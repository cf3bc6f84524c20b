use gleaner_model::{Context, LoaderError, Processor, Result, Value};
use url::{Url, form_urlencoded};

use super::{expect_text, map_single};

/// Resolves URLs against a base and canonicalizes them.
#[derive(Debug, Clone)]
pub struct JoinCanonicalizeUrl {
    base: Option<Url>,
    canonicalize: bool,
}

impl JoinCanonicalizeUrl {
    /// Canonicalizing processor with an optional base URL.
    pub fn new(base: Option<&str>) -> Result<Self> {
        let base = base.map(parse_url).transpose()?;
        Ok(Self {
            base,
            canonicalize: true,
        })
    }

    pub fn canonicalize(mut self, enabled: bool) -> Self {
        self.canonicalize = enabled;
        self
    }

    fn join(&self, url: &str) -> Result<String> {
        let joined = match &self.base {
            Some(base) => base.join(url).map_err(|err| invalid_url(url, &err))?,
            None if self.canonicalize => parse_url(url)?,
            None => return Ok(url.to_string()),
        };
        if self.canonicalize {
            Ok(canonical_form(joined))
        } else {
            Ok(joined.into())
        }
    }
}

impl Processor for JoinCanonicalizeUrl {
    fn process(&self, value: Value, _context: &Context) -> Result<Value> {
        map_single(value, |single| {
            let url = expect_text("JoinCanonicalizeUrl", &single)?;
            Ok(Value::from(self.join(url)?))
        })
    }
}

/// Canonical form of an absolute URL.
///
/// Query arguments are sorted (blank values kept), path percent-escapes are
/// normalized, the host is lowercased and the fragment dropped.
pub fn canonicalize_url(url: &str) -> Result<String> {
    Ok(canonical_form(parse_url(url)?))
}

fn canonical_form(mut url: Url) -> String {
    if let Some(query) = url.query() {
        let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        pairs.sort();
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        url.set_query((!query.is_empty()).then_some(query.as_str()));
    }
    let path = normalize_escapes(url.path());
    url.set_path(&path);
    url.set_fragment(None);
    url.into()
}

/// Decode escapes of unreserved characters and uppercase the others.
fn normalize_escapes(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = String::with_capacity(path.len());
    let mut i = 0;
    while i < bytes.len() {
        let escaped = (bytes[i] == b'%')
            .then(|| Some((hex_digit(*bytes.get(i + 1)?)?, hex_digit(*bytes.get(i + 2)?)?)))
            .flatten();
        match escaped {
            Some((high, low)) => {
                let decoded = high * 16 + low;
                if decoded.is_ascii_alphanumeric() || b"-._~".contains(&decoded) {
                    out.push(char::from(decoded));
                } else {
                    out.push_str(&format!("%{decoded:02X}"));
                }
                i += 3;
            }
            None => {
                out.push(char::from(bytes[i]));
                i += 1;
            }
        }
    }
    out
}

fn hex_digit(byte: u8) -> Option<u8> {
    char::from(byte)
        .to_digit(16)
        .and_then(|digit| u8::try_from(digit).ok())
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|err| invalid_url(url, &err))
}

fn invalid_url(url: &str, err: &url::ParseError) -> LoaderError {
    LoaderError::InvalidUrl {
        url: url.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_sorts_query_and_drops_fragment() {
        assert_eq!(
            canonicalize_url("http://www.Example.com/do?b=2&a=1&c=#frag").unwrap(),
            "http://www.example.com/do?a=1&b=2&c="
        );
        assert_eq!(
            canonicalize_url("http://example.com/a%7eb/%2fc%c3%a9").unwrap(),
            "http://example.com/a~b/%2Fc%C3%A9"
        );
    }

    #[test]
    fn joins_relative_urls_against_base() {
        let join = JoinCanonicalizeUrl::new(Some("http://example.com/shop/list.html")).unwrap();
        let out = join
            .process(Value::list(["item?id=2&cat=1", "/about#team"]), &Context::new())
            .unwrap();
        assert_eq!(
            out,
            Value::list([
                "http://example.com/shop/item?cat=1&id=2",
                "http://example.com/about"
            ])
        );
    }

    #[test]
    fn relative_url_without_base_is_an_error() {
        let join = JoinCanonicalizeUrl::new(None).unwrap();
        let err = join.process(Value::from("/about"), &Context::new()).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidUrl { url, .. } if url == "/about"));

        let passthrough = JoinCanonicalizeUrl::new(None).unwrap().canonicalize(false);
        assert_eq!(
            passthrough.process(Value::from("/about"), &Context::new()).unwrap(),
            Value::from("/about")
        );
    }
}
