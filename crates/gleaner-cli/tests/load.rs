//! Integration tests for config-driven loading.

use gleaner_cli::load::{LoadOptions, load_html, load_texts, render_item};
use gleaner_core::{LoaderConfig, Value};

const PAGE: &str = r#"<html><body>
<h1> Blue Widget </h1>
<ul>
  <li class="tag">sale</li>
  <li class="tag">new</li>
</ul>
<span class="price">Now only 19.99 EUR</span>
<a class="more" href="details?b=2&amp;a=1#specs">details</a>
<p class="empty"></p>
</body></html>"#;

const HTML_CONFIG: &str = r#"{
  "default_input": { "type": "map_compose", "steps": [{ "type": "strip" }] },
  "default_output": { "type": "take_first" },
  "fields": {
    "name": { "queries": ["h1::text"] },
    "tags": { "queries": ["li.tag::text"], "output": { "type": "join", "separator": ", " } },
    "price": { "queries": ["span.price::text"], "re": "(\\d+\\.\\d+)" },
    "link": {
      "queries": ["a.more::attr(href)"],
      "input": {
        "type": "join_canonicalize_url",
        "base": "http://shop.test/catalog/widget"
      }
    },
    "note": {
      "queries": ["p.empty"],
      "input": { "type": "remove_tag" },
      "output": { "type": "join" }
    }
  }
}"#;

#[test]
fn loads_a_page_with_configured_processors() {
    let config = LoaderConfig::from_json_str(HTML_CONFIG).unwrap();
    let item = load_html(&config, PAGE, None, LoadOptions::default()).unwrap();
    insta::assert_snapshot!(render_item(&item).unwrap(), @r#"
    {
      "link": "http://shop.test/catalog/details?a=1&b=2",
      "name": "Blue Widget",
      "price": "19.99",
      "tags": "sale, new"
    }
    "#);
}

#[test]
fn keep_empty_retains_blank_fields() {
    let config = LoaderConfig::from_json_str(HTML_CONFIG).unwrap();
    let item = load_html(
        &config,
        PAGE,
        Some("http://shop.test/catalog/widget"),
        LoadOptions { keep_empty: true },
    )
    .unwrap();
    assert_eq!(item.get("note"), Some(&Value::from("")));
}

#[test]
fn loads_key_value_texts() {
    let config = LoaderConfig::from_json_str(
        r#"{
          "default_output": { "type": "take_first" },
          "fields": {
            "name": { "queries": ["^name$"], "input": { "type": "strip" } },
            "age": { "queries": ["^age$"], "re": "\\d+" }
          }
        }"#,
    )
    .unwrap();
    let texts = ["name: Alice", "age: 30 years", "broken line"];
    let item = load_texts(&config, &texts, Some(":"), LoadOptions::default()).unwrap();
    assert_eq!(item.get("name"), Some(&Value::from("Alice")));
    assert_eq!(item.get("age"), Some(&Value::from("30")));
    assert_eq!(item.len(), 2);
}

#[test]
fn invalid_separator_is_reported() {
    let config = LoaderConfig::default();
    let err = load_texts(&config, &["a"], Some("("), LoadOptions::default()).unwrap_err();
    assert!(format!("{err:#}").contains("invalid pattern"));
}
