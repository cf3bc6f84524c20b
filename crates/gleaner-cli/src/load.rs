//! Drive configured loaders over pages and text batches.

use std::sync::Arc;

use anyhow::{Context, Result};
use gleaner_core::{
    HtmlSelector, Item, ItemLoader, LoaderConfig, RegexSource, Response, SelectorSource, Value,
};
use tracing::{debug, info};

/// Options shared by every load.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Keep fields whose output value is empty.
    pub keep_empty: bool,
}

/// Load a record from an HTML page.
///
/// Each configured field's queries are evaluated as selector queries, with
/// the field's `re` applied to the extracted strings.
pub fn load_html(
    config: &LoaderConfig,
    page: &str,
    url: Option<&str>,
    options: LoadOptions,
) -> Result<Item> {
    let source = match url {
        Some(url) => SelectorSource::from_response(Response::new(url, page)),
        None => SelectorSource::from_selector(Arc::new(HtmlSelector::from_text(page))),
    };
    let definition = config.definition().context("build loader definition")?;
    let mut loader = ItemLoader::with_source(Item::new(), source).with_definition(definition);

    for (name, field) in &config.fields {
        if field.queries.is_empty() {
            debug!(field = %name, "field has no queries");
            continue;
        }
        loader
            .add_path(name.as_str(), &field.queries, &[], field.re.as_deref())
            .with_context(|| format!("load field '{name}'"))?;
    }

    loader
        .materialize(!options.keep_empty)
        .context("materialize record")?;
    let item = loader.into_item();
    info!(fields = item.len(), "loaded record from page");
    Ok(item)
}

/// Load a record from a batch of texts.
///
/// Each configured field's queries are regexes matched against the texts
/// (against the keys when `kv_split` is given); the field's `re` then
/// extracts from the matched values.
pub fn load_texts<S: AsRef<str>>(
    config: &LoaderConfig,
    texts: &[S],
    kv_split: Option<&str>,
    options: LoadOptions,
) -> Result<Item> {
    let mut source = RegexSource::new(texts.iter().map(|text| text.as_ref().to_string()));
    if let Some(separator) = kv_split {
        source = source
            .with_separator(separator)
            .context("compile key/value separator")?;
    }
    let definition = config.definition().context("build loader definition")?;
    let mut loader = ItemLoader::with_source(Item::new(), source).with_definition(definition);

    for (name, field) in &config.fields {
        for query in &field.queries {
            let values = loader
                .source()
                .get_values(query)
                .with_context(|| format!("match field '{name}'"))?;
            let values = loader
                .get_value(Value::List(values), &[], field.re.as_deref())
                .with_context(|| format!("extract field '{name}'"))?;
            loader
                .add_value(name.as_str(), values, &[])
                .with_context(|| format!("load field '{name}'"))?;
        }
    }

    loader
        .materialize(!options.keep_empty)
        .context("materialize record")?;
    let item = loader.into_item();
    info!(fields = item.len(), texts = texts.len(), "loaded record from texts");
    Ok(item)
}

/// Render a record as pretty JSON.
pub fn render_item(item: &Item) -> Result<String> {
    serde_json::to_string_pretty(item.values()).context("serialize record")
}
