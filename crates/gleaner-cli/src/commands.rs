use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use gleaner_cli::load::{LoadOptions, load_html, load_texts, render_item};
use gleaner_core::LoaderConfig;
use tracing::{info, info_span};

use crate::cli::{HtmlArgs, TextArgs};

fn read_config(path: &Path) -> Result<LoaderConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    LoaderConfig::from_json_str(&json)
        .with_context(|| format!("Failed to parse config from {}", path.display()))
}

pub fn run_html(args: &HtmlArgs) -> Result<String> {
    let span = info_span!("html", page = %args.page.display());
    let _guard = span.enter();

    let config = read_config(&args.config)?;
    let page = fs::read_to_string(&args.page)
        .with_context(|| format!("Failed to read page from {}", args.page.display()))?;
    info!(fields = config.fields.len(), bytes = page.len(), "loading page");

    let options = LoadOptions {
        keep_empty: args.keep_empty,
    };
    let item = load_html(&config, &page, args.url.as_deref(), options)?;
    render_item(&item)
}

pub fn run_text(args: &TextArgs) -> Result<String> {
    let span = info_span!("text", texts = %args.texts.display());
    let _guard = span.enter();

    let config = read_config(&args.config)?;
    let content = fs::read_to_string(&args.texts)
        .with_context(|| format!("Failed to read texts from {}", args.texts.display()))?;
    let texts: Vec<&str> = content.lines().collect();
    info!(fields = config.fields.len(), texts = texts.len(), "loading texts");

    let options = LoadOptions {
        keep_empty: args.keep_empty,
    };
    let item = load_texts(&config, texts.as_slice(), args.kv_split.as_deref(), options)?;
    render_item(&item)
}
