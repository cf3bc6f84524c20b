//! Declarative loader configuration.
//!
//! A [`LoaderConfig`] describes processors and per-field sources as data, so
//! a loader can be set up from a JSON file:
//!
//! ```json
//! {
//!   "default_output": { "type": "take_first" },
//!   "fields": {
//!     "name": {
//!       "queries": ["h1::text"],
//!       "input": { "type": "map_compose", "steps": [{ "type": "strip" }] }
//!     },
//!     "tags": { "queries": ["li.tag::text"], "output": { "type": "identity" } }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use gleaner_model::{LoaderError, ProcessorExt, ProcessorRef, Result};
use serde::{Deserialize, Serialize};

use crate::compose::{Compose, MapCompose};
use crate::definition::LoaderDefinition;
use crate::processors::{
    Identity, Join, JoinCanonicalizeUrl, RegexExtract, RemoveTag, Replace, ReplaceTag,
    SelectExtract, Split, Strip, Take, TakeFirst, TakeOne,
};

fn default_separator() -> String {
    " ".to_string()
}

fn default_true() -> bool {
    true
}

/// A processor described as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcessorSpec {
    Identity,
    TakeFirst,
    Join {
        #[serde(default = "default_separator")]
        separator: String,
    },
    Take {
        #[serde(default)]
        start: isize,
        #[serde(default)]
        end: Option<isize>,
    },
    TakeOne {
        index: isize,
    },
    RegexExtract {
        patterns: Vec<String>,
    },
    ReplaceTag {
        #[serde(default)]
        replacement: String,
    },
    RemoveTag {
        #[serde(default)]
        which_ones: Vec<String>,
        #[serde(default)]
        keep: Vec<String>,
        #[serde(default = "default_true")]
        keep_content: bool,
    },
    Strip {
        #[serde(default)]
        chars: Option<String>,
    },
    Replace {
        pattern: String,
        #[serde(default)]
        replacement: String,
    },
    Split {
        pattern: String,
    },
    JoinCanonicalizeUrl {
        #[serde(default)]
        base: Option<String>,
        #[serde(default = "default_true")]
        canonicalize: bool,
    },
    SelectExtract {
        queries: Vec<String>,
        #[serde(default)]
        re: Option<String>,
    },
    Compose {
        steps: Vec<ProcessorSpec>,
        #[serde(default = "default_true")]
        stop_on_null: bool,
    },
    MapCompose {
        steps: Vec<ProcessorSpec>,
    },
}

impl ProcessorSpec {
    /// Build the described processor.
    pub fn build(&self) -> Result<ProcessorRef> {
        let processor = match self {
            Self::Identity => Identity.shared(),
            Self::TakeFirst => TakeFirst.shared(),
            Self::Join { separator } => Join::new(separator.as_str()).shared(),
            Self::Take { start, end } => Take::new(*start, *end).shared(),
            Self::TakeOne { index } => TakeOne::new(*index).shared(),
            Self::RegexExtract { patterns } => RegexExtract::new(patterns)?.shared(),
            Self::ReplaceTag { replacement } => ReplaceTag::new(replacement.as_str()).shared(),
            Self::RemoveTag {
                which_ones,
                keep,
                keep_content,
            } => RemoveTag::new(which_ones.iter().cloned(), keep.iter().cloned(), *keep_content)?
                .shared(),
            Self::Strip { chars } => match chars {
                Some(chars) => Strip::chars(chars.as_str()).shared(),
                None => Strip::new().shared(),
            },
            Self::Replace {
                pattern,
                replacement,
            } => Replace::new(pattern, replacement.as_str())?.shared(),
            Self::Split { pattern } => Split::new(pattern)?.shared(),
            Self::JoinCanonicalizeUrl { base, canonicalize } => {
                JoinCanonicalizeUrl::new(base.as_deref())?
                    .canonicalize(*canonicalize)
                    .shared()
            }
            Self::SelectExtract { queries, re } => {
                SelectExtract::new(queries.iter().cloned(), re.as_deref())?.shared()
            }
            Self::Compose {
                steps,
                stop_on_null,
            } => Compose::new(build_steps(steps)?)
                .stop_on_null(*stop_on_null)
                .shared(),
            Self::MapCompose { steps } => MapCompose::new(build_steps(steps)?).shared(),
        };
        Ok(processor)
    }
}

fn build_steps(steps: &[ProcessorSpec]) -> Result<Vec<ProcessorRef>> {
    steps.iter().map(ProcessorSpec::build).collect()
}

/// Processors and value source of one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default)]
    pub input: Option<ProcessorSpec>,
    #[serde(default)]
    pub output: Option<ProcessorSpec>,
    /// Selector queries, or key regexes for text sources.
    #[serde(default)]
    pub queries: Vec<String>,
    /// Regex applied to the extracted values.
    #[serde(default)]
    pub re: Option<String>,
}

/// A whole loader described as data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    pub default_input: Option<ProcessorSpec>,
    #[serde(default)]
    pub default_output: Option<ProcessorSpec>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldConfig>,
}

impl LoaderConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| LoaderError::InvalidConfig(err.to_string()))
    }

    /// Build the loader definition: defaults plus every field override.
    pub fn definition(&self) -> Result<LoaderDefinition> {
        let mut definition = LoaderDefinition::new();
        if let Some(spec) = &self.default_input {
            definition = definition.with_default_input(spec.build()?);
        }
        if let Some(spec) = &self.default_output {
            definition = definition.with_default_output(spec.build()?);
        }
        for (name, field) in &self.fields {
            if let Some(spec) = &field.input {
                definition.set_field_input(name.as_str(), spec.build()?);
            }
            if let Some(spec) = &field.output {
                definition.set_field_output(name.as_str(), spec.build()?);
            }
        }
        tracing::debug!(fields = self.fields.len(), "built loader definition from config");
        Ok(definition)
    }
}
