//! Serialization formats for the catalog payload

use std::fmt;
use std::io::{Read, Write};

use bincode::Options;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;

/// Upper bound on a decoded binary payload, guarding against absurd length prefixes
const BINARY_LIMIT: u64 = 64 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("Binary serialization error: {0}")]
    Binary(#[from] bincode::Error),
}

/// Encoding used for the payload inside the encrypted container
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    /// Human-readable JSON
    #[default]
    Json,
    /// Human-readable YAML
    Yaml,
    /// Compact binary
    #[serde(alias = "binary")]
    #[value(alias = "binary")]
    Bin,
}

impl FormatKind {
    /// File extension reflecting the encoding, placed before `.enc`
    pub fn extension(&self) -> &'static str {
        match self {
            FormatKind::Json => "json",
            FormatKind::Yaml => "yaml",
            FormatKind::Bin => "bin",
        }
    }

    /// The codec implementing this format
    pub fn codec(&self) -> &'static dyn CatalogCodec {
        match self {
            FormatKind::Json => &JsonCodec,
            FormatKind::Yaml => &YamlCodec,
            FormatKind::Bin => &BinaryCodec,
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Encodes and decodes a [`Catalog`] over byte streams
pub trait CatalogCodec: Sync {
    fn encode(&self, catalog: &Catalog, sink: &mut dyn Write) -> Result<(), CodecError>;

    fn decode(&self, source: &mut dyn Read) -> Result<Catalog, CodecError>;
}

pub struct JsonCodec;

impl CatalogCodec for JsonCodec {
    fn encode(&self, catalog: &Catalog, sink: &mut dyn Write) -> Result<(), CodecError> {
        serde_json::to_writer_pretty(sink, catalog)?;
        Ok(())
    }

    fn decode(&self, source: &mut dyn Read) -> Result<Catalog, CodecError> {
        Ok(serde_json::from_reader(source)?)
    }
}

pub struct YamlCodec;

impl CatalogCodec for YamlCodec {
    fn encode(&self, catalog: &Catalog, sink: &mut dyn Write) -> Result<(), CodecError> {
        serde_yaml_ng::to_writer(sink, catalog)?;
        Ok(())
    }

    fn decode(&self, source: &mut dyn Read) -> Result<Catalog, CodecError> {
        Ok(serde_yaml_ng::from_reader(source)?)
    }
}

pub struct BinaryCodec;

impl BinaryCodec {
    fn options() -> impl Options {
        bincode::DefaultOptions::new().with_limit(BINARY_LIMIT)
    }
}

impl CatalogCodec for BinaryCodec {
    fn encode(&self, catalog: &Catalog, sink: &mut dyn Write) -> Result<(), CodecError> {
        Self::options().serialize_into(sink, catalog)?;
        Ok(())
    }

    fn decode(&self, source: &mut dyn Read) -> Result<Catalog, CodecError> {
        Ok(Self::options().deserialize_from(source)?)
    }
}
