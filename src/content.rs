//! The content document that drives every section of the page.
//!
//! A document is a mapping of section name to an arbitrary nested tree of
//! strings, numbers, lists and mappings. It is parsed once, wrapped in an
//! [`Rc`](std::rc::Rc) by the [`store`](crate::store), and never mutated:
//! reloading content produces a new document that replaces the old one.
//!
//! ## Supported Formats
//!
//! The parser is picked from the file extension:
//!
//! | Extension | Parser |
//! |-----------|--------|
//! | `.yaml`, `.yml` | `serde_yaml` |
//! | `.json` | `serde_json` |
//! | `.toml` | `toml` |
//!
//! ## Typed Slices
//!
//! The tree itself is kept untyped. Each section asks for its own slice with
//! [`ContentDocument::section`], which deserializes into one of the view
//! types below. A missing slice or a missing required field is a
//! [`ContentShapeError`]; optional fields are `Option`/`#[serde(default)]`
//! and the dependent markup is simply omitted.
//!
//! ```text
//! navigation.items[]{label,href}   navigation.cta_button
//! hero.title.{line1,line2}         hero.subtitle   hero.buttons.{primary,secondary}
//! products.items[]{name,description,price,image,bestseller}
//! features.items[]{icon,title,description}
//! about.images[]{src,alt}          about.paragraphs[]
//! footer.sections[]{title,links[]{name,href}}   footer.social[]{platform,href,icon}
//! brand.{name,tagline,logo}        ui.loading
//! ```

use crate::types::ImageRef;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported content format `{0}` (expected .yaml, .yml, .json or .toml)")]
    UnsupportedFormat(String),
    #[error("content document root must be a mapping of section names")]
    NotAMapping,
}

/// A section read a slice that is missing or does not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("content section `{section}` is malformed: {detail}")]
pub struct ContentShapeError {
    pub section: String,
    pub detail: String,
}

/// Immutable parsed content document.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDocument {
    root: Value,
}

impl ContentDocument {
    /// Wrap an already-parsed tree. The root must be a mapping.
    pub fn from_value(root: Value) -> Result<Self, ContentError> {
        if !root.is_object() {
            return Err(ContentError::NotAMapping);
        }
        Ok(Self { root })
    }

    /// Read and parse a document, choosing the format by extension.
    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        let text = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let root: Value = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&text)?,
            "json" => serde_json::from_str(&text)?,
            "toml" => toml::from_str(&text)?,
            other => return Err(ContentError::UnsupportedFormat(other.to_string())),
        };
        Self::from_value(root)
    }

    /// The raw slice stored under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }

    /// Top-level keys in the document.
    pub fn section_keys(&self) -> Vec<&str> {
        self.root
            .as_object()
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Deserialize the slice under `name` into a typed view.
    pub fn section<T: DeserializeOwned>(&self, name: &str) -> Result<T, ContentShapeError> {
        let value = self.get(name).ok_or_else(|| ContentShapeError {
            section: name.to_string(),
            detail: "section is missing from the content document".to_string(),
        })?;
        T::deserialize(value).map_err(|e| ContentShapeError {
            section: name.to_string(),
            detail: e.to_string(),
        })
    }

    /// Like [`section`](Self::section), but an absent slice is `Ok(None)`.
    pub fn optional_section<T: DeserializeOwned>(
        &self,
        name: &str,
    ) -> Result<Option<T>, ContentShapeError> {
        match self.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.section(name).map(Some),
        }
    }

    /// Loading text from `ui.loading`, tolerating any shape problem.
    pub fn loading_text(&self) -> Option<&str> {
        self.root.get("ui")?.get("loading")?.as_str()
    }

    /// Short SHA-256 digest of the document.
    ///
    /// `serde_json` maps are ordered, so equal documents always produce the
    /// same fingerprint regardless of the source format's key order.
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(&self.root).unwrap_or_default();
        let digest = Sha256::digest(&bytes);
        format!("{:x}", digest)[..16].to_string()
    }
}

// ============================================================================
// Typed section views
// ============================================================================

/// A string, number or boolean rendered verbatim (prices are often numbers).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Navigation {
    pub items: Vec<NavLink>,
    pub cta_button: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Brand {
    pub name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeroTitle {
    pub line1: String,
    pub line2: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeroButtons {
    pub primary: String,
    pub secondary: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hero {
    pub title: HeroTitle,
    pub subtitle: String,
    pub buttons: HeroButtons,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub name: String,
    pub description: String,
    pub price: Scalar,
    pub image: String,
    #[serde(default)]
    pub bestseller: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Products {
    pub section_title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub items: Vec<Product>,
    #[serde(default)]
    pub cta_button: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub icon: Option<String>,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Features {
    pub section_title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub items: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct About {
    pub title: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub cta_button: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FooterLink {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FooterColumn {
    pub title: String,
    pub links: Vec<FooterLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub href: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Footer {
    pub sections: Vec<FooterColumn>,
    #[serde(default)]
    pub social: Vec<SocialLink>,
    #[serde(default)]
    pub copyright: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    #[serde(default)]
    pub loading: Option<String>,
}
