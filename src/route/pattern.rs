//! Segment-based path patterns.
//!
//! A pattern is compiled once from a template such as
//! `/:year/:month/:slug/:edit?` and then used in both directions:
//!
//! - [`PathPattern::match_path`]: request path -> captured fields
//! - [`PathPattern::generate`]: fields -> canonical path
//!
//! # Template Syntax
//!
//! | Segment  | Meaning                                   |
//! |----------|-------------------------------------------|
//! | `tag`    | Literal, compared exactly                 |
//! | `:slug`  | Required capture of one whole segment     |
//! | `:edit?` | Optional capture, only allowed trailing   |
//!
//! Matching works on `/`-delimited segments only, so the trailing slash of
//! the request path never affects whether a pattern matches.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::core::{UrlPath, split_segments};

/// Captured field values keyed by capture name.
pub type Fields = BTreeMap<String, String>;

/// Errors raised while compiling a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template is empty")]
    Empty,

    #[error("template `{0}` must start with `/`")]
    MissingLeadingSlash(String),

    #[error("template `{template}` has an empty segment")]
    EmptySegment { template: String },

    #[error("invalid capture name `{name}` in template `{template}`")]
    InvalidCaptureName { template: String, name: String },

    #[error("capture `{name}` appears more than once in template `{template}`")]
    DuplicateCapture { template: String, name: String },

    #[error("segment `{segment}` in template `{template}` mixes literal text and a capture")]
    MixedSegment { template: String, segment: String },

    #[error("optional capture `{name}` in template `{template}` is followed by a required segment")]
    OptionalNotTrailing { template: String, name: String },
}

/// Errors raised while generating a path from fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("missing value for capture `{0}`")]
    MissingField(String),

    #[error("value `{value}` for capture `{name}` is not a single path segment")]
    InvalidValue { name: String, value: String },

    #[error("optional capture `{present}` is set while earlier optional `{missing}` is not")]
    OptionalGap { missing: String, present: String },
}

/// One compiled template segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, compared exactly
    Literal(String),
    /// Named capture of one whole segment
    Capture { name: String, optional: bool },
}

impl Segment {
    /// Classify one raw template segment.
    fn parse(raw: &str, template: &str) -> Result<Self, TemplateError> {
        let Some(capture) = raw.strip_prefix(':') else {
            if raw.contains([':', '?']) {
                return Err(TemplateError::MixedSegment {
                    template: template.to_string(),
                    segment: raw.to_string(),
                });
            }
            return Ok(Self::Literal(raw.to_string()));
        };

        let (name, optional) = match capture.strip_suffix('?') {
            Some(name) => (name, true),
            None => (capture, false),
        };

        if !is_capture_name(name) {
            let err = if name.contains([':', '?']) {
                TemplateError::MixedSegment {
                    template: template.to_string(),
                    segment: raw.to_string(),
                }
            } else {
                TemplateError::InvalidCaptureName {
                    template: template.to_string(),
                    name: name.to_string(),
                }
            };
            return Err(err);
        }

        Ok(Self::Capture {
            name: name.to_string(),
            optional,
        })
    }

    fn render(&self) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Capture { name, optional } => {
                format!(":{name}{}", if *optional { "?" } else { "" })
            }
        }
    }
}

/// Capture names: ASCII letter or `_` first, then alphanumerics or `_`.
fn is_capture_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A compiled, immutable path grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
    /// Number of leading segments that must be present
    required: usize,
}

impl PathPattern {
    /// Compile a template string.
    pub fn compile(template: &str) -> Result<Self, TemplateError> {
        let template = template.trim();
        if template.is_empty() {
            return Err(TemplateError::Empty);
        }
        if !template.starts_with('/') {
            return Err(TemplateError::MissingLeadingSlash(template.to_string()));
        }

        let body = template.trim_start_matches('/');
        let body = body.strip_suffix('/').unwrap_or(body);

        let mut segments = Vec::new();
        if !body.is_empty() {
            for raw in body.split('/') {
                if raw.is_empty() {
                    return Err(TemplateError::EmptySegment {
                        template: template.to_string(),
                    });
                }
                segments.push(Segment::parse(raw, template)?);
            }
        }

        Self::from_segments(template.to_string(), segments)
    }

    /// Validate segment invariants and build the pattern.
    fn from_segments(source: String, segments: Vec<Segment>) -> Result<Self, TemplateError> {
        let mut seen: Vec<&str> = Vec::new();
        let mut first_optional: Option<&str> = None;
        let mut required = 0;

        for segment in &segments {
            match segment {
                Segment::Capture { name, optional } => {
                    if seen.contains(&name.as_str()) {
                        return Err(TemplateError::DuplicateCapture {
                            template: source,
                            name: name.clone(),
                        });
                    }
                    seen.push(name);

                    if *optional {
                        first_optional.get_or_insert(name);
                        continue;
                    }
                }
                Segment::Literal(_) => {}
            }

            if let Some(name) = first_optional {
                return Err(TemplateError::OptionalNotTrailing {
                    template: source.clone(),
                    name: name.to_string(),
                });
            }
            required += 1;
        }

        Ok(Self {
            source,
            segments,
            required,
        })
    }

    /// The same pattern with one extra trailing optional capture.
    ///
    /// `/:year/:slug/` with `edit` becomes `/:year/:slug/:edit?`.
    pub fn with_optional_suffix(&self, name: &str) -> Result<Self, TemplateError> {
        let mut segments = self.segments.clone();
        segments.push(Segment::Capture {
            name: name.to_string(),
            optional: true,
        });
        let source = if self.source.ends_with('/') {
            format!("{}:{name}?", self.source)
        } else {
            format!("{}/:{name}?", self.source)
        };
        Self::from_segments(source, segments)
    }

    /// Template text this pattern was compiled from.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Capture names in template order.
    pub fn captures(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Capture { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn has_capture(&self, name: &str) -> bool {
        self.captures().any(|capture| capture == name)
    }

    /// Match a decoded request path.
    pub fn match_path(&self, path: &str) -> Option<Fields> {
        self.match_segments(&split_segments(path))
    }

    /// Match already-split path segments.
    pub fn match_segments(&self, parts: &[&str]) -> Option<Fields> {
        if parts.len() < self.required || parts.len() > self.segments.len() {
            return None;
        }

        let mut fields = Fields::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(text) if text == part => {}
                Segment::Literal(_) => return None,
                Segment::Capture { name, .. } => {
                    fields.insert(name.clone(), (*part).to_string());
                }
            }
        }
        Some(fields)
    }

    /// Build the canonical path for the given fields.
    ///
    /// Fields not named by the pattern are ignored. Optional captures may be
    /// left out, but only from the end.
    pub fn generate(&self, fields: &Fields) -> Result<UrlPath, GenerateError> {
        let mut parts: Vec<&str> = Vec::with_capacity(self.segments.len());
        let mut missing_optional: Option<&str> = None;

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => parts.push(text),
                Segment::Capture { name, optional } => match fields.get(name) {
                    Some(value) => {
                        if value.is_empty() || value.contains('/') {
                            return Err(GenerateError::InvalidValue {
                                name: name.clone(),
                                value: value.clone(),
                            });
                        }
                        if let Some(missing) = missing_optional {
                            return Err(GenerateError::OptionalGap {
                                missing: missing.to_string(),
                                present: name.clone(),
                            });
                        }
                        parts.push(value);
                    }
                    None if *optional => {
                        missing_optional.get_or_insert(name);
                    }
                    None => return Err(GenerateError::MissingField(name.clone())),
                },
            }
        }

        Ok(UrlPath::from_segments(&parts))
    }
}

impl FromStr for PathPattern {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.segments.iter().map(Segment::render).collect();
        if rendered.is_empty() {
            return f.write_str("/");
        }
        write!(f, "/{}/", rendered.join("/"))
    }
}
