//! Controller/action references and their resolution.
//!
//! A reference is either a literal identifier or a `$` back-reference into
//! the captures of the matching pattern (`$1`, `$controller`). References
//! are parsed once at registration.

use std::fmt;

use crate::routing::matcher::{Args, RoutePattern};
use crate::routing::error::RouterError;

/// Sigil marking a back-reference.
pub const CAPTURE_SIGIL: char = '$';

/// Identifies a capture group by position or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureKey {
    Index(usize),
    Name(String),
}

impl CaptureKey {
    fn parse(raw: &str) -> Self {
        match raw.parse::<usize>() {
            Ok(index) => CaptureKey::Index(index),
            Err(_) => CaptureKey::Name(raw.to_string()),
        }
    }
}

impl fmt::Display for CaptureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureKey::Index(i) => write!(f, "{}", i),
            CaptureKey::Name(name) => write!(f, "{}", name),
        }
    }
}

/// A controller or action reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Literal(String),
    Capture(CaptureKey),
}

impl Reference {
    /// Parse a reference string; a leading `$` makes it a back-reference.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(CAPTURE_SIGIL) {
            Some(key) => Reference::Capture(CaptureKey::parse(key)),
            None => Reference::Literal(raw.to_string()),
        }
    }

    /// Resolve against the captures of a match.
    pub fn resolve(&self, captures: &Args) -> Option<String> {
        match self {
            Reference::Literal(value) => Some(value.clone()),
            Reference::Capture(key) => captures.get(&key.to_string()).cloned(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Literal(value) => write!(f, "{}", value),
            Reference::Capture(key) => write!(f, "{}{}", CAPTURE_SIGIL, key),
        }
    }
}

/// Where a matched route goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub controller: Reference,
    pub action: Reference,
}

impl Target {
    pub fn new(controller: &str, action: &str) -> Self {
        Self {
            controller: Reference::parse(controller),
            action: Reference::parse(action),
        }
    }

    /// Reject back-references the pattern can never satisfy.
    pub fn check(&self, pattern: &RoutePattern) -> Result<(), RouterError> {
        for reference in [&self.controller, &self.action] {
            if let Reference::Capture(key) = reference {
                if !pattern.defines(key) {
                    return Err(RouterError::UnknownCapture {
                        pattern: pattern.spec().to_string(),
                        reference: reference.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
