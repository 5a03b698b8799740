//! Path specification compilation and matching.
//!
//! # Responsibilities
//! - Compile a path specification into a case-insensitive regex
//! - Tell raw patterns (`/.../`) apart from templated paths
//! - Expand `[name]` placeholders into named capture groups
//! - Extract every participating capture group from a URL
//!
//! # Design Decisions
//! - Literal text in templated paths is fully escaped, so `/feed.json`
//!   only matches itself
//! - Templated paths are anchored at both ends; raw patterns are taken as
//!   written and anchor only if they say so
//! - The compiled regex source is the identity of a pattern; two
//!   specifications compiling to the same source share one route entry

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::routing::error::RouterError;
use crate::routing::target::CaptureKey;

/// Captured groups keyed by group index (`"0"`, `"1"`, ...) and by name.
pub type Args = BTreeMap<String, String>;

/// Upper bound on compiled regex size for a single route.
const MAX_ROUTE_REGEX_SIZE: usize = 1 << 20;

/// Character class a `[name]` placeholder accepts.
const PLACEHOLDER_CLASS: &str = "(?-u:[A-Za-z0-9_])+";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([A-Za-z_][A-Za-z0-9_]*)\]").expect("placeholder regex is valid")
});

/// How a pattern was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Plain path, possibly with `[name]` placeholders.
    Templated,
    /// Regex wrapped in `/` delimiters.
    Raw,
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    spec: String,
    source: String,
    kind: PatternKind,
    regex: Regex,
}

impl RoutePattern {
    /// Compile a path specification.
    ///
    /// `"/about/[id]"` becomes `^/about/(?P<id>(?-u:[A-Za-z0-9_])+)$`, while
    /// `"/^\/(\d{3})\/(\w+)$/"` is used as the regex `^\/(\d{3})\/(\w+)$`.
    /// Both are matched case-insensitively.
    pub fn compile(spec: &str) -> Result<Self, RouterError> {
        if spec.is_empty() {
            return Err(RouterError::EmptyPath);
        }

        let (kind, source) = if is_raw(spec) {
            (PatternKind::Raw, spec[1..spec.len() - 1].to_string())
        } else {
            (PatternKind::Templated, expand_template(spec))
        };

        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .size_limit(MAX_ROUTE_REGEX_SIZE)
            .build()
            .map_err(|source| RouterError::InvalidPattern {
                pattern: spec.to_string(),
                source,
            })?;

        Ok(Self {
            spec: spec.to_string(),
            source,
            kind,
            regex,
        })
    }

    /// The specification this pattern was compiled from.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// The compiled regex source.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// Returns true if the URL matches this pattern.
    pub fn is_match(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }

    /// Names of the named capture groups, in group order.
    pub fn capture_names(&self) -> impl Iterator<Item = &str> {
        self.regex.capture_names().flatten()
    }

    /// Returns true if a capture reference can ever be satisfied by this pattern.
    pub fn defines(&self, key: &CaptureKey) -> bool {
        match key {
            CaptureKey::Index(i) => *i < self.regex.captures_len(),
            CaptureKey::Name(name) => self.capture_names().any(|n| n == name),
        }
    }

    /// Match the URL and collect every participating group.
    ///
    /// Each group is stored under its index; named groups are stored under
    /// their name as well. Groups that did not take part in the match are
    /// absent.
    pub fn captures(&self, url: &str) -> Option<Args> {
        let caps = self.regex.captures(url)?;
        let mut args = Args::new();

        for (index, name) in self.regex.capture_names().enumerate() {
            if let Some(m) = caps.get(index) {
                args.insert(index.to_string(), m.as_str().to_string());
                if let Some(name) = name {
                    args.insert(name.to_string(), m.as_str().to_string());
                }
            }
        }

        Some(args)
    }
}

/// A specification is a raw regex when it is wrapped in `/` delimiters.
/// The root path `/` on its own is a literal.
fn is_raw(spec: &str) -> bool {
    spec.len() >= 2 && spec.starts_with('/') && spec.ends_with('/')
}

/// Escape literal text and turn `[name]` tokens into named groups.
fn expand_template(spec: &str) -> String {
    let mut source = String::from("^");
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(spec) {
        let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        source.push_str(&regex::escape(&spec[last..token.start()]));
        source.push_str(&format!("(?P<{}>{})", name.as_str(), PLACEHOLDER_CLASS));
        last = token.end();
    }

    source.push_str(&regex::escape(&spec[last..]));
    source.push('$');
    source
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_path() {
        let pattern = RoutePattern::compile("/about").unwrap();
        assert_eq!(pattern.kind(), PatternKind::Templated);
        assert_eq!(pattern.source(), "^/about$");

        assert!(pattern.is_match("/about"));
        assert!(pattern.is_match("/ABOUT")); // Case insensitive
        assert!(!pattern.is_match("/about/"));
        assert!(!pattern.is_match("/about/us"));
        assert!(!pattern.is_match("/x/about"));
    }

    #[test]
    fn test_root_is_literal() {
        let pattern = RoutePattern::compile("/").unwrap();
        assert_eq!(pattern.kind(), PatternKind::Templated);
        assert!(pattern.is_match("/"));
        assert!(!pattern.is_match("/home"));
    }

    #[test]
    fn test_literal_metacharacters_are_escaped() {
        let pattern = RoutePattern::compile("/feed.json").unwrap();
        assert!(pattern.is_match("/feed.json"));
        assert!(!pattern.is_match("/feedXjson"));
    }

    #[test]
    fn test_placeholder_capture() {
        let pattern = RoutePattern::compile("/about/addNew/[id]").unwrap();
        let args = pattern.captures("/about/addNew/12345hello").unwrap();

        assert_eq!(args.get("id").map(String::as_str), Some("12345hello"));
        assert_eq!(args.get("1").map(String::as_str), Some("12345hello"));
        assert_eq!(args.get("0").map(String::as_str), Some("/about/addNew/12345hello"));

        assert!(pattern.captures("/about/addnew/").is_none());
        assert!(pattern.captures("/about/addNew/\u{212A}\u{017F}").is_none());
        assert!(pattern.captures("/about/addNew/caf\u{e9}").is_none());
        assert!(pattern.captures("/about/addnew/a-b").is_none());
        assert!(pattern.captures("/about/addnew/a/b").is_none());
    }

    #[test]
    fn test_placeholder_names_in_order() {
        let pattern = RoutePattern::compile("/login/[controller]/[action]/[id]").unwrap();
        let names: Vec<&str> = pattern.capture_names().collect();
        assert_eq!(names, vec!["controller", "action", "id"]);

        assert!(pattern.defines(&CaptureKey::Name("action".into())));
        assert!(pattern.defines(&CaptureKey::Index(3)));
        assert!(!pattern.defines(&CaptureKey::Index(4)));
        assert!(!pattern.defines(&CaptureKey::Name("slug".into())));
    }

    #[test]
    fn test_non_identifier_brackets_stay_literal() {
        let pattern = RoutePattern::compile("/list/[a-b]").unwrap();
        assert!(pattern.is_match("/list/[a-b]"));
        assert!(!pattern.is_match("/list/a"));
        assert_eq!(pattern.capture_names().count(), 0);
    }

    #[test]
    fn test_raw_pattern() {
        let pattern = RoutePattern::compile(r"/^\/(\d{3})\/(\w+)$/").unwrap();
        assert_eq!(pattern.kind(), PatternKind::Raw);
        assert_eq!(pattern.source(), r"^\/(\d{3})\/(\w+)$");

        let args = pattern.captures("/123/DELETE").unwrap();
        assert_eq!(args.get("1").map(String::as_str), Some("123"));
        assert_eq!(args.get("2").map(String::as_str), Some("DELETE"));
        assert!(!pattern.is_match("/12/delete"));
    }

    #[test]
    fn test_raw_pattern_is_unanchored_unless_written() {
        let pattern = RoutePattern::compile("/about/").unwrap();
        assert_eq!(pattern.kind(), PatternKind::Raw);
        assert!(pattern.is_match("/x/ABOUT/y"));
    }

    #[test]
    fn test_raw_pattern_named_groups() {
        let pattern = RoutePattern::compile(r"/^\/posts\/(?<slug>[a-z-]+)$/").unwrap();
        let args = pattern.captures("/posts/hello-world").unwrap();
        assert_eq!(args.get("slug").map(String::as_str), Some("hello-world"));
    }

    #[test]
    fn test_optional_group_absent_when_not_participating() {
        let pattern = RoutePattern::compile(r"/^\/page(\/(\d+))?$/").unwrap();
        let args = pattern.captures("/page").unwrap();
        assert!(args.contains_key("0"));
        assert!(!args.contains_key("2"));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(RoutePattern::compile(""), Err(RouterError::EmptyPath)));
        assert!(matches!(
            RoutePattern::compile("/(unclosed/"),
            Err(RouterError::InvalidPattern { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/[id]/[id]"),
            Err(RouterError::InvalidPattern { .. })
        ));
    }
}
