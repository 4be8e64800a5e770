//! Compiles path templates into anchored regular expressions.
//!
//! A template such as `/api/v2/widgets/{id}/` must match `/api/v2/widgets/7/`
//! but neither `/api/v2/widgets/` nor `/api/v2/widgets/7/runs/`, so matching is
//! always against the whole concrete path.

use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}/]+)\}").expect("placeholder pattern is valid"));

const DIGITS: &str = "[0-9]+";
const SLUG: &str = r"[a-zA-Z0-9\-]+";
const SEGMENT: &str = "[^/]+";

/// A compiled path template.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    template: String,
    regex: Regex,
}

impl PathMatcher {
    pub fn compile(template: &str) -> Result<Self, regex::Error> {
        let mut pattern = String::from("^");
        let mut last = 0;

        for caps in RE_PLACEHOLDER.captures_iter(template) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            pattern.push_str(&regex::escape(&template[last..whole.start()]));
            pattern.push_str(placeholder_pattern(name.as_str()));
            last = whole.end();
        }
        pattern.push_str(&regex::escape(&template[last..]));
        pattern.push('$');

        debug!("Compiled {} to {}", template, pattern);
        Ok(Self {
            template: template.to_string(),
            regex: Regex::new(&pattern)?,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Numeric identifiers and slugs get their own shapes; any other placeholder
/// spans exactly one path segment.
fn placeholder_pattern(name: &str) -> &'static str {
    if name == "id" || name == "pk" || name.ends_with("_id") || name.ends_with("_pk") {
        DIGITS
    } else if name.ends_with("slug") {
        SLUG
    } else {
        SEGMENT
    }
}
