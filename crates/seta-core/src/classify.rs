//! Job name classification.
//!
//! A raw job name such as `mochitest-e10s-browser-chrome-3` is reduced to
//! a group tag (`Me10s-bc`) and a short code (`3`). The leftmost match
//! wins; among rules matching at the same offset the table order decides,
//! so a specific family must precede any rule whose pattern is a prefix
//! of it (`mochitest-e10s-browser-chrome` before `mochitest-e10s` before
//! `mochitest`).

use regex::Regex;
use serde::Serialize;

use crate::error::{ClassificationError, ClassifierError};

/// Pattern and canonical group for every known job family.
pub const STANDARD_RULES: &[(&str, &str)] = &[
    ("mochitest-browser-chrome-?", "M-bc"),
    ("mochitest-e10s-browser-chrome-?", "Me10s-bc"),
    ("mochitest-e10s-devtools-chrome-?", "M-dt"),
    ("mochitest-e10s", "Me10s"),
    ("mochitest-devtools-chrome-?", "M-dt"),
    ("mochitest-other", "M-oth"),
    ("mochitest", "M"),
    ("crashtest-ipc", "R-C-ipc"),
    ("crashtest", "R-C"),
    ("jsreftest", "R-J"),
    ("reftest-no-accel", "R-RU"),
    ("reftest-e10s", "Re10s-R"),
    ("reftest", "R-R"),
    ("xpcshell", "O-X"),
    ("marionette", "O-Mn"),
    ("cppunit", "O-Cpp"),
    ("jittest-?", "O-Jit"),
    ("web-platform-tests", "WPT"),
];

/// Top-level groups, declared in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TopGroup {
    #[serde(rename = "O")]
    Other,
    #[serde(rename = "M")]
    Mochitest,
    #[serde(rename = "Me10s")]
    MochitestE10s,
    #[serde(rename = "R")]
    Reftest,
    #[serde(rename = "Re10s")]
    ReftestE10s,
    #[serde(rename = "WPT")]
    WebPlatform,
}

impl TopGroup {
    pub const ORDERED: [TopGroup; 6] = [
        TopGroup::Other,
        TopGroup::Mochitest,
        TopGroup::MochitestE10s,
        TopGroup::Reftest,
        TopGroup::ReftestE10s,
        TopGroup::WebPlatform,
    ];

    /// Tag as it appears at the start of a group (`Me10s` in `Me10s-bc`).
    pub fn tag(self) -> &'static str {
        match self {
            TopGroup::Other => "O",
            TopGroup::Mochitest => "M",
            TopGroup::MochitestE10s => "Me10s",
            TopGroup::Reftest => "R",
            TopGroup::ReftestE10s => "Re10s",
            TopGroup::WebPlatform => "WPT",
        }
    }

    /// Label printed in front of a bucket.
    pub fn label(self) -> &'static str {
        match self {
            TopGroup::Other => "O",
            TopGroup::Mochitest => "M",
            TopGroup::MochitestE10s => "M-e10s",
            TopGroup::Reftest => "R",
            TopGroup::ReftestE10s => "R-e10s",
            TopGroup::WebPlatform => "W",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ORDERED.into_iter().find(|group| group.tag() == tag)
    }
}

/// Result of classifying one job name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobClass {
    pub top: TopGroup,
    /// Canonical group, e.g. `M-bc` or `WPT`.
    pub group: String,
    /// Residual qualifier, possibly empty.
    pub short_code: String,
}

impl JobClass {
    /// Part of the group after the top-level tag (`bc` for `M-bc`).
    pub fn family(&self) -> &str {
        self.group
            .split_once('-')
            .map(|(_, family)| family)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone)]
struct Rule {
    pattern: Regex,
    group: String,
    top: TopGroup,
}

/// Compiled, ordered rule table.
#[derive(Debug, Clone)]
pub struct NameClassifier {
    rules: Vec<Rule>,
}

impl NameClassifier {
    /// Classifier over [`STANDARD_RULES`].
    pub fn standard() -> Result<Self, ClassifierError> {
        Self::with_rules(STANDARD_RULES)
    }

    /// Compile a custom rule table; every group must start with a known
    /// top-level tag.
    pub fn with_rules(rules: &[(&str, &str)]) -> Result<Self, ClassifierError> {
        let rules = rules
            .iter()
            .map(|(pattern, group)| {
                let compiled = Regex::new(pattern).map_err(|source| ClassifierError::Pattern {
                    pattern: (*pattern).to_string(),
                    source,
                })?;
                let tag = group.split('-').next().unwrap_or_default();
                let top = TopGroup::from_tag(tag).ok_or_else(|| ClassifierError::UnknownGroup {
                    pattern: (*pattern).to_string(),
                    group: (*group).to_string(),
                })?;
                Ok(Rule {
                    pattern: compiled,
                    group: (*group).to_string(),
                    top,
                })
            })
            .collect::<Result<Vec<_>, ClassifierError>>()?;
        Ok(Self { rules })
    }

    /// Classify `raw_name` with the rule matching leftmost in it; rules
    /// matching at the same offset are tried in table order.
    ///
    /// The match must start the name. Text after it, with the joining
    /// dash removed, becomes the short code.
    pub fn classify(&self, raw_name: &str) -> Result<JobClass, ClassificationError> {
        let mut best: Option<(&Rule, regex::Match<'_>)> = None;
        for rule in &self.rules {
            let Some(found) = rule.pattern.find(raw_name) else {
                continue;
            };
            if best.map_or(true, |(_, current)| found.start() < current.start()) {
                best = Some((rule, found));
            }
        }

        // A family matched past the start leaves an unknown prefix as the
        // group, so the name belongs to no known group.
        if let Some((rule, found)) = best.filter(|(_, found)| found.start() == 0) {
            return Ok(JobClass {
                top: rule.top,
                group: rule.group.clone(),
                short_code: raw_name[found.end()..].trim_start_matches('-').to_string(),
            });
        }

        let mut parts = raw_name.split('-');
        Err(ClassificationError {
            raw_name: raw_name.to_string(),
            group: parts.next().unwrap_or_default().to_string(),
            code: parts.next().unwrap_or_default().to_string(),
        })
    }
}
