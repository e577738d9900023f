// crates/core/src/registry.rs
//
// Static identity tables for AI tools and automation bots.
//
// Two tiers: classifications the upstream pass already pinned resolve through
// the fixed map; the catch-alls (`ai-assisted`, `other-bot`) are refined by
// testing PR evidence against the ordered pattern lists below. First pattern
// that matches wins, so list order is part of the contract: keep specific
// patterns above general ones and only ever append new entries.

use provenance_types::{AttributionMatch, Classification, Lane};
use regex_lite::Regex;
use std::sync::LazyLock;
use tracing::error;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A `{key, label, lane}` triple known at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub lane: Lane,
}

impl MatchSpec {
    pub const fn new(key: &'static str, label: &'static str, lane: Lane) -> Self {
        Self { key, label, lane }
    }

    pub fn to_match(&self) -> AttributionMatch {
        AttributionMatch::new(self.key, self.label, self.lane)
    }
}

/// One compiled, case-insensitive pattern and the identity it resolves to.
#[derive(Debug, Clone)]
pub struct PatternEntry {
    pattern: Regex,
    source: &'static str,
    pub spec: MatchSpec,
}

impl PatternEntry {
    pub fn is_match(&self, haystack: &str) -> bool {
        self.pattern.is_match(haystack)
    }

    /// The pattern as written in the table, without the case-insensitive flag.
    pub fn source(&self) -> &'static str {
        self.source
    }
}

/// Fallback for `ai-assisted` signals that match no AI pattern.
pub const AI_UNSPECIFIED: MatchSpec =
    MatchSpec::new("ai-unspecified", "Unknown AI Assistant", Lane::Ai);

/// Fallback for `other-bot` signals that match no automation pattern.
pub const BOT_UNSPECIFIED: MatchSpec =
    MatchSpec::new("bot-unspecified", "Unknown Automation Bot", Lane::Automation);

// ---------------------------------------------------------------------------
// Fixed map
// ---------------------------------------------------------------------------

/// Identity for a classification that is already definite.
///
/// Returns `None` for `human` and for the two catch-alls, which go through
/// pattern matching instead.
pub fn fixed_spec(classification: Classification) -> Option<MatchSpec> {
    let spec = match classification {
        Classification::Copilot => MatchSpec::new("github-copilot", "GitHub Copilot", Lane::Ai),
        Classification::Claude => MatchSpec::new("claude", "Claude", Lane::Ai),
        Classification::Cursor => MatchSpec::new("cursor", "Cursor", Lane::Ai),
        Classification::Devin => MatchSpec::new("devin", "Devin", Lane::Ai),
        Classification::Codex => MatchSpec::new("openai-codex", "OpenAI Codex", Lane::Ai),
        Classification::Gemini => MatchSpec::new("gemini", "Gemini Code Assist", Lane::Ai),
        Classification::Dependabot => {
            MatchSpec::new("dependabot", "Dependabot", Lane::Automation)
        }
        Classification::Renovate => MatchSpec::new("renovate", "Renovate", Lane::Automation),
        Classification::GithubActions => {
            MatchSpec::new("github-actions", "GitHub Actions", Lane::Automation)
        }
        Classification::Human | Classification::AiAssisted | Classification::OtherBot => {
            return None
        }
    };
    Some(spec)
}

/// Reverse lookup: which classification a resolved identity should be stored as.
///
/// Keys from the fixed map return their own variant; anything else
/// (pattern-only identities and the unspecified fallbacks) lands in the
/// catch-all of its lane.
pub fn classification_for_key(key: &str, lane: Lane) -> Classification {
    Classification::ALL
        .into_iter()
        .find(|c| fixed_spec(*c).is_some_and(|spec| spec.key == key))
        .unwrap_or_else(|| Classification::catch_all(lane))
}

// ---------------------------------------------------------------------------
// Pattern tables
// ---------------------------------------------------------------------------

// (pattern, key, label). Order is load-bearing.
const AI_PATTERN_TABLE: &[(&str, &str, &str)] = &[
    (r"coderabbit", "coderabbit", "CodeRabbit"),
    (r"copilot", "github-copilot", "GitHub Copilot"),
    (r"claude|anthropic", "claude", "Claude"),
    (r"cursor", "cursor", "Cursor"),
    (r"devin", "devin", "Devin"),
    (r"codex|openai", "openai-codex", "OpenAI Codex"),
    (r"google-labs-jules|\bjules\b", "google-jules", "Jules"),
    (r"gemini", "gemini", "Gemini Code Assist"),
    (r"sweep", "sweep", "Sweep"),
    (r"codegen-sh|\bcodegen\b", "codegen", "Codegen"),
    (r"openhands|all-hands", "openhands", "OpenHands"),
    (r"\baider\b", "aider", "Aider"),
    (r"amazon-q|amazonq|q-developer", "amazon-q", "Amazon Q Developer"),
    (r"qodo|codium-?ai", "qodo", "Qodo"),
    (r"greptile", "greptile", "Greptile"),
    (r"ellipsis-dev|\bellipsis\b", "ellipsis", "Ellipsis"),
    (r"windsurf|codeium", "windsurf", "Windsurf"),
    (r"tabnine", "tabnine", "Tabnine"),
    (r"\bcline\b|roo-?code", "cline", "Cline"),
    (r"factory-droid|factory\.ai", "factory", "Factory Droid"),
];

const AUTOMATION_PATTERN_TABLE: &[(&str, &str, &str)] = &[
    (r"dependabot", "dependabot", "Dependabot"),
    (r"renovate", "renovate", "Renovate"),
    (r"github-actions", "github-actions", "GitHub Actions"),
    (r"snyk", "snyk", "Snyk"),
    (r"sentry", "sentry-bot", "Sentry Bot"),
    (r"pre-commit-ci", "pre-commit-ci", "pre-commit.ci"),
    (r"mergify", "mergify", "Mergify"),
    (r"all-?contributors", "all-contributors", "All Contributors"),
    (r"release-please", "release-please", "Release Please"),
    (r"semantic-release", "semantic-release", "semantic-release"),
    (r"changeset", "changesets", "Changesets"),
    (r"imgbot", "imgbot", "ImgBot"),
    (r"greenkeeper", "greenkeeper", "Greenkeeper"),
    (r"codecov", "codecov", "Codecov"),
    (r"pyup", "pyup", "PyUp"),
    (r"depfu", "depfu", "Depfu"),
    (r"vercel", "vercel", "Vercel"),
    (r"netlify", "netlify", "Netlify"),
    (r"weblate", "weblate", "Weblate"),
    (r"crowdin", "crowdin", "Crowdin"),
    (r"\bstale\b", "stale", "Stale"),
];

static AI_PATTERNS: LazyLock<Vec<PatternEntry>> =
    LazyLock::new(|| compile_table(AI_PATTERN_TABLE, Lane::Ai));

static AUTOMATION_PATTERNS: LazyLock<Vec<PatternEntry>> =
    LazyLock::new(|| compile_table(AUTOMATION_PATTERN_TABLE, Lane::Automation));

fn compile_table(table: &'static [(&'static str, &'static str, &'static str)], lane: Lane) -> Vec<PatternEntry> {
    table
        .iter()
        .filter_map(|&(source, key, label)| {
            match Regex::new(&format!("(?i){source}")) {
                Ok(pattern) => Some(PatternEntry {
                    pattern,
                    source,
                    spec: MatchSpec::new(key, label, lane),
                }),
                Err(e) => {
                    error!(pattern = source, lane = %lane, error = %e, "Dropping invalid attribution pattern");
                    None
                }
            }
        })
        .collect()
}

/// Ordered pattern list for a lane, compiled on first use.
pub fn patterns(lane: Lane) -> &'static [PatternEntry] {
    match lane {
        Lane::Ai => &AI_PATTERNS,
        Lane::Automation => &AUTOMATION_PATTERNS,
    }
}

/// The unspecified fallback for a lane.
pub fn unspecified(lane: Lane) -> MatchSpec {
    match lane {
        Lane::Ai => AI_UNSPECIFIED,
        Lane::Automation => BOT_UNSPECIFIED,
    }
}

/// First pattern in `lane` that matches `haystack`.
pub fn first_match(lane: Lane, haystack: &str) -> Option<MatchSpec> {
    patterns(lane)
        .iter()
        .find(|entry| entry.is_match(haystack))
        .map(|entry| entry.spec)
}
