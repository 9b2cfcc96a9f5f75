//! URL allowlist matching.
//!
//! One authoritative matcher shared by the local tab-change handler and the
//! store-side `check-tab` endpoint. Matching is deliberately permissive:
//! after normalization, a candidate is allowed if its domain and any allowed
//! fragment's domain contain one another, so subdomain entries
//! (`en.wikipedia.org`) and partial-domain entries (`wikipedia`) both work.
//!
//! An empty allowlist permits nothing. Callers avoid locking the user out of
//! the dashboard itself by seeding the study-site origin at session start
//! (see [`AllowedUrlSet::for_session`]).

use serde::{Deserialize, Serialize};

/// Normalize a URL or fragment down to its domain part.
///
/// Lowercases, strips a leading `scheme://`, strips a leading `www.`, and
/// truncates at the first `/`. No network resolution, no scheme or port
/// validation.
pub fn domain_of(input: &str) -> String {
    let lowered = input.trim().to_ascii_lowercase();
    let without_scheme = match lowered.split_once("://") {
        Some((_, rest)) => rest,
        None => lowered.as_str(),
    };
    let without_www = without_scheme.strip_prefix("www.").unwrap_or(without_scheme);
    without_www
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Decide whether `candidate` is permitted by `fragments`.
///
/// Empty `fragments` always returns false (fail closed).
pub fn is_allowed<S: AsRef<str>>(candidate: &str, fragments: &[S]) -> bool {
    let candidate_domain = domain_of(candidate);
    if candidate_domain.is_empty() {
        return false;
    }
    fragments.iter().any(|fragment| {
        let fragment_domain = domain_of(fragment.as_ref());
        !fragment_domain.is_empty()
            && (candidate_domain.contains(&fragment_domain)
                || fragment_domain.contains(&candidate_domain))
    })
}

/// The set of URL fragments permitted during one study session.
///
/// Derived once at session start from the study-site origin plus the
/// user-supplied fragments; immutable for the session's lifetime and
/// replaced (never mutated) at the next session start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedUrlSet {
    fragments: Vec<String>,
}

impl AllowedUrlSet {
    /// The empty set: nothing is permitted. Used while no session is current.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the allowlist for a new session.
    ///
    /// The study-site origin is seeded first so the dashboard's own tab is
    /// always permitted. Empty entries are discarded, duplicates removed,
    /// insertion order preserved.
    pub fn for_session<S: AsRef<str>>(study_origin: &str, user_fragments: &[S]) -> Self {
        let mut fragments: Vec<String> = Vec::with_capacity(user_fragments.len() + 1);
        let origin = study_origin.trim();
        if !origin.is_empty() {
            fragments.push(origin.to_string());
        }
        for fragment in user_fragments {
            let trimmed = fragment.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            if !fragments.iter().any(|f| f == trimmed) {
                fragments.push(trimmed.to_string());
            }
        }
        Self { fragments }
    }

    pub fn is_allowed(&self, candidate: &str) -> bool {
        is_allowed(candidate, &self.fragments)
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
