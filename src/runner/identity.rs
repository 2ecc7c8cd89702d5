//! Task identity resolution
//!
//! A task identity is derived once from the input URL: the host labels are
//! reversed (`www.example.com` → `com.example` with `www` stripped by
//! default), the path segments keep their order, and every segment is
//! normalized to an identifier-safe token. The same segments address both
//! the task directory and the dotted module name, so the two stay consistent
//! by construction.

use crate::error::{PagetaskError, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// Canonical, filesystem-safe and dotted-name-safe identity of a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskIdentity {
    /// Host labels, ignored subdomains removed, reversed
    pub domain_segments: Vec<String>,

    /// URL path segments, empty segments dropped, order kept
    pub path_segments: Vec<String>,
}

impl TaskIdentity {
    /// Resolve a URL into a task identity
    ///
    /// The identity always comes from the URL as given; redirects discovered
    /// later by the fetcher never change it, so the same input URL maps to
    /// the same task directory on every run.
    pub fn resolve(url: &str, ignored_subdomains: &[String]) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| PagetaskError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let host = parsed
            .host_str()
            .ok_or_else(|| PagetaskError::InvalidUrl {
                url: url.to_string(),
                reason: "URL has no host".to_string(),
            })?;

        let all_labels: Vec<&str> = host.split('.').filter(|s| !s.is_empty()).collect();
        if all_labels.is_empty() {
            return Err(PagetaskError::InvalidUrl {
                url: url.to_string(),
                reason: "URL host is empty".to_string(),
            });
        }

        let mut labels: Vec<&str> = all_labels
            .iter()
            .copied()
            .filter(|label| !ignored_subdomains.iter().any(|ig| ig.eq_ignore_ascii_case(label)))
            .collect();
        // Stripping must never erase the whole domain (e.g. "https://www").
        if labels.is_empty() {
            labels = all_labels;
        }

        let domain_segments = labels
            .iter()
            .rev()
            .map(|label| sanitize_segment(&label.to_ascii_lowercase()))
            .collect();

        let path_segments = parsed
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(sanitize_segment)
            .collect();

        Ok(TaskIdentity {
            domain_segments,
            path_segments,
        })
    }

    /// All segments, domain first then path
    pub fn segments(&self) -> impl Iterator<Item = &String> {
        self.domain_segments.iter().chain(self.path_segments.iter())
    }

    /// Importable dotted name, e.g. `com.example.articles.42`
    pub fn dotted_name(&self) -> String {
        self.segments()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Task directory under the tasks root, mirroring the dotted name
    pub fn dir_path(&self, tasks_root: &Path) -> PathBuf {
        let mut dir = tasks_root.to_path_buf();
        for segment in self.segments() {
            dir.push(segment);
        }
        dir
    }
}

/// Normalize one host label or path segment into an identifier-safe token
///
/// Anything outside `[A-Za-z0-9_]` becomes `_`, a leading digit is prefixed
/// with `_`, and an empty segment collapses to the placeholder `_`.
pub fn sanitize_segment(segment: &str) -> String {
    let mut token: String = segment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if token.is_empty() {
        token.push('_');
    }
    if token.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        token.insert(0, '_');
    }
    token
}

/// Check that a segment is already in sanitized form
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with(|c: char| c.is_ascii_digit())
        && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
