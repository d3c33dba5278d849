//! Search specification resolution.
//!
//! Turns the search specifications from the command line into the list of
//! files to process. Each specification is split into a directory and a glob
//! pattern, the directory is walked, and every regular file whose path
//! (relative to that directory) matches is collected.
//!
//! ## Directory split
//!
//! The longest leading run of `/`-separated components that names an existing
//! directory and contains no glob characters becomes the directory; the rest is
//! the pattern.
//!
//! ```text
//! ""                 → (cwd,        "*")
//! "scans"            → ("scans",    "*")       scans/ exists
//! "*.png"            → (cwd,        "*.png")
//! "./*.png"          → (".",        "*.png")
//! "/a/b/*.png"       → ("/a/b",     "*.png")   /a/b exists
//! "scans/**/*.tif"   → ("scans",    "**/*.tif")
//! ```
//!
//! ## Matching
//!
//! Patterns are matched case-insensitively. `*` and `?` stay within one path
//! component; `**` crosses directories. Without `**` the walk only descends as
//! deep as the pattern has components.
//!
//! ## Ordering
//!
//! Files come out in specification order, each specification's files sorted by
//! name within each directory. A file found by several specifications is kept
//! once, at its first position.

use globset::{GlobBuilder, GlobMatcher};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid file specification \"{spec}\": {source}")]
    Pattern {
        spec: String,
        #[source]
        source: globset::Error,
    },
    #[error("Cannot read {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A search specification split into where to look and what to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySearchRequest {
    pub directory: PathBuf,
    pub pattern: String,
}

/// Files found for all specifications, plus anything that went wrong.
#[derive(Debug, Default)]
pub struct SearchResult {
    pub files: Vec<PathBuf>,
    pub errors: Vec<SearchError>,
}

const GLOB_CHARS: &[char] = &['*', '?', '[', '{'];

fn has_glob_chars(text: &str) -> bool {
    text.contains(GLOB_CHARS)
}

/// Split `spec` into an existing directory and a trailing pattern.
///
/// Directories are checked relative to `cwd`. When no directory part exists the
/// directory is `cwd` itself; an empty pattern means "everything".
pub fn directory_search_request(spec: &str, cwd: &Path) -> DirectorySearchRequest {
    let everything = |directory: PathBuf| DirectorySearchRequest {
        directory,
        pattern: "*".to_string(),
    };

    if spec.is_empty() {
        return everything(cwd.to_path_buf());
    }
    if !has_glob_chars(spec) && cwd.join(spec).is_dir() {
        return everything(PathBuf::from(spec));
    }

    // Longest existing directory prefix first
    for (split, _) in spec.rmatch_indices('/') {
        let prefix = if split == 0 { "/" } else { &spec[..split] };
        if has_glob_chars(prefix) || !cwd.join(prefix).is_dir() {
            continue;
        }
        let rest = &spec[split + 1..];
        return DirectorySearchRequest {
            directory: PathBuf::from(prefix),
            pattern: if rest.is_empty() { "*".to_string() } else { rest.to_string() },
        };
    }

    DirectorySearchRequest {
        directory: cwd.to_path_buf(),
        pattern: spec.to_string(),
    }
}

/// `base.join(path)` without `.` components, so the same file found through
/// `*.jpg` and `./*.jpg` compares equal.
fn resolve_directory(base: &Path, path: &Path) -> PathBuf {
    let mut resolved = base.to_path_buf();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            other => resolved.push(other),
        }
    }
    resolved
}

fn compile(pattern: &str, spec: &str) -> Result<GlobMatcher, SearchError> {
    GlobBuilder::new(pattern)
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| SearchError::Pattern {
            spec: spec.to_string(),
            source,
        })
}

/// Walk depth needed to reach everything `pattern` can match.
fn max_depth(pattern: &str) -> usize {
    if pattern.contains("**") {
        usize::MAX
    } else {
        pattern.split('/').count()
    }
}

/// Expand one specification into matching files, in walk order.
///
/// Unreadable entries below the directory are reported in `errors` and skipped.
pub fn expand(spec: &str, cwd: &Path, errors: &mut Vec<SearchError>) -> Vec<PathBuf> {
    let request = directory_search_request(spec, cwd);
    let matcher = match compile(&request.pattern, spec) {
        Ok(matcher) => matcher,
        Err(e) => {
            errors.push(e);
            return Vec::new();
        }
    };
    let root = resolve_directory(cwd, &request.directory);

    let mut files = Vec::new();
    let walker = WalkDir::new(&root)
        .min_depth(1)
        .max_depth(max_depth(&request.pattern))
        .sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                let path = source.path().unwrap_or(&root).to_path_buf();
                errors.push(SearchError::Walk { path, source });
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Ok(relative) = path.strip_prefix(&root) else {
            continue;
        };
        if matcher.is_match(relative) {
            files.push(path.to_path_buf());
        }
    }
    files
}

/// Resolve every specification against `cwd`, dropping duplicates.
pub fn resolve_files<S: AsRef<str>>(specs: &[S], cwd: &Path) -> SearchResult {
    let mut result = SearchResult::default();
    let mut seen = HashSet::new();

    for spec in specs {
        let spec = spec.as_ref();
        let found = expand(spec, cwd, &mut result.errors);
        if found.is_empty() {
            tracing::warn!("No files match \"{spec}\"");
        }
        for file in found {
            if seen.insert(file.clone()) {
                result.files.push(file);
            } else {
                tracing::debug!("{} already matched, skipping", file.display());
            }
        }
    }
    result
}
