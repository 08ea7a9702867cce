//! Benchmark Filtering
//!
//! Selects subtrees of a result tree with shell-style glob patterns.
//!
//! A pattern is split on `/` into one glob per path segment. Matching may
//! start at any depth and then proceeds segment by segment down the tree;
//! once the last segment matches, the whole subtree under that node is
//! selected. So `suite/*` keeps every child of any group named `suite`, and
//! a bare `Sieve*` keeps every node whose own name starts with `Sieve`.
//!
//! Include patterns keep matched subtrees plus the groups leading to them.
//! Exclude patterns drop matched subtrees. Groups left empty by filtering are
//! pruned.

use crate::tree::{Group, Node, PATH_SEPARATOR};
use glob::Pattern;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from building a filter
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FilterError {
    /// A pattern could not be parsed as a glob
    #[error("Invalid filter pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as given
        pattern: String,
        /// Underlying parse error
        #[source]
        source: glob::PatternError,
    },
}

#[derive(Debug, Clone)]
struct PathPattern {
    source: String,
    segments: Vec<Pattern>,
}

impl PathPattern {
    fn parse(source: &str) -> Result<Self, FilterError> {
        let segments = source
            .split(PATH_SEPARATOR)
            .filter(|s| !s.is_empty())
            .map(Pattern::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source_err| FilterError::InvalidPattern {
                pattern: source.to_string(),
                source: source_err,
            })?;

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The same pattern with its first and last segment widened to substrings.
    ///
    /// Stars already at the widened ends are folded in, since `**` is only
    /// valid as a whole segment.
    fn widened(&self) -> Result<Self, FilterError> {
        let mut segments: Vec<String> = self
            .source
            .split(PATH_SEPARATOR)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if let Some(first) = segments.first_mut() {
            *first = format!("*{}", first.trim_start_matches('*'));
        }
        if let Some(last) = segments.last_mut() {
            *last = format!("{}*", last.trim_end_matches('*'));
        }

        let separator = PATH_SEPARATOR.to_string();
        Self::parse(&segments.join(separator.as_str()))
    }
}

/// Matching progress of one pattern: `(pattern index, next segment index)`
type Cursor = (usize, usize);

/// Include/exclude filter over result trees
#[derive(Debug, Clone, Default)]
pub struct TreeFilter {
    include: Vec<PathPattern>,
    exclude: Vec<PathPattern>,
}

impl TreeFilter {
    /// Parse include and exclude patterns.
    ///
    /// Empty patterns are ignored.
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self, FilterError> {
        Ok(Self {
            include: parse_all(include)?,
            exclude: parse_all(exclude)?,
        })
    }

    /// True when the filter keeps every benchmark
    pub fn is_noop(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Apply the filter, returning a new tree.
    ///
    /// When include patterns select nothing, each one is retried once as a
    /// substring pattern (`*pattern*`).
    pub fn apply(&self, tree: &Group) -> Group {
        if self.is_noop() {
            return tree.clone();
        }

        let included = if self.include.is_empty() {
            tree.clone()
        } else {
            let selected = select(tree, &self.include, &[]);
            if selected.is_empty() {
                self.retry_as_substrings(tree)
            } else {
                selected
            }
        };

        if self.exclude.is_empty() {
            return included;
        }
        let kept = exclude(&included, &self.exclude, &[]);
        debug!(
            before = included.leaf_count(),
            after = kept.leaf_count(),
            "Applied exclude patterns"
        );
        kept
    }

    fn retry_as_substrings(&self, tree: &Group) -> Group {
        let widened: Vec<PathPattern> = self
            .include
            .iter()
            .filter_map(|pattern| match pattern.widened() {
                Ok(widened) => Some(widened),
                Err(e) => {
                    warn!(error = %e, "Cannot widen filter pattern, skipping it in the retry");
                    None
                }
            })
            .collect();
        if widened.is_empty() {
            return Group::new();
        }

        let sources: Vec<&str> = widened.iter().map(|p| p.source.as_str()).collect();
        info!(
            patterns = ?sources,
            "No benchmark matched the filter, retrying as substring patterns"
        );
        select(tree, &widened, &[])
    }
}

/// Filter `tree` with the given include and exclude patterns.
pub fn filter_tree<S: AsRef<str>>(
    tree: &Group,
    include: &[S],
    exclude: &[S],
) -> Result<Group, FilterError> {
    Ok(TreeFilter::new(include, exclude)?.apply(tree))
}

fn parse_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathPattern>, FilterError> {
    patterns
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| !p.trim_matches(PATH_SEPARATOR).is_empty())
        .map(PathPattern::parse)
        .collect()
}

/// Advance every cursor (plus a fresh start for each pattern) over `name`.
///
/// Returns whether some pattern matched completely, and the cursors to carry
/// into the children of `name`.
fn advance(name: &str, patterns: &[PathPattern], active: &[Cursor]) -> (bool, Vec<Cursor>) {
    let fresh = (0..patterns.len()).map(|p| (p, 0));
    let mut next = Vec::new();
    let mut complete = false;

    for (p, seg) in active.iter().copied().chain(fresh) {
        let segments = &patterns[p].segments;
        if !segments[seg].matches(name) {
            continue;
        }
        if seg + 1 == segments.len() {
            complete = true;
        } else if !next.contains(&(p, seg + 1)) {
            next.push((p, seg + 1));
        }
    }

    (complete, next)
}

fn select(group: &Group, patterns: &[PathPattern], active: &[Cursor]) -> Group {
    let mut out = Group::new();
    for (name, node) in group.iter() {
        let (complete, next) = advance(name, patterns, active);
        if complete {
            out.insert(name, node.clone());
            continue;
        }
        if let Node::Group(child) = node {
            let selected = select(child, patterns, &next);
            if !selected.is_empty() {
                out.insert(name, selected);
            }
        }
    }
    out
}

fn exclude(group: &Group, patterns: &[PathPattern], active: &[Cursor]) -> Group {
    let mut out = Group::new();
    for (name, node) in group.iter() {
        let (complete, next) = advance(name, patterns, active);
        if complete {
            continue;
        }
        match node {
            Node::Leaf(_) => {
                out.insert(name, node.clone());
            }
            Node::Group(child) => {
                let kept = exclude(child, patterns, &next);
                if !kept.is_empty() || child.is_empty() {
                    out.insert(name, kept);
                }
            }
        }
    }
    out
}
