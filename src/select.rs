use globset::{GlobBuilder, GlobMatcher};
use log::{debug, warn};

/// A compiled selection rule: include or exclude what the glob matches.
struct Rule {
    negated: bool,
    matcher: Option<GlobMatcher>,
}

impl Rule {
    fn new(pattern: &str) -> Self {
        let (negated, glob) = match pattern.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        let matcher = match GlobBuilder::new(glob).literal_separator(true).build() {
            Ok(glob) => Some(glob.compile_matcher()),
            Err(err) => {
                warn!("Invalid glob pattern '{pattern}': {err}");
                None
            }
        };
        Self { negated, matcher }
    }

    fn is_match(&self, key: &str) -> bool {
        self.matcher.as_ref().is_some_and(|m| m.is_match(key))
    }
}

/// Selects the keys matched by an ordered list of glob patterns.
///
/// A plain pattern adds the keys it matches; a pattern starting with `!`
/// removes its matches from what earlier patterns selected. `*` does not
/// cross `/`, `**` does. Malformed patterns match nothing. Keys come back
/// in input order.
pub fn select_keys<'k, I>(keys: I, patterns: &[&str]) -> Vec<String>
where
    I: IntoIterator<Item = &'k String>,
{
    let rules: Vec<Rule> = patterns.iter().map(|p| Rule::new(p)).collect();

    let selected: Vec<String> = keys
        .into_iter()
        .filter(|key| {
            rules.iter().fold(false, |selected, rule| {
                if rule.negated {
                    selected && !rule.is_match(key)
                } else {
                    selected || rule.is_match(key)
                }
            })
        })
        .cloned()
        .collect();

    debug!("Patterns {patterns:?} selected {} file(s)", selected.len());
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn double_star_matches_everything() {
        let all = keys(&["index.md", "a/b/post.md", "style.css"]);
        assert_eq!(select_keys(&all, &["**/*"]), all);
    }

    #[test]
    fn single_star_stays_in_segment() {
        let all = keys(&["index.md", "blog/post.md"]);
        assert_eq!(select_keys(&all, &["*.md"]), keys(&["index.md"]));
        assert_eq!(select_keys(&all, &["**/*.md"]), all);
    }

    #[test]
    fn negation_removes_earlier_matches() {
        let all = keys(&["index.md", "drafts/wip.md", "blog/post.md"]);
        let selected = select_keys(&all, &["**/*.md", "!drafts/**"]);
        assert_eq!(selected, keys(&["index.md", "blog/post.md"]));
    }

    #[test]
    fn leading_negation_selects_nothing() {
        let all = keys(&["index.md"]);
        assert!(select_keys(&all, &["!drafts/**"]).is_empty());
    }

    #[test]
    fn later_pattern_can_add_back() {
        let all = keys(&["drafts/keep.md", "drafts/wip.md"]);
        let selected = select_keys(&all, &["**/*.md", "!drafts/**", "drafts/keep.md"]);
        assert_eq!(selected, keys(&["drafts/keep.md"]));
    }

    #[test]
    fn malformed_pattern_matches_nothing() {
        let all = keys(&["index.md"]);
        assert!(select_keys(&all, &["[unclosed"]).is_empty());
        assert_eq!(select_keys(&all, &["[unclosed", "*.md"]), all);
    }
}
