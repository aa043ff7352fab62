#![forbid(unsafe_code)]

//! Active-route matching for navigation highlighting.
//!
//! Two navigation shapes live side by side in site markup without anything
//! to tell them apart: section links (matched against the path) and in-page
//! anchors (matched against the fragment). [`RouteMatcher`] answers both
//! questions for one link at a time.
//!
//! # Top-level rules
//!
//! With `link_path` = the part of the href before `#`, a link is active for
//! path `P` when any of these hold, checked in this order:
//!
//! | Rule | Condition |
//! |------|-----------|
//! | Exact | `link_path == P` |
//! | Parent | `P.starts_with(link_path) && link_path != "/"` |
//! | Home | `P == "/" && link_path in {"/", "/index.html"}` |
//!
//! An empty href never matches. Nothing is normalized: trailing slashes,
//! query strings and case are compared verbatim.
//!
//! # Sub-nav rule
//!
//! With a non-empty fragment `H` (including its `#`), a link is sub-nav
//! active when its href contains `H` ([`HashMatch::Substring`], the default)
//! or when its own fragment equals `H` ([`HashMatch::Exact`]).
//!
//! # Failure Modes
//!
//! - Substring mode over-matches: `#intro` also marks `/page#intro-2`.
//! - A fragment-only href (`#faq`) has an empty `link_path`, which every path
//!   starts with, so it satisfies the Parent rule.

use ampui_core::config::HashMatch;

/// Home-page aliases accepted when the current path is `/`.
const HOME_PATHS: &[&str] = &["/", "/index.html"];

/// Which top-level rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopLevelMatch {
    Exact,
    Parent,
    Home,
}

/// Path of an href: everything before the first `#`.
#[inline]
#[must_use]
pub fn link_path(href: &str) -> &str {
    href.split_once('#').map_or(href, |(path, _)| path)
}

/// Fragment of an href including the `#`, or `""`.
#[inline]
#[must_use]
pub fn link_fragment(href: &str) -> &str {
    href.find('#').map_or("", |idx| &href[idx..])
}

/// Decides which navigation links are active for the current location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMatcher {
    hash_match: HashMatch,
}

impl RouteMatcher {
    /// Matcher with the given fragment mode.
    #[must_use]
    pub const fn new(hash_match: HashMatch) -> Self {
        Self { hash_match }
    }

    /// Fragment matching mode.
    #[must_use]
    pub const fn hash_match(&self) -> HashMatch {
        self.hash_match
    }

    /// First top-level rule that marks `href` active for `path`.
    #[must_use]
    pub fn top_level_match(&self, path: &str, href: &str) -> Option<TopLevelMatch> {
        if href.is_empty() {
            return None;
        }
        let link_path = link_path(href);
        if link_path == path {
            Some(TopLevelMatch::Exact)
        } else if link_path != "/" && path.starts_with(link_path) {
            Some(TopLevelMatch::Parent)
        } else if path == "/" && HOME_PATHS.contains(&link_path) {
            Some(TopLevelMatch::Home)
        } else {
            None
        }
    }

    /// Whether the enclosing top-level item of `href` is active for `path`.
    #[inline]
    #[must_use]
    pub fn should_mark_top_level(&self, path: &str, href: &str) -> bool {
        self.top_level_match(path, href).is_some()
    }

    /// Whether `href` itself is the active in-page target for `hash`.
    #[must_use]
    pub fn should_mark_sub_nav(&self, hash: &str, href: &str) -> bool {
        if hash.is_empty() {
            return false;
        }
        match self.hash_match {
            HashMatch::Substring => href.contains(hash),
            HashMatch::Exact => link_fragment(href) == hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn m() -> RouteMatcher {
        RouteMatcher::default()
    }

    #[test]
    fn link_path_strips_fragment() {
        assert_eq!(link_path("/docs#intro"), "/docs");
        assert_eq!(link_path("/docs"), "/docs");
        assert_eq!(link_path("#faq"), "");
        assert_eq!(link_fragment("/docs#a#b"), "#a#b");
        assert_eq!(link_fragment("/docs"), "");
    }

    #[test]
    fn exact_match() {
        assert_eq!(m().top_level_match("/about", "/about"), Some(TopLevelMatch::Exact));
        assert_eq!(m().top_level_match("/", "/"), Some(TopLevelMatch::Exact));
    }

    #[test]
    fn parent_match_for_sections() {
        assert_eq!(
            m().top_level_match("/docs/guide", "/docs"),
            Some(TopLevelMatch::Parent)
        );
        assert_eq!(
            m().top_level_match("/docs/guide", "/docs#intro"),
            Some(TopLevelMatch::Parent)
        );
    }

    #[test]
    fn root_link_never_parent_matches() {
        assert!(!m().should_mark_top_level("/about", "/"));
        assert!(!m().should_mark_top_level("/about", "/#top"));
    }

    #[test]
    fn home_aliases_match_root_path() {
        assert_eq!(m().top_level_match("/", "/index.html"), Some(TopLevelMatch::Home));
        assert!(!m().should_mark_top_level("/index.html", "/"));
    }

    #[test]
    fn empty_href_never_matches() {
        assert!(!m().should_mark_top_level("/", ""));
        assert!(!m().should_mark_top_level("", ""));
    }

    #[test]
    fn no_normalization() {
        assert!(!m().should_mark_top_level("/docs", "/docs/"));
        assert!(!m().should_mark_top_level("/Docs", "/docs"));
        assert!(!m().should_mark_top_level("/docs", "/docs?x=1"));
    }

    #[test]
    fn prefix_is_not_segment_aware() {
        // "/doc" is a string prefix of "/docs" and matches as a parent.
        assert!(m().should_mark_top_level("/docs", "/doc"));
    }

    #[test]
    fn fragment_only_href_parent_matches_everything() {
        assert_eq!(m().top_level_match("/about", "#faq"), Some(TopLevelMatch::Parent));
    }

    #[test]
    fn sub_nav_substring_mode() {
        assert!(m().should_mark_sub_nav("#intro", "/page#intro"));
        assert!(m().should_mark_sub_nav("#intro", "/page#intro-2"));
        assert!(!m().should_mark_sub_nav("#intro", "/page#outro"));
        assert!(!m().should_mark_sub_nav("", "/page#intro"));
    }

    #[test]
    fn sub_nav_exact_mode() {
        let exact = RouteMatcher::new(HashMatch::Exact);
        assert!(exact.should_mark_sub_nav("#intro", "/page#intro"));
        assert!(exact.should_mark_sub_nav("#intro", "#intro"));
        assert!(!exact.should_mark_sub_nav("#intro", "/page#intro-2"));
        assert!(!exact.should_mark_sub_nav("", "/page"));
    }

    fn path_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("/".to_string()),
            Just("/index.html".to_string()),
            Just(String::new()),
            "(/[a-c]{0,3}){1,3}",
        ]
    }

    proptest! {
        #[test]
        fn top_level_matches_reference_formula(p in path_strategy(), l in path_strategy()) {
            let expected = !l.is_empty()
                && (l == p
                    || (l != "/" && p.starts_with(l.as_str()))
                    || (p == "/" && (l == "/" || l == "/index.html")));
            prop_assert_eq!(m().should_mark_top_level(&p, &l), expected);
        }

        #[test]
        fn fragment_never_affects_top_level(p in path_strategy(), l in "(/[a-c]{1,3}){1,2}", frag in "[a-z]{0,4}") {
            let with_frag = format!("{l}#{frag}");
            prop_assert_eq!(
                m().should_mark_top_level(&p, &with_frag),
                m().should_mark_top_level(&p, &l)
            );
        }

        #[test]
        fn exact_hash_implies_substring(h in "#[a-z]{1,4}", href in "(/[a-z]{1,3})?(#[a-z]{0,5})?") {
            let exact = RouteMatcher::new(HashMatch::Exact);
            if exact.should_mark_sub_nav(&h, &href) {
                prop_assert!(m().should_mark_sub_nav(&h, &href));
            }
        }
    }
}
