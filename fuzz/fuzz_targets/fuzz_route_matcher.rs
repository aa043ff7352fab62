#![no_main]

use ampui_core::config::HashMatch;
use ampui_widgets::route::{RouteMatcher, TopLevelMatch, link_fragment, link_path};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    path: String,
    hash: String,
    href: String,
}

fuzz_target!(|input: Input| {
    let substring = RouteMatcher::new(HashMatch::Substring);
    let exact = RouteMatcher::new(HashMatch::Exact);

    // Fragment mode never changes top-level matching.
    let top = substring.top_level_match(&input.path, &input.href);
    assert_eq!(top, exact.top_level_match(&input.path, &input.href));

    if input.href.is_empty() {
        assert!(top.is_none());
    }
    if top == Some(TopLevelMatch::Home) {
        assert_eq!(input.path, "/");
    }

    // Path and fragment partition the href.
    let path = link_path(&input.href);
    let fragment = link_fragment(&input.href);
    assert_eq!(format!("{path}{fragment}"), input.href);

    // Exact implies substring.
    if exact.should_mark_sub_nav(&input.hash, &input.href) {
        assert!(substring.should_mark_sub_nav(&input.hash, &input.href));
    }
});
