//! In-browser tests for the DOM-backed element tree.
//!
//! Run with: `wasm-pack test --headless --firefox crates/ampui-web`

#![cfg(target_arch = "wasm32")]

use ampui_core::config::SiteConfig;
use ampui_core::dom::ElementTree;
use ampui_core::event::HostEvent;
use ampui_core::location::Location;
use ampui_core::Instant;
use ampui_web::{DomTree, start};
use ampui_widgets::Site;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

const PAGE: &str = r##"
<header class="site-nav">
  <button id="toggle" class="nav-toggle" aria-expanded="false">Menu</button>
  <nav id="main-nav">
    <ul class="horizontal">
      <li><a href="/">Home</a></li>
      <li><a href="/docs">Docs</a>
        <ul><li><a href="/docs/guide">Guide</a></li><li><a href="/docs#faq">FAQ</a></li></ul>
      </li>
    </ul>
  </nav>
</header>
<a href="#" id="opener" class="modal_opener" amp-target="signup"><span id="icon">Sign up</span></a>
<div class="modal_overlay" id="signup" aria-hidden="true">
  <div class="modal_content" id="content">
    <input id="email" type="email">
    <button id="close" class="modal_kill" amp-target="signup">Close</button>
  </div>
</div>
"##;

fn mount() -> DomTree {
    let tree = DomTree::from_global().unwrap();
    tree.document().body().unwrap().set_inner_html(PAGE);
    tree
}

fn node(tree: &DomTree, id: &str) -> ampui_core::dom::NodeId {
    tree.element_by_id(id).unwrap()
}

#[wasm_bindgen_test]
fn interning_is_stable() {
    let tree = mount();
    let a = node(&tree, "opener");
    let b = node(&tree, "opener");
    assert_eq!(a, b);
    assert_eq!(tree.parent(node(&tree, "icon")), Some(a));
    assert_eq!(tree.tag_name(a), "a");
}

#[wasm_bindgen_test]
fn detached_elements_keep_their_handle() {
    let tree = mount();
    let opener = node(&tree, "opener");
    tree.document().body().unwrap().set_inner_html("<p></p>");
    let element = tree.element(opener).unwrap();
    assert!(!element.is_connected());
    assert_eq!(tree.node_for_target(&element), Some(opener));
    assert_eq!(tree.element_by_id("opener"), None);
}

#[wasm_bindgen_test]
fn class_and_style_round_trip() {
    let tree = mount();
    let body = tree.body().unwrap();
    tree.set_style(body, "overflow", "hidden");
    assert_eq!(tree.style(body, "overflow").as_deref(), Some("hidden"));
    tree.set_style(body, "overflow", "");
    assert_eq!(tree.style(body, "overflow"), None);

    let modal = node(&tree, "signup");
    assert!(tree.toggle_class(modal, "active"));
    assert!(tree.has_class(modal, "active"));
    assert_eq!(tree.elements_by_class("modal_overlay"), vec![modal]);
}

#[wasm_bindgen_test]
fn modal_opens_from_icon_click_and_closes_on_escape() {
    let tree = mount();
    let mut site = Site::new(SiteConfig::default());
    site.initialize(&tree, &Location::path("/docs/guide"));

    let out = site.dispatch(&tree, &HostEvent::click(node(&tree, "icon")), Instant::now());
    assert!(out.default_prevented);
    assert_eq!(site.active_modal(), Some("signup"));
    assert_eq!(tree.focused(), Some(node(&tree, "email")));

    site.dispatch(&tree, &HostEvent::key("Escape"), Instant::now());
    assert_eq!(site.active_modal(), None);
    assert_eq!(tree.focused(), Some(node(&tree, "opener")));
    assert_eq!(tree.style(tree.body().unwrap(), "overflow"), None);
}

#[wasm_bindgen_test]
fn active_state_marks_docs_item() {
    let tree = mount();
    let mut site = Site::new(SiteConfig::default());
    site.initialize(&tree, &Location::path("/docs/guide"));
    let docs = tree
        .elements_by_class("horizontal")
        .into_iter()
        .flat_map(|ul| tree.children_by_tag(ul, "li"))
        .nth(1)
        .unwrap();
    assert!(tree.has_class(docs, "active"));
}

#[wasm_bindgen_test]
fn dropdown_toggles_below_breakpoint() {
    let tree = mount();
    let config = SiteConfig {
        mobile_breakpoint: 1.0e9,
        ..SiteConfig::default()
    };
    let mut site = Site::new(config);
    site.initialize(&tree, &Location::path("/"));
    let docs_link = tree
        .all_elements()
        .into_iter()
        .find(|&n| tree.attribute(n, "href").as_deref() == Some("/docs"))
        .unwrap();
    let out = site.dispatch(&tree, &HostEvent::click(docs_link), Instant::now());
    assert!(out.default_prevented);
    assert_eq!(tree.attribute(docs_link, "aria-expanded").as_deref(), Some("true"));
}

#[wasm_bindgen_test]
fn second_start_reuses_the_first_site() {
    let tree = mount();
    let first = start().unwrap();
    let second = start().unwrap();
    assert!(first.is_ready());
    assert!(second.is_ready());

    // One set of listeners: a single click opens the menu.
    let toggle: HtmlElement = tree
        .document()
        .get_element_by_id("toggle")
        .unwrap()
        .dyn_into()
        .unwrap();
    toggle.click();
    assert_eq!(toggle.get_attribute("aria-expanded").as_deref(), Some("true"));

    assert!(second.open_modal("signup"));
    assert_eq!(first.active_modal().as_deref(), Some("signup"));
    assert!(first.close_modal("signup"));
    assert_eq!(second.active_modal(), None);
}
