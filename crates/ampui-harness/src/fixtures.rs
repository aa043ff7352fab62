#![forbid(unsafe_code)]

//! Reference page markup shared by the scenario tests.
//!
//! The standard page has a mobile navigation header with one dropdown and
//! two modals:
//!
//! ```text
//! header.site-nav
//!   button.nav-toggle[aria-expanded=false]
//!   nav#main-nav
//!     ul.horizontal
//!       li > a[href=/]
//!       li > a[href=/docs] + ul > (li > a[href=/docs/guide], li > a[href=/docs#faq])
//!       li > a[href=/about]
//! a.modal_opener[amp-target=signup] > span
//! div.modal_overlay#signup > div.modal_content > (p, input, button.modal_kill)
//! a.modal_opener[amp-target=newsletter]
//! div.modal_overlay#newsletter > div.modal_content > p[tabindex=-1]
//! ```

use ampui_core::dom::{ElementTree, NodeId};

use crate::document::{El, FakeDocument};

/// Handles into the standard page.
#[derive(Debug)]
pub struct SiteFixture {
    pub doc: FakeDocument,
    pub wrapper: NodeId,
    pub toggle: NodeId,
    pub nav: NodeId,
    pub nav_list: NodeId,
    pub signup_opener: NodeId,
    pub signup_opener_icon: NodeId,
    pub signup: NodeId,
    pub signup_content: NodeId,
    pub signup_email: NodeId,
    pub signup_close: NodeId,
    pub newsletter_opener: NodeId,
    pub newsletter: NodeId,
}

impl SiteFixture {
    /// Top-level `li` enclosing the link with `href`.
    #[must_use]
    pub fn item_for(&self, href: &str) -> Option<NodeId> {
        let link = self.doc.link(href)?;
        self.doc
            .ancestors_inclusive(link)
            .into_iter()
            .find(|&n| self.doc.is_tag(n, "li") && self.doc.parent(n) == Some(self.nav_list))
    }

    /// Link with `href`.
    ///
    /// # Panics
    ///
    /// Panics if the fixture has no such link.
    #[must_use]
    pub fn link(&self, href: &str) -> NodeId {
        self.doc
            .link(href)
            .unwrap_or_else(|| panic!("fixture has no link {href}"))
    }
}

/// Navigation list markup from `(href, children)` pairs.
pub fn nav_list(items: &[(&str, &[&str])]) -> El {
    El::new("ul")
        .class("horizontal")
        .children(items.iter().map(|(href, sub)| {
            let li = El::new("li").child(El::link(href));
            if sub.is_empty() {
                li
            } else {
                li.child(El::new("ul").children(
                    sub.iter().map(|h| El::new("li").child(El::link(h))),
                ))
            }
        }))
}

fn modal(id: &str, content: El) -> El {
    El::new("div")
        .class("modal_overlay")
        .id(id)
        .attr("aria-hidden", "true")
        .child(content)
}

/// Build the standard page.
#[must_use]
pub fn standard_site() -> SiteFixture {
    let doc = FakeDocument::new();

    let wrapper = doc.append(El::new("header").class("site-nav"));
    let toggle = doc.append_to(
        wrapper,
        El::new("button")
            .class("nav-toggle")
            .attr("aria-expanded", "false"),
    );
    let nav = doc.append_to(wrapper, El::new("nav").id("main-nav"));
    let nav_list = doc.append_to(
        nav,
        nav_list(&[
            ("/", &[]),
            ("/docs", &["/docs/guide", "/docs#faq"]),
            ("/about", &[]),
        ]),
    );

    let signup_opener = doc.append(
        El::link("#")
            .class("modal_opener")
            .attr("amp-target", "signup"),
    );
    let signup_opener_icon = doc.append_to(signup_opener, El::new("span"));
    let signup = doc.append(modal("signup", El::new("div").class("modal_content")));
    let signup_content = doc.children(signup)[0];
    doc.append_to(signup_content, El::new("p"));
    let signup_email = doc.append_to(signup_content, El::new("input").attr("type", "email"));
    let signup_close = doc.append_to(
        signup_content,
        El::new("button")
            .class("modal_kill")
            .attr("amp-target", "signup"),
    );

    let newsletter_opener = doc.append(
        El::link("#")
            .class("modal_opener")
            .attr("amp-target", "newsletter"),
    );
    let newsletter = doc.append(modal(
        "newsletter",
        El::new("div")
            .class("modal_content")
            .child(El::new("p").attr("tabindex", "-1")),
    ));

    SiteFixture {
        doc,
        wrapper,
        toggle,
        nav,
        nav_list,
        signup_opener,
        signup_opener_icon,
        signup,
        signup_content,
        signup_email,
        signup_close,
        newsletter_opener,
        newsletter,
    }
}
