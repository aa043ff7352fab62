#![forbid(unsafe_code)]

//! Focus-in and focus-restore helpers for modals.

use ampui_core::dom::{ElementTree, NodeId, first_focusable};

/// Focus the first focusable element inside `scope`.
///
/// Returns the focused element, or `None` if nothing inside can take focus.
pub fn focus_first_in<T: ElementTree + ?Sized>(tree: &T, scope: NodeId) -> Option<NodeId> {
    let target = first_focusable(tree, scope)?;
    tree.focus(target);
    Some(target)
}

/// Focus the first element with `opener_class` whose `target_attr` names
/// `modal_id`.
pub fn restore_focus_to_opener<T: ElementTree + ?Sized>(
    tree: &T,
    opener_class: &str,
    target_attr: &str,
    modal_id: &str,
) -> Option<NodeId> {
    let opener = tree
        .elements_by_class(opener_class)
        .into_iter()
        .find(|&n| tree.attribute(n, target_attr).as_deref() == Some(modal_id))?;
    tree.focus(opener);
    Some(opener)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ampui_harness::{El, FakeDocument};

    #[test]
    fn skips_negative_tabindex() {
        let doc = FakeDocument::new();
        let scope = doc.append(
            El::new("div")
                .child(El::new("p").attr("tabindex", "-1"))
                .child(El::new("div").attr("tabindex", "0")),
        );
        let expected = doc.children(scope)[1];
        assert_eq!(focus_first_in(&doc, scope), Some(expected));
        assert_eq!(doc.focused(), Some(expected));
    }

    #[test]
    fn nothing_focusable_leaves_focus_alone() {
        let doc = FakeDocument::new();
        let scope = doc.append(El::new("div").child(El::new("p")));
        assert_eq!(focus_first_in(&doc, scope), None);
        assert_eq!(doc.focus_calls(), 0);
    }

    #[test]
    fn restores_to_matching_opener_only() {
        let doc = FakeDocument::new();
        doc.append(El::new("a").class("modal_opener").attr("amp-target", "a"));
        let b = doc.append(El::new("a").class("modal_opener").attr("amp-target", "b"));
        assert_eq!(
            restore_focus_to_opener(&doc, "modal_opener", "amp-target", "b"),
            Some(b)
        );
        assert_eq!(doc.focused(), Some(b));
        assert_eq!(
            restore_focus_to_opener(&doc, "modal_opener", "amp-target", "zzz"),
            None
        );
    }
}
