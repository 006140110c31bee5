//! Nearest-ancestor matching over an element tree.
//!
//! The host supplies the selector engine through `Element::matches`; this
//! module only walks the parent chain.

/// A node in a host element tree.
pub trait Element: Sized {
    /// Whether this element matches a CSS-style selector.
    fn matches(&self, selector: &str) -> bool;

    fn parent_element(&self) -> Option<Self>;
}

/// The element itself or its nearest ancestor matching `selector`.
pub fn select_parent<E: Element>(element: E, selector: &str) -> Option<E> {
    let mut current = Some(element);
    while let Some(el) = current {
        if el.matches(selector) {
            return Some(el);
        }
        current = el.parent_element();
    }
    None
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    struct Node {
        tag: &'static str,
        classes: Vec<&'static str>,
        parent: Option<Rc<Node>>,
    }

    #[derive(Clone)]
    struct NodeRef(Rc<Node>);

    // Supports `tag`, `.class` and `tag.class`.
    impl Element for NodeRef {
        fn matches(&self, selector: &str) -> bool {
            let (tag, class) = match selector.split_once('.') {
                Some((tag, class)) => (tag, Some(class)),
                None => (selector, None),
            };
            (tag.is_empty() || tag == self.0.tag)
                && class.map_or(true, |c| self.0.classes.contains(&c))
        }

        fn parent_element(&self) -> Option<Self> {
            self.0.parent.clone().map(NodeRef)
        }
    }

    fn node(tag: &'static str, classes: Vec<&'static str>, parent: Option<&NodeRef>) -> NodeRef {
        NodeRef(Rc::new(Node {
            tag,
            classes,
            parent: parent.map(|p| p.0.clone()),
        }))
    }

    fn tree() -> (NodeRef, NodeRef, NodeRef) {
        let root = node("body", vec![], None);
        let list = node("ul", vec!["menu"], Some(&root));
        let item = node("li", vec!["item"], Some(&list));
        (root, list, item)
    }

    #[test]
    fn returns_self_when_it_matches() {
        let (_, _, item) = tree();
        let found = select_parent(item, "li").unwrap();
        assert_eq!(found.0.tag, "li");
    }

    #[test]
    fn walks_up_to_nearest_ancestor() {
        let (_, _, item) = tree();
        let found = select_parent(item.clone(), ".menu").unwrap();
        assert_eq!(found.0.tag, "ul");
        let found = select_parent(item, "body").unwrap();
        assert_eq!(found.0.tag, "body");
    }

    #[test]
    fn none_when_nothing_matches() {
        let (_, _, item) = tree();
        assert!(select_parent(item, "table").is_none());
    }
}
