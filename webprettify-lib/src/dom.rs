use html5ever::QualName;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub mod dom_tree {
    use super::*;

    pub type Handle = Rc<RefCell<Node>>;
    pub type WeakHandle = Weak<RefCell<Node>>;

    #[derive(Debug)]
    pub enum NodeData {
        DocumentRoot,
        Element(ElementNode),
        Text(String),
        Comment(String),
        ProcessingInstruction { target: String, data: String },
    }

    #[derive(Debug)]
    pub struct Node {
        pub data: NodeData,
        pub parent: Option<WeakHandle>,
        pub children: Vec<Handle>,
    }

    #[derive(Debug, Clone)]
    pub struct ElementNode {
        pub tag: String,
        pub qual_name: QualName,
        /// Attributes in source order, names with their prefix (`xlink:href`).
        pub attributes: Vec<(String, String)>,
    }

    #[derive(Debug)]
    pub struct Document {
        pub root: Handle,
        pub doctype: RefCell<Option<Doctype>>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Doctype {
        pub name: String,
        pub public_id: String,
        pub system_id: String,
    }

    impl Node {
        pub fn new(data: NodeData) -> Handle {
            Rc::new(RefCell::new(Node {
                data,
                parent: None,
                children: Vec::new(),
            }))
        }

        pub fn element(&self) -> Option<&ElementNode> {
            match &self.data {
                NodeData::Element(elem) => Some(elem),
                _ => None,
            }
        }

        pub fn parent(&self) -> Option<Handle> {
            self.parent.as_ref().and_then(Weak::upgrade)
        }
    }

    impl ElementNode {
        pub fn new(qual_name: QualName, attributes: Vec<(String, String)>) -> Self {
            ElementNode {
                tag: qual_name.local.to_string(),
                qual_name,
                attributes,
            }
        }

        pub fn attribute(&self, name: &str) -> Option<&str> {
            self.attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        }
    }

    pub fn new_document() -> Document {
        Document {
            root: Node::new(NodeData::DocumentRoot),
            doctype: RefCell::new(None),
        }
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(parent: &Handle, child: Handle) {
        detach(&child);
        child.borrow_mut().parent = Some(Rc::downgrade(parent));
        parent.borrow_mut().children.push(child);
    }

    /// Insert `child` right before `sibling` under the sibling's parent.
    /// Does nothing when the sibling is detached.
    pub fn insert_before(sibling: &Handle, child: Handle) {
        let Some(parent) = sibling.borrow().parent() else {
            return;
        };
        detach(&child);
        child.borrow_mut().parent = Some(Rc::downgrade(&parent));
        let mut parent_node = parent.borrow_mut();
        let position = parent_node
            .children
            .iter()
            .position(|node| Rc::ptr_eq(node, sibling))
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(position, child);
    }

    /// Remove `node` from its parent's children, if it has a parent.
    pub fn detach(node: &Handle) {
        let parent = node.borrow_mut().parent.take().and_then(|weak| weak.upgrade());
        if let Some(parent) = parent {
            parent
                .borrow_mut()
                .children
                .retain(|child| !Rc::ptr_eq(child, node));
        }
    }
}
