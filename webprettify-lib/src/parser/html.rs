//! This module parses HTML into the owned tree of `crate::dom::dom_tree`.
//!
//! html5ever does the parsing; [`PrettifyTreeSink`] receives its tree
//! operations. Recoverable HTML errors are only logged. Tree operations that
//! make no sense for the sink are recorded and turn the whole parse into an
//! [`Error::Parse`].

use crate::dom::dom_tree::{self, Handle, Node, NodeData};
use crate::error::{Error, Result};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink},
    Attribute, LocalName, Namespace, QualName,
};
use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Parses the provided HTML content into a document tree.
///
/// # Arguments
///
/// * `html_content` - A string slice containing the HTML to parse.
///
/// # Returns
///
/// The parsed `dom_tree::Document`, or `Error::Parse` when the tree could not
/// be built.
pub fn create_dom_tree(html_content: &str) -> Result<dom_tree::Document> {
    let tree_sink = PrettifyTreeSink::new();
    html5ever::parse_document(tree_sink, Default::default()).one(html_content)
}

/// A custom TreeSink for building the document tree.
///
/// It holds the Document being built, the quirks mode chosen by the parser,
/// the count of recoverable parse errors and the first fatal sink error.
pub struct PrettifyTreeSink {
    document: dom_tree::Document,
    quirks_mode: Cell<QuirksMode>,
    parse_errors: Cell<usize>,
    failure: RefCell<Option<String>>,
}

impl Default for PrettifyTreeSink {
    fn default() -> Self {
        Self::new()
    }
}

impl PrettifyTreeSink {
    /// Creates a new `PrettifyTreeSink` with an empty document.
    pub fn new() -> Self {
        Self {
            document: dom_tree::new_document(),
            quirks_mode: Cell::new(QuirksMode::NoQuirks),
            parse_errors: Cell::new(0),
            failure: RefCell::new(None),
        }
    }

    /// Quirks mode the parser settled on.
    pub fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode.get()
    }

    /// Remembers the first fatal error; later ones are only logged.
    fn fail(&self, message: String) {
        log::error!("HTML tree error: {}", message);
        let mut failure = self.failure.borrow_mut();
        if failure.is_none() {
            *failure = Some(message);
        }
    }

    /// Turns appended text into a node, merging it into a text node right
    /// before the insertion point when there is one.
    fn append_text_or_node(&self, parent: &Handle, child: NodeOrText<Handle>) {
        match child {
            NodeOrText::AppendNode(node) => dom_tree::append_child(parent, node),
            NodeOrText::AppendText(text) => {
                if let Some(last) = parent.borrow().children.last() {
                    if let NodeData::Text(existing) = &mut last.borrow_mut().data {
                        existing.push_str(&text);
                        return;
                    }
                }
                dom_tree::append_child(parent, Node::new(NodeData::Text(text.to_string())));
            }
        }
    }
}

/// A simple implementation of the `ElemName` trait for our elements.
#[derive(Debug)]
pub struct PrettifyElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for PrettifyElemName {
    /// Returns a reference to the local name of the element.
    fn local_name(&self) -> &LocalName {
        &self.local
    }

    /// Returns a reference to the namespace of the element.
    fn ns(&self) -> &Namespace {
        &self.ns
    }
}

fn attribute_pair(attr: Attribute) -> (String, String) {
    let name = match &attr.name.prefix {
        Some(prefix) => format!("{}:{}", prefix, attr.name.local),
        None => attr.name.local.to_string(),
    };
    (name, attr.value.to_string())
}

impl TreeSink for PrettifyTreeSink {
    type Handle = Handle;
    type Output = Result<dom_tree::Document>;
    type ElemName<'a>
        = PrettifyElemName
    where
        Self: 'a;

    /// Finalizes the Document, failing if the sink saw a fatal error.
    fn finish(self) -> Self::Output {
        let errors = self.parse_errors.get();
        if errors > 0 {
            log::debug!("HTML parsed with {} recoverable errors", errors);
        }
        match self.failure.into_inner() {
            Some(message) => Err(Error::parse(message)),
            None => Ok(self.document),
        }
    }

    /// Called for recoverable HTML errors.
    fn parse_error(&self, msg: Cow<'static, str>) {
        self.parse_errors.set(self.parse_errors.get() + 1);
        log::debug!("HTML parse error: {}", msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document.root.clone()
    }

    /// Returns the element name for the given element handle.
    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        if let Some(elem) = target.borrow().element() {
            return PrettifyElemName {
                ns: elem.qual_name.ns.clone(),
                local: elem.qual_name.local.clone(),
            };
        }
        self.fail("element name requested for a non-element node".to_string());
        PrettifyElemName {
            ns: Namespace::from(""),
            local: LocalName::from(""),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attributes = attrs.into_iter().map(attribute_pair).collect();
        Node::new(NodeData::Element(dom_tree::ElementNode::new(name, attributes)))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        Node::new(NodeData::Comment(text.to_string()))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        Node::new(NodeData::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        })
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        if matches!(parent.borrow().data, NodeData::Text(_) | NodeData::Comment(_)) {
            self.fail("cannot append children to a text or comment node".to_string());
            return;
        }
        self.append_text_or_node(parent, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if element.borrow().parent().is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    /// Stores the DOCTYPE on the Document.
    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        *self.document.doctype.borrow_mut() = Some(dom_tree::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        });
    }

    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    fn pop(&self, _node: &Self::Handle) {}

    /// Template contents live directly under the template element.
    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        self.quirks_mode.set(mode);
    }

    /// Inserts a node or text right before `sibling` (foster parenting).
    fn append_before_sibling(&self, sibling: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let Some(parent) = sibling.borrow().parent() else {
            self.fail("sibling without a parent".to_string());
            return;
        };
        match child {
            NodeOrText::AppendNode(node) => dom_tree::insert_before(sibling, node),
            NodeOrText::AppendText(text) => {
                let previous = {
                    let parent_node = parent.borrow();
                    let position = parent_node
                        .children
                        .iter()
                        .position(|node| Rc::ptr_eq(node, sibling));
                    position
                        .and_then(|index| index.checked_sub(1))
                        .map(|index| parent_node.children[index].clone())
                };
                if let Some(previous) = previous {
                    if let NodeData::Text(existing) = &mut previous.borrow_mut().data {
                        existing.push_str(&text);
                        return;
                    }
                }
                dom_tree::insert_before(sibling, Node::new(NodeData::Text(text.to_string())));
            }
        }
    }

    /// Adds attributes to the target node if they are missing.
    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut target_node = target.borrow_mut();
        if let NodeData::Element(elem_node) = &mut target_node.data {
            for (key, value) in attrs.into_iter().map(attribute_pair) {
                if !elem_node.attributes.iter().any(|(k, _)| k == &key) {
                    elem_node.attributes.push((key, value));
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        dom_tree::detach(target);
    }

    /// Moves every child of `node` under `new_parent`.
    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let children = std::mem::take(&mut node.borrow_mut().children);
        for child in children {
            child.borrow_mut().parent = Some(Rc::downgrade(new_parent));
            new_parent.borrow_mut().children.push(child);
        }
    }
}
