//! Arena-based HTML tree with predicate queries and DOM-style mutation.
//!
//! sprig provides:
//! - **Arena DOM**: every node lives in one indextree arena and is addressed
//!   by [`NodeId`]; parent links and child lists can never disagree
//! - **Predicates**: composable `Fn(&Dom, NodeId) -> bool` tests over tag
//!   names, attributes, classes, text and ancestry
//! - **Walks**: pre-order search, `querySelector`-style queries, ancestor
//!   walks and reverse-document-order ("prior") walks
//! - **Mutation**: insert, replace, remove, clone, normalize
//! - **Parsing and serialization**: html5ever tree construction in, HTML5
//!   serialization out
//!
//! # Example
//!
//! ```rust
//! use sprig::predicates::{has_attr_value, has_tag_name, is_text_node};
//! use sprig::{and, parse_fragment};
//!
//! let mut dom = parse_fragment(r#"<ul><li id="a">one</li><li id="b">two</li></ul>"#);
//!
//! let b = dom.query(dom.root, has_attr_value("id", "b")).unwrap();
//! assert_eq!(dom.get_text_content(b).as_ref(), "two");
//!
//! // Everything before `b` that is a text node, nearest first
//! let texts = dom.node_walk_all_prior(b, is_text_node);
//! assert_eq!(texts.len(), 1);
//!
//! // Move `b` to the front
//! let ul = dom.query(dom.root, and!(has_tag_name("ul"))).unwrap();
//! dom.insert_node(ul, 0, b, false).unwrap();
//! assert_eq!(
//!     dom.to_html(),
//!     r#"<ul><li id="b">two</li><li id="a">one</li></ul>"#
//! );
//! ```

#[macro_use]
mod tracing_macros;

mod dom;
mod error;
mod mutate;
mod node;
mod parser;
pub mod predicates;
pub mod serialize;
mod walk;

pub use dom::Dom;
pub use error::DomError;
pub use node::{Attributes, ElementData, Namespace, NodeData, NodeKind, SourceLocation};
pub use parser::{parse_document, parse_fragment};
pub use predicates::{BoxedPredicate, Predicate};
pub use serialize::{SerializeOptions, serialize};
pub use walk::{ChildNodes, DepthFirst, Prior};

pub use indextree;
pub use indextree::NodeId;
