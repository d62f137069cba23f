//! Editable node-link tree diagram.
//!
//! Renders a hierarchy as a tidy tree on an HTML canvas and lets the user:
//! - Draw extra links by clicking two nodes in turn
//! - Select a link by clicking it, and clicking it again to deselect
//! - Delete the selected link (panel button or `Delete` key)
//! - Cancel a half-drawn link (panel button or `Esc`)
//!
//! The editing rules live in [`GraphEditor`], which has no web dependencies
//! and can be driven directly.
//!
//! # Example
//!
//! ```ignore
//! use link_tree::{Hierarchy, LinkTreeCanvas, TreeData};
//!
//! let data = TreeData {
//!     tree: Hierarchy::branch("root", vec![Hierarchy::leaf("a"), Hierarchy::leaf("b")]),
//!     ..Default::default()
//! };
//!
//! view! { <LinkTreeCanvas data=data.into() fullscreen=true /> }
//! ```

mod component;
pub mod config;
pub mod editor;
pub mod geometry;
pub mod layout;
mod render;
mod state;
pub mod theme;
mod types;

pub use component::LinkTreeCanvas;
pub use config::TreeConfig;
pub use editor::{AddLinkOutcome, GraphEditor, Link, LinkId, LinkKind, Node, NodeId, NodeRef, Selection};
pub use layout::{TreeLayout, tidy_tree};
pub use types::{ExtraLink, Hierarchy, TreeData};
