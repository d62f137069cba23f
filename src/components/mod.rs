//! UI components.

pub mod link_tree;
