//! 拓扑构建模块

pub mod tree;

pub use tree::{build_tree, TreeOpts, TreeTopology};
