//! Zone layout for the workbench screen.

mod core;

pub use core::{Constraint, Direction, LayoutNode, LayoutTree, NodeId};
