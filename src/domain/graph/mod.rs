//! Conversation flow graph model
//!
//! A workflow is a directed graph drawn in the visual editor: start nodes,
//! yes/no decision nodes, terminal action nodes and scenario nodes that label
//! the user situations feeding into a decision.

mod edge;
mod flows;
mod node;

pub use edge::{Edge, EdgeHandle};
pub use flows::{extract_decision_flows, BranchActions, DecisionFlow};
pub use node::{Node, NodeId, NodeKind};
