//! Decision-flow extraction
//!
//! Walks a workflow graph from every start node and collects, for each
//! decision node directly wired to a start, its inbound scenarios and its
//! yes/no action branches. This is the shape the prompt assembler consumes.

use serde::{Deserialize, Serialize};

use super::{Edge, EdgeHandle, Node, NodeId, NodeKind};

/// Yes/no branch targets of a decision node. A missing branch is rendered
/// downstream as the literal "No action specified".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchActions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no: Option<String>,
}

/// A decision node together with its attached scenarios and branch actions.
/// Derived per request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionFlow {
    pub decision: String,
    pub scenarios: Vec<String>,
    pub actions: BranchActions,
}

/// Extracts decision flows from a node/edge set.
///
/// Discovery is start-anchored: only decision nodes with a direct edge from
/// a start node are considered. Scenario collection deliberately scans ALL
/// inbound edges of the decision node regardless of start-reachability; the
/// two rules differ and both are load-bearing for existing workflows, so
/// neither is unified with the other.
///
/// A decision reachable from two start nodes appears twice. Cycles elsewhere
/// in the graph are irrelevant here: traversal never goes deeper than
/// start -> decision -> action/scenario.
pub fn extract_decision_flows(nodes: &[Node], edges: &[Edge]) -> Vec<DecisionFlow> {
    let mut flows = Vec::new();

    let starts = nodes
        .iter()
        .filter(|n| matches!(n.kind, NodeKind::Start { .. }));

    for start in starts {
        for edge in edges.iter().filter(|e| e.source == start.id) {
            let Some(target) = find_node(nodes, &edge.target) else {
                continue;
            };

            if matches!(target.kind, NodeKind::Decision { .. }) {
                flows.push(build_flow(target, nodes, edges));
            }
        }
    }

    flows
}

fn find_node<'a>(nodes: &'a [Node], id: &NodeId) -> Option<&'a Node> {
    nodes.iter().find(|n| &n.id == id)
}

fn build_flow(decision: &Node, nodes: &[Node], edges: &[Edge]) -> DecisionFlow {
    let scenarios = edges
        .iter()
        .filter(|e| e.target == decision.id)
        .filter_map(|e| find_node(nodes, &e.source))
        .filter(|n| matches!(n.kind, NodeKind::Scenario { .. }))
        .map(|n| n.label().to_string())
        .collect();

    let branch = |handle: EdgeHandle| {
        edges
            .iter()
            .filter(|e| e.source == decision.id && e.has_handle(&handle))
            .filter_map(|e| find_node(nodes, &e.target))
            .find(|n| matches!(n.kind, NodeKind::Action { .. }))
            .map(|n| n.label().to_string())
    };

    DecisionFlow {
        decision: decision.label().to_string(),
        scenarios,
        actions: BranchActions {
            yes: branch(EdgeHandle::Yes),
            no: branch(EdgeHandle::No),
        },
    }
}
