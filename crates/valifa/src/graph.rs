use std::fmt::{self, Display};

use petgraph::{
    dot::{Config, Dot},
    graph::{DiGraph, NodeIndex},
};

use crate::{
    state::{StateIdx, StateSet, StateTable},
    symbol::Symbol,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeShape {
    /// The invisible node the start arrow comes from.
    Anchor,
    Normal,
    Final,
}

impl NodeShape {
    pub fn dot_shape(self) -> &'static str {
        match self {
            NodeShape::Anchor => "none",
            NodeShape::Normal => "circle",
            NodeShape::Final => "doublecircle",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
    pub name: String,
    pub shape: NodeShape,
    // false for ghost states that only appear as a transition destination
    pub declared: bool,
}

impl Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeLabel {
    Start,
    Symbol(Symbol),
}

impl Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeLabel::Start => Ok(()),
            EdgeLabel::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

// endpoints are positions in `AutomatonGraph::nodes`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: usize,
    pub to: usize,
    pub label: EdgeLabel,
}

/// Drawable description of an automaton: the anchor node comes first, then one node per
/// state in interning order; edges follow the sorted transition list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutomatonGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

const ANCHOR: usize = 0;

impl AutomatonGraph {
    pub fn build(
        states: &StateTable,
        transitions: &[(StateIdx, Symbol, StateIdx)],
        accepting: &StateSet,
    ) -> AutomatonGraph {
        let mut nodes = vec![GraphNode {
            name: String::new(),
            shape: NodeShape::Anchor,
            declared: false,
        }];

        // undeclared states only get a node when some edge points at them
        let mut referenced = StateSet::new();
        for (from, _, to) in transitions {
            referenced.insert(*from);
            referenced.insert(*to);
        }

        let mut positions: Vec<Option<usize>> = vec![None; states.len()];
        for idx in states.iter() {
            let declared = states.is_declared(idx);
            if !declared && !referenced.contains(idx) {
                continue;
            }

            let shape = if declared && accepting.contains(idx) {
                NodeShape::Final
            } else {
                NodeShape::Normal
            };
            positions[idx.index()] = Some(nodes.len());
            nodes.push(GraphNode {
                name: states.name(idx).to_string(),
                shape,
                declared,
            });
        }

        let mut edges = Vec::with_capacity(transitions.len() + 1);
        if let Some(start) = states.start().and_then(|idx| positions[idx.index()]) {
            edges.push(GraphEdge {
                from: ANCHOR,
                to: start,
                label: EdgeLabel::Start,
            });
        }

        for (from, symbol, to) in transitions {
            if let (Some(from), Some(to)) = (positions[from.index()], positions[to.index()]) {
                edges.push(GraphEdge {
                    from,
                    to,
                    label: EdgeLabel::Symbol(*symbol),
                });
            }
        }

        AutomatonGraph { nodes, edges }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes
            .iter()
            .skip(1)
            .find(|node| node.name == name)
    }

    /// Edges as (source name, label, destination name); the start edge has an empty source.
    pub fn labeled_edges(&self) -> impl Iterator<Item = (&str, EdgeLabel, &str)> + '_ {
        self.edges.iter().map(|edge| {
            (
                self.nodes[edge.from].name.as_str(),
                edge.label,
                self.nodes[edge.to].name.as_str(),
            )
        })
    }

    pub fn to_petgraph(&self) -> DiGraph<GraphNode, EdgeLabel> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let indices: Vec<NodeIndex> = self
            .nodes
            .iter()
            .map(|node| graph.add_node(node.clone()))
            .collect();

        for edge in &self.edges {
            graph.add_edge(indices[edge.from], indices[edge.to], edge.label);
        }

        graph
    }

    /// Graphviz source, laid out left to right.
    pub fn to_dot(&self) -> String {
        let graph = self.to_petgraph();
        let dot = Dot::with_attr_getters(
            &graph,
            &[Config::GraphContentOnly],
            &|_, _| String::new(),
            &|_, (_, node)| format!("shape = {} ", node.shape.dot_shape()),
        );

        format!("digraph {{\n    rankdir = LR\n{}}}\n", dot)
    }
}
