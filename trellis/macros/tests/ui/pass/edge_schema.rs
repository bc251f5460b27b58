//! Test: an edge schema and a vertex schema linking to it compile, and the
//! stripped traits can be implemented by hand.

use std::fmt;

use trellis::{Edge, FramedEdge, FramedElement, FramedGraph, FramedVertex, edge, vertex};

#[vertex]
pub trait Place: FramedVertex {
    #[linked_edge(label = "road", direction = In)]
    fn get_roads(&self) -> Vec<Box<dyn Road>>;
}

#[edge]
pub trait Road: FramedEdge {
    fn get_length(&self) -> f64;

    #[inbound]
    fn get_to(&self) -> Box<dyn Place>;
}

#[derive(Debug)]
struct RoadImpl {
    edge: Edge,
    graph: FramedGraph,
}

impl fmt::Display for RoadImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "road[{}]", self.edge.id())
    }
}

impl FramedElement for RoadImpl {
    fn graph(&self) -> &FramedGraph {
        &self.graph
    }
}

impl FramedEdge for RoadImpl {
    fn edge(&self) -> &Edge {
        &self.edge
    }
}

impl Road for RoadImpl {
    fn get_length(&self) -> f64 {
        self.edge.property::<f64>("length").unwrap_or(0.0f64)
    }

    fn get_to(&self) -> Box<dyn Place> {
        unimplemented!()
    }
}

fn main() {}
