pub mod entity_graph;
pub mod force_graph;
pub mod graph_view;
mod node_preview;
mod type_filter;
