//! Knowledge-graph construction: keys, assembly, lineage layering, filtering and focus.

pub mod assemble;
pub mod category;
pub mod entity;
pub mod filter;
pub mod focus;
pub mod graph;
pub mod key;
pub mod lineage;
pub mod source;
pub mod tag_input;

pub use assemble::assemble;
pub use entity::{EntityRef, EntityType};
pub use filter::TypeFilterSet;
pub use focus::{Anchor, FocusAction, FocusController, GraphMode};
pub use graph::{Category, GraphEdge, GraphVertex, KnowledgeGraph, LinkStyle, NodeRole};
pub use key::{NodeKey, build_key, parse_key};
pub use source::{GraphRequest, GraphSource, TraceDirection};
pub use tag_input::TagInput;
