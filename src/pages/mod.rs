pub mod entity;
pub mod graph;
pub mod not_found;
