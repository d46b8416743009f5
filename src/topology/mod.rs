mod components;
mod edge_map;

pub use components::{find_connected_components, Component, ComponentAnalysis};
pub use edge_map::{EdgeKey, EdgeMap, EdgeRecord};
