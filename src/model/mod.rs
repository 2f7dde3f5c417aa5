mod graph;
mod load;
mod status;

pub use graph::{
    AdjacencyIndex, AtlasGraph, Connection, Group, GroupLayout, Node, NodeId, NodeRole, PresetDef,
    StatusColor, StoryStep, SurfaceKind, TabDef, build_adjacency,
};
pub use load::{load_atlas, parse_atlas};
pub use status::{
    API_NODE, DATABASE_NODE, GAME_SERVER_NODE, LiveStatusReport, TABLE_NODE_PREFIX, map_report,
    read_report,
};
