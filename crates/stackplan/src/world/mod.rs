//! The block-stacking world: snapshots, placement laws and transitions

pub mod graph;
pub mod physics;
pub mod state;

pub use graph::{action_between, action_cost, Action, BlocksGraph};
pub use state::{Location, WorldState, MAX_ARMS};
