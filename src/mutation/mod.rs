//! Mutation engine: placement policies, island repair and budgeted passes

pub mod engine;
pub mod islands;
pub mod memory;
pub mod placement;
pub mod strategies;

pub use engine::{MutatedSpecies, MutationEngine};
pub use islands::{find_islands, repair_islands};
pub use memory::MutationWorkMemory;
pub use placement::{
    place_organelle, side_traversal_order, DirectionBias, Placement, PlacementPolicy,
};
pub use strategies::{
    AddOrganelle, CandidateMutation, ChangeBehaviour, ChangeMembrane, CompositeStrategy,
    MutationContext, MutationKind, MutationStrategy, RemoveOrganelle,
};
