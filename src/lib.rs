pub mod adjacency;
pub mod edit;
pub mod error;
pub mod events;
mod face_heal;
mod face_split;
pub mod ids;
mod index;
pub mod model;
pub mod predicate;
pub mod query;
pub mod ring;
pub mod store;
mod wiring;

pub use error::{Result, SpatialError};
pub use events::{Event, SubscriptionId};
pub use ids::{EdgeId, FaceId, NodeId, UNIVERSE_FACE};
pub use model::{DirectedEdge, Edge, Face, Node};
pub use store::Topology;
