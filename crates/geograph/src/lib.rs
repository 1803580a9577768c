pub mod adj;
pub mod components;
pub mod error;
pub mod polygons;

pub use adj::AdjacencyMatrix;
pub use components::{connected_components, suggest_connection, Components};
pub use error::GeographError;
pub use polygons::PolygonSet;
