#![doc = "Hexmander public API"]
mod assemble;
mod config;
mod error;
mod geom;
mod graph;
mod grid;
mod hexmap;
mod observer;
mod partition;
mod score;
mod search;

#[doc(inline)]
pub use config::{HexmapConfig, InputCrs, ScoreConfig, SearchConfig};

#[doc(inline)]
pub use error::HexmapError;

#[doc(inline)]
pub use observer::{NoopObserver, Observer, Progress};

#[doc(inline)]
pub use geom::Projection;

#[doc(inline)]
pub use grid::{HexCell, HexGrid, TargetData};

#[doc(inline)]
pub use score::{AssignmentBijection, ScoreBreakdown, Scorer, DEFAULT_DISTANCE_SCALE};

#[doc(inline)]
pub use partition::Partition;

#[doc(inline)]
pub use search::{run_search, PartitionSearch, RunResult, ShortBursts};

#[doc(inline)]
pub use assemble::{assemble, assemble_single, DistrictShape};

#[doc(inline)]
pub use hexmap::{Hexmap, HexmapOutput};

/// Adjacency structure shared by grids and target districts.
pub use geograph::AdjacencyMatrix;
