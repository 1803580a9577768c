mod burst;
mod contiguity;
mod frontier;
mod partition;
mod sampler;

use frontier::FrontierSet;

pub use partition::Partition;
pub(crate) use burst::short_bursts;
pub(crate) use sampler::sample_partition;
