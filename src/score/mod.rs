mod assignment;
mod scorer;

pub use assignment::AssignmentBijection;
pub use scorer::{ScoreBreakdown, Scorer, DEFAULT_DISTANCE_SCALE};
