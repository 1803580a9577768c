use std::fmt;

/// Unrecoverable conditions raised while building a hex grid.
///
/// Each variant names the input or parameters that produced it, so callers
/// can adjust density or simplify the boundary and retry.  These are wrapped
/// in `anyhow::Error`; use `downcast_ref::<HexmapError>()` to match on them.
#[derive(Debug, Clone, PartialEq)]
pub enum HexmapError {
    /// An input geometry was empty or had no area.
    EmptyGeometry { what: String },
    /// Sliver filtering left no cells at the given tiling resolution.
    NoSurvivingCells { attempt: usize, resolution: (usize, usize), target_cells: usize },
    /// The sizing loop hit its retry cap without exceeding the target count.
    SizingDidNotConverge { attempts: usize, best_cells: usize, target_cells: usize },
    /// Connectivity repair found no cell outside this component to bridge to.
    DisconnectedComponent { component: u32, cells: Vec<u32> },
}

impl fmt::Display for HexmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGeometry { what } =>
                write!(f, "{what} is empty or has zero area"),
            Self::NoSurvivingCells { attempt, resolution, target_cells } =>
                write!(f, "no grid cells survived sliver filtering on attempt {attempt} \
                    (resolution {}x{}, target {target_cells} cells); the boundary or district \
                    geometry is too small or too thin for the requested density",
                    resolution.0, resolution.1),
            Self::SizingDidNotConverge { attempts, best_cells, target_cells } =>
                write!(f, "grid sizing gave up after {attempts} attempts with {best_cells} cells \
                    (needed more than {target_cells}); lower cells_per_district or simplify the boundary"),
            Self::DisconnectedComponent { component, cells } =>
                write!(f, "cannot connect grid component {component} (cells {cells:?}) to the rest of the grid"),
        }
    }
}

impl std::error::Error for HexmapError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_parameters() {
        let err = HexmapError::NoSurvivingCells { attempt: 3, resolution: (4, 2), target_cells: 21 };
        let msg = err.to_string();
        assert!(msg.contains("attempt 3"));
        assert!(msg.contains("4x2"));
        assert!(msg.contains("21"));

        let err = HexmapError::DisconnectedComponent { component: 2, cells: vec![7, 8] };
        assert!(err.to_string().contains("[7, 8]"));
    }

    #[test]
    fn downcasts_through_anyhow() {
        let err: anyhow::Error = HexmapError::EmptyGeometry { what: "boundary".into() }.into();
        assert_eq!(
            err.downcast_ref::<HexmapError>(),
            Some(&HexmapError::EmptyGeometry { what: "boundary".into() }),
        );
    }
}
