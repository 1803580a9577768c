/// Coarse checkpoints reported while a hex map is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// The grid is finalized and connected.
    GridBuilt { cells: usize, components_joined: usize },
    /// One independent optimizer run finished with its best score.
    RunFinished { run: usize, score: f64 },
}

/// Optional progress observer.
///
/// Runs report from worker threads, so observers must be `Sync`.  Results
/// never depend on what an observer does.
pub trait Observer: Sync {
    fn on_progress(&self, _progress: &Progress) {}
}

/// Observer that ignores every checkpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

impl<F: Fn(&Progress) + Sync> Observer for F {
    fn on_progress(&self, progress: &Progress) { self(progress) }
}
