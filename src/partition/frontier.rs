/// Cells on the border of each part, with O(1) insert and remove.
///
/// Every cell sits in at most one set; removal swaps the last element of
/// the set into the vacated slot.
#[derive(Debug, Clone)]
pub(super) struct FrontierSet {
    sets: Vec<Vec<usize>>,
    index: Vec<Option<(usize, usize)>>, // index[cell] = Some((part, pos)) if sets[part][pos] == cell
}

impl FrontierSet {
    /// Create empty frontiers for `num_parts` parts over `num_cells` cells.
    pub(super) fn new(num_parts: usize, num_cells: usize) -> Self {
        Self {
            sets: vec![Vec::new(); num_parts],
            index: vec![None; num_cells],
        }
    }

    /// Remove every cell from every frontier.
    pub(super) fn clear(&mut self) {
        self.sets.iter_mut().for_each(Vec::clear);
        self.index.fill(None);
    }

    /// Get the frontier cells of a part.
    #[inline]
    pub(super) fn get(&self, part: usize) -> &[usize] {
        debug_assert!(part < self.sets.len(), "part out of range");
        &self.sets[part]
    }

    /// Put `cell` on the frontier of `part`, moving it from any other.
    pub(super) fn insert(&mut self, cell: usize, part: usize) {
        match self.index[cell] {
            Some((current, _)) if current == part => {}
            Some(_) => { self.remove(cell); self.push(cell, part) }
            None => self.push(cell, part),
        }
    }

    /// Take `cell` off whichever frontier holds it.
    pub(super) fn remove(&mut self, cell: usize) {
        let Some((part, pos)) = self.index[cell].take() else { return };
        let set = &mut self.sets[part];
        set.swap_remove(pos);
        if let Some(&moved) = set.get(pos) {
            self.index[moved] = Some((part, pos));
        }
    }

    #[inline]
    fn push(&mut self, cell: usize, part: usize) {
        self.index[cell] = Some((part, self.sets[part].len()));
        self.sets[part].push(cell);
    }
}

#[cfg(test)]
mod tests {
    use super::FrontierSet;

    #[test]
    fn insert_moves_between_parts() {
        let mut frontiers = FrontierSet::new(3, 6);
        frontiers.insert(4, 1);
        frontiers.insert(4, 1);
        assert_eq!(frontiers.get(1), &[4]);

        frontiers.insert(4, 2);
        assert!(frontiers.get(1).is_empty());
        assert_eq!(frontiers.get(2), &[4]);
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let mut frontiers = FrontierSet::new(2, 5);
        for cell in 0..4 { frontiers.insert(cell, 0) }
        frontiers.remove(1);
        frontiers.remove(1);

        assert_eq!(frontiers.get(0), &[0, 3, 2]);

        // The swapped-in cell must still be removable from its new slot.
        frontiers.remove(3);
        assert_eq!(frontiers.get(0), &[0, 2]);
    }

    #[test]
    fn clear_empties_everything() {
        let mut frontiers = FrontierSet::new(2, 3);
        frontiers.insert(0, 0);
        frontiers.insert(2, 1);
        frontiers.clear();
        assert!(frontiers.get(0).is_empty() && frontiers.get(1).is_empty());

        frontiers.insert(2, 0);
        assert_eq!(frontiers.get(0), &[2]);
    }
}
