//! Agent-indexed relationship storage.
//!
//! Trust models and scenarios both need a square, lazily growing table of
//! per-pair state (opinions, deception assignments) alongside a matching
//! per-agent row (experience summaries). Agent ids are allocated by the
//! scenario and may be sparse, so the table is sized by the largest id seen
//! rather than by a count. Absent entries are `None`, never a numeric
//! default that could pass for data.

/// Square matrix of pair state `T` plus a self row of per-agent state `S`,
/// both indexed by agent id.
///
/// The only structural mutation is [`ensure_capacity`](Self::ensure_capacity),
/// which grows the bound and preserves every stored entry. Capacity never
/// shrinks.
#[derive(Debug)]
pub struct RelationMatrix<T, S> {
    bound: usize,
    cells: Vec<Option<T>>,
    selves: Vec<Option<S>>,
}

impl<T, S> RelationMatrix<T, S> {
    /// Creates an empty matrix with bound 0.
    pub fn new() -> Self {
        Self {
            bound: 0,
            cells: Vec::new(),
            selves: Vec::new(),
        }
    }

    /// Current exclusive bound on addressable agent ids.
    pub fn capacity(&self) -> usize {
        self.bound
    }

    /// Grows the matrix so that `max_agent_id` is addressable.
    ///
    /// Existing entries keep their positions; new cells start unset. Growth
    /// copies the full table, so callers batch it: scan a tick's incoming
    /// tuples for the largest id first, then grow once.
    pub fn ensure_capacity(&mut self, max_agent_id: usize) {
        let needed = max_agent_id + 1;
        if needed <= self.bound {
            return;
        }
        let mut cells: Vec<Option<T>> = Vec::new();
        cells.resize_with(needed * needed, || None);
        for i in 0..self.bound {
            for j in 0..self.bound {
                cells[i * needed + j] = self.cells[i * self.bound + j].take();
            }
        }
        self.cells = cells;
        self.selves.resize_with(needed, || None);
        self.bound = needed;
    }

    /// Pair entry for `(source, target)`, or `None` when unset or out of
    /// bounds.
    pub fn get(&self, source: usize, target: usize) -> Option<&T> {
        if source >= self.bound || target >= self.bound {
            return None;
        }
        self.cells[source * self.bound + target].as_ref()
    }

    /// Stores a pair entry. The ids must already be within capacity.
    pub fn set(&mut self, source: usize, target: usize, value: T) {
        assert!(
            source < self.bound && target < self.bound,
            "relation matrix write at ({source}, {target}) outside bound {}; \
             ensure_capacity first",
            self.bound
        );
        self.cells[source * self.bound + target] = Some(value);
    }

    /// Self-row entry for `agent`, or `None` when unset or out of bounds.
    pub fn get_self(&self, agent: usize) -> Option<&S> {
        if agent >= self.bound {
            return None;
        }
        self.selves[agent].as_ref()
    }

    /// Stores a self-row entry. The id must already be within capacity.
    pub fn set_self(&mut self, agent: usize, value: S) {
        *self.self_mut(agent) = Some(value);
    }

    /// Mutable self-row slot for in-place accumulation.
    pub fn self_mut(&mut self, agent: usize) -> &mut Option<S> {
        assert!(
            agent < self.bound,
            "relation matrix self write at {agent} outside bound {}; \
             ensure_capacity first",
            self.bound
        );
        &mut self.selves[agent]
    }

    /// Set entries of the column for `target`, in source order.
    pub fn column(&self, target: usize) -> impl Iterator<Item = &T> {
        (0..self.bound).filter_map(move |source| self.get(source, target))
    }
}

impl<T, S> Default for RelationMatrix<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let matrix: RelationMatrix<f64, u32> = RelationMatrix::new();
        assert_eq!(matrix.capacity(), 0);
        assert_eq!(matrix.get(0, 0), None);
        assert_eq!(matrix.get_self(0), None);
    }

    #[test]
    fn test_growth_preserves_entries() {
        let mut matrix: RelationMatrix<f64, u32> = RelationMatrix::new();
        matrix.ensure_capacity(2);
        matrix.set(0, 1, 0.25);
        matrix.set(2, 0, 0.75);
        matrix.set_self(1, 7);

        matrix.ensure_capacity(6);

        assert_eq!(matrix.capacity(), 7);
        assert_eq!(matrix.get(0, 1), Some(&0.25));
        assert_eq!(matrix.get(2, 0), Some(&0.75));
        assert_eq!(matrix.get_self(1), Some(&7));
        // Never-set cells stay unset rather than defaulting.
        assert_eq!(matrix.get(1, 0), None);
        assert_eq!(matrix.get(5, 5), None);
        assert_eq!(matrix.get_self(6), None);
    }

    #[test]
    fn test_capacity_never_shrinks() {
        let mut matrix: RelationMatrix<u8, u8> = RelationMatrix::new();
        matrix.ensure_capacity(9);
        matrix.ensure_capacity(3);
        assert_eq!(matrix.capacity(), 10);
    }

    #[test]
    fn test_out_of_bounds_reads_are_no_information() {
        let mut matrix: RelationMatrix<u8, u8> = RelationMatrix::new();
        matrix.ensure_capacity(1);
        assert_eq!(matrix.get(5, 0), None);
        assert_eq!(matrix.get_self(5), None);
    }

    #[test]
    #[should_panic(expected = "ensure_capacity")]
    fn test_write_outside_bound_panics() {
        let mut matrix: RelationMatrix<u8, u8> = RelationMatrix::new();
        matrix.ensure_capacity(1);
        matrix.set(2, 0, 1);
    }

    #[test]
    fn test_self_mut_accumulates_in_place() {
        let mut matrix: RelationMatrix<u8, u32> = RelationMatrix::new();
        matrix.ensure_capacity(0);
        for _ in 0..3 {
            let slot = matrix.self_mut(0);
            *slot = Some(slot.unwrap_or(0) + 1);
        }
        assert_eq!(matrix.get_self(0), Some(&3));
    }

    #[test]
    fn test_column_iterates_set_sources_in_order() {
        let mut matrix: RelationMatrix<u32, ()> = RelationMatrix::new();
        matrix.ensure_capacity(3);
        matrix.set(3, 1, 30);
        matrix.set(0, 1, 10);
        matrix.set(2, 2, 99);
        let column: Vec<u32> = matrix.column(1).copied().collect();
        assert_eq!(column, vec![10, 30]);
    }
}
