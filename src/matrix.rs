//! Dense capital x productivity state matrices.

/// Heap-backed `n_capital x n_productivity` matrix of `f64`.
///
/// Stored one productivity row at a time: all capital levels of state 0,
/// then state 1, and so on. The Bellman search walks capital in order within
/// a productivity state, so each row is a contiguous slice that can be handed
/// to a worker on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct StateMatrix {
    n_capital: usize,
    n_productivity: usize,
    data: Vec<f64>,
}

impl StateMatrix {
    /// Zero-filled matrix.
    ///
    /// # Panics
    ///
    /// Panics if `n_capital` is zero.
    pub fn zeros(n_capital: usize, n_productivity: usize) -> Self {
        assert!(n_capital > 0, "state matrix needs at least one capital level");
        Self {
            n_capital,
            n_productivity,
            data: vec![0f64; n_capital * n_productivity],
        }
    }

    /// Builds a matrix from `f(capital_idx, productivity_idx)`.
    pub fn from_fn(
        n_capital: usize,
        n_productivity: usize,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> Self {
        let mut m = Self::zeros(n_capital, n_productivity);
        for (p, row) in m.rows_mut().enumerate() {
            for (k, val) in row.iter_mut().enumerate() {
                *val = f(k, p);
            }
        }
        m
    }

    pub fn n_capital(&self) -> usize {
        self.n_capital
    }

    pub fn n_productivity(&self) -> usize {
        self.n_productivity
    }

    #[inline]
    pub fn get(&self, capital_idx: usize, productivity_idx: usize) -> f64 {
        self.data[self.offset(capital_idx, productivity_idx)]
    }

    /// Returns `None` when either index is out of range.
    pub fn try_get(&self, capital_idx: usize, productivity_idx: usize) -> Option<f64> {
        if capital_idx < self.n_capital && productivity_idx < self.n_productivity {
            Some(self.get(capital_idx, productivity_idx))
        } else {
            None
        }
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, f64> {
        self.data.chunks_exact(self.n_capital)
    }

    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, f64> {
        self.data.chunks_exact_mut(self.n_capital)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    fn offset(&self, capital_idx: usize, productivity_idx: usize) -> usize {
        debug_assert!(capital_idx < self.n_capital && productivity_idx < self.n_productivity);
        productivity_idx * self.n_capital + capital_idx
    }
}
