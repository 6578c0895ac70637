use thiserror::Error;

/// Errors raised when a cost matrix is rejected before any solving begins.
///
/// Both variants are detected eagerly, so a failed call never allocates or
/// mutates solver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The matrix has zero rows or zero columns.
    #[error("cost matrix is empty ({rows}x{cols}); both dimensions must be at least 1")]
    EmptyMatrix { rows: usize, cols: usize },

    /// The matrix holds at least one negative cost.
    #[error("negative cost at ({row}, {col}); all costs must be nonnegative")]
    NegativeCost { row: usize, col: usize },
}
