//! Minimum-cost assignment over nalgebra matrices.
//!
//! [`solve`] takes an m×n matrix of nonnegative costs, where entry `(i, j)`
//! is the cost of pairing row `i` with column `j`, and returns a matching of
//! rows to columns that is cheapest in total cost. The matrix may be
//! rectangular: `min(m, n)` pairs are produced, and surplus rows come back
//! unassigned. The implementation is the Munkres method (row/column
//! reduction followed by augmenting-path rounds over starred and primed
//! zeros), running in polynomial time on the caller's thread with no shared
//! state between calls.

mod error;
mod solver;

pub use error::SolveError;
pub use solver::{solve, Solution};

/// Expands an assignment vector into one `(row, column)` pair per row, in
/// row order. `None` columns mark rows left unassigned by a tall matrix.
pub fn vector_pairs(assignment: &[Option<usize>]) -> Vec<(usize, Option<usize>)> {
    assignment.iter().copied().enumerate().collect()
}
