use log::{debug, trace};
use nalgebra::{DMatrix, Dim, Matrix, RawStorage, RealField};

use crate::SolveError;

/// A finished assignment: one column per row (or `None` for rows left out
/// when the matrix has more rows than columns) plus the total cost of the
/// matched pairs, summed from the original cost matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<T> {
    assignment: Vec<Option<usize>>,
    total_cost: T,
}

impl<T: Copy> Solution<T> {
    /// The matched column for each row, in row order.
    pub fn assignment(&self) -> &[Option<usize>] {
        &self.assignment
    }

    pub fn total_cost(&self) -> T {
        self.total_cost
    }

    /// Iterator over the matched `(row, col)` pairs, skipping unassigned rows.
    pub fn assigned(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.assignment
            .iter()
            .enumerate()
            .filter_map(|(row, col)| col.map(|col| (row, col)))
    }

    /// One `(row, column)` pair per row, unassigned rows included.
    pub fn pairs(&self) -> Vec<(usize, Option<usize>)> {
        crate::vector_pairs(&self.assignment)
    }
}

/// Solves the assignment problem for the given cost matrix.
///
/// Entry `(i, j)` is the cost of pairing row `i` with column `j`. The matrix
/// may be rectangular; `min(rows, cols)` pairs are produced and, when there
/// are more rows than columns, the surplus rows come back unassigned. The
/// total cost is minimal over all feasible matchings, though which of several
/// equally cheap matchings is returned is implementation-defined.
///
/// Fails with [`SolveError::EmptyMatrix`] when either dimension is zero and
/// with [`SolveError::NegativeCost`] when any entry is negative.
pub fn solve<T, R, C, S>(costs: &Matrix<T, R, C, S>) -> Result<Solution<T>, SolveError>
where
    T: RealField + Copy,
    R: Dim,
    C: Dim,
    S: RawStorage<T, R, C>,
{
    validate(costs)?;

    let (rows, cols) = costs.shape();
    let target = rows.min(cols);
    debug!("solving {rows}x{cols} assignment, {target} pairs expected");

    let mut ctx = Context::new(DMatrix::from_fn(rows, cols, |r, c| costs[(r, c)]));
    ctx.reduce();
    ctx.star_initial_zeros();
    ctx.cover_starred_columns();

    while ctx.covered_columns() < target {
        let (row, col) = loop {
            match ctx.find_path_root() {
                Scan::Root(row, col) => break (row, col),
                Scan::Exhausted => ctx.adjust(),
            }
        };
        ctx.augment(row, col);
    }

    // read the final stars back against the caller's matrix, not the
    // reduced working copy
    let assignment: Vec<Option<usize>> = (0..rows).map(|r| ctx.star_in_row(r)).collect();
    let total_cost = assignment
        .iter()
        .enumerate()
        .filter_map(|(row, col)| col.map(|col| costs[(row, col)]))
        .fold(T::zero(), |acc, cost| acc + cost);

    Ok(Solution {
        assignment,
        total_cost,
    })
}

fn validate<T, R, C, S>(costs: &Matrix<T, R, C, S>) -> Result<(), SolveError>
where
    T: RealField + Copy,
    R: Dim,
    C: Dim,
    S: RawStorage<T, R, C>,
{
    let (rows, cols) = costs.shape();
    if rows == 0 || cols == 0 {
        return Err(SolveError::EmptyMatrix { rows, cols });
    }

    for row in 0..rows {
        for col in 0..cols {
            if costs[(row, col)] < T::zero() {
                return Err(SolveError::NegativeCost { row, col });
            }
        }
    }

    Ok(())
}

/// Outcome of one scan over the uncovered cells of the working matrix.
enum Scan {
    /// An uncovered zero in a star-free row: the root of an augmenting path.
    Root(usize, usize),
    /// No uncovered zero anywhere; the working matrix needs adjusting.
    Exhausted,
}

/// Per-call working state: the reduced distance copy, star/prime marks and
/// the row/column covers, with each solver phase as a method.
struct Context<T> {
    dist: DMatrix<T>,
    star: DMatrix<bool>,
    prime: DMatrix<bool>,
    row_cover: Vec<bool>,
    col_cover: Vec<bool>,
    tol: T,
}

impl<T: RealField + Copy> Context<T> {
    fn new(dist: DMatrix<T>) -> Self {
        let (rows, cols) = dist.shape();
        Context {
            star: DMatrix::from_element(rows, cols, false),
            prime: DMatrix::from_element(rows, cols, false),
            row_cover: vec![false; rows],
            col_cover: vec![false; cols],
            tol: nalgebra::convert(f64::EPSILON),
            dist,
        }
    }

    /// Reduced values within the tolerance count as zeros.
    fn is_zero_at(&self, row: usize, col: usize) -> bool {
        self.dist[(row, col)] < self.tol
    }

    fn star_in_row(&self, row: usize) -> Option<usize> {
        (0..self.dist.ncols()).find(|&col| self.star[(row, col)])
    }

    fn star_in_column(&self, col: usize) -> Option<usize> {
        (0..self.dist.nrows()).find(|&row| self.star[(row, col)])
    }

    fn prime_in_row(&self, row: usize) -> Option<usize> {
        (0..self.dist.ncols()).find(|&col| self.prime[(row, col)])
    }

    /// Subtract each row's minimum from the row, then each column's minimum
    /// from the column, seeding a zero in every row.
    fn reduce(&mut self) {
        let (rows, cols) = self.dist.shape();

        for row in 0..rows {
            let mut min = self.dist[(row, 0)];
            for col in 1..cols {
                if self.dist[(row, col)] < min {
                    min = self.dist[(row, col)];
                }
            }
            self.dist.row_mut(row).add_scalar_mut(-min);
        }

        for col in 0..cols {
            let mut min = self.dist[(0, col)];
            for row in 1..rows {
                if self.dist[(row, col)] < min {
                    min = self.dist[(row, col)];
                }
            }
            self.dist.column_mut(col).add_scalar_mut(-min);
        }
    }

    /// Greedy first pass: star the first zero of each row that still has a
    /// free column. All starred cells are true zeros, so the pass never adds
    /// cost, only matching size.
    fn star_initial_zeros(&mut self) {
        let (rows, cols) = self.dist.shape();
        for row in 0..rows {
            for col in 0..cols {
                if !self.col_cover[col] && self.is_zero_at(row, col) {
                    self.star[(row, col)] = true;
                    self.row_cover[row] = true;
                    self.col_cover[col] = true;
                    break;
                }
            }
        }

        // the covers were scratch space for the pass; coverage is re-derived
        // from the stars before the main loop
        self.row_cover.fill(false);
        self.col_cover.fill(false);
    }

    fn cover_starred_columns(&mut self) {
        self.col_cover.fill(false);
        for col in 0..self.dist.ncols() {
            if self.star_in_column(col).is_some() {
                self.col_cover[col] = true;
            }
        }
    }

    fn covered_columns(&self) -> usize {
        self.col_cover.iter().filter(|&&covered| covered).count()
    }

    /// Scan the uncovered cells in row-major order for a zero. A zero in a
    /// star-free row is returned as the augmenting-path root; otherwise the
    /// zero's row is covered, the column of its starred zero uncovered, and
    /// the scan restarts from the top.
    fn find_path_root(&mut self) -> Scan {
        let (rows, cols) = self.dist.shape();
        'scan: loop {
            for row in 0..rows {
                if self.row_cover[row] {
                    continue;
                }
                for col in 0..cols {
                    if self.col_cover[col] || !self.is_zero_at(row, col) {
                        continue;
                    }
                    self.prime[(row, col)] = true;
                    match self.star_in_row(row) {
                        None => return Scan::Root(row, col),
                        Some(starred) => {
                            self.row_cover[row] = true;
                            self.col_cover[starred] = false;
                            continue 'scan;
                        }
                    }
                }
            }
            return Scan::Exhausted;
        }
    }

    /// No uncovered zero remains: add the minimum uncovered value to every
    /// covered row and subtract it from every uncovered column. Existing
    /// stars keep their zeros and at least one new uncovered zero appears.
    fn adjust(&mut self) {
        let (rows, cols) = self.dist.shape();

        let mut min: Option<T> = None;
        for row in 0..rows {
            if self.row_cover[row] {
                continue;
            }
            for col in 0..cols {
                if self.col_cover[col] {
                    continue;
                }
                let value = self.dist[(row, col)];
                if min.map_or(true, |min| value < min) {
                    min = Some(value);
                }
            }
        }
        let h = min.expect("an incomplete matching leaves uncovered cells");
        trace!("no uncovered zero, shifting working matrix by {h:?}");

        for row in 0..rows {
            if self.row_cover[row] {
                self.dist.row_mut(row).add_scalar_mut(h);
            }
        }
        for col in 0..cols {
            if !self.col_cover[col] {
                self.dist.column_mut(col).add_scalar_mut(-h);
            }
        }
    }

    /// Walk the alternating chain from the path root (primed zero, starred
    /// zero in its column, primed zero in that star's row, ...) and flip
    /// stars off and primes on along it, growing the matching by one.
    fn augment(&mut self, root_row: usize, root_col: usize) {
        let mut path = vec![(root_row, root_col)];
        let mut col = root_col;
        while let Some(star_row) = self.star_in_column(col) {
            path.push((star_row, col));
            let primed = self
                .prime_in_row(star_row)
                .expect("every covered row on the path holds a primed zero");
            path.push((star_row, primed));
            col = primed;
        }
        trace!("augmenting from ({root_row}, {root_col}), path covers {} cells", path.len());

        for &(row, col) in &path {
            if self.star[(row, col)] {
                self.star[(row, col)] = false;
            } else if self.prime[(row, col)] {
                self.star[(row, col)] = true;
            }
        }

        self.prime.fill(false);
        self.row_cover.fill(false);
        self.col_cover.fill(false);
        self.cover_starred_columns();
    }
}
