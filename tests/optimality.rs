use itertools::Itertools;
use munkres::{solve, vector_pairs};
use nalgebra::DMatrix;

/// Exhaustive minimum over every feasible matching of `min(m, n)` pairs.
fn brute_force_cost(costs: &DMatrix<f64>) -> f64 {
    let (rows, cols) = costs.shape();
    let pairs = rows.min(cols);
    if rows <= cols {
        (0..cols)
            .permutations(pairs)
            .map(|chosen| {
                chosen
                    .iter()
                    .enumerate()
                    .map(|(row, &col)| costs[(row, col)])
                    .sum::<f64>()
            })
            .fold(f64::INFINITY, f64::min)
    } else {
        (0..rows)
            .permutations(pairs)
            .map(|chosen| {
                chosen
                    .iter()
                    .enumerate()
                    .map(|(col, &row)| costs[(row, col)])
                    .sum::<f64>()
            })
            .fold(f64::INFINITY, f64::min)
    }
}

fn assert_optimal(costs: &DMatrix<f64>) {
    let solution = solve(costs).unwrap();
    let expected = brute_force_cost(costs);
    assert!(
        (solution.total_cost() - expected).abs() < 1e-9,
        "{}x{} matrix: solver found {}, exhaustive search found {expected}",
        costs.nrows(),
        costs.ncols(),
        solution.total_cost()
    );
}

#[test]
fn optimal_on_square_fixtures() {
    let fixtures = [
        DMatrix::from_row_slice(3, 3, &[9., 2., 7., 6., 4., 3., 5., 8., 1.]),
        DMatrix::from_row_slice(
            4,
            4,
            &[
                15., 6., 12., 8., 10., 16., 8., 12., 30., 25., 11., 9., 13., 7., 20., 17.,
            ],
        ),
        // step structure that forces several augmentation rounds
        DMatrix::from_row_slice(
            4,
            4,
            &[7., 3., 6., 9., 9., 7., 3., 6., 6., 9., 7., 3., 3., 6., 9., 7.],
        ),
        // repeated rows, many tied optima
        DMatrix::from_row_slice(
            4,
            4,
            &[5., 1., 9., 3., 5., 1., 9., 3., 2., 7., 1., 8., 6., 4., 2., 1.],
        ),
        // repeated columns
        DMatrix::from_row_slice(
            4,
            4,
            &[4., 4., 1., 9., 3., 3., 2., 8., 7., 7., 9., 1., 6., 6., 3., 5.],
        ),
        // rank-1 outer product
        DMatrix::from_fn(4, 4, |r, c| ((r + 1) * (c + 1) * 10) as f64),
    ];

    for costs in &fixtures {
        assert_optimal(costs);
    }
}

#[test]
fn optimal_on_rectangular_fixtures() {
    let fixtures = [
        DMatrix::from_row_slice(3, 5, &[9., 2., 7., 3., 4., 6., 4., 3., 7., 5., 5., 8., 1., 6., 3.]),
        DMatrix::from_row_slice(
            6,
            3,
            &[
                4., 1., 3., 2., 0., 5., 3., 2., 2., 9., 1., 7., 6., 3., 5., 3., 4., 2.,
            ],
        ),
        DMatrix::from_row_slice(2, 5, &[8., 0., 3., 1., 9., 2., 7., 7., 0., 4.]),
        DMatrix::from_row_slice(5, 2, &[8., 2., 0., 7., 3., 7., 1., 0., 9., 4.]),
        DMatrix::from_row_slice(1, 4, &[4., 2., 9., 1.]),
        DMatrix::from_row_slice(4, 1, &[4., 2., 9., 1.]),
    ];

    for costs in &fixtures {
        assert_optimal(costs);
    }
}

#[test]
fn optimal_on_random_matrices() {
    for rows in 1..=4 {
        for cols in 1..=4 {
            for _ in 0..8 {
                assert_optimal(&DMatrix::<f64>::new_random(rows, cols));
            }
        }
    }
}

#[test]
fn assignments_are_feasible_across_shapes() {
    for rows in 1..=5 {
        for cols in 1..=5 {
            let costs = DMatrix::<f64>::new_random(rows, cols);
            let solution = solve(&costs).unwrap();
            let pairs = rows.min(cols);

            assert_eq!(solution.assignment().len(), rows);
            assert!(solution.total_cost() >= 0.);

            let assigned: Vec<(usize, usize)> = solution.assigned().collect();
            assert_eq!(assigned.len(), pairs);
            assert!(assigned.iter().all(|&(_, col)| col < cols));
            let distinct: std::collections::BTreeSet<usize> =
                assigned.iter().map(|&(_, col)| col).collect();
            assert_eq!(distinct.len(), pairs);

            assert_eq!(solution.pairs(), vector_pairs(solution.assignment()));
        }
    }
}
