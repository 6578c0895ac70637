use std::time::Instant;

use nalgebra::DMatrix;

fn run(name: &str, costs: &DMatrix<f64>) {
    let started = Instant::now();
    let solution = munkres::solve(costs).expect("demo matrices are valid");
    let elapsed = started.elapsed();

    println!("===== {name} =====");
    println!("cost: {}", solution.total_cost());
    println!("took: {elapsed:?}");
    for (row, col) in solution.pairs() {
        match col {
            Some(col) => println!("row {row} -> column {col}"),
            None => println!("row {row} -> unassigned"),
        }
    }
    println!();
}

fn main() {
    run("2x2 basic", &DMatrix::from_row_slice(2, 2, &[4., 1., 2., 3.]));

    run(
        "3x3 classic",
        &DMatrix::from_row_slice(3, 3, &[9., 2., 7., 6., 4., 3., 5., 8., 1.]),
    );

    #[rustfmt::skip]
    let diagonal = DMatrix::from_row_slice(4, 4,
        &[
              1., 100., 100., 100.,
            100.,   1., 100., 100.,
            100., 100.,   1., 100.,
            100., 100., 100.,   1.,
        ]
    );
    run("4x4 diagonal optimum", &diagonal);

    run("4x4 all-equal", &DMatrix::from_element(4, 4, 5.));

    #[rustfmt::skip]
    let tall = DMatrix::from_row_slice(6, 3,
        &[
            4., 1., 3.,
            2., 0., 5.,
            3., 2., 2.,
            9., 1., 7.,
            6., 3., 5.,
            3., 4., 2.,
        ]
    );
    run("6x3 tall", &tall);

    #[rustfmt::skip]
    let wide = DMatrix::from_row_slice(3, 5,
        &[
            9., 2., 7., 3., 4.,
            6., 4., 3., 7., 5.,
            5., 8., 1., 6., 3.,
        ]
    );
    run("3x5 wide", &wide);

    #[rustfmt::skip]
    let almost_free = DMatrix::from_row_slice(4, 4,
        &[
            0., 0., 0., 0.,
            0., 0., 0., 0.,
            0., 0., 0., 0.,
            0., 0., 0., 1000.,
        ]
    );
    run("4x4 all-zero except one", &almost_free);
}
