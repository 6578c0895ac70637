const ASSIGNMENT_SIZE: usize = 64;
const N: usize = 100;

fn main() {
    let mut total_cost = 0.;
    for _ in 0..N {
        let costs = nalgebra::DMatrix::<f64>::new_random(ASSIGNMENT_SIZE, ASSIGNMENT_SIZE);
        let solution = munkres::solve(&costs).expect("random costs are nonnegative");
        total_cost += solution.total_cost();
    }

    println!("total: {total_cost}");
}
