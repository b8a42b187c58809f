use koshi_diffeq::{OdeSolver, SolveDriver, SolverMethods};

// y' = y, y(0) = 1 has y(1) = e
fn growth(_x: f64, y: f64) -> f64 {
    y
}

fn main() {
    let driver = SolveDriver::new(1.0).with_step_counts(vec![10, 20, 40, 80, 160]);

    println!("{:>18} {:>6} {:>14} {:>14}", "method", "steps", "y(1)", "error");
    for method in SolverMethods::ALL {
        let results = match driver.run(&method, &growth) {
            Ok(results) => results,
            Err(e) => {
                eprintln!("{}: {e}", method);
                continue;
            }
        };
        for tagged in results {
            let y1 = tagged.sequence.last().y;
            println!(
                "{:>18} {:>6} {:>14.10} {:>14.6e}",
                method.to_string(),
                tagged.steps,
                y1,
                (y1 - std::f64::consts::E).abs()
            );
        }
    }

    // the solvers can also be used on their own
    let sequence = SolverMethods::AdamsBashforth3
        .solve(&|x: f64, y: f64| y * y + x, -2.0, 10)
        .unwrap();
    let (x, y) = sequence.split();
    for (x, y) in x.iter().zip(&y) {
        println!("{:10.6}     {:10.6}", x, y);
    }
}
