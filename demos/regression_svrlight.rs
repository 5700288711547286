use kernelkit::drivers::regression_svrlight::{parameter_list, run, training_fit, TITLE};
use kernelkit::metrics::{mean_squared_error, r2_score};
use kernelkit::toy::ToyData;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let data = ToyData::generate(17);
    println!("{}", TITLE);

    let params = &parameter_list(&data)[0];
    let Some((out, kernel)) = run(params)? else {
        return Ok(());
    };
    println!("width {}, C {}, tube {}:", params.width, params.c, params.tube_epsilon);
    println!("  kernel: {} x {}", kernel.num_lhs(), kernel.num_rhs());
    println!("  test predictions: {:.4}", out.get_labels());

    let train_fit = training_fit(params)?;
    println!(
        "  training MSE: {:.4}, R²: {:.4}",
        mean_squared_error(&params.labels, train_fit.get_labels())?,
        r2_score(&params.labels, train_fit.get_labels())?
    );

    Ok(())
}
