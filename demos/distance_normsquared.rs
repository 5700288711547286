use kernelkit::drivers::distance_normsquared::{parameter_list, run, TITLE};
use kernelkit::toy::ToyData;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let data = ToyData::generate(17);
    println!("{}", TITLE);

    let params = &parameter_list(&data)[0];
    let (distance, dm_train, dm_test) = run(params)?;

    println!("Train distances ({} x {}):", dm_train.nrows(), dm_train.ncols());
    println!("{:.4}", dm_train);
    println!("Test distances ({} x {}):", dm_test.nrows(), dm_test.ncols());
    println!("{:.4}", dm_test);
    println!("  sqrt disabled: {}", distance.disable_sqrt());

    Ok(())
}
