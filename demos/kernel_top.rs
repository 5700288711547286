use kernelkit::drivers::kernel_top::{parameter_list, run, TITLE};
use kernelkit::toy::ToyData;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let data = ToyData::generate(17);
    println!("{}", TITLE);

    let params = &parameter_list(&data)[0];
    let (km_train, km_test, kernel) = run(params)?;

    if let Some(lhs) = kernel.lhs() {
        println!("TOP features: {} dimensions", lhs.num_features());
    }
    println!("Train kernel ({} x {}):", km_train.nrows(), km_train.ncols());
    println!("{:.3}", km_train);
    println!("Test kernel ({} x {}):", km_test.nrows(), km_test.ncols());
    println!("{:.3}", km_test);

    Ok(())
}
