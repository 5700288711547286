use kernelkit::drivers::kernel_linear::{parameter_list, run, TITLE};
use kernelkit::toy::ToyData;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let data = ToyData::generate(17);
    println!("{}", TITLE);

    let params = &parameter_list(&data)[0];
    let (km_train, km_test, kernel) = run(params)?;
    println!("Scale {}:", params.scale);
    println!("  normalizer: {:?}", kernel.normalizer());
    println!("  train kernel diagonal: {:.4}", km_train.diag());
    println!("  test kernel shape: {:?}", km_test.shape());

    Ok(())
}
