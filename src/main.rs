use office_datasets::dataloader::info::print_domain_info;
use office_datasets::dataloader::{load_office31_domain, DatasetConfig, DatasetError, Office31Domain};

fn main() -> Result<(), DatasetError> {
    env_logger::init();

    let config = DatasetConfig::default().build()?;
    println!("Office-31 root: {}", config.office31_root.display());

    for domain in Office31Domain::ALL {
        let samples = load_office31_domain(&config, domain)?;
        print_domain_info(domain.as_str(), &samples);
    }

    Ok(())
}
