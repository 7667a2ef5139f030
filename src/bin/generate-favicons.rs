use log::error;
use vitae::cli::{favicon_options, favicons_app};
use vitae::favicon::generate;

fn main() {
    let matches = favicons_app().get_matches();
    vitae::init_logging();

    if let Err(e) = generate(&favicon_options(&matches)) {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}
