use log::error;
use vitae::cli::{site_app, site_args};
use vitae::site::render_site;

fn main() {
    let matches = site_app().get_matches();
    vitae::init_logging();

    let args = site_args(&matches);
    if let Err(e) = render_site(&args.template, &args.data, &args.output) {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}
