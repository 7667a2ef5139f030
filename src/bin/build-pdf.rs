use log::error;
use vitae::cli::pdf_app;
use vitae::config::PdfSettings;
use vitae::pdf::build_pdf;

fn main() {
    pdf_app().get_matches();
    vitae::init_logging();

    match build_pdf(&PdfSettings::default()) {
        Ok(path) => println!("Generated PDF: {}", path.display()),
        Err(e) => {
            error!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}
