use favicon_builder::{Error, FaviconGenerator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match FaviconGenerator::default().generate() {
        Ok(path) => println!("Successfully created high-res {}", path.display()),
        // A missing source is reported, not treated as a failed run.
        Err(Error::SourceNotFound(path)) => println!("Error: {} not found", path.display()),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
