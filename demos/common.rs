use std::io;

use letsads::Credentials;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("letsads=debug")),
        )
        .init();
}

pub fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

pub fn credentials() -> Result<Credentials, Box<dyn std::error::Error>> {
    Ok(Credentials::new(
        required_env("LETSADS_LOGIN")?,
        required_env("LETSADS_PASSWORD")?,
    )?)
}
