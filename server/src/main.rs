mod employees;
mod http;

use std::{net::IpAddr, sync::Arc};

use anyhow::Result;
use clap::Parser;
use platform_obs::{ObsConfig, init_tracing};
use products_hr::EmployeeStore;

use crate::http::{AppState, ServeConfig};

#[derive(Parser, Debug)]
#[command(
    name = "employee-server",
    version,
    about = "In-memory employee records over HTTP"
)]
struct Cli {
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

impl From<Cli> for ServeConfig {
    fn from(value: Cli) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    let state = AppState::new(Arc::new(EmployeeStore::new()));
    http::serve(cli.into(), state).await
}
