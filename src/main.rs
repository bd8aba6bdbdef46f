//! IVDAR Sheet API server binary.

use clap::Parser;
use ivdar_sheet_api::api::{run_api_server, ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "ivdar-server")]
#[command(version)]
#[command(about = "Read-only JSON API over the published IVDAR allocation spreadsheet")]
#[command(long_about = r#"
IVDAR Sheet API

Serves the published allocation spreadsheet as JSON for the chart
front-end:
  GET  /        - capability message
  GET  /data    - raw row dump of Sheet1 (debugging)
  GET  /assets  - parsed asset records + metadata block

Every request re-fetches the sheet; responses carry an advisory
Cache-Control header for the browser side.

Example usage:
  ivdar-server                          # listen on 127.0.0.1:8000
  ivdar-server --host 0.0.0.0 --port 9000
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "IVDAR_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "IVDAR_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
    };

    run_api_server(config).await
}
