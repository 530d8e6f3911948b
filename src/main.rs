use anyhow::Context;
use log::error;

use skyward::{SkywardApp, ViewerConfig};

fn run() -> anyhow::Result<()> {
    let config = ViewerConfig::from_env();
    let app = SkywardApp::new(config).context("failed to start the viewer")?;
    app.run().context("viewer stopped with an error")
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
