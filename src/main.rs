use anyhow::Context;
use glade::{config::AppConfig, GladeApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    log::info!(
        "starting {} ({}x{})",
        config.window.title,
        config.window.width,
        config.window.height
    );

    GladeApp::new(config)
        .run()
        .context("the scene stopped with an error")
}
