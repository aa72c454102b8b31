use anyhow::Context;
use fortune_wheel::config;
use fortune_wheel::gui::app::AppModel;
use fortune_wheel::sys::runtime;
use fortune_wheel::wheel::WheelController;
use relm4::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    if let Ok(path) = config::get_config_path()
        && !path.exists()
    {
        match config::write_default_config() {
            Ok(path) => log::info!("Wrote default config to {}", path.display()),
            Err(e) => log::warn!("Could not write default config: {}", e),
        }
    }

    let config = config::load_or_default();
    let wheel = WheelController::new(&config).context("Invalid wheel configuration")?;

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx).context("Failed to start background services")?;

    let app = RelmApp::new("org.fortune.wheel");

    app.run::<AppModel>((wheel, config, rx));
    Ok(())
}
