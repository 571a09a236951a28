//! REAPER extension serving reapy programs to distant clients.
//!
//! Settings are read from the `reapy/config` ExtState (JSON), then
//! overridden by `REAPY_*` environment variables.
use log::info;
use rea_rs_low::PluginContext;
use rea_rs_macros::reaper_extension_plugin;
use reapy::{config::Config, extension::Extension, server::Dispatcher};
use std::error::Error;

#[reaper_extension_plugin]
fn plugin_main(context: PluginContext) -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let extension = Extension::init_global(context)?;
    let config = load_config(extension)?;
    let dispatcher = Dispatcher::spawn(&config.server)?;
    extension.register_timer(Box::new(dispatcher));
    info!("reapy server started on {}", config.server.url());
    Ok(())
}

fn load_config(extension: &Extension) -> anyhow::Result<Config> {
    let stored = Config::load_or_init_in_host(extension.host())?;
    Ok(stored.with_env()?)
}
