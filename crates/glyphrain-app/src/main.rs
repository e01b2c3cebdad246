use anyhow::Result;

use glyphrain_engine::device::GpuInit;
use glyphrain_engine::logging::{LoggingConfig, init_logging};
use glyphrain_engine::window::{Runtime, RuntimeConfig};

use winit::dpi::LogicalSize;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "glyphrain".to_string(),
        initial_size: LogicalSize::new(1280.0, 720.0),
    };

    log::info!("starting {} v{}", config.title, env!("CARGO_PKG_VERSION"));
    Runtime::run(config, GpuInit::default())
}
