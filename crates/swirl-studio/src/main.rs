use anyhow::Result;

use swirl_engine::device::GpuInit;
use swirl_engine::logging::{LoggingConfig, init_logging};
use swirl_engine::window::{Runtime, RuntimeConfig};

mod shaders;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    log::info!("starting swirl viewer");

    let config = RuntimeConfig {
        title: "swirls".to_string(),
        ..Default::default()
    };

    Runtime::run(config, GpuInit::default(), shaders::sources())
}
