use std::process::ExitCode;

use anyhow::Result;
use winit::dpi::LogicalSize;

use fuchsia_engine::device::{GpuInit, RenderingMode};
use fuchsia_engine::logging::{init_logging, LoggingConfig};
use fuchsia_engine::window::{Runtime, RuntimeConfig};

mod app;
mod controls;

use app::TriangleApp;

/// Used when `RUST_LOG` is unset. wgpu is chatty at info.
const DEFAULT_LOG_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

fn main() -> ExitCode {
    // Nothing may touch winit or wgpu before logging is up.
    init_logging(LoggingConfig {
        default_filter: DEFAULT_LOG_FILTER.to_string(),
        ..Default::default()
    });

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("fuchsia terminated: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = RuntimeConfig {
        title: "Fuchsia".to_string(),
        initial_size: LogicalSize::new(800.0, 450.0),
    };

    let gpu_init = GpuInit {
        rendering_mode: RenderingMode::platform_default(),
        ..Default::default()
    };

    log::info!("starting with rendering mode {:?}", gpu_init.rendering_mode);
    Runtime::run(config, gpu_init, TriangleApp::new())
}
