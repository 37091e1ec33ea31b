//! Rostrum server entry point.
//!
//! Parses the command line, loads configuration, assembles the render
//! pipeline, and outside production wires up hot reload before serving.

use clap::Parser;
use miette::Result;
use rostrum_server::cli::Cli;
use rostrum_server::config::ServerConfig;
use rostrum_server::environment::Mode;
use rostrum_server::http::{self, AppState, EventHub};
use rostrum_server::reload::{CompilerProcess, HotReloadCoordinator, TemplateWatcher};
use rostrum_server::render::{RenderData, RenderDataStore, RendererFactory};
use rostrum_server::{error, logger};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let no_color = args.no_color || !logger::should_use_colors();
    logger::init_logger(args.verbose, args.quiet, no_color);

    run(args).await.map_err(error::to_report)
}

async fn run(args: Cli) -> rostrum_server::Result<()> {
    let mode = Mode::detect();
    tracing::debug!("starting in {} mode", mode);

    let config = ServerConfig::load(&args)?;
    config.validate()?;

    let data = RenderData::load(&config).await?;
    let store = Arc::new(RenderDataStore::new(data));
    let factory = RendererFactory::new(Arc::clone(&store));
    let hub = Arc::new(EventHub::new());

    // Hot reload only runs outside production. The watcher and compiler
    // handles must outlive the server loop, so they are bound here.
    let mut compilers = Vec::new();
    let mut _watcher = None;
    if mode.is_production() {
        tracing::debug!("production mode, hot reload disabled");
    } else {
        let (watcher, template_rx) = TemplateWatcher::new(&config.template, config.debounce_ms)?;
        let coordinator = Arc::new(HotReloadCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&hub),
            watcher.path().to_path_buf(),
        ));
        coordinator.spawn_template(template_rx);
        _watcher = Some(watcher);

        if let Some(argv) = &config.server_compiler {
            let (process, rx) = CompilerProcess::spawn("server", argv, &config.artifacts)?;
            coordinator.spawn_server_compiles(rx);
            compilers.push(process);
        }
        if let Some(argv) = &config.client_compiler {
            let (process, rx) = CompilerProcess::spawn("client", argv, &config.artifacts)?;
            coordinator.spawn_client_compiles(rx);
            compilers.push(process);
        }
    }

    let state = AppState {
        factory,
        hub,
        mode,
        title: config.title.clone(),
    };
    let result = http::serve(&config, state).await;

    for process in compilers {
        process.shutdown().await;
    }
    result
}
