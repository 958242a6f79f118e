use crate::app::cli::display::print_summary;
use crate::app::cli::Args;
use crate::app::driver::{self, DriverSettings};
use crate::core::error_handling::{exit_code, log_error_with_context};
use crate::core::logging::init_logging;
use crate::core::shutdown::ShutdownCoordinator;
use crate::queue::{MultiQueue, QueueResult};
use clap::Parser;

/// Initialize application startup
pub fn startup() {
    let args = Args::parse();
    let use_color = args.use_color();
    colored::control::set_override(use_color);

    let log_file = args.log_file.as_ref().map(|p| p.to_string_lossy().to_string());
    if let Err(e) = init_logging(
        args.log_level.as_deref(),
        args.log_format.as_deref(),
        log_file.as_deref(),
        use_color,
    ) {
        eprintln!("Error: failed to initialise logging: {}", e);
        std::process::exit(1);
    }

    log::info!("multiqueue {} starting", crate::core::version::long_version());

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("FATAL: could not start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(&args, use_color)) {
        log_error_with_context(&e, "Load run");
        std::process::exit(exit_code(&e));
    }
}

async fn run(args: &Args, use_color: bool) -> QueueResult<()> {
    let config = args.queue_config()?;
    log::debug!("queue configuration: {:?}", config);

    let queue = MultiQueue::shared(config)?;

    let (coordinator, _shutdown_rx) = ShutdownCoordinator::new();
    coordinator.install_signal_handlers();
    let closer = coordinator.close_on_shutdown(queue.clone());

    let report = driver::run(queue, DriverSettings::from(args)).await?;
    closer.abort();

    if let Err(e) = print_summary(&report, args.output, use_color) {
        log::error!("{}", e);
    }
    Ok(())
}
