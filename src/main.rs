mod app_handlers;
mod app_settings;
mod asset_binding;
mod cli;
mod error;
mod io;
mod logger;
mod preview;

use std::process::ExitCode;

use clap::Parser;

use app_settings::AppSettings;
use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let app_settings = AppSettings::load(cli.config.as_deref());
    // guard 释放时才会把文件日志刷到磁盘
    let _log_guard = logger::init_global_logger(&app_settings.log_settings, cli.verbose);

    tracing::info!("应用程序已启动。");

    match app_handlers::run(cli, &app_settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
