use log::{error, info};

use nerdwm::config::{self, ParsedArgs};
use nerdwm::wm::WindowManager;

/// Configure file logging under the XDG cache directory, mirroring how the
/// reference binary set up `fern`/`chrono`/`xdg` together.
fn setup_logger() {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("nerdwm").unwrap();

    let mut log_path = xdg_dirs.get_cache_home();
    log_path.push("logs");

    if !log_path.exists() {
        std::fs::create_dir_all(&log_path).unwrap();
    }

    log_path.push(
        &format!(
            "{}.log",
            chrono::Local::now().format("nerdwm-%Y-%m-%d-%H:%M:%S")
        )[..],
    );

    #[cfg(debug_assertions)]
    let current_log_level = log::LevelFilter::Debug;

    #[cfg(not(debug_assertions))]
    let current_log_level = log::LevelFilter::Info;

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(current_log_level)
        .chain(fern::log_file(log_path).unwrap())
        .apply()
        .unwrap();
}

fn main() {
    let config = match config::parse_args(std::env::args().skip(1)) {
        ParsedArgs::Run(config) => config,
        ParsedArgs::Usage => {
            print!("{}", config::USAGE);
            std::process::exit(0);
        }
    };

    setup_logger();

    let mut wm = match WindowManager::bootstrap(config) {
        Ok(wm) => wm,
        Err(e) => {
            error!("fatal: {}", e);
            eprintln!("nerdwm: {}", e);
            std::process::exit(1);
        }
    };

    info!("entering event loop");
    wm.run();
}
