//! leap_bridge: command-line entry point.

use std::io::Write;

use leap_bridge::bridge::run;
use leap_bridge::config::{usage, BridgeConfig, ConfigError};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(buf, "[{}] {} - {}", record.level(), record.target(), record.args())
        })
        .init();

    let cfg = match BridgeConfig::from_args(std::env::args().skip(1)) {
        Ok(cfg) => cfg,
        Err(ConfigError::Help) => {
            println!("{}", usage());
            return;
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", usage());
            std::process::exit(2);
        }
    };

    #[cfg(feature = "leap")]
    log::info!("leap_bridge starting (LeapMotion hardware build)");
    #[cfg(not(feature = "leap"))]
    log::info!("leap_bridge starting (simulation build; use --features leap for hardware)");
    log::info!("Press Ctrl-C to quit");

    if let Err(e) = run(cfg) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
