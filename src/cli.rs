use anyhow::{Context, Result, anyhow};
use log::info;
use pico_args::Arguments;
use std::{env, fs::File, io::BufReader, path::PathBuf};

use touchhelper::config::Settings;
use touchhelper::geometry::legal_delta;
use touchhelper::replay::replay;
use touchhelper::tracker::PointerTracker;

pub fn run() -> Result<()> {
    let mut pargs = Arguments::from_env();

    // No args -> general help
    if env::args().len() == 1 {
        print_help();
        return Ok(());
    }

    if pargs.contains("-h") || pargs.contains("--help") {
        print_help();
        return Ok(());
    }

    let config_path: Option<PathBuf> = pargs.opt_value_from_str("--config")?;
    let debug = pargs.contains("--debug");

    let subcmd: Option<String> = pargs.free_from_str().ok();

    match subcmd.as_deref() {
        Some("help") => {
            let topic: Option<String> = pargs.free_from_str().ok();
            if let Some(t) = topic {
                print_subcmd_help(&t);
            } else {
                print_help();
            }
            Ok(())
        }

        Some("replay") => {
            let path: PathBuf = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: touchhelper replay <file> [--config <path>] [--debug]"))?;
            let settings = Settings::resolve(config_path.as_deref())?;

            let mut tracker = PointerTracker::new();
            tracker.set_debug(debug || settings.debug.enabled);

            let file = File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
            let rows = replay(BufReader::new(file), &mut tracker, &settings.click)?;
            for row in &rows {
                println!("{}", serde_json::to_string(row)?);
            }
            info!("replayed {} samples from {}", rows.len(), path.display());
            Ok(())
        }

        Some("legal-delta") => {
            let usage = || anyhow!("usage: touchhelper legal-delta <current> <min> <max> <delta>");
            let current: i32 = pargs.free_from_str().map_err(|_| usage())?;
            let min: i32 = pargs.free_from_str().map_err(|_| usage())?;
            let max: i32 = pargs.free_from_str().map_err(|_| usage())?;
            let delta: i32 = pargs.free_from_str().map_err(|_| usage())?;
            println!("{}", legal_delta(current, min, max, delta));
            Ok(())
        }

        Some("config") => {
            let settings = Settings::resolve(config_path.as_deref())?;
            let report = serde_json::json!({
                "settings": settings,
                "click_timeout_ms": settings.click.click_timeout_ms(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }

        Some(other) => {
            eprintln!("unknown subcommand: {other}\n");
            print_help();
            Ok(())
        }

        None => {
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!(
        r#"touchhelper: single-pointer gesture metrics

USAGE:
  touchhelper help [command]                          Show general or command-specific help
  touchhelper replay <file> [--config <p>] [--debug]  Replay a JSON-lines sample stream
  touchhelper legal-delta <cur> <min> <max> <delta>   Clamp a delta to a range
  touchhelper config [--config <p>]                   Show effective settings

TIPS:
  - Default config: <user config dir>/touchhelper/config.toml
  - Set RUST_LOG=debug for more output
"#
    );
}

fn print_subcmd_help(cmd: &str) {
    match cmd {
        "replay" => println!(
            "usage: touchhelper replay <file> [--config <path>] [--debug]\nFeeds each sample line to a tracker and prints deltas, angles and click verdicts as JSON."
        ),
        "legal-delta" => println!(
            "usage: touchhelper legal-delta <current> <min> <max> <delta>\nPrints the delta adjusted so current+delta stays in [min, max]."
        ),
        "config" => println!(
            "usage: touchhelper config [--config <path>]\nPrints the click timeout, touch slop and debug flag in effect."
        ),
        _ => {
            eprintln!("unknown command: {cmd}\n");
            print_help();
        }
    }
}
