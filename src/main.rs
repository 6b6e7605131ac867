use std::path::PathBuf;
use std::process::ExitCode;

use glowfield::{snapshot, window, FieldConfig, HostError};
use tracing::*;

const USAGE: &str = "\
usage: glowfield [CONFIG.json]
       glowfield --snapshot OUT.png [--frames N] [--size WxH] [CONFIG.json]";

enum Mode {
    Window,
    Snapshot {
        out: PathBuf,
        frames: u32,
        width: u32,
        height: u32,
    },
}

struct Args {
    mode: Mode,
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_logging();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("glowfield: {message}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), HostError> {
    let config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            FieldConfig::load(path)?
        }
        None => FieldConfig::default(),
    };

    match args.mode {
        Mode::Window => window::run(config),
        Mode::Snapshot {
            out,
            frames,
            width,
            height,
        } => snapshot::write(&config, width, height, frames, out),
    }
}

/// Parse the command line. `Ok(None)` means help was asked for.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Args>, String> {
    let mut snapshot_out = None;
    let mut frames = 120;
    let mut size = (1280, 720);
    let mut config = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--snapshot" => {
                let out = args.next().ok_or("--snapshot needs an output path")?;
                snapshot_out = Some(PathBuf::from(out));
            }
            "--frames" => {
                let n = args.next().ok_or("--frames needs a count")?;
                frames = n.parse().map_err(|_| format!("invalid frame count: {n}"))?;
            }
            "--size" => {
                let s = args.next().ok_or("--size needs WIDTHxHEIGHT")?;
                size = parse_size(&s).ok_or_else(|| format!("invalid size: {s}"))?;
            }
            other if other.starts_with('-') => return Err(format!("unknown option: {other}")),
            path => {
                if config.replace(PathBuf::from(path)).is_some() {
                    return Err("only one config file may be given".into());
                }
            }
        }
    }

    let mode = match snapshot_out {
        Some(out) => Mode::Snapshot {
            out,
            frames,
            width: size.0,
            height: size.1,
        },
        None => Mode::Window,
    };
    Ok(Some(Args { mode, config }))
}

fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once(['x', 'X'])?;
    let (w, h): (u32, u32) = (w.parse().ok()?, h.parse().ok()?);
    (w > 0 && h > 0).then_some((w, h))
}

fn init_logging() {
    use tracing_subscriber::{
        filter::{LevelFilter, Targets},
        fmt::Layer,
        prelude::*,
    };

    tracing_subscriber::registry()
        .with(
            Layer::new()
                .with_writer(std::io::stderr)
                .with_filter(
                    Targets::new()
                        .with_default(LevelFilter::INFO)
                        .with_target("glowfield", LevelFilter::DEBUG),
                ),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<Args>, String> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_no_args_opens_window() {
        let args = parse(&[]).unwrap().unwrap();
        assert!(matches!(args.mode, Mode::Window));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_snapshot_args() {
        let args = parse(&["--snapshot", "out.png", "--frames", "30", "--size", "640x480", "field.json"])
            .unwrap()
            .unwrap();
        match args.mode {
            Mode::Snapshot { out, frames, width, height } => {
                assert_eq!(out, PathBuf::from("out.png"));
                assert_eq!((frames, width, height), (30, 640, 480));
            }
            Mode::Window => panic!("expected snapshot mode"),
        }
        assert_eq!(args.config, Some(PathBuf::from("field.json")));
    }

    #[test]
    fn test_bad_args() {
        assert!(parse(&["--size", "0x10", "--snapshot", "a.png"]).is_err());
        assert!(parse(&["--frames", "many"]).is_err());
        assert!(parse(&["--snapshot"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
        assert!(parse(&["--help"]).unwrap().is_none());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1920x1080"), Some((1920, 1080)));
        assert_eq!(parse_size("8X6"), Some((8, 6)));
        assert_eq!(parse_size("1920"), None);
    }
}
