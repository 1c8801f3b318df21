use log::{LevelFilter, Log, Metadata, Record};
use pokemon_wave_solver::{run, CliOptions};
use std::env;
use std::path::PathBuf;

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn usage() -> ! {
    eprintln!(
        "Usage: cargo run --release -- --data data.json --wave wave.json [--slack X] \
[--max-variants N] [--output schedules.json] [--verbose]"
    );
    std::process::exit(1);
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut data_path = PathBuf::from("data.json");
    let mut wave_path = PathBuf::from("wave.json");
    let mut slack = None;
    let mut max_variants = None;
    let mut output_path = None;
    let mut verbose = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data" => {
                data_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--data requires a path (e.g. --data data.json)")
                })?;
            }
            "--wave" => {
                wave_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--wave requires a path (e.g. --wave wave.json)")
                })?;
            }
            "--slack" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--slack requires a number"))?;
                slack = Some(val.parse()?);
            }
            "--max-variants" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--max-variants requires a number"))?;
                max_variants = Some(val.parse()?);
            }
            "--output" => {
                output_path = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--output requires a path (e.g. --output schedules.json)")
                })?);
            }
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }

    Ok(CliOptions {
        data_path,
        wave_path,
        slack,
        max_variants,
        output_path,
        verbose,
    })
}

fn main() -> anyhow::Result<()> {
    let opts = parse_args()?;
    log::set_logger(&LOGGER).map_err(|err| anyhow::anyhow!("logger already set: {err}"))?;
    log::set_max_level(if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    run(opts)
}
