//! Stream position snapshots through a lossy, jittery, reordering link.

use clap::{value_parser, Arg, ArgMatches, Command};
use prometheus_client::{encoding::text::encode, registry::Registry};
use snapshot::{Config, Driver};
use std::process::exit;
use tracing::{debug, error, info, Level};

/// Returns the version of the crate.
fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

fn main() {
    // Parse arguments
    let matches = Command::new("snapnet-snapshot")
        .about("stream position snapshots through an impaired link")
        .version(crate_version())
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(String))
                .help("Path to a YAML configuration file"),
        )
        .arg(float("latency", "Fixed one-way delay in seconds"))
        .arg(float("jitter", "Maximum random delay added to latency, in seconds [0, 1]"))
        .arg(float("loss", "Probability a snapshot is dropped [0, 1]"))
        .arg(float("scramble", "Probability a snapshot is delivered out of order [0, 1]"))
        .arg(float("send-interval", "Seconds between snapshots"))
        .arg(float("frame", "Seconds between frames"))
        .arg(float("duration", "Seconds of simulated time to send snapshots for"))
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("Seed for the link's random number generator"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .num_args(0)
                .help("Log every delivery"),
        )
        .get_matches();

    // Create logger
    let level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    // Load config
    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(err) => {
            error!(?err, "invalid configuration");
            exit(1);
        }
    };
    info!(
        latency = config.impairment.latency,
        jitter = config.impairment.jitter,
        loss = config.impairment.loss,
        scramble = config.impairment.scramble,
        send_interval = config.send_interval,
        duration = config.duration,
        seed = config.seed,
        "loaded config"
    );

    // Run
    let driver = match Driver::new(config) {
        Ok(driver) => driver,
        Err(err) => {
            error!(?err, "invalid configuration");
            exit(1);
        }
    };
    let mut registry = Registry::default();
    driver.register(&mut registry);
    let summary = driver.run();

    // Report
    let mut metrics = String::new();
    match encode(&mut metrics, &registry) {
        Ok(()) => debug!(%metrics, "link metrics"),
        Err(err) => error!(?err, "failed to encode metrics"),
    }
    info!(
        produced = summary.produced,
        received = summary.received,
        lost = summary.lost,
        out_of_order = summary.out_of_order,
        "finished"
    );
    println!("{summary}");
}

/// Optional floating point argument.
fn float(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_parser(value_parser!(f64))
        .help(help)
}

/// Read the config file (if any) and apply overrides from the command line.
fn load_config(matches: &ArgMatches) -> Result<Config, snapshot::Error> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let overrides = [
        ("latency", &mut config.impairment.latency),
        ("jitter", &mut config.impairment.jitter),
        ("loss", &mut config.impairment.loss),
        ("scramble", &mut config.impairment.scramble),
        ("send-interval", &mut config.send_interval),
        ("frame", &mut config.frame),
        ("duration", &mut config.duration),
    ];
    for (name, value) in overrides {
        if let Some(provided) = matches.get_one::<f64>(name) {
            *value = *provided;
        }
    }
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config.seed = *seed;
    }

    config.validate()?;
    Ok(config)
}
