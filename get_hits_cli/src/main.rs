//! # get_hits_cli
//!
//! Part of the get_hits crate family.
//!
//! This is the command line application which extracts hits from GET .graw data.
//!
//! ## Use
//!
//! Make a template configuration, edit it, then run it:
//!
//! ```bash
//! get_hits_cli -p config.yml new
//! get_hits_cli -p config.yml
//! ```
//!
//! The hits of a finished run can be printed with
//!
//! ```bash
//! get_hits_cli dump /path/to/hits/run_0001.hits
//! ```
//!
//! Detailed progress of the workers is written to `get_hits.log` in the working directory.
use clap::{Arg, Command};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};

use libget_hits::config::Config;
use libget_hits::hit_file::HitReader;
use libget_hits::process::{create_subsets, process_subset};
use libget_hits::worker_status::WorkerStatus;

const LOG_FILE: &str = "./get_hits.log";

fn make_template_config(path: &Path) {
    let config = Config::default();
    let yaml_str = match config.to_yaml() {
        Ok(s) => s,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    let mut file = File::create(path).expect("Could create template config file!");
    file.write_all(yaml_str.as_bytes())
        .expect("Failed to write yaml data to file!");
}

/// Print every hit in a hit file
fn dump_hits(path: &Path) {
    let reader = match HitReader::open(path) {
        Ok(r) => r,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    for record in reader {
        let frame = match record {
            Ok(f) => f,
            Err(e) => {
                log::error!("Failed to read hit file: {e}");
                return;
            }
        };
        log::info!(
            "Event {} Time {} -- {} hits",
            frame.event_id,
            frame.event_time,
            frame.hits.len()
        );
        for hit in frame.hits {
            log::info!(
                "CoBo: {} AsAd: {} AGET: {} Channel: {} -- time: {} peak: {} integral: {}",
                hit.cobo,
                hit.asad,
                hit.aget,
                hit.channel,
                hit.time,
                hit.peak,
                hit.integral
            );
        }
    }
}

/// The library logs through spdlog; send it to a file so it stays out of the progress bars
fn init_library_log() -> Result<(), spdlog::Error> {
    let file_sink = Arc::new(
        spdlog::sink::FileSink::builder()
            .path(PathBuf::from(LOG_FILE))
            .formatter(Box::new(spdlog::formatter::PatternFormatter::new(
                spdlog::formatter::pattern!(
                    "[{date_short} {time_short}] - [thread: {tid}] - [{^{level}}] - {payload}{eol}"
                ),
            )))
            .truncate(true)
            .build()?,
    );
    let logger = Arc::new(
        spdlog::Logger::builder()
            .flush_level_filter(spdlog::LevelFilter::All)
            .sink(file_sink)
            .build()?,
    );
    spdlog::set_default_logger(logger);
    Ok(())
}

fn main() {
    // Create a cli
    let matches = Command::new("get_hits_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .subcommand(
            Command::new("dump")
                .about("Print the hits stored in a hit file")
                .arg(Arg::new("hit_file").required(true).help("Path to the hit file")),
        )
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .help("Path to the configuration file"),
        )
        .get_matches();

    // Initialize feedback
    let logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    let pb_manager = MultiProgress::new();

    LogWrapper::new(pb_manager.clone(), logger)
        .try_init()
        .expect("Could not create logging/progress!");

    if let Some(("dump", sub_matches)) = matches.subcommand() {
        if let Some(hit_file) = sub_matches.get_one::<String>("hit_file") {
            dump_hits(Path::new(hit_file));
        }
        return;
    }

    // Parse the cli
    let config_path = match matches.get_one::<String>("path") {
        Some(p) => PathBuf::from(p),
        None => {
            log::error!("A configuration file path is required (-p/--path)");
            return;
        }
    };

    if let Some(("new", _)) = matches.subcommand() {
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );
        make_template_config(&config_path);
        log::info!("Done.");
        return;
    }

    if let Err(e) = init_library_log() {
        log::error!("Could not create log file {LOG_FILE}: {e}");
        return;
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");
    log::info!("GRAW Path: {}", config.graw_path.to_string_lossy());
    log::info!("Hit Path: {}", config.hit_path.to_string_lossy());
    log::info!(
        "First Run: {} Last Run: {}",
        config.first_run_number,
        config.last_run_number
    );
    log::info!("Number of workers: {}", config.n_threads);
    log::info!("Skip bad frames: {}", config.skip_bad_frames);

    if !config.is_n_threads_valid() {
        log::error!("Number of workers must be at least 1!");
        return;
    }

    // Spawn the workers, one progress bar each
    let style = ProgressStyle::with_template("{msg:>12} [{bar:40.cyan/blue}] {pos:>3}%")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let (tx, rx) = mpsc::channel::<WorkerStatus>();
    let mut workers = Vec::new();
    let mut bars: Vec<Option<ProgressBar>> = Vec::new();
    for (idx, subset) in create_subsets(&config).into_iter().enumerate() {
        if subset.is_empty() {
            bars.push(None);
            continue;
        }
        let pb = pb_manager.add(ProgressBar::new(100));
        pb.set_style(style.clone());
        pb.set_message(format!("Worker {idx}"));
        bars.push(Some(pb));

        let conf = config.clone();
        let tx = tx.clone();
        workers.push(std::thread::spawn(move || {
            process_subset(conf, tx, idx, subset)
        }));
    }
    // Workers hold the only senders now, so the loop ends when they all finish
    drop(tx);

    while let Ok(status) = rx.recv() {
        if let Some(Some(pb)) = bars.get(status.worker_id) {
            pb.set_message(format!("Run {}", status.run_number));
            pb.set_position((status.progress * 100.0) as u64);
        }
    }

    for pb in bars.iter().flatten() {
        pb.finish();
    }

    for worker in workers {
        match worker.join() {
            Ok(result) => match result {
                Ok(_) => log::info!("Worker successfully extracted hits!"),
                Err(e) => log::error!(
                    "Worker failed with error: {e}. Check {LOG_FILE} for details."
                ),
            },
            Err(_) => log::error!("Failed to join worker!"),
        }
    }

    log::info!("Done.");
}
