use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use super::channel_data::ChannelAccumulator;
use super::classifier::{classify_frame, FrameKind};
use super::config::Config;
use super::error::{GrawFileError, ProcessorError};
use super::frame_processor::process_frame_with;
use super::graw_file::GrawFile;
use super::hit_file::HitWriter;
use super::worker_status::WorkerStatus;

const GRAW_EXTENSION: &str = "graw";
const FLUSH_FRAC: f32 = 0.01;

/// Counters for a processed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub frames_with_hits: u64,
    pub hits: u64,
    pub bad_frames: u64,
    /// Frames of an unrecognized type
    pub skipped_frames: u64,
    pub bytes: u64,
}

/// Sends progress in FLUSH_FRAC steps of the total run size
struct ProgressTracker<'a> {
    tx: &'a Sender<WorkerStatus>,
    run_number: i32,
    worker_id: usize,
    flush_val: u64,
    count: u64,
    progress: f32,
}

impl<'a> ProgressTracker<'a> {
    fn new(tx: &'a Sender<WorkerStatus>, run_number: i32, worker_id: usize, total: u64) -> Self {
        Self {
            tx,
            run_number,
            worker_id,
            flush_val: (total as f64 * FLUSH_FRAC as f64) as u64,
            count: 0,
            progress: 0.0,
        }
    }

    fn send(&self, progress: f32) -> Result<(), ProcessorError> {
        self.tx
            .send(WorkerStatus::new(progress, self.run_number, self.worker_id))?;
        Ok(())
    }

    fn advance(&mut self, bytes: u64) -> Result<(), ProcessorError> {
        self.count += bytes;
        if self.count > self.flush_val {
            self.count = 0;
            self.progress += FLUSH_FRAC;
            self.send(self.progress.min(1.0))?;
        }
        Ok(())
    }
}

/// Collect the .graw files of a run directory, sorted by name, with their total size
fn get_graw_files(run_dir: &Path) -> Result<(Vec<PathBuf>, u64), ProcessorError> {
    let mut file_list: Vec<PathBuf> = Vec::new();
    let mut total_bytes: u64 = 0;
    for item in run_dir.read_dir()? {
        let item = item?;
        let item_path = item.path();
        if item_path.extension().is_some_and(|ext| ext == GRAW_EXTENSION) {
            total_bytes += item.metadata()?.len();
            file_list.push(item_path);
        }
    }

    if file_list.is_empty() {
        return Err(ProcessorError::NoGrawFiles(run_dir.to_path_buf()));
    }
    file_list.sort();
    Ok((file_list, total_bytes))
}

/// Extract the hits of every frame of one .graw file and write them out
fn process_graw_file<W: std::io::Write>(
    graw: &mut GrawFile,
    writer: &mut HitWriter<W>,
    skip_bad_frames: bool,
    tracker: &mut ProgressTracker,
    summary: &mut RunSummary,
) -> Result<(), ProcessorError> {
    let mut channels = ChannelAccumulator::new();
    loop {
        let frame = match graw.get_next_frame() {
            Ok(frame) => frame,
            Err(GrawFileError::EndOfFile) => return Ok(()),
            Err(e) => return Err(ProcessorError::GrawError(e)),
        };
        let frame_bytes = frame.as_bytes().len() as u64;
        summary.frames += 1;
        summary.bytes += frame_bytes;
        tracker.advance(frame_bytes)?;

        if let FrameKind::Unrecognized(frame_type) = classify_frame(&frame).kind {
            summary.skipped_frames += 1;
            spdlog::debug!(
                "Skipping frame of type {frame_type} for event {} in {}",
                frame.header.event_id,
                graw.get_path().to_string_lossy()
            );
            continue;
        }

        match process_frame_with(&frame, &mut channels) {
            Ok(hits) => {
                if writer.write_frame(frame.header.event_id, frame.header.event_time, &hits)? {
                    summary.frames_with_hits += 1;
                    summary.hits += hits.len() as u64;
                }
            }
            Err(e) if skip_bad_frames => {
                summary.bad_frames += 1;
                spdlog::warn!(
                    "Dropping frame for event {} in {}: {e}",
                    frame.header.event_id,
                    graw.get_path().to_string_lossy()
                );
            }
            Err(e) => {
                spdlog::error!(
                    "Bad frame for event {} in {}",
                    frame.header.event_id,
                    graw.get_path().to_string_lossy()
                );
                return Err(ProcessorError::DecodeError(e));
            }
        }
    }
}

/// The main loop of get_hits.
///
/// Reads every frame of every .graw file of a run, extracts the hits and writes them to the
/// run's hit file. Progress is reported through tx.
pub fn process_run(
    config: &Config,
    run_number: i32,
    tx: &Sender<WorkerStatus>,
    worker_id: &usize,
) -> Result<RunSummary, ProcessorError> {
    let run_dir = config.get_run_directory(run_number)?;
    let (graw_files, total_bytes) = get_graw_files(&run_dir)?;
    spdlog::info!(
        "Found {} GRAW files with total size: {}",
        graw_files.len(),
        human_bytes::human_bytes(total_bytes as f64)
    );

    let hit_path = config.get_hit_file_name(run_number)?;
    let mut writer = HitWriter::create(&hit_path)?;
    let mut tracker = ProgressTracker::new(tx, run_number, *worker_id, total_bytes);
    let mut summary = RunSummary::default();

    tracker.send(0.0)?;
    for path in graw_files {
        spdlog::info!("Processing {}...", path.to_string_lossy());
        let mut graw = GrawFile::new(&path)?;
        process_graw_file(
            &mut graw,
            &mut writer,
            config.skip_bad_frames,
            &mut tracker,
            &mut summary,
        )?;
    }
    writer.close()?;
    tracker.send(1.0)?;

    spdlog::info!(
        "Run {run_number}: {} frames ({}), {} frames with hits, {} hits, {} skipped frames, {} bad frames",
        summary.frames,
        human_bytes::human_bytes(summary.bytes as f64),
        summary.frames_with_hits,
        summary.hits,
        summary.skipped_frames,
        summary.bad_frames
    );
    spdlog::info!("Hits written to {}", hit_path.to_string_lossy());
    Ok(summary)
}

/// Process every run in the configured range.
/// Unused by get_hits_cli, which splits the range over workers, but useful for a single thread
pub fn process(
    config: Config,
    tx: Sender<WorkerStatus>,
    worker_id: usize,
) -> Result<(), ProcessorError> {
    let runs: Vec<i32> = (config.first_run_number..(config.last_run_number + 1)).collect();
    process_subset(config, tx, worker_id, runs)
}

/// Process a subset of runs
pub fn process_subset(
    config: Config,
    tx: Sender<WorkerStatus>,
    worker_id: usize,
    subset: Vec<i32>,
) -> Result<(), ProcessorError> {
    for run in subset {
        if config.does_run_exist(run) {
            spdlog::info!("Processing run {}...", run);
            process_run(&config, run, &tx, &worker_id)?;
            spdlog::info!("Finished processing run {}.", run);
        } else {
            spdlog::info!("Run {} does not exist, skipping...", run);
        }
    }
    Ok(())
}

/// Divide a run range in to a set of subranges (per thread/worker)
pub fn create_subsets(config: &Config) -> Vec<Vec<i32>> {
    let mut subsets: Vec<Vec<i32>> = vec![Vec::new(); config.n_threads.max(1) as usize];
    let n_subsets = subsets.len();

    for (idx, run) in (config.first_run_number..(config.last_run_number + 1)).enumerate() {
        subsets[idx % n_subsets].push(run)
    }

    subsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::hit_file::{FrameHits, HitReader};
    use crate::mfm_frame::test_support::*;
    use std::sync::mpsc;

    /// A scratch GRAW/hit directory pair under the system temp dir
    struct Scratch {
        root: PathBuf,
    }

    impl Scratch {
        fn new(name: &str) -> Self {
            let root =
                std::env::temp_dir().join(format!("get_hits_{name}_{}", std::process::id()));
            let _ = std::fs::remove_dir_all(&root);
            std::fs::create_dir_all(root.join("graw").join("run_0001")).unwrap();
            std::fs::create_dir_all(root.join("hits")).unwrap();
            Self { root }
        }

        fn config(&self, skip_bad_frames: bool) -> Config {
            Config {
                graw_path: self.root.join("graw"),
                hit_path: self.root.join("hits"),
                first_run_number: 1,
                last_run_number: 1,
                n_threads: 1,
                skip_bad_frames,
            }
        }

        fn write_graw(&self, name: &str, frames: &[TestFrame]) {
            let bytes: Vec<u8> = frames.iter().flat_map(|f| f.to_bytes()).collect();
            std::fs::write(self.root.join("graw").join("run_0001").join(name), bytes).unwrap();
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }

    fn pulse_frame(event_id: u32, aget: u32, channel: u32) -> TestFrame {
        let body: Vec<u8> = [(0, 10), (1, 50), (2, 10)]
            .iter()
            .flat_map(|(bucket, value)| partial_item(aget, channel, *bucket, *value))
            .collect();
        let mut frame = TestFrame::new(FRAME_TYPE_PARTIAL, 4, body);
        frame.event_id = event_id;
        frame.event_time = 1000 + event_id as u64;
        frame
    }

    fn bad_frame(event_id: u32) -> TestFrame {
        let mut frame = TestFrame::new(FRAME_TYPE_PARTIAL, 2, vec![0; 8]);
        frame.event_id = event_id;
        frame
    }

    #[test]
    fn test_process_run() {
        let scratch = Scratch::new("process_run");
        scratch.write_graw(
            "CoBo0_AsAd0.graw",
            &[
                pulse_frame(1, 0, 0),
                TestFrame::new(9, 2, vec![0; 2]),
                pulse_frame(2, 1, 5),
            ],
        );
        scratch.write_graw("CoBo0_AsAd1.graw", &[pulse_frame(3, 3, 67)]);
        let config = scratch.config(true);

        let (tx, rx) = mpsc::channel::<WorkerStatus>();
        let summary = process_run(&config, 1, &tx, &0).unwrap();
        assert_eq!(summary.frames, 4);
        assert_eq!(summary.frames_with_hits, 3);
        assert_eq!(summary.hits, 3);
        assert_eq!(summary.skipped_frames, 1);
        assert_eq!(summary.bad_frames, 0);

        let statuses: Vec<WorkerStatus> = rx.try_iter().collect();
        assert_eq!(statuses.first().unwrap().progress, 0.0);
        assert_eq!(statuses.last().unwrap().progress, 1.0);

        let hit_path = config.get_hit_file_name(1).unwrap();
        let records: Vec<FrameHits> = HitReader::open(&hit_path)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let ids: Vec<u32> = records.iter().map(|r| r.event_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(records[1].event_time, 1002);
        assert_eq!((records[1].hits[0].aget, records[1].hits[0].channel), (1, 5));
        assert_eq!(records[2].hits[0].integral, 40.0);
    }

    #[test]
    fn test_bad_frames_skipped() {
        let scratch = Scratch::new("bad_skipped");
        scratch.write_graw(
            "CoBo0_AsAd0.graw",
            &[pulse_frame(1, 0, 0), bad_frame(2), pulse_frame(3, 0, 1)],
        );
        let (tx, _rx) = mpsc::channel::<WorkerStatus>();
        let summary = process_run(&scratch.config(true), 1, &tx, &0).unwrap();
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.bad_frames, 1);
        assert_eq!(summary.skipped_frames, 0);
        assert_eq!(summary.hits, 2);
    }

    #[test]
    fn test_bad_frames_abort() {
        let scratch = Scratch::new("bad_abort");
        scratch.write_graw("CoBo0_AsAd0.graw", &[pulse_frame(1, 0, 0), bad_frame(2)]);
        let (tx, _rx) = mpsc::channel::<WorkerStatus>();
        let result = process_run(&scratch.config(false), 1, &tx, &0);
        assert!(matches!(result, Err(ProcessorError::DecodeError(_))));
    }

    #[test]
    fn test_no_graw_files() {
        let scratch = Scratch::new("no_graw");
        let (tx, _rx) = mpsc::channel::<WorkerStatus>();
        let result = process_run(&scratch.config(true), 1, &tx, &0);
        assert!(matches!(result, Err(ProcessorError::NoGrawFiles(_))));
    }

    #[test]
    fn test_create_subsets() {
        let config = Config {
            first_run_number: 10,
            last_run_number: 16,
            n_threads: 3,
            ..Default::default()
        };
        let subsets = create_subsets(&config);
        assert_eq!(
            subsets,
            vec![vec![10, 13, 16], vec![11, 14], vec![12, 15]]
        );
    }
}
