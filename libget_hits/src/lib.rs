//! # get_hits
//!
//! get_hits extracts pulse features from the raw waveforms recorded by the GET front-end
//! electronics. It takes data produced by the GET DAQ in the form of .graw files, and for
//! every frame reduces each channel trace to a single hit: the arrival time, the peak
//! height and the integrated charge.
//!
//! ## Installation
//!
//! The only method of install is from source. If you have not used Rust before, you will
//! most likely need to install the Rust tool chain. See the
//! [Rust docs](https://www.rust-lang.org/tools/install) for installation instructions.
//!
//! To build and install the CLI use `cargo install --path ./get_hits_cli` from the top
//! level get_hits repository.
//!
//! ## Hit Extraction
//!
//! A GET frame holds the data of one AsAd (4 AGETs of 68 channels each) for one trigger.
//! Two frame types are handled:
//!
//! - Partial readout (frame type 1): only channels with signal are read. Each item is a
//!   32-bit word carrying the AGET, channel, time bucket and sample.
//! - Full readout (frame type 2): every channel is read. Each item is a 16-bit word carrying
//!   the AGET and sample; channels are interleaved in turn and the time bucket is implied by
//!   the item position.
//!
//! Any other frame type is skipped. For every channel with at least one sample, the
//! baseline is taken as the smaller of the first and last samples. The integral is the sum
//! of the baseline subtracted samples, the time is the bucket centroid weighted by those
//! samples, and the peak is found by fitting a parabola through the maximum sample and its
//! two neighbors.
//!
//! The core entry point is [`frame_processor::process_frame`], which works on anything
//! implementing [`frame_view::FrameView`]. [`mfm_frame::MfmFrame`] is the provided
//! implementation for frames read from .graw files.
//!
//! ## Configuration
//!
//! The YAML format of a configuration file is as follows:
//!
//! ```yml
//! graw_path: /path/to/graw
//! hit_path: /path/to/hits
//! first_run_number: 0
//! last_run_number: 0
//! n_threads: 1
//! skip_bad_frames: true
//! ```
//!
//! `graw_path` should contain subdirectories of the `run_####` format, each holding the
//! .graw files of that run. If `skip_bad_frames` is false, a malformed frame stops the run.
//!
//! ## Output
//!
//! Each run produces `run_####.hits` in `hit_path`. For every frame which produced hits,
//! the file holds (all little endian):
//!
//! ```text
//! event_id(u32) event_time(u64) n_hits(u32)
//! |---- hit(cobo u32, asad u32, aget u32, channel u32, time f64, peak f64, integral f64)
//! |---- ...
//! ```
pub mod channel_data;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod extractor;
pub mod frame_processor;
pub mod frame_view;
pub mod graw_file;
pub mod hit;
pub mod hit_file;
pub mod mfm_frame;
pub mod process;
pub mod worker_status;
