use std::path::PathBuf;
use thiserror::Error;

use super::constants::*;
use super::worker_status::WorkerStatus;

#[derive(Debug, Error)]
pub enum MfmFrameError {
    #[error("Failed to parse buffer into MfmFrame: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Incorrect meta type {0} found for MfmFrame; expected {exp}", exp=EXPECTED_META_TYPE)]
    IncorrectMetaType(u8),
    #[error("MfmFrame buffer holds {0} bytes but the header declares a frame of {1} bytes")]
    IncorrectFrameSize(usize, usize),
    #[error("Incorrect header size {0} bytes found for MfmFrame; need at least {min}", min=MIN_HEADER_SIZE)]
    IncorrectHeaderSize(usize),
    #[error("MfmFrame declares {0} items of {1} bytes, which overruns the {2} byte frame")]
    ItemOverrun(usize, usize, usize),
    #[error("MfmFrame declares {0} items with an item size of zero")]
    ZeroItemSize(usize),
}

#[derive(Debug, Error)]
pub enum GrawFileError {
    #[error("Error when parsing MfmFrame from GrawFile: {0}")]
    BadFrame(#[from] MfmFrameError),
    #[error("Could not open GrawFile because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Reached end of GrawFile")]
    EndOfFile,
    #[error("GrawFile failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Incorrect item size {size} found at item {index} of a partial readout frame; expected {exp}", exp=EXPECTED_ITEM_SIZE_PARTIAL)]
    IncorrectItemSize { index: usize, size: usize },
}

#[derive(Debug, Error)]
pub enum HitBlockError {
    #[error("Hit block declares {0} hits but only holds {1} bytes")]
    Truncated(u32, usize),
    #[error("Hit block failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum HitFileError {
    #[error("HitFile failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("HitFile contained a bad hit block: {0}")]
    BadBlock(#[from] HitBlockError),
    #[error("Could not open HitFile because file {0:?} does not exist")]
    BadFilePath(PathBuf),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor could not find any GRAW files in {0:?}")]
    NoGrawFiles(PathBuf),
    #[error("Processor failed due to GrawFile error: {0}")]
    GrawError(#[from] GrawFileError),
    #[error("Processor failed due to a malformed frame: {0}")]
    DecodeError(#[from] DecodeError),
    #[error("Processor failed due to HitFile error: {0}")]
    HitFileError(#[from] HitFileError),
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed due to Send error: {0}")]
    SendError(#[from] std::sync::mpsc::SendError<WorkerStatus>),
    #[error("Processor failed due to IO error: {0}")]
    IoError(#[from] std::io::Error),
}
