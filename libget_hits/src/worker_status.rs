/// Progress report sent from a worker thread to the UI
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerStatus {
    /// Fraction of the current run that has been read, 0.0 to 1.0
    pub progress: f32,
    pub run_number: i32,
    pub worker_id: usize,
}

impl WorkerStatus {
    pub fn new(progress: f32, run_number: i32, worker_id: usize) -> Self {
        Self {
            progress,
            run_number,
            worker_id,
        }
    }
}
