/// Test helper functions shared by the integration tests
use std::sync::{Arc, Mutex};
use tokio::time::{Duration, Instant};

/// Records when each job started, in start order
#[derive(Clone, Default)]
pub struct StartLog {
    starts: Arc<Mutex<Vec<(usize, Instant)>>>,
}

impl StartLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, job: usize) {
        self.starts.lock().unwrap().push((job, Instant::now()));
    }

    pub fn order(&self) -> Vec<usize> {
        self.starts.lock().unwrap().iter().map(|(job, _)| *job).collect()
    }

    pub fn times(&self) -> Vec<Instant> {
        self.starts.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }

    pub fn start_of(&self, job: usize) -> Instant {
        self.starts
            .lock()
            .unwrap()
            .iter()
            .find(|(j, _)| *j == job)
            .map(|(_, at)| *at)
            .unwrap_or_else(|| panic!("job {} never started", job))
    }

    /// Gaps between consecutive starts
    pub fn gaps(&self) -> Vec<Duration> {
        self.times()
            .windows(2)
            .map(|pair| pair[1].duration_since(pair[0]))
            .collect()
    }
}

/// Let spawned tasks run without advancing the paused clock by a meaningful amount
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
