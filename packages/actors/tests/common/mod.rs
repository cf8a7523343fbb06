#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use actors::{ExecutionError, Executor, FnExecutor, Gateway, RunnerHandle, start_service};
use lookup_core::{ContactFields, Job, JobResult, ServiceConfig};

pub fn alice() -> ContactFields {
    ContactFields {
        title: "Alice".to_string(),
        subtitle: "online".to_string(),
        status: "Hey there! I am using WhatsApp.".to_string(),
        status_info: "January 1".to_string(),
        image: "iVBORw0KGgo=".to_string(),
    }
}

pub fn ok_executor() -> Arc<dyn Executor> {
    Arc::new(FnExecutor::new(|job: &Job| {
        job.answer(JobResult::ok("Ok with any info", alice()));
        Ok(())
    }))
}

pub fn failing_executor() -> Arc<dyn Executor> {
    Arc::new(FnExecutor::new(|_job: &Job| {
        Err(ExecutionError::Session("device unreachable".to_string()))
    }))
}

pub async fn start(
    capacity: usize,
    response_timeout: Duration,
    executor: Arc<dyn Executor>,
) -> (Gateway, RunnerHandle) {
    let config = ServiceConfig::default()
        .with_queue_capacity(capacity)
        .with_response_timeout(response_timeout);
    start_service(&config, executor)
        .await
        .expect("service should start")
}

/// Executor that records when each execution starts and ends.
pub struct RecordingExecutor {
    delay: Duration,
    active: AtomicUsize,
    max_active: AtomicUsize,
    spans: Mutex<Vec<(String, Instant, Instant)>>,
}

impl RecordingExecutor {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            spans: Mutex::new(Vec::new()),
        })
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn spans(&self) -> Vec<(String, Instant, Instant)> {
        self.spans.lock().unwrap().clone()
    }

    pub fn targets(&self) -> Vec<String> {
        self.spans().into_iter().map(|(target, _, _)| target).collect()
    }
}

impl Executor for RecordingExecutor {
    fn execute(&self, job: &Job) -> Result<(), ExecutionError> {
        let start = Instant::now();
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);

        std::thread::sleep(self.delay);

        self.active.fetch_sub(1, Ordering::SeqCst);
        self.spans
            .lock()
            .unwrap()
            .push((job.target().to_string(), start, Instant::now()));
        job.answer(JobResult::ok("Ok with any info", alice()));
        Ok(())
    }
}

/// Executor that blocks until its gate is opened, then answers OK.
pub struct GatedExecutor {
    gate: (Mutex<bool>, Condvar),
    started: Mutex<Vec<String>>,
    late_answers: Mutex<Vec<bool>>,
}

impl GatedExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: (Mutex::new(false), Condvar::new()),
            started: Mutex::new(Vec::new()),
            late_answers: Mutex::new(Vec::new()),
        })
    }

    pub fn open(&self) {
        let (open, cvar) = &self.gate;
        *open.lock().unwrap() = true;
        cvar.notify_all();
    }

    /// Targets whose execution has started.
    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }

    /// Return values of `answer` for executions that finished.
    pub fn answers(&self) -> Vec<bool> {
        self.late_answers.lock().unwrap().clone()
    }
}

impl Executor for GatedExecutor {
    fn execute(&self, job: &Job) -> Result<(), ExecutionError> {
        self.started.lock().unwrap().push(job.target().to_string());

        let (open, cvar) = &self.gate;
        let guard = open.lock().unwrap();
        let (guard, _) = cvar
            .wait_timeout_while(guard, Duration::from_secs(10), |open| !*open)
            .unwrap();
        drop(guard);

        let recorded = job.answer(JobResult::ok("Ok with any info", alice()));
        self.late_answers.lock().unwrap().push(recorded);
        Ok(())
    }
}

/// Poll `condition` until it holds or `within` elapses.
pub async fn eventually(within: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + within;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
