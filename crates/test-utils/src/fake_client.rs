use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use flagpipe::dag::ScheduledJob;
use flagpipe::engine::FlagPaths;
use flagpipe::errors::Result;
use flagpipe::exec::ExecutionClient;
use flagpipe::fs::FileSystem;
use flagpipe::fs::mock::MockFileSystem;

#[derive(Debug, Default)]
struct FakeState {
    batches: Vec<Vec<String>>,
    busy_at_dispatch: Vec<(String, bool)>,
    /// Remaining failing attempts per node; `u32::MAX` fails forever.
    failures_left: HashMap<String, u32>,
    /// Return `Err` when asked to run this (1-based) batch.
    error_on_batch: Option<usize>,
}

/// A fake execution client that:
/// - records every batch it is asked to run
/// - reports success unless told to fail a node
/// - optionally inspects and writes to a `MockFileSystem` while "running"
///
/// Clones share state, so keep one clone for assertions and box the other.
#[derive(Debug, Clone, Default)]
pub struct FakeClient {
    state: Arc<Mutex<FakeState>>,
    fs: Option<MockFileSystem>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe `.busy` markers and write job outputs into `fs`.
    pub fn with_fs(mut self, fs: MockFileSystem) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Fail the first `times` attempts of `node`.
    pub fn fail_times(self, node: &str, times: u32) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures_left
            .insert(node.to_string(), times);
        self
    }

    pub fn always_fail(self, node: &str) -> Self {
        self.fail_times(node, u32::MAX)
    }

    pub fn error_on_batch(self, n: usize) -> Self {
        self.state.lock().unwrap().error_on_batch = Some(n);
        self
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().batches.clone()
    }

    /// Flattened list of dispatched node names, in dispatch order.
    pub fn executed(&self) -> Vec<String> {
        self.batches().into_iter().flatten().collect()
    }

    /// For each dispatched job, whether its `.busy` marker existed when the
    /// client received it. Empty unless built `with_fs`.
    pub fn busy_at_dispatch(&self) -> Vec<(String, bool)> {
        self.state.lock().unwrap().busy_at_dispatch.clone()
    }
}

impl ExecutionClient for FakeClient {
    fn launch_batch<'a>(
        &'a mut self,
        batch: &'a mut [ScheduledJob],
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        let state = Arc::clone(&self.state);
        let fs = self.fs.clone();

        Box::pin(async move {
            let mut guard = state.lock().unwrap();
            guard
                .batches
                .push(batch.iter().map(|j| j.name.clone()).collect());

            if guard.error_on_batch == Some(guard.batches.len()) {
                return Err(anyhow::anyhow!("backend unavailable").into());
            }

            for job in batch.iter_mut() {
                let paths = FlagPaths::for_output(job.output_dir());

                if let Some(fs) = &fs {
                    let busy = fs.exists(&paths.busy);
                    guard.busy_at_dispatch.push((job.name.clone(), busy));
                }

                let fail = match guard.failures_left.get_mut(&job.name) {
                    Some(0) | None => false,
                    Some(left) => {
                        if *left != u32::MAX {
                            *left -= 1;
                        }
                        true
                    }
                };

                if let Some(fs) = &fs {
                    fs.add_file(paths.output.join("part-00000"));
                }

                job.return_code = Some(if fail { 1 } else { 0 });
            }

            Ok(())
        })
    }
}
