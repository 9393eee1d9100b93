use tokio::task::JoinHandle;

/// Handle to a callback-mode run.
///
/// Each enabled adapter runs as its own task. Dropping the handle detaches the
/// run: the tasks keep delivering to the sink until they finish.
#[derive(Debug)]
pub struct RetrievalHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl RetrievalHandle {
    pub(crate) const fn new(tasks: Vec<JoinHandle<()>>) -> Self {
        Self { tasks }
    }

    /// Number of adapter tasks started by this run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True when no enabled adapter was started.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Return `true` once every adapter task has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.tasks.iter().all(JoinHandle::is_finished)
    }

    /// Wait until every adapter has finished delivering.
    ///
    /// Panics inside an adapter are reported to the sink by the task itself,
    /// so this only waits.
    pub async fn wait(self) {
        let _ = futures::future::join_all(self.tasks).await;
    }

    /// Abort every adapter task that is still running.
    ///
    /// Aborted adapters deliver nothing further, including errors. Pending
    /// listings they were joining are aborted with them.
    pub fn abort(&self) {
        for t in &self.tasks {
            if !t.is_finished() {
                t.abort();
            }
        }
    }
}
