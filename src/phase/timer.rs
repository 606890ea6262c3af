use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct ArmedDeadline {
    epoch: u64,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// A single cancellable phase deadline.
///
/// Arming always cancels the previous deadline first, so at most one is pending.
#[derive(Default)]
pub struct PhaseTimer {
    armed: Option<ArmedDeadline>,
}

impl PhaseTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `on_expire(epoch)` after `duration` unless cancelled first.
    pub fn arm<F>(&mut self, epoch: u64, duration: Duration, on_expire: F)
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();

        let token = CancellationToken::new();
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {}
                _ = tokio::time::sleep(duration) => {
                    if !task_token.is_cancelled() {
                        on_expire(epoch);
                    }
                }
            }
        });

        tracing::debug!(
            target: "phase.timer",
            epoch = epoch,
            duration_ms = duration.as_millis() as u64,
            "phase_deadline_armed"
        );
        self.armed = Some(ArmedDeadline {
            epoch,
            token,
            handle,
        });
    }

    /// Cancels the pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        let Some(armed) = self.armed.take() else {
            return false;
        };
        armed.token.cancel();
        armed.handle.abort();
        tracing::debug!(target: "phase.timer", epoch = armed.epoch, "phase_deadline_cancelled");
        true
    }

    pub fn armed_epoch(&self) -> Option<u64> {
        self.armed
            .as_ref()
            .filter(|armed| !armed.handle.is_finished())
            .map(|armed| armed.epoch)
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
