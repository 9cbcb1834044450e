use crate::state::SessionManager;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// Handle to a running countdown task.
///
/// Cancelling (or dropping the session it drives into `Finished`) stops the
/// ticker. The controller keeps at most one live handle, so there is never
/// more than one active countdown per quiz.
#[derive(Debug)]
pub struct CountdownHandle {
    cancel_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Request the ticker to stop.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// Whether the ticker task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn the 1 Hz countdown that drives [`SessionManager::tick`].
///
/// The task runs until the session leaves `InProgress` (end of questions or
/// clock at zero) or the handle is cancelled. Callers restarting the quiz
/// must cancel the previous handle first; [`crate::controller::QuizController`]
/// does exactly that.
pub fn start_countdown(manager: SessionManager) -> CountdownHandle {
    let (cancel_tx, mut cancel_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first interval tick completes immediately; consume it so the
        // countdown only decrements after a full second.
        ticker.tick().await;

        tracing::debug!("countdown started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if manager.tick().is_err() {
                        // Session is no longer in progress.
                        break;
                    }
                    if !manager.read(|session| session.is_in_progress()) {
                        tracing::debug!("countdown reached zero or quiz finished");
                        break;
                    }
                }
                changed = cancel_rx.changed() => {
                    if changed.is_err() || *cancel_rx.borrow() {
                        tracing::debug!("countdown cancelled");
                        break;
                    }
                }
            }
        }
    });

    CountdownHandle { cancel_tx, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::builtin_questions;
    use tokio::time::{Duration, advance};

    /// Advance paused time one second at a time, yielding so the ticker task
    /// gets to run between steps.
    async fn advance_secs(secs: u32) {
        for _ in 0..secs {
            advance(Duration::from_secs(1)).await;
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_decrements_once_per_second() {
        let manager = SessionManager::new();
        manager.start_quiz(builtin_questions(), 75).unwrap();

        let handle = start_countdown(manager.clone());
        tokio::task::yield_now().await;

        advance_secs(3).await;

        assert_eq!(manager.read(|s| s.time_remaining()), 72);
        handle.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_stops_at_zero() {
        let manager = SessionManager::new();
        manager.start_quiz(builtin_questions(), 2).unwrap();

        let handle = start_countdown(manager.clone());
        tokio::task::yield_now().await;

        advance_secs(5).await;

        // Clock bottomed out at zero and the task exited; the extra seconds
        // were never applied.
        assert_eq!(manager.read(|s| s.time_remaining()), 0);
        assert!(!manager.read(|s| s.is_in_progress()));
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_countdown_leaves_timer_untouched() {
        let manager = SessionManager::new();
        manager.start_quiz(builtin_questions(), 75).unwrap();

        let handle = start_countdown(manager.clone());
        tokio::task::yield_now().await;

        handle.cancel();
        tokio::task::yield_now().await;

        advance_secs(10).await;

        assert_eq!(manager.read(|s| s.time_remaining()), 75);
        assert!(handle.is_finished());
    }
}
