//! Countdown clock for timed-test mode.
//!
//! A [`Countdown`] is a spawned tokio task that ticks once per second,
//! invokes `on_expire` exactly once at zero, and can be stopped idempotently.
//! Clock granularity is whole seconds; there are no sub-second guarantees.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

use crate::session::{AssessmentController, SessionState};

/// A one-shot countdown driven by the tokio clock.
#[derive(Debug)]
pub struct Countdown {
    remaining: Arc<AtomicU64>,
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Start a countdown of `duration_secs`.
    ///
    /// `on_tick(remaining)` fires once per second after the decrement;
    /// `on_expire` fires exactly once when the clock reaches zero, after the
    /// final `on_tick(0)`. A zero-length countdown expires on its first poll
    /// without ticking.
    pub fn start<T, E>(duration_secs: u64, mut on_tick: T, on_expire: E) -> Self
    where
        T: FnMut(u64) + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let remaining = Arc::new(AtomicU64::new(duration_secs));
        let shared = Arc::clone(&remaining);

        let handle = tokio::spawn(async move {
            let mut on_expire = Some(on_expire);
            let mut left = duration_secs;

            if left == 0 {
                if let Some(expire) = on_expire.take() {
                    expire();
                }
                return;
            }

            let period = Duration::from_secs(1);
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticks.tick() => {
                        left -= 1;
                        shared.store(left, Ordering::Relaxed);
                        on_tick(left);
                        if left == 0 {
                            if let Some(expire) = on_expire.take() {
                                expire();
                            }
                            break;
                        }
                    }
                    // Fires on stop() and when the Countdown handle is dropped.
                    _ = stop_rx.changed() => {
                        tracing::debug!(remaining = left, "countdown stopped");
                        break;
                    }
                }
            }
        });

        Self {
            remaining,
            stop_tx,
            handle,
        }
    }

    /// Cancel the countdown. Idempotent, and safe to call after expiry.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Whole seconds left on the clock.
    pub fn remaining(&self) -> u64 {
        self.remaining.load(Ordering::Relaxed)
    }

    /// Whether the countdown task has finished (expired or stopped).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Attach a countdown to a timed in-progress session.
///
/// Every tick funnels through [`AssessmentController::timed_tick`] on the
/// shared lock, so tick-driven and user-driven mutations serialize, and the
/// epoch captured here makes any tick that races a `submit`/`reset` a no-op.
/// Returns `None` for practice sessions; practice mode never starts a timer.
pub fn drive(session: Arc<Mutex<AssessmentController>>) -> Option<Countdown> {
    let (duration_secs, epoch) = {
        let ctl = session.lock().unwrap();
        if ctl.state() != SessionState::InProgress || !ctl.mode().is_timed() {
            return None;
        }
        (ctl.remaining_secs(), ctl.epoch())
    };

    let on_tick_session = Arc::clone(&session);
    Some(Countdown::start(
        duration_secs,
        move |_remaining| {
            let mut ctl = on_tick_session.lock().unwrap();
            let _ = ctl.timed_tick(epoch);
        },
        move || {
            // The final tick already forced submission; this is a no-op
            // unless that tick was lost, in which case it closes the session.
            let mut ctl = session.lock().unwrap();
            let _ = ctl.timed_tick(epoch);
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::sample_bank;
    use crate::session::Mode;
    use std::sync::atomic::AtomicU32;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_second_and_expires_once() {
        let ticks = Arc::new(AtomicU32::new(0));
        let expiries = Arc::new(AtomicU32::new(0));
        let t = Arc::clone(&ticks);
        let e = Arc::clone(&expiries);

        let countdown = Countdown::start(
            5,
            move |_| {
                t.fetch_add(1, Ordering::Relaxed);
            },
            move || {
                e.fetch_add(1, Ordering::Relaxed);
            },
        );

        tokio::time::sleep(Duration::from_secs(6)).await;

        assert_eq!(ticks.load(Ordering::Relaxed), 5);
        assert_eq!(expiries.load(Ordering::Relaxed), 1);
        assert_eq!(countdown.remaining(), 0);
        assert!(countdown.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_pending_ticks() {
        let ticks = Arc::new(AtomicU32::new(0));
        let expiries = Arc::new(AtomicU32::new(0));
        let t = Arc::clone(&ticks);
        let e = Arc::clone(&expiries);

        let countdown = Countdown::start(
            60,
            move |_| {
                t.fetch_add(1, Ordering::Relaxed);
            },
            move || {
                e.fetch_add(1, Ordering::Relaxed);
            },
        );

        tokio::time::sleep(Duration::from_millis(2500)).await;
        countdown.stop();
        countdown.stop(); // idempotent
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(ticks.load(Ordering::Relaxed), 2);
        assert_eq!(expiries.load(Ordering::Relaxed), 0);
        assert!(countdown.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_after_expiry_is_safe() {
        let countdown = Countdown::start(1, |_| {}, || {});
        tokio::time::sleep(Duration::from_secs(2)).await;
        countdown.stop();
        assert!(countdown.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_expires_immediately() {
        let expiries = Arc::new(AtomicU32::new(0));
        let e = Arc::clone(&expiries);
        let countdown = Countdown::start(0, |_| {}, move || {
            e.fetch_add(1, Ordering::Relaxed);
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(expiries.load(Ordering::Relaxed), 1);
        assert!(countdown.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn drive_forces_submission_at_zero() {
        let session = Arc::new(Mutex::new(AssessmentController::new(sample_bank())));
        session
            .lock()
            .unwrap()
            .start(Mode::Timed { duration_secs: 5 })
            .unwrap();

        let countdown = drive(Arc::clone(&session)).expect("timed session gets a countdown");
        tokio::time::sleep(Duration::from_secs(6)).await;

        let ctl = session.lock().unwrap();
        assert_eq!(ctl.state(), SessionState::Submitted);
        assert_eq!(ctl.summary().unwrap().correct, 0);
        drop(ctl);
        assert!(countdown.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn drive_returns_none_for_practice_mode() {
        let session = Arc::new(Mutex::new(AssessmentController::new(sample_bank())));
        session.lock().unwrap().start(Mode::Practice).unwrap();
        assert!(drive(session).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_mid_countdown_leaves_session_untouched() {
        let session = Arc::new(Mutex::new(AssessmentController::new(sample_bank())));
        session
            .lock()
            .unwrap()
            .start(Mode::Timed { duration_secs: 30 })
            .unwrap();

        let countdown = drive(Arc::clone(&session)).unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        session.lock().unwrap().reset();
        countdown.stop();
        tokio::time::sleep(Duration::from_secs(40)).await;

        // Stale ticks (if any raced the stop) were ignored by the epoch guard.
        let ctl = session.lock().unwrap();
        assert_eq!(ctl.state(), SessionState::NotStarted);
        assert_eq!(ctl.answered_count(), 0);
    }
}
