//! Periodic driver for a [`ChallengeSession`].
//!
//! One tick loop per runner. The loop owns a child of a cancellation token
//! and re-checks it under the session lock before every tick, so once
//! `stop`/`reset`/`dismiss` returns no tick from the old loop can land.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::session::{ChallengeSession, ChallengeSnapshot};
use super::{commit_candidate, ChallengeMode, ChallengeState};
use crate::error::Result;
use crate::events::Event;
use crate::observable::Observable;
use crate::storage::{KeyValueStore, PreferenceStore};

const TICK_PERIOD: Duration = Duration::from_secs(1);

struct TickLoop {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct ChallengeRunner {
    session: Arc<Mutex<ChallengeSession>>,
    snapshots: Arc<Observable<ChallengeSnapshot>>,
    tick_loop: Option<TickLoop>,
    period: Duration,
}

impl ChallengeRunner {
    pub fn new(session: ChallengeSession) -> Self {
        Self::with_period(session, TICK_PERIOD)
    }

    /// Runner with a custom tick period. The session still counts one
    /// second per tick.
    pub fn with_period(session: ChallengeSession, period: Duration) -> Self {
        let snapshots = Arc::new(Observable::new(session.snapshot()));
        Self {
            session: Arc::new(Mutex::new(session)),
            snapshots,
            tick_loop: None,
            period,
        }
    }

    pub fn snapshot(&self) -> ChallengeSnapshot {
        self.snapshots.get()
    }

    /// Receiver updated after every command and every tick.
    pub fn subscribe(&self) -> watch::Receiver<ChallengeSnapshot> {
        self.snapshots.subscribe()
    }

    /// Whether a tick loop is still alive.
    pub fn is_ticking(&self) -> bool {
        self.tick_loop
            .as_ref()
            .is_some_and(|l| !l.token.is_cancelled() && !l.handle.is_finished())
    }

    pub fn set_mode(&mut self, mode: ChallengeMode) -> Option<Event> {
        self.command(|s| s.set_mode(mode))
    }

    pub fn set_countdown_input(&mut self, input: &str) -> bool {
        let mut session = lock(&self.session);
        let accepted = session.set_countdown_input(input);
        self.snapshots.set(session.snapshot());
        accepted
    }

    /// Start the session and its tick loop. No-op while already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Option<Event> {
        let event = {
            let mut session = lock(&self.session);
            let event = session.start()?;
            self.snapshots.set(session.snapshot());
            event
        };
        self.cancel_loop();
        self.tick_loop = Some(self.spawn_loop());
        tracing::debug!(event = event.name(), "challenge tick loop started");
        Some(event)
    }

    pub fn stop(&mut self) -> Option<Event> {
        self.cancel_loop();
        self.command(ChallengeSession::stop)
    }

    pub fn reset(&mut self) -> Event {
        self.cancel_loop();
        let mut session = lock(&self.session);
        let event = session.reset();
        self.snapshots.set(session.snapshot());
        event
    }

    pub fn acknowledge(&mut self) -> Option<Event> {
        self.command(ChallengeSession::acknowledge)
    }

    pub fn confirm(&mut self, made_it: bool) -> Option<Event> {
        self.command(|s| s.confirm(made_it))
    }

    /// Close whichever prompt is open and commit its candidate time.
    ///
    /// A completed countdown is acknowledged regardless of `made_it`; a
    /// stopped count-up is confirmed with `made_it`. Returns the finish
    /// event followed by `BestRecorded` if the time beat the stored best.
    pub fn finish<S: KeyValueStore>(
        &mut self,
        prefs: &PreferenceStore<S>,
        made_it: bool,
    ) -> Result<Vec<Event>> {
        let finished = match self.snapshot().state {
            ChallengeState::Completed => self.acknowledge(),
            ChallengeState::AwaitingConfirmation => self.confirm(made_it),
            _ => None,
        };
        let Some(finished) = finished else {
            return Ok(Vec::new());
        };
        let mut events = vec![finished];
        if let Some(best) = commit_candidate(prefs, &events[0])? {
            events.push(best);
        }
        Ok(events)
    }

    /// Close the session: cancel the loop and reset before releasing it.
    pub fn dismiss(mut self) -> Event {
        self.reset()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn command<R>(&mut self, f: impl FnOnce(&mut ChallengeSession) -> R) -> R {
        let mut session = lock(&self.session);
        let out = f(&mut session);
        self.snapshots.set(session.snapshot());
        out
    }

    fn cancel_loop(&mut self) {
        if let Some(tick_loop) = self.tick_loop.take() {
            tick_loop.token.cancel();
        }
    }

    fn spawn_loop(&self) -> TickLoop {
        let token = CancellationToken::new();
        let cancelled = token.child_token();
        let session = Arc::clone(&self.session);
        let snapshots = Arc::clone(&self.snapshots);
        let period = self.period;

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = interval.tick() => {}
                }
                let mut guard = lock(&session);
                if cancelled.is_cancelled() {
                    break;
                }
                let event = guard.tick();
                snapshots.set(guard.snapshot());
                if let Some(event) = &event {
                    tracing::debug!(event = event.name(), counter = guard.display_secs());
                }
                if !guard.is_running() {
                    break;
                }
            }
        });

        TickLoop { token, handle }
    }
}

impl Drop for ChallengeRunner {
    fn drop(&mut self) {
        self.cancel_loop();
    }
}

fn lock(session: &Mutex<ChallengeSession>) -> MutexGuard<'_, ChallengeSession> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
