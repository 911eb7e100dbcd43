// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Carousel engine: the periodic cover rotation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::ScrollAnimation;
use crate::covers::{Cover, CoverPool, CoverWindow};

/// Length of one scroll cycle
pub const DEFAULT_CYCLE: Duration = Duration::from_secs(2);

/// Buffered events per subscriber before it starts lagging
pub const EVENT_CAPACITY: usize = 64;

/// Notifications emitted by the engine
#[derive(Debug, Clone)]
pub enum CarouselEvent {
    /// A new scroll animation began (offset back at 0)
    CycleStarted {
        cycle: u64,
        animation: ScrollAnimation,
    },
    /// The window scrolled by one cover
    WindowChanged {
        cycle: u64,
        window: CoverWindow,
        inserted: Cover,
    },
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselSettings {
    /// Duration of one cycle
    pub cycle: Duration,
    /// Fixed RNG seed (entropy when `None`)
    pub seed: Option<u64>,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            cycle: DEFAULT_CYCLE,
            seed: None,
        }
    }
}

/// State shared between the engine handle and its cycle task
#[derive(Debug)]
struct CarouselState {
    window: CoverWindow,
    rng: StdRng,
    /// Bumped on every start and stop; a task only acts for its own run
    generation: u64,
    running: bool,
    cycles: u64,
    viewport_width: f64,
}

impl CarouselState {
    /// One cycle boundary: update the window, then restart the animation
    fn cycle(
        &mut self,
        pool: &CoverPool,
        period: Duration,
        events: &broadcast::Sender<CarouselEvent>,
    ) -> Option<Cover> {
        self.cycles += 1;
        let cycle = self.cycles;

        let inserted = self.window.advance(pool, &mut self.rng);
        match &inserted {
            Some(cover) => {
                debug!(cycle, cover = %cover, "carousel window advanced");
                let _ = events.send(CarouselEvent::WindowChanged {
                    cycle,
                    window: self.window.clone(),
                    inserted: cover.clone(),
                });
            }
            None => debug!(cycle, pool = pool.len(), "carousel update skipped"),
        }

        let _ = events.send(CarouselEvent::CycleStarted {
            cycle,
            animation: ScrollAnimation::for_viewport(self.viewport_width, period),
        });

        inserted
    }
}

fn lock(state: &Mutex<CarouselState>) -> MutexGuard<'_, CarouselState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Non-repeating rotating carousel.
///
/// `start` spawns one Tokio task that fires every cycle; `stop` cancels it.
/// Window updates and events happen under the state lock after checking the
/// run generation, so once `stop` returns nothing else is emitted.
pub struct CarouselEngine {
    pool: Arc<CoverPool>,
    period: Duration,
    state: Arc<Mutex<CarouselState>>,
    events: broadcast::Sender<CarouselEvent>,
    task: Option<JoinHandle<()>>,
}

impl CarouselEngine {
    /// Create a stopped engine showing the first covers of `pool`
    pub fn new(pool: CoverPool, settings: CarouselSettings) -> Self {
        let window = CoverWindow::from_pool(&pool);
        Self::with_window(pool, window, settings)
    }

    /// Create a stopped engine showing a specific window
    pub fn with_window(pool: CoverPool, window: CoverWindow, settings: CarouselSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            pool: Arc::new(pool),
            period: settings.cycle,
            state: Arc::new(Mutex::new(CarouselState {
                window,
                rng,
                generation: 0,
                running: false,
                cycles: 0,
                viewport_width: 0.0,
            })),
            events,
            task: None,
        }
    }

    /// Subscribe to window and animation events
    pub fn subscribe(&self) -> broadcast::Receiver<CarouselEvent> {
        self.events.subscribe()
    }

    /// Start rotating. Does nothing if already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self, viewport_width: f64) {
        let generation = {
            let mut state = lock(&self.state);
            if state.running {
                debug!("carousel already running");
                return;
            }
            state.running = true;
            state.generation += 1;
            state.viewport_width = viewport_width;

            let _ = self.events.send(CarouselEvent::CycleStarted {
                cycle: state.cycles,
                animation: ScrollAnimation::for_viewport(viewport_width, self.period),
            });
            state.generation
        };

        info!(
            viewport_width,
            period_ms = self.period.as_millis() as u64,
            pool = self.pool.len(),
            "carousel started"
        );

        if self.period.is_zero() {
            // A zero period would spin; the strip just stays put
            debug!("carousel period is zero, no cycle task spawned");
            return;
        }

        self.task = Some(tokio::spawn(run_cycles(
            Arc::clone(&self.pool),
            Arc::clone(&self.state),
            self.events.clone(),
            self.period,
            generation,
        )));
    }

    /// Stop rotating. Safe to call when already stopped.
    pub fn stop(&mut self) {
        {
            let mut state = lock(&self.state);
            if state.running {
                state.running = false;
                state.generation += 1;
                info!(cycles = state.cycles, "carousel stopped");
            }
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Run one cycle boundary immediately, as the timer would
    pub fn step(&self) -> Option<Cover> {
        let mut state = lock(&self.state);
        state.cycle(&self.pool, self.period, &self.events)
    }

    /// Check if the cycle task is active
    pub fn is_running(&self) -> bool {
        lock(&self.state).running
    }

    /// Snapshot of the visible covers
    pub fn window(&self) -> CoverWindow {
        lock(&self.state).window.clone()
    }

    /// Number of completed cycles since creation
    pub fn cycles(&self) -> u64 {
        lock(&self.state).cycles
    }

    /// Viewport width passed to the last `start`
    pub fn viewport_width(&self) -> f64 {
        lock(&self.state).viewport_width
    }

    /// Duration of one cycle
    pub fn period(&self) -> Duration {
        self.period
    }

    /// The cover pool in use
    pub fn pool(&self) -> &CoverPool {
        &self.pool
    }
}

impl Drop for CarouselEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_cycles(
    pool: Arc<CoverPool>,
    state: Arc<Mutex<CarouselState>>,
    events: broadcast::Sender<CarouselEvent>,
    period: Duration,
    generation: u64,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let keep_going = {
            let mut guard = lock(&state);
            if guard.running && guard.generation == generation {
                guard.cycle(&pool, period, &events);
                true
            } else {
                false
            }
        };

        if !keep_going {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tokio::sync::broadcast::error::TryRecvError;

    fn seeded(seed: u64) -> CarouselSettings {
        CarouselSettings {
            cycle: DEFAULT_CYCLE,
            seed: Some(seed),
        }
    }

    fn drain(rx: &mut broadcast::Receiver<CarouselEvent>) -> Vec<CarouselEvent> {
        let mut events = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        events
    }

    fn window_changes(events: &[CarouselEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, CarouselEvent::WindowChanged { .. }))
            .count()
    }

    #[test]
    fn test_engine_creation() {
        let engine = CarouselEngine::new(CoverPool::standard(), CarouselSettings::default());
        assert!(!engine.is_running());
        assert_eq!(engine.window(), CoverWindow::default());
        assert_eq!(engine.cycles(), 0);
        assert_eq!(engine.period(), DEFAULT_CYCLE);
        assert_eq!(engine.pool().len(), 48);
    }

    #[test]
    fn test_window_drawn_from_configured_pool() {
        let pool = CoverPool::numbered("disc", 12);
        let engine = CarouselEngine::new(pool, seeded(3));
        assert!(engine.window().iter().all(|c| engine.pool().contains(c)));

        for _ in 0..50 {
            engine.step();
            assert!(engine.window().iter().all(|c| engine.pool().contains(c)));
        }
    }

    #[test]
    fn test_step_keeps_window_distinct() {
        let engine = CarouselEngine::new(CoverPool::standard(), seeded(5));
        for _ in 0..200 {
            let before = engine.window();
            let inserted = engine.step().unwrap();
            assert!(!before.contains(&inserted));

            let window = engine.window();
            let unique: HashSet<&Cover> = window.iter().collect();
            assert_eq!(unique.len(), 5);
        }
        assert_eq!(engine.cycles(), 200);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let a = CarouselEngine::new(CoverPool::standard(), seeded(99));
        let b = CarouselEngine::new(CoverPool::standard(), seeded(99));
        for _ in 0..20 {
            assert_eq!(a.step(), b.step());
        }
        assert_eq!(a.window(), b.window());
    }

    #[test]
    fn test_stop_when_idle_is_harmless() {
        let mut engine = CarouselEngine::new(CoverPool::standard(), seeded(1));
        engine.stop();
        engine.stop();
        assert!(!engine.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_updates_window_each_period() {
        let mut engine = CarouselEngine::new(CoverPool::standard(), seeded(3));
        let mut rx = engine.subscribe();

        engine.start(400.0);
        assert!(engine.is_running());
        assert_eq!(engine.viewport_width(), 400.0);

        time::sleep(Duration::from_millis(6100)).await;
        assert_eq!(engine.cycles(), 3);

        let events = drain(&mut rx);
        assert_eq!(window_changes(&events), 3);

        match events.first() {
            Some(CarouselEvent::CycleStarted { cycle, animation }) => {
                assert_eq!(*cycle, 0);
                assert_eq!(animation.target, 200.0);
                assert_eq!(animation.duration, DEFAULT_CYCLE);
            }
            other => panic!("expected initial CycleStarted, got {:?}", other),
        }

        engine.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent() {
        let mut engine = CarouselEngine::new(CoverPool::standard(), seeded(8));
        engine.start(300.0);
        engine.start(300.0);
        engine.start(999.0);
        assert_eq!(engine.viewport_width(), 300.0);

        time::sleep(Duration::from_millis(4100)).await;
        // A second task would have doubled this
        assert_eq!(engine.cycles(), 2);
        engine.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_updates_after_stop() {
        let mut engine = CarouselEngine::new(CoverPool::standard(), seeded(4));
        let mut rx = engine.subscribe();

        engine.start(200.0);
        time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(engine.cycles(), 1);

        engine.stop();
        let window = engine.window();
        drain(&mut rx);

        time::sleep(Duration::from_secs(20)).await;
        assert_eq!(engine.cycles(), 1);
        assert_eq!(engine.window(), window);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_preempts_pending_tick() {
        let mut engine = CarouselEngine::new(CoverPool::standard(), seeded(4));
        engine.start(200.0);
        time::sleep(Duration::from_millis(1999)).await;
        engine.stop();
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(engine.cycles(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_stop() {
        let mut engine = CarouselEngine::new(CoverPool::standard(), seeded(6));
        engine.start(200.0);
        time::sleep(Duration::from_millis(2100)).await;
        engine.stop();

        engine.start(200.0);
        assert!(engine.is_running());
        time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(engine.cycles(), 2);
        engine.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_degenerate_pool_ticks_are_noops() {
        let pool = CoverPool::from_covers(["album0", "album1"]);
        let mut engine = CarouselEngine::new(pool, seeded(2));
        let mut rx = engine.subscribe();

        engine.start(100.0);
        time::sleep(Duration::from_secs(21)).await;
        engine.stop();

        assert_eq!(engine.cycles(), 10);
        assert_eq!(engine.window(), CoverWindow::default());
        assert_eq!(window_changes(&drain(&mut rx)), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_engine() {
        let pool = CoverPool::standard();
        let engine = CarouselEngine::new(pool, seeded(2));
        let mut rx = engine.subscribe();
        {
            let mut engine = engine;
            engine.start(100.0);
        }
        drain(&mut rx);
        time::sleep(Duration::from_secs(10)).await;
        assert!(drain(&mut rx).is_empty());
    }
}
