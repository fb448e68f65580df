//! Phase controller: the click → sneeze → reaction → next-flower sequence.
//!
//! A sequence is a chain of timed steps on a `Timeline`. Each step mutates
//! `GameProgress` once and publishes a `Snapshot`, so observers see every
//! intermediate state even when one frame fires several steps. The lock keeps
//! a second sequence from starting while one is running.

use bloom_engine::{Particle, ParticleBurst, Subject, SubscriptionId, Timeline, TimerId, Vec2};
use serde::Serialize;

use crate::assets::AssetId;
use crate::config::PlayConfig;
use crate::pointer::{hits_square, is_near, PointerTracker};
use crate::script::{PhaseDefinition, PhaseScript};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButterflyMood {
    Happy,
    Sneezing,
    Sad,
    Surprised,
}

impl ButterflyMood {
    pub fn asset(self) -> AssetId {
        match self {
            ButterflyMood::Happy => AssetId::ButterflyHappy,
            ButterflyMood::Sneezing => AssetId::ButterflySneezing,
            ButterflyMood::Sad => AssetId::ButterflySad,
            ButterflyMood::Surprised => AssetId::ButterflySurprised,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceState {
    Idle,
    DialogueInitial,
    Sneezing,
    ParticlesActive,
    DialogueReaction,
    Resolving,
    GameComplete,
}

/// What the player sees of the story so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameProgress {
    pub phase_index: usize,
    pub flower_asset: AssetId,
    pub dialogue: Option<String>,
    pub mood: ButterflyMood,
}

impl GameProgress {
    fn start(first: &PhaseDefinition) -> Self {
        Self {
            phase_index: 0,
            flower_asset: first.initial_asset,
            dialogue: None,
            mood: ButterflyMood::Happy,
        }
    }
}

/// Read-only view published after every state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase_index: usize,
    pub state: SequenceState,
    pub flower_asset: AssetId,
    pub dialogue: Option<String>,
    pub mood: ButterflyMood,
    pub pointer: Vec2,
    pub particles: Vec<Particle>,
    pub interaction_locked: bool,
    pub is_near: bool,
}

/// Cross-screen notifications, drained by the owner each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerSignal {
    PhaseAdvanced { from: usize, to: usize },
    GameComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Sneeze,
    Burst,
    React,
    Resolve,
    Advance,
    Finish,
    ClearParticles,
}

/// A step tagged with the run that scheduled it.
#[derive(Debug, Clone, Copy)]
struct Scheduled {
    run: u32,
    step: Step,
}

pub struct PhaseController {
    script: PhaseScript,
    config: PlayConfig,
    progress: GameProgress,
    state: SequenceState,
    locked: bool,
    pointer: PointerTracker,
    particles: ParticleBurst,
    timeline: Timeline<Scheduled>,
    sequence_timer: Option<TimerId>,
    clear_timer: Option<TimerId>,
    run: u32,
    signals: Vec<ControllerSignal>,
    snapshots: Subject<Snapshot>,
}

impl PhaseController {
    pub fn new(script: PhaseScript, config: PlayConfig) -> Self {
        let progress = GameProgress::start(script.first());
        let pointer = PointerTracker::new(config.initial_pointer);
        Self {
            script,
            config,
            progress,
            state: SequenceState::Idle,
            locked: false,
            pointer,
            particles: ParticleBurst::new(),
            timeline: Timeline::new(),
            sequence_timer: None,
            clear_timer: None,
            run: 0,
            signals: Vec::new(),
            snapshots: Subject::new(),
        }
    }

    // -- Accessors --

    pub fn progress(&self) -> &GameProgress {
        &self.progress
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_complete(&self) -> bool {
        self.state == SequenceState::GameComplete
    }

    pub fn current_phase(&self) -> &PhaseDefinition {
        self.script
            .get(self.progress.phase_index)
            .unwrap_or_else(|| self.script.first())
    }

    pub fn script(&self) -> &PhaseScript {
        &self.script
    }

    pub fn config(&self) -> &PlayConfig {
        &self.config
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn particles(&self) -> &ParticleBurst {
        &self.particles
    }

    /// Milliseconds since the current burst spawned.
    pub fn particle_age_ms(&self) -> Option<f64> {
        self.particles.age_ms(self.timeline.now_ms())
    }

    pub fn now_ms(&self) -> f64 {
        self.timeline.now_ms()
    }

    pub fn pending_timers(&self) -> usize {
        self.timeline.pending_count()
    }

    /// Pointer is close enough to the current flower to highlight it.
    pub fn is_near(&self) -> bool {
        is_near(
            self.pointer.position(),
            self.current_phase().position,
            self.config.near_radius,
        )
    }

    /// Published-snapshot counter, for hosts that poll instead of subscribing.
    pub fn version(&self) -> u64 {
        self.snapshots.version()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase_index: self.progress.phase_index,
            state: self.state,
            flower_asset: self.progress.flower_asset,
            dialogue: self.progress.dialogue.clone(),
            mood: self.progress.mood,
            pointer: self.pointer.position(),
            particles: self.particles.as_slice().to_vec(),
            interaction_locked: self.locked,
            is_near: self.is_near(),
        }
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
        self.snapshots.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.snapshots.unsubscribe(id)
    }

    pub fn drain_signals(&mut self) -> Vec<ControllerSignal> {
        std::mem::take(&mut self.signals)
    }

    // -- Input --

    pub fn set_surface_origin(&mut self, origin: Vec2) {
        self.pointer.set_surface_origin(origin);
    }

    /// Raw pointer move in viewport coordinates.
    pub fn pointer_moved(&mut self, viewport: Vec2) {
        if self.pointer.on_move(viewport) {
            self.publish();
        }
    }

    /// Raw pointer press in viewport coordinates. Starts the sequence when it
    /// lands on the current flower. Returns whether a sequence started.
    pub fn pointer_pressed(&mut self, viewport: Vec2) -> bool {
        let scene = self.pointer.to_scene(viewport);
        let on_flower = self
            .current_phase()
            .position
            .is_some_and(|center| hits_square(scene, center, self.config.flower_size));
        on_flower && self.trigger()
    }

    /// Start the current phase's sequence. A no-op while locked or after the
    /// game completed. Returns whether a sequence started.
    pub fn trigger(&mut self) -> bool {
        if self.locked || self.is_complete() {
            log::debug!("trigger ignored (state {:?})", self.state);
            return false;
        }

        let line = self.current_phase().initial_dialogue.clone();
        self.locked = true;
        self.pointer.set_frozen(true);
        self.progress.dialogue = Some(line);
        self.state = SequenceState::DialogueInitial;
        log::debug!("phase {}: sequence started", self.progress.phase_index);
        self.publish();

        self.schedule_next(self.config.timing.initial_dialogue_ms, Step::Sneeze);
        true
    }

    // -- Time --

    /// Advance the clock by `dt_ms`, running every step that falls due in
    /// order. Each step is timed from the previous step's due time, so large
    /// frames do not stretch the sequence.
    pub fn tick(&mut self, dt_ms: f64) {
        let until = self.timeline.now_ms() + dt_ms.max(0.0);
        while let Some((id, scheduled)) = self.timeline.pop_due(until) {
            if scheduled.run != self.run {
                continue;
            }
            if self.sequence_timer == Some(id) {
                self.sequence_timer = None;
            }
            if self.clear_timer == Some(id) {
                self.clear_timer = None;
            }
            self.run_step(scheduled.step);
        }
        self.timeline.advance_to(until);
    }

    /// Back to the first phase with nothing pending. No timer from the
    /// previous run can fire afterwards.
    pub fn restart(&mut self) {
        self.shutdown();
        self.progress = GameProgress::start(self.script.first());
        self.state = SequenceState::Idle;
        self.locked = false;
        self.pointer.reset(self.config.initial_pointer);
        self.particles.clear();
        self.signals.clear();
        log::info!("controller restarted");
        self.publish();
    }

    /// Cancel everything scheduled. Called on restart and when the play
    /// screen is torn down.
    pub fn shutdown(&mut self) {
        for id in [self.sequence_timer.take(), self.clear_timer.take()].into_iter().flatten() {
            self.timeline.cancel(id);
        }
        let dropped = self.timeline.cancel_all();
        if dropped > 0 {
            log::debug!("cancelled {} stray timers", dropped);
        }
        self.run = self.run.wrapping_add(1);
    }

    fn schedule_next(&mut self, delay_ms: f64, step: Step) {
        let id = self.timeline.schedule(delay_ms, Scheduled { run: self.run, step });
        self.sequence_timer = Some(id);
    }

    fn run_step(&mut self, step: Step) {
        let timing = self.config.timing.clone();
        match step {
            Step::Sneeze => {
                self.progress.mood = ButterflyMood::Sneezing;
                self.state = SequenceState::Sneezing;
                self.publish();
                self.schedule_next(timing.sneeze_windup_ms, Step::Burst);
            }
            Step::Burst => {
                let origin = self.pointer.position();
                self.particles
                    .spawn(origin, self.config.particle_count, self.timeline.now_ms());
                if let Some(old) = self.clear_timer.take() {
                    self.timeline.cancel(old);
                }
                let clear = self.timeline.schedule(
                    timing.particle_clear_ms,
                    Scheduled { run: self.run, step: Step::ClearParticles },
                );
                self.clear_timer = Some(clear);
                self.state = SequenceState::ParticlesActive;
                log::debug!("sneeze burst of {} at {}", self.particles.len(), origin);
                self.publish();
                self.schedule_next(timing.particle_settle_ms, Step::React);
            }
            Step::ClearParticles => {
                self.particles.clear();
                self.publish();
            }
            Step::React => {
                let phase = self.current_phase();
                let (asset, line) = (phase.reaction_asset, phase.reaction_dialogue.clone());
                self.progress.flower_asset = asset;
                self.progress.dialogue = Some(line);
                self.state = SequenceState::DialogueReaction;
                self.publish();
                self.schedule_next(timing.reaction_ms, Step::Resolve);
            }
            Step::Resolve => {
                self.state = SequenceState::Resolving;
                if self.script.is_last(self.progress.phase_index) {
                    self.progress.mood = ButterflyMood::Happy;
                    self.publish();
                    self.schedule_next(timing.farewell_ms, Step::Finish);
                } else {
                    self.progress.mood = ButterflyMood::Sad;
                    self.publish();
                    self.schedule_next(timing.sad_ms, Step::Advance);
                }
            }
            Step::Advance => {
                let from = self.progress.phase_index;
                let to = from + 1;
                let next_flower = match self.script.get(to) {
                    Some(next) => next.initial_asset,
                    None => {
                        log::error!("advance past last phase {}", from);
                        return;
                    }
                };
                self.progress.phase_index = to;
                self.progress.flower_asset = next_flower;
                self.progress.dialogue = None;
                self.progress.mood = ButterflyMood::Happy;
                self.state = SequenceState::Idle;
                self.locked = false;
                self.pointer.set_frozen(false);
                log::info!("phase {} -> {}", from, to);
                self.signals.push(ControllerSignal::PhaseAdvanced { from, to });
                self.publish();
            }
            Step::Finish => {
                self.state = SequenceState::GameComplete;
                log::info!("game complete");
                self.signals.push(ControllerSignal::GameComplete);
                self.publish();
            }
        }
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.snapshots.publish(&snapshot);
    }
}
