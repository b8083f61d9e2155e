//! Match orchestration
//!
//! A [`Match`] owns every spinner and effect of one battle. The caller's
//! frame clock drives [`Match::tick`]; each tick runs to completion:
//! trails and integration, pairwise collisions, effects, then the win check.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::resolve;
use super::events::{ImpactSource, SimEvent};
use super::integrate::integrate;
use super::rng::RngState;
use super::state::{Arena, Elimination, Spinner};
use super::telemetry::{Telemetry, TelemetrySource};
use crate::consts::{LAUNCH_INWARD, LAUNCH_TANGENT, SPAWN_RING};
use crate::cues::{EventSink, banner_text};
use crate::error::SimError;
use crate::fx::EffectsSystem;
use crate::settings::Settings;
use crate::view::{EffectsView, FrameView, SpinnerView};

/// Stream offset so effect randomness never shifts the physics draws
const FX_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;
/// Golden angle in degrees, spreads hues apart
const HUE_STEP: f32 = 137.508;

/// Where a match is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// No spinners loaded
    Idle,
    Running,
    /// Winner ticker, or None when nobody survived
    Terminated { winner: Option<String> },
}

/// One battle: arena, effects, randomness and the event buffer
pub struct Match<R = Pcg32> {
    pub settings: Settings,
    pub arena: Arena,
    pub effects: EffectsSystem,
    pub phase: MatchPhase,
    /// Ticks simulated since the last start
    pub time_ticks: u64,
    rng: R,
    fx_rng: Pcg32,
    /// Tickers and telemetry of the current match, for rematch
    roster: Vec<(String, Telemetry)>,
    events: Vec<SimEvent>,
    stopped: bool,
}

impl Match<Pcg32> {
    /// Match seeded from `settings.seed`, or OS entropy when unset
    pub fn new(settings: Settings) -> Self {
        let state = settings
            .seed
            .map(RngState::new)
            .unwrap_or_else(RngState::from_entropy);
        log::info!("Match RNG seed: {}", state.seed);
        Self::build(settings, state.to_rng(), state.seed)
    }
}

impl<R: Rng> Match<R> {
    /// Match with an injected physics RNG
    pub fn with_rng(settings: Settings, rng: R) -> Self {
        let fx_seed = settings.seed.unwrap_or_default();
        Self::build(settings, rng, fx_seed)
    }

    fn build(settings: Settings, rng: R, fx_seed: u64) -> Self {
        Self {
            arena: Arena::new(Vec2::ZERO, settings.arena_radius),
            effects: EffectsSystem::new(&settings),
            phase: MatchPhase::Idle,
            time_ticks: 0,
            rng,
            fx_rng: Pcg32::seed_from_u64(fx_seed ^ FX_STREAM),
            roster: Vec::new(),
            events: Vec::new(),
            stopped: false,
            settings,
        }
    }

    /// Start a new match, replacing every spinner and effect
    ///
    /// Nothing changes if any spinner fails to build.
    pub fn start<S: AsRef<str>>(
        &mut self,
        tickers: &[S],
        source: &dyn TelemetrySource,
    ) -> Result<(), SimError> {
        let roster = tickers
            .iter()
            .map(|t| {
                let ticker = t.as_ref();
                (ticker.to_string(), source.telemetry_or_default(ticker))
            })
            .collect();
        self.launch(roster)
    }

    /// Restart with the same tickers and telemetry
    pub fn rematch(&mut self) -> Result<(), SimError> {
        if self.roster.is_empty() {
            return Err(SimError::NoRoster);
        }
        let roster = self.roster.clone();
        self.launch(roster)
    }

    /// Discard the match entirely
    pub fn close(&mut self) {
        self.arena.spinners.clear();
        self.effects.clear();
        self.events.clear();
        self.roster.clear();
        self.phase = MatchPhase::Idle;
        self.time_ticks = 0;
        log::info!("Match closed");
    }

    /// Ask the driver to stop scheduling ticks; an in-flight tick still finishes
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Whether the driver should schedule another tick
    pub fn should_schedule(&self) -> bool {
        !self.stopped && self.phase == MatchPhase::Running
    }

    fn launch(&mut self, roster: Vec<(String, Telemetry)>) -> Result<(), SimError> {
        if roster.len() < 2 {
            return Err(SimError::TooFewSpinners {
                count: roster.len(),
            });
        }
        self.settings.validate()?;
        let center = Vec2::ZERO;
        let radius = self.settings.arena_radius;
        let spinners = place_spinners(&roster, center, radius)?;

        // Everything below is infallible: the swap is all-or-nothing
        self.arena = Arena {
            center,
            radius,
            spinners,
        };
        self.effects = EffectsSystem::new(&self.settings);
        self.events.clear();
        self.time_ticks = 0;
        self.stopped = false;
        self.phase = MatchPhase::Running;
        self.effects.banner(center, "FIGHT!");

        let names: Vec<&str> = roster.iter().map(|(t, _)| t.as_str()).collect();
        log::info!("Match started: {}", names.join(" vs "));
        self.roster = roster;
        Ok(())
    }

    /// Advance the match by `dt` seconds; returns this tick's events in order
    pub fn tick(&mut self, dt: f32) -> &[SimEvent] {
        self.events.clear();
        if self.phase != MatchPhase::Running || !dt.is_finite() || dt <= 0.0 {
            return &self.events;
        }
        let dt = dt.min(self.settings.max_dt);
        if dt <= 0.0 {
            log::warn!("Ignoring tick: max_dt {} is not positive", self.settings.max_dt);
            return &self.events;
        }
        self.time_ticks += 1;

        let center = self.arena.center;
        let radius = self.arena.radius;

        for spinner in self.arena.spinners.iter_mut().filter(|s| s.alive()) {
            self.effects.push_trail(spinner.id, spinner.pos, spinner.hue);
            integrate(spinner, center, radius, dt, &mut self.rng, &mut self.events);
        }

        let n = self.arena.spinners.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = self.arena.pair_mut(i, j);
                let Some(hit) = resolve(a, b, &mut self.rng) else {
                    continue;
                };
                self.events.push(SimEvent::Impact {
                    pos: hit.point,
                    impact01: hit.impact01,
                    source: ImpactSource::Clash,
                });
                for (spinner, burst) in [(a, hit.burst_a), (b, hit.burst_b)] {
                    if burst && spinner.eliminate(Elimination::Burst) {
                        self.events.push(SimEvent::Burst {
                            id: spinner.id,
                            pos: spinner.pos,
                            hue: spinner.hue,
                        });
                    }
                }
            }
        }

        route_effects(&mut self.effects, &self.events, &mut self.fx_rng);
        self.effects.update(dt);

        if self.arena.alive_count() <= 1 {
            let winner = self.arena.alive().next().map(|s| s.ticker.clone());
            let end = SimEvent::MatchEnd {
                winner: winner.clone(),
            };
            if let Some(text) = banner_text(&end) {
                self.effects.banner(center, &text);
            }
            log::info!(
                "Match over after {} ticks: {}",
                self.time_ticks,
                winner.as_deref().unwrap_or("no winner")
            );
            self.events.push(end);
            self.phase = MatchPhase::Terminated { winner };
        }

        &self.events
    }

    /// Tick, then hand every event to `sink` in order
    pub fn tick_with(&mut self, dt: f32, sink: &mut dyn EventSink) {
        self.tick(dt);
        for event in &self.events {
            sink.on_event(event);
        }
    }

    /// Events from the most recent tick
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.phase, MatchPhase::Terminated { .. })
    }

    /// Snapshots of every live spinner
    pub fn spinner_views(&self) -> Vec<SpinnerView> {
        self.arena.alive().map(SpinnerView::from).collect()
    }

    pub fn effects_view(&self) -> EffectsView<'_> {
        EffectsView::from(&self.effects)
    }

    pub fn frame(&self) -> FrameView<'_> {
        FrameView {
            center: self.arena.center,
            arena_radius: self.arena.radius,
            spinners: self.spinner_views(),
            effects: self.effects_view(),
        }
    }

    /// Camera offset for the current screen shake
    pub fn shake_offset(&mut self) -> Vec2 {
        self.effects.shake_offset(&mut self.fx_rng)
    }
}

/// Evenly spaced on the spawn ring, launched inward with an orbit tangent
fn place_spinners(
    roster: &[(String, Telemetry)],
    center: Vec2,
    arena_radius: f32,
) -> Result<Vec<Spinner>, SimError> {
    let count = roster.len();
    roster
        .iter()
        .enumerate()
        .map(|(i, (ticker, telemetry))| {
            let mut spinner = Spinner::new(i as u32 + 1, ticker.as_str(), telemetry)?;
            let outward = Vec2::from_angle(TAU * i as f32 / count as f32);
            spinner.pos = center + outward * arena_radius * SPAWN_RING;
            spinner.vel = -outward * LAUNCH_INWARD + outward.perp() * LAUNCH_TANGENT;
            spinner.hue = (i as f32 * HUE_STEP).rem_euclid(360.0);
            Ok(spinner)
        })
        .collect()
}

/// Spawn effects for this tick's events
fn route_effects<R: Rng + ?Sized>(effects: &mut EffectsSystem, events: &[SimEvent], rng: &mut R) {
    for event in events {
        match event {
            SimEvent::Impact { pos, impact01, .. } => effects.impact(*pos, *impact01, rng),
            SimEvent::Burst { pos, hue, .. } => effects.burst(*pos, *hue, rng),
            SimEvent::RingOut { pos, .. } => effects.ring_out(*pos),
            SimEvent::SpinOut { pos, .. } => effects.spin_out(*pos),
            SimEvent::MatchEnd { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::sim::state::Fate;
    use crate::sim::telemetry::NoTelemetry;
    use std::collections::HashMap;

    fn running(tickers: &[&str]) -> Match {
        let mut m = Match::new(Settings::seeded(12345));
        m.start(tickers, &NoTelemetry).expect("valid roster");
        m
    }

    #[test]
    fn test_start_places_two_symmetrically() {
        let m = running(&["AAA", "BBB"]);
        assert_eq!(m.phase, MatchPhase::Running);
        let a = &m.arena.spinners[0];
        let b = &m.arena.spinners[1];
        let ring = m.settings.arena_radius * SPAWN_RING;
        assert!((a.pos - Vec2::new(ring, 0.0)).length() < 1e-3);
        assert!((b.pos - Vec2::new(-ring, 0.0)).length() < 1e-3);
        assert!((a.vel + b.vel).length() < 1e-3);
        assert_ne!(a.hue, b.hue);
    }

    #[test]
    fn test_start_needs_two() {
        let mut m = Match::new(Settings::seeded(1));
        let err = m.start(&["SOLO"], &NoTelemetry).unwrap_err();
        assert!(matches!(err, SimError::TooFewSpinners { count: 1 }));
        assert_eq!(m.phase, MatchPhase::Idle);
    }

    #[test]
    fn test_failed_start_keeps_previous_match() {
        let mut m = running(&["AAA", "BBB"]);
        for _ in 0..10 {
            m.tick(FRAME_DT);
        }
        let ticks = m.time_ticks;

        let mut book = HashMap::new();
        book.insert(
            "BAD".to_string(),
            Telemetry {
                thrust_potential: f32::NAN,
                ..Telemetry::default()
            },
        );
        assert!(m.start(&["AAA", "BAD"], &book).is_err());
        assert_eq!(m.time_ticks, ticks);
        assert_eq!(m.arena.spinners[1].ticker, "BBB");
        assert_eq!(m.phase, MatchPhase::Running);
    }

    #[test]
    fn test_rematch_replaces_everything() {
        let mut m = running(&["AAA", "BBB"]);
        for _ in 0..60 {
            m.tick(FRAME_DT);
        }
        assert!(!m.effects.trails().is_empty());

        m.rematch().expect("roster present");
        assert_eq!(m.time_ticks, 0);
        assert!(m.events().is_empty());
        assert!(m.effects.trails().is_empty());
        assert!(m.effects.particles().is_empty());
        assert_eq!(m.effects.callouts().len(), 1, "only the start banner");
        for s in &m.arena.spinners {
            assert!(s.alive());
            assert_eq!(s.coherence, 1.0);
            assert_eq!(s.omega, s.constants.omega0);
        }
    }

    #[test]
    fn test_rematch_without_roster() {
        let mut m = Match::new(Settings::seeded(1));
        assert!(matches!(m.rematch(), Err(SimError::NoRoster)));
    }

    #[test]
    fn test_close_discards_state() {
        let mut m = running(&["AAA", "BBB"]);
        m.tick(FRAME_DT);
        m.close();
        assert_eq!(m.phase, MatchPhase::Idle);
        assert!(m.arena.spinners.is_empty());
        assert!(m.effects.is_idle());
        assert!(m.tick(FRAME_DT).is_empty());
        assert!(matches!(m.rematch(), Err(SimError::NoRoster)));
    }

    #[test]
    fn test_dt_clamped_to_max_step() {
        let mut long = running(&["AAA", "BBB"]);
        let mut capped = running(&["AAA", "BBB"]);
        long.tick(5.0);
        capped.tick(long.settings.max_dt);
        assert_eq!(long.arena.spinners[0].pos, capped.arena.spinners[0].pos);
    }

    #[test]
    fn test_bad_dt_is_noop() {
        let mut m = running(&["AAA", "BBB"]);
        let before = m.arena.spinners[0].pos;
        assert!(m.tick(f32::NAN).is_empty());
        assert!(m.tick(0.0).is_empty());
        assert!(m.tick(-1.0).is_empty());
        assert_eq!(m.arena.spinners[0].pos, before);
        assert_eq!(m.time_ticks, 0);
    }

    #[test]
    fn test_stop_blocks_scheduling() {
        let mut m = running(&["AAA", "BBB"]);
        assert!(m.should_schedule());
        m.stop();
        assert!(!m.should_schedule());
        // An explicit tick still completes
        m.tick(FRAME_DT);
        assert_eq!(m.time_ticks, 1);
        m.rematch().expect("roster present");
        assert!(m.should_schedule());
    }

    #[test]
    fn test_burst_flag_eliminates_and_ends_match() {
        let mut m = Match::with_rng(Settings::seeded(3), crate::sim::rng::ConstRng(0));
        m.start(&["AAA", "BBB"], &NoTelemetry).expect("valid");
        {
            let (a, b) = m.arena.pair_mut(0, 1);
            a.pos = Vec2::ZERO;
            b.pos = Vec2::new(40.0, 0.0);
            a.vel = Vec2::new(150.0, 0.0);
            b.vel = Vec2::new(-150.0, 0.0);
            a.coherence = 0.09;
        }
        let events = m.tick(FRAME_DT).to_vec();
        assert!(events.iter().any(|e| matches!(e, SimEvent::Burst { id: 1, .. })));
        assert_eq!(m.arena.spinners[0].fate, Fate::Removed(Elimination::Burst));
        assert_eq!(
            events.last(),
            Some(&SimEvent::MatchEnd {
                winner: Some("BBB".to_string())
            })
        );
        assert!(m.is_terminated());
    }

    #[test]
    fn test_views_only_show_alive() {
        let mut m = running(&["AAA", "BBB", "CCC"]);
        m.arena.spinners[1].eliminate(Elimination::SpinOut);
        let views = m.spinner_views();
        assert_eq!(views.len(), 2);
        assert!(views.iter().all(|v| v.ticker != "BBB"));
        let frame = m.frame();
        assert_eq!(frame.spinners.len(), 2);
        assert_eq!(frame.arena_radius, m.settings.arena_radius);
    }

    #[test]
    fn test_start_rejects_invalid_settings() {
        for settings in [
            Settings {
                arena_radius: -50.0,
                ..Settings::seeded(1)
            },
            Settings {
                arena_radius: f32::INFINITY,
                ..Settings::seeded(1)
            },
            Settings {
                max_dt: -0.02,
                ..Settings::seeded(1)
            },
        ] {
            let mut m = Match::new(settings);
            let err = m.start(&["AAA", "BBB"], &NoTelemetry).unwrap_err();
            assert!(matches!(err, SimError::InvalidSettings { .. }));
            assert_eq!(m.phase, MatchPhase::Idle);
        }
    }

    #[test]
    fn test_negative_max_dt_after_start_never_spins_up() {
        let mut m = running(&["AAA", "BBB"]);
        m.settings.max_dt = -0.02;
        let omega = m.arena.spinners[0].omega;
        assert!(m.tick(FRAME_DT).is_empty());
        assert_eq!(m.arena.spinners[0].omega, omega);
        assert_eq!(m.time_ticks, 0);
    }

    #[test]
    fn test_lost_spinner_still_ends_match() {
        let mut m = running(&["AAA", "BBB"]);
        m.arena.spinners[0].pos = Vec2::new(f32::NAN, 0.0);
        let events = m.tick(FRAME_DT).to_vec();
        assert_eq!(m.arena.spinners[0].fate, Fate::Removed(Elimination::RingOut));
        assert!(m.arena.spinners[0].pos.is_finite());
        assert!(events.contains(&SimEvent::RingOut {
            id: 1,
            pos: Vec2::ZERO
        }));
        assert_eq!(
            m.phase,
            MatchPhase::Terminated {
                winner: Some("BBB".to_string())
            }
        );
        assert!(m.effects.rings().iter().all(|r| r.center.is_finite()));
    }

    #[test]
    fn test_shake_offset_bounded_by_amplitude() {
        let mut m = running(&["AAA", "BBB"]);
        assert_eq!(m.shake_offset(), Vec2::ZERO);
        m.effects.add_shake(10.0, 0.2);
        let amplitude = m.effects.shake().amplitude;
        assert_eq!(amplitude, 10.0);
        for _ in 0..50 {
            assert!(m.shake_offset().length() <= amplitude + 1e-4);
        }

        let mut calm = Match::new(Settings {
            reduced_motion: true,
            ..Settings::seeded(1)
        });
        calm.start(&["AAA", "BBB"], &NoTelemetry).expect("valid roster");
        calm.effects.add_shake(10.0, 0.2);
        assert_eq!(calm.shake_offset(), Vec2::ZERO);
    }

    #[test]
    fn test_tick_with_forwards_events() {
        let mut m = running(&["AAA", "BBB"]);
        m.arena.spinners[0].omega = 0.5;
        let mut sink: Vec<SimEvent> = Vec::new();
        m.tick_with(FRAME_DT, &mut sink);
        assert_eq!(sink.as_slice(), m.events());
        assert!(matches!(sink.last(), Some(SimEvent::MatchEnd { .. })));
    }
}
