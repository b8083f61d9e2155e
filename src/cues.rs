//! Collaborator cues
//!
//! Maps simulation events onto the sound cues and banner lines the audio and
//! UI layers play. This module only names them; it never touches an audio API.

use serde::{Deserialize, Serialize};

use crate::sim::events::{ImpactSource, SimEvent};

/// Sound cue for an event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cue {
    /// Spinners collided; intensity in [0, 1]
    Clash { intensity: f32 },
    /// Spinner bounced off the rim
    WallTap,
    /// Spinner fractured
    Burst,
    /// Spinner left the arena
    RingOut,
    /// Spinner lost its spin
    SpinOut,
    /// Match ended with a winner
    Victory,
    /// Match ended with nobody standing
    Draw,
}

impl Cue {
    pub fn for_event(event: &SimEvent) -> Self {
        match event {
            SimEvent::Impact {
                impact01,
                source: ImpactSource::Clash,
                ..
            } => Cue::Clash {
                intensity: *impact01,
            },
            SimEvent::Impact {
                source: ImpactSource::Wall,
                ..
            } => Cue::WallTap,
            SimEvent::Burst { .. } => Cue::Burst,
            SimEvent::RingOut { .. } => Cue::RingOut,
            SimEvent::SpinOut { .. } => Cue::SpinOut,
            SimEvent::MatchEnd { winner: Some(_) } => Cue::Victory,
            SimEvent::MatchEnd { winner: None } => Cue::Draw,
        }
    }

    /// Playback gain for the cue, scaled by intensity where it has one
    pub fn gain(&self) -> f32 {
        match self {
            Cue::Clash { intensity } => 0.35 + 0.65 * intensity.clamp(0.0, 1.0),
            Cue::WallTap => 0.25,
            Cue::Burst | Cue::Victory | Cue::Draw => 1.0,
            Cue::RingOut => 0.8,
            Cue::SpinOut => 0.6,
        }
    }
}

/// Banner line for match-level events
pub fn banner_text(event: &SimEvent) -> Option<String> {
    match event {
        SimEvent::MatchEnd { winner: Some(ticker) } => Some(format!("{ticker} WINS")),
        SimEvent::MatchEnd { winner: None } => Some("NO ONE WINS".to_string()),
        _ => None,
    }
}

/// Receives events as a tick emits them (audio, banners, telemetry logging)
pub trait EventSink {
    fn on_event(&mut self, event: &SimEvent);
}

impl EventSink for Vec<SimEvent> {
    fn on_event(&mut self, event: &SimEvent) {
        self.push(event.clone());
    }
}

/// Sink that logs each cue at debug level
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn on_event(&mut self, event: &SimEvent) {
        let cue = Cue::for_event(event);
        log::debug!("cue {:?} (gain {:.2})", cue, cue.gain());
        if let Some(text) = banner_text(event) {
            log::info!("{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_cue_mapping() {
        let clash = SimEvent::Impact {
            pos: Vec2::ZERO,
            impact01: 0.5,
            source: ImpactSource::Clash,
        };
        assert_eq!(Cue::for_event(&clash), Cue::Clash { intensity: 0.5 });

        let wall = SimEvent::Impact {
            pos: Vec2::ZERO,
            impact01: 0.22,
            source: ImpactSource::Wall,
        };
        assert_eq!(Cue::for_event(&wall), Cue::WallTap);

        let draw = SimEvent::MatchEnd { winner: None };
        assert_eq!(Cue::for_event(&draw), Cue::Draw);
    }

    #[test]
    fn test_banner_text() {
        let win = SimEvent::MatchEnd {
            winner: Some("NVDA".to_string()),
        };
        assert_eq!(banner_text(&win).as_deref(), Some("NVDA WINS"));
        assert_eq!(
            banner_text(&SimEvent::MatchEnd { winner: None }).as_deref(),
            Some("NO ONE WINS")
        );
        assert!(banner_text(&SimEvent::SpinOut { id: 1, pos: Vec2::ZERO }).is_none());
    }

    #[test]
    fn test_clash_gain_scales() {
        let soft = Cue::Clash { intensity: 0.0 }.gain();
        let hard = Cue::Clash { intensity: 1.0 }.gain();
        assert!(soft < hard);
        assert!((hard - 1.0).abs() < 1e-6);
    }
}
