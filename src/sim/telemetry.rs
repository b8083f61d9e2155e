//! Telemetry adapter
//!
//! Maps normalized per-asset telemetry onto the physical constants of one
//! spinner. Pure: no side effects and no failure modes. Missing telemetry
//! resolves to the neutral vector, which sets baseline combat parity.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::{clamp01, ease_out};

/// Market regime bias, selects the drive-direction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Orbit with a slight inward pull
    #[default]
    Range,
    /// Mostly tangential, drifting outward, with noise
    Chaotic,
    /// Any other regime: pure tangential drive
    #[serde(other)]
    Other,
}

/// Raw telemetry for one asset; every scalar is expected in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Telemetry {
    pub thrust_potential: f32,
    pub maneuver_stability: f32,
    pub hull_resilience: f32,
    pub chop_sensitivity: f32,
    pub signal_clarity: f32,
    pub volume_reliability: f32,
    pub regime_bias: Regime,
}

impl Default for Telemetry {
    /// The neutral vector used when a ticker has no telemetry
    fn default() -> Self {
        Self {
            thrust_potential: 0.5,
            maneuver_stability: 0.5,
            hull_resilience: 0.5,
            chop_sensitivity: 0.5,
            signal_clarity: 0.5,
            volume_reliability: 0.6,
            regime_bias: Regime::Range,
        }
    }
}

impl Telemetry {
    /// Copy with every scalar clamped to [0, 1] (NaN passes through)
    pub fn normalized(&self) -> Self {
        Self {
            thrust_potential: clamp01(self.thrust_potential),
            maneuver_stability: clamp01(self.maneuver_stability),
            hull_resilience: clamp01(self.hull_resilience),
            chop_sensitivity: clamp01(self.chop_sensitivity),
            signal_clarity: clamp01(self.signal_clarity),
            volume_reliability: clamp01(self.volume_reliability),
            regime_bias: self.regime_bias,
        }
    }
}

/// Constants derived once per spinner and immutable for the match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    pub mass: f32,
    pub radius: f32,
    pub vmax: f32,
    /// Reference spin magnitude at launch
    pub omega0: f32,
    pub stability: f32,
}

/// Derive physical constants from telemetry
pub fn derive_spinner(telemetry: &Telemetry) -> PhysicalConstants {
    let t = telemetry.normalized();
    let thrust = t.thrust_potential;
    let maneuver = t.maneuver_stability;
    let hull = t.hull_resilience;
    let chop = t.chop_sensitivity;
    let signal = t.signal_clarity;
    let volume = t.volume_reliability;

    PhysicalConstants {
        mass: 0.8 + 1.4 * (0.75 * ease_out(hull) + 0.25 * ease_out(volume)),
        radius: 18.0 + 10.0 * (0.6 * hull + 0.4 * (1.0 - maneuver)),
        omega0: 10.0 + 38.0 * ease_out(thrust),
        vmax: 120.0 + 260.0 * (0.55 * ease_out(thrust) + 0.45 * (1.0 - ease_out(chop))),
        stability: clamp01(0.55 * maneuver + 0.25 * signal + 0.20 * volume - 0.35 * chop),
    }
}

/// Where telemetry comes from; `None` means the neutral defaults apply
pub trait TelemetrySource {
    fn telemetry(&self, ticker: &str) -> Option<Telemetry>;

    /// Telemetry for a ticker, falling back to the neutral vector
    fn telemetry_or_default(&self, ticker: &str) -> Telemetry {
        self.telemetry(ticker).unwrap_or_default()
    }
}

impl TelemetrySource for HashMap<String, Telemetry> {
    fn telemetry(&self, ticker: &str) -> Option<Telemetry> {
        self.get(ticker).copied()
    }
}

/// Source with no telemetry at all: every ticker gets the defaults
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTelemetry;

impl TelemetrySource for NoTelemetry {
    fn telemetry(&self, _ticker: &str) -> Option<Telemetry> {
        None
    }
}

/// Telemetry keyed by ticker, as stored on disk
///
/// ```json
/// { "NVDA": { "thrustPotential": 0.8, "regimeBias": "chaotic" } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TelemetryBook {
    pub entries: BTreeMap<String, Telemetry>,
}

impl TelemetryBook {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let book = Self::from_json(&json)?;
        log::info!("Loaded telemetry for {} tickers", book.entries.len());
        Ok(book)
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl TelemetrySource for TelemetryBook {
    fn telemetry(&self, ticker: &str) -> Option<Telemetry> {
        self.entries.get(ticker).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_defaults() {
        let t = NoTelemetry.telemetry_or_default("ZZZ");
        assert_eq!(t.thrust_potential, 0.5);
        assert_eq!(t.maneuver_stability, 0.5);
        assert_eq!(t.hull_resilience, 0.5);
        assert_eq!(t.chop_sensitivity, 0.5);
        assert_eq!(t.signal_clarity, 0.5);
        assert_eq!(t.volume_reliability, 0.6);
        assert_eq!(t.regime_bias, Regime::Range);
    }

    #[test]
    fn test_neutral_constants() {
        let c = derive_spinner(&Telemetry::default());
        // 0.55*0.5 + 0.25*0.5 + 0.20*0.6 - 0.35*0.5
        assert!((c.stability - 0.345).abs() < 1e-5);
        // 0.8 + 1.4 * (0.75*0.75 + 0.25*0.84)
        assert!((c.mass - 1.8815).abs() < 1e-4);
        assert!((c.radius - 23.0).abs() < 1e-4);
        assert!((c.omega0 - 38.5).abs() < 1e-4);
        assert!((c.vmax - 256.5).abs() < 1e-3);
    }

    #[test]
    fn test_extremes_stay_positive() {
        let weak = Telemetry {
            thrust_potential: 0.0,
            maneuver_stability: 0.0,
            hull_resilience: 0.0,
            chop_sensitivity: 1.0,
            signal_clarity: 0.0,
            volume_reliability: 0.0,
            regime_bias: Regime::Chaotic,
        };
        let c = derive_spinner(&weak);
        assert!((c.mass - 0.8).abs() < 1e-6);
        assert!((c.vmax - 120.0).abs() < 1e-4);
        assert!((c.omega0 - 10.0).abs() < 1e-6);
        assert_eq!(c.stability, 0.0);
    }

    #[test]
    fn test_out_of_range_inputs_clamped() {
        let wild = Telemetry {
            thrust_potential: 3.0,
            hull_resilience: -2.0,
            ..Telemetry::default()
        };
        let c = derive_spinner(&wild);
        assert!((c.omega0 - 48.0).abs() < 1e-4);
        assert!(c.mass >= 0.8);
    }

    #[test]
    fn test_book_partial_entries_and_unknown_regime() {
        let book = TelemetryBook::from_json(
            r#"{
                "AAPL": { "thrustPotential": 0.9, "regimeBias": "chaotic" },
                "TSLA": { "regimeBias": "trend" }
            }"#,
        )
        .expect("valid book");

        let aapl = book.telemetry("AAPL").expect("present");
        assert_eq!(aapl.thrust_potential, 0.9);
        assert_eq!(aapl.volume_reliability, 0.6);
        assert_eq!(aapl.regime_bias, Regime::Chaotic);

        let tsla = book.telemetry("TSLA").expect("present");
        assert_eq!(tsla.regime_bias, Regime::Other);
        assert!(book.telemetry("MSFT").is_none());
    }
}
