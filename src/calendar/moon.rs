//! Moons - cycles, phases and the per-day moon state
//!
//! A moon's phase fraction is `((epoch_day - offset) / cycle) mod 1`:
//! 0.0 = new, 0.5 = full, approaching 1.0 = new again.

use serde::{Deserialize, Serialize};

use crate::core::types::EpochDay;

/// A moon as defined by the calendar author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moon {
    pub name: String,
    /// Length of one full cycle in days
    pub cycle: f64,
    /// Days after the epoch of the first new moon
    #[serde(default)]
    pub offset: f64,
    #[serde(default = "default_face")]
    pub face_color: String,
    #[serde(default = "default_shadow")]
    pub shadow_color: String,
    #[serde(default)]
    pub hidden: bool,
}

fn default_face() -> String {
    "#ffffff".into()
}

fn default_shadow() -> String {
    "#292b4a".into()
}

impl Moon {
    pub fn new(name: impl Into<String>, cycle: f64, offset: f64) -> Self {
        Self {
            name: name.into(),
            cycle,
            offset,
            face_color: default_face(),
            shadow_color: default_shadow(),
            hidden: false,
        }
    }
}

/// The eight named phases, in cycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    pub const ALL: [MoonPhase; 8] = [
        MoonPhase::NewMoon,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::FullMoon,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    /// Nearest named phase for a cycle fraction in `[0, 1)`
    pub fn from_fraction(fraction: f64) -> Self {
        let slot = (fraction.rem_euclid(1.0) * 8.0).round() as usize % 8;
        Self::ALL[slot]
    }

    pub fn name(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

/// Cycle fraction of a moon on an epoch day
pub fn calculate_moon_phase(epoch_day: EpochDay, cycle: f64, offset: f64) -> f64 {
    if cycle <= 0.0 {
        return 0.0;
    }
    ((epoch_day as f64 - offset) / cycle).rem_euclid(1.0)
}

/// State of one moon on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonState {
    /// Index into the calendar's moon list
    pub moon: usize,
    pub name: String,
    /// 0.0 = new, 0.5 = full, 1.0 = new again
    pub fraction: f64,
    pub phase: MoonPhase,
}

impl MoonState {
    pub fn new(index: usize, moon: &Moon, epoch_day: EpochDay) -> Self {
        let fraction = calculate_moon_phase(epoch_day, moon.cycle, moon.offset);
        Self {
            moon: index,
            name: moon.name.clone(),
            fraction,
            phase: MoonPhase::from_fraction(fraction),
        }
    }

    /// Is the moon full? (fraction within 0.05 of 0.5)
    pub fn is_full(&self) -> bool {
        (self.fraction - 0.5).abs() < 0.05
    }

    /// Is the moon new? (fraction within 0.05 of 0.0 or 1.0)
    pub fn is_new(&self) -> bool {
        self.fraction < 0.05 || self.fraction > 0.95
    }

    /// Illuminated portion of the face (0.0 at new, 1.0 at full)
    pub fn illumination(&self) -> f64 {
        if self.fraction <= 0.5 {
            self.fraction * 2.0
        } else {
            (1.0 - self.fraction) * 2.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moon_phase_calculation() {
        assert!((calculate_moon_phase(0, 29.0, 0.0) - 0.0).abs() < 1e-9);
        assert!((calculate_moon_phase(14, 29.0, 0.0) - 14.0 / 29.0).abs() < 1e-9);
        let wrapped = calculate_moon_phase(29, 29.0, 0.0);
        assert!(wrapped < 0.05 || wrapped > 0.95);
    }

    #[test]
    fn test_negative_days_and_offset_wrap() {
        let phase = calculate_moon_phase(-1, 10.0, 0.0);
        assert!((phase - 0.9).abs() < 1e-9);
        let phase = calculate_moon_phase(5, 10.0, 5.0);
        assert!(phase.abs() < 1e-9);
        assert_eq!(calculate_moon_phase(5, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_phase_from_fraction() {
        assert_eq!(MoonPhase::from_fraction(0.0), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_fraction(0.5), MoonPhase::FullMoon);
        assert_eq!(MoonPhase::from_fraction(0.26), MoonPhase::FirstQuarter);
        assert_eq!(MoonPhase::from_fraction(0.97), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_fraction(0.85), MoonPhase::WaningCrescent);
    }

    #[test]
    fn test_moon_state() {
        let moon = Moon::new("Selune", 30.4375, 0.0);
        let state = MoonState::new(0, &moon, 0);
        assert!(state.is_new());
        assert!(!state.is_full());
        assert_eq!(state.phase, MoonPhase::NewMoon);

        let state = MoonState::new(0, &moon, 15);
        assert!(state.is_full());
        assert!(state.illumination() > 0.95);
    }
}
