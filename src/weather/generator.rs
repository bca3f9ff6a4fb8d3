//! Procedural weather generation
//!
//! Each day's weather is a pure function of the epoch day, the weather
//! seed, the seasonal data and an optional location override. Near season
//! boundaries the season data is eased toward the neighbouring season so
//! conditions drift instead of jumping.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

use crate::calendar::engine::CalendarEngine;
use crate::core::config::WeatherTuning;
use crate::core::types::{CalDate, EpochDay};
use crate::season::{self, SeasonState};
use crate::weather::archetype::{SeasonWeather, SeasonalWeatherData};
use crate::weather::location::Location;
use crate::weather::{
    CloudCover, Precipitation, PrecipitationKind, PrecipitationStrength, Temperature, Weather, Wind,
};

/// Cosine interpolation between `a` and `b`
pub fn cerp(a: f64, b: f64, t: f64) -> f64 {
    let eased = (1.0 - (std::f64::consts::PI * t).cos()) / 2.0;
    a + (b - a) * eased
}

fn blend(own: &SeasonalWeatherData, other: &SeasonalWeatherData, weight: f64) -> SeasonalWeatherData {
    own.lerp(other, cerp(0.0, 1.0, weight.clamp(0.0, 1.0)))
}

fn season_data(engine: &CalendarEngine, index: usize, location: Option<&Location>) -> SeasonalWeatherData {
    let Some(season) = engine.data().seasonal.seasons.get(index) else {
        return SeasonWeather::default().data();
    };
    location
        .and_then(|l| l.season_override(&season.id))
        .unwrap_or(season.weather)
        .data()
}

/// Season weather for the day described by `state`, eased toward the
/// previous or next season outside the season's weather window
///
/// The weight toward a neighbour reaches 0.5 at the season boundary, so
/// the last day of one season and the first day of the next meet in the
/// middle.
pub fn season_weather_data(engine: &CalendarEngine, state: &SeasonState, location: Option<&Location>) -> SeasonalWeatherData {
    let own = season_data(engine, state.season, location);
    let Some(season) = engine.data().seasonal.seasons.get(state.season) else {
        return own;
    };

    let offset = season.weather_offset as i64;
    let window_end = offset + season.weather_peak as i64;
    let days = state.days_passed;

    if days < offset {
        let previous = season_data(engine, state.previous, location);
        let weight = 0.5 * (1.0 - days as f64 / offset as f64);
        blend(&own, &previous, weight)
    } else if days > window_end && state.duration > window_end {
        let next = season_data(engine, state.next, location);
        let weight = 0.5 * (days - window_end) as f64 / (state.duration - window_end) as f64;
        blend(&own, &next, weight)
    } else {
        own
    }
}

/// Seed for one day's generator
///
/// The weather seed is mixed in twice so that epoch day 0 still depends
/// on it.
pub fn day_seed(epoch_day: EpochDay, seed: u64) -> u64 {
    (epoch_day as u64).wrapping_mul(seed) ^ seed
}

fn normal(rng: &mut ChaCha8Rng, mean: f64, spread: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + z * spread
}

/// Draw one day's weather from already interpolated season data
pub fn roll_weather(
    data: &SeasonalWeatherData,
    tuning: &WeatherTuning,
    seed: u64,
    epoch_day: EpochDay,
    prevailing_wind: f64,
) -> (Temperature, Precipitation, CloudCover, Wind) {
    let mut rng = ChaCha8Rng::seed_from_u64(day_seed(epoch_day, seed));

    let mut low = normal(&mut rng, data.temp_range[0], tuning.temperature_spread);
    let mut high = normal(&mut rng, data.temp_range[1], tuning.temperature_spread);
    if low > high {
        std::mem::swap(&mut low, &mut high);
    }
    let actual = normal(&mut rng, (low + high) / 2.0, (high - low) / 4.0).clamp(low, high);

    let chance = normal(&mut rng, data.precipitation_chance, tuning.precipitation_spread).clamp(0.0, 1.0);
    let strength = if rng.gen::<f64>() < chance {
        let intensity = normal(&mut rng, data.precipitation_intensity, tuning.intensity_spread).clamp(0.0, 1.0);
        PrecipitationStrength::from_intensity(intensity)
    } else {
        PrecipitationStrength::None
    };
    let precipitation = Precipitation {
        kind: if actual < 0.0 {
            PrecipitationKind::Snow
        } else {
            PrecipitationKind::Rain
        },
        strength,
    };

    let clouds = if strength != PrecipitationStrength::None {
        strength.cloud_cover()
    } else if rng.gen::<f64>() < data.cloudy {
        match rng.gen_range(0..3) {
            0 => CloudCover::Partly,
            1 => CloudCover::Mostly,
            _ => CloudCover::Overcast,
        }
    } else {
        CloudCover::Clear
    };

    let base_speed = normal(&mut rng, data.windy * tuning.max_wind_speed, tuning.wind_spread).abs();
    let wind = Wind {
        speed: base_speed * strength.wind_multiplier(),
        direction: normal(&mut rng, prevailing_wind, tuning.direction_jitter).rem_euclid(360.0),
    };

    let temperature = Temperature { low, high, actual };
    (temperature, precipitation, clouds, wind)
}

/// Weather for `date` in the season described by `state`
pub fn generate_for_season(
    engine: &CalendarEngine,
    date: CalDate,
    state: &SeasonState,
    location: Option<&Location>,
) -> Weather {
    let config = &engine.data().weather;
    let epoch_day = engine.days_before(date);
    let data = season_weather_data(engine, state, location);
    let prevailing = location
        .and_then(Location::prevailing_wind)
        .unwrap_or(config.prevailing_wind);

    let (temperature, precipitation, clouds, wind) =
        roll_weather(&data, &engine.config().weather, config.seed, epoch_day, prevailing);

    Weather {
        date,
        location: location.map(|l| l.id.clone()),
        season: Some(state.id.clone()),
        temperature,
        precipitation,
        clouds,
        wind,
        stored: false,
    }
}

/// Weather for `date`, or `None` when weather is disabled or the
/// calendar has no seasons
pub fn generate_weather(engine: &CalendarEngine, date: CalDate, location: Option<&Location>) -> Option<Weather> {
    if !engine.data().weather.enabled {
        return None;
    }
    let state = season::season_on(engine, date)?;
    Some(generate_for_season(engine, date, &state, location))
}
