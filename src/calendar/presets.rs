//! Built-in calendar definitions
//!
//! The Gregorian preset is proleptic: year 1 day 1 is a Monday and there
//! is no year zero. Harptos is the Forgotten Realms calendar, with five
//! festival days outside the tendays and Shieldmeet every fourth year.

use crate::calendar::model::{
    Calendar, Era, LeapDay, LeapDayCondition, Month, StaticCalendarData, Weekday,
};
use crate::calendar::moon::Moon;
use crate::core::types::CalDate;
use crate::season::{Season, SeasonalConfig};
use crate::weather::archetype::{SeasonWeather, WeatherArchetype};
use crate::weather::location::Location;
use crate::weather::WeatherConfig;

/// Synodic month in days
const LUNAR_CYCLE: f64 = 29.530588853;

/// Epoch day of the new moon of 6 January 2000, reduced by the cycle
const LUNAR_OFFSET: f64 = 10.4812;

fn weekdays(names: &[&str]) -> Vec<Weekday> {
    names.iter().map(|name| Weekday::new(*name)).collect()
}

fn season(id: &str, name: &str, month: usize, day: u32, color: &str, climate: WeatherArchetype) -> Season {
    Season::dated(id, name, month, day)
        .with_color(color)
        .with_weather(SeasonWeather::Archetype(climate), 10, 60)
}

pub fn gregorian() -> StaticCalendarData {
    let months = [
        ("January", 31),
        ("February", 28),
        ("March", 31),
        ("April", 30),
        ("May", 31),
        ("June", 30),
        ("July", 31),
        ("August", 31),
        ("September", 30),
        ("October", 31),
        ("November", 30),
        ("December", 31),
    ]
    .into_iter()
    .map(|(name, length)| Month::regular(name, length))
    .collect();

    let mut era = Era::starting("ce", "Common Era");
    era.format = "{{year}} CE".into();

    StaticCalendarData {
        weekdays: weekdays(&[
            "Sunday",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
        ]),
        months,
        leap_days: vec![LeapDay::new(
            "Leap Day",
            1,
            vec![
                LeapDayCondition::every(400),
                LeapDayCondition::except(100),
                LeapDayCondition::every(4),
            ],
        )],
        eras: vec![era],
        moons: vec![Moon::new("Moon", LUNAR_CYCLE, LUNAR_OFFSET)],
        years: Vec::new(),
        use_custom_years: false,
        first_weekday: 1,
        overflow: true,
        week_offset: 0,
        year_zero_exists: false,
        seasonal: SeasonalConfig {
            seasons: vec![
                season("spring", "Spring", 2, 20, "#7cc47f", WeatherArchetype::Temperate),
                season("summer", "Summer", 5, 21, "#f2c14e", WeatherArchetype::Warm),
                season("autumn", "Autumn", 8, 22, "#d9822b", WeatherArchetype::Temperate),
                season("winter", "Winter", 11, 21, "#7aa6d6", WeatherArchetype::Cold),
            ],
            offset: 0,
            interpolate_colors: true,
        },
        weather: WeatherConfig {
            seed: 42,
            prevailing_wind: 250.0,
            ..WeatherConfig::default()
        },
    }
}

/// Gregorian calendar with a sample location
pub fn gregorian_calendar() -> Calendar {
    Calendar {
        id: "gregorian".into(),
        name: "Gregorian".into(),
        description: "Proleptic Gregorian calendar".into(),
        static_data: gregorian(),
        current: CalDate::new(2024, 0, 1),
        locations: vec![Location::new("highlands", "Highlands")
            .with_season("summer", SeasonWeather::Archetype(WeatherArchetype::Temperate))
            .with_season("winter", SeasonWeather::Archetype(WeatherArchetype::Frigid))],
    }
}

pub fn harptos() -> StaticCalendarData {
    let months = vec![
        Month::regular("Hammer", 30),
        Month::intercalary("Midwinter", 1),
        Month::regular("Alturiak", 30),
        Month::regular("Ches", 30),
        Month::regular("Tarsakh", 30),
        Month::intercalary("Greengrass", 1),
        Month::regular("Mirtul", 30),
        Month::regular("Kythorn", 30),
        Month::regular("Flamerule", 30),
        Month::intercalary("Midsummer", 1),
        Month::regular("Eleasis", 30),
        Month::regular("Eleint", 30),
        Month::intercalary("Highharvestide", 1),
        Month::regular("Marpenoth", 30),
        Month::regular("Uktar", 30),
        Month::intercalary("Feast of the Moon", 1),
        Month::regular("Nightal", 30),
    ];

    let mut shieldmeet = LeapDay::new("Shieldmeet", 9, vec![LeapDayCondition::every(4)]);
    shieldmeet.intercalary = true;

    let mut dale_reckoning = Era::starting("dr", "Dale Reckoning");
    dale_reckoning.format = "{{year}} DR".into();

    StaticCalendarData {
        weekdays: weekdays(&[
            "First Day",
            "Second Day",
            "Third Day",
            "Fourth Day",
            "Fifth Day",
            "Sixth Day",
            "Seventh Day",
            "Eighth Day",
            "Ninth Day",
            "Tenth Day",
        ]),
        months,
        leap_days: vec![shieldmeet],
        eras: vec![dale_reckoning],
        moons: vec![Moon::new("Selûne", 30.4375, 0.0)],
        years: Vec::new(),
        use_custom_years: false,
        first_weekday: 0,
        overflow: false,
        week_offset: 0,
        year_zero_exists: true,
        seasonal: SeasonalConfig {
            seasons: vec![
                season("spring", "Spring", 3, 19, "#8fd18c", WeatherArchetype::Temperate),
                season("summer", "Summer", 7, 20, "#f0c75e", WeatherArchetype::Warm),
                season("autumn", "Autumn", 11, 21, "#c97b38", WeatherArchetype::Temperate),
                season("winter", "Winter", 16, 20, "#9ab8de", WeatherArchetype::Frigid),
            ],
            offset: 0,
            interpolate_colors: true,
        },
        weather: WeatherConfig {
            seed: 1372,
            ..WeatherConfig::default()
        },
    }
}
