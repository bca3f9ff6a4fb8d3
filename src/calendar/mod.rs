//! Calendar definitions and the arithmetic engine

pub mod arithmetic;
pub mod cycle;
pub mod engine;
pub mod era;
pub mod format;
pub mod grid;
pub mod leap;
pub mod model;
pub mod moon;
pub mod presets;

pub use engine::CalendarEngine;
pub use model::{
    Calendar, Era, EraKind, LeapDay, LeapDayCondition, Month, MonthKind, StaticCalendarData, Weekday, Year,
};
pub use moon::{Moon, MoonPhase, MoonState};
