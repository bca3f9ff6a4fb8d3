//! Fabled Calendar - fictional calendar engine
//!
//! Arithmetic over user-defined calendars (conditional leap days, eras,
//! intercalary months), incremental per-date caches for events, eras,
//! moons, seasons and weather, and a seeded weather generator.

pub mod cache;
pub mod calendar;
pub mod core;
pub mod season;
pub mod session;
pub mod weather;
