//! Fabled Calendar - command line front end
//!
//! Loads a calendar definition (JSON) or a built-in preset and answers
//! date questions: what a day looks like, the weather over a stretch of
//! days, which years are leap years, and how a year is laid out.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tokio::runtime::Runtime;

use fabled_calendar::cache::CalEvent;
use fabled_calendar::calendar::era::format_era;
use fabled_calendar::calendar::format::{format_date, parse_date};
use fabled_calendar::calendar::grid::{year_layout, LayoutBlock};
use fabled_calendar::calendar::leap::{parse_conditions, test_leap_day};
use fabled_calendar::calendar::model::Calendar;
use fabled_calendar::calendar::presets;
use fabled_calendar::core::config::EngineConfig;
use fabled_calendar::core::error::Result;
use fabled_calendar::core::types::{CalDate, LocationId};
use fabled_calendar::session::feed::{self, EventDelta};
use fabled_calendar::session::CalendarSession;

#[derive(Parser, Debug)]
#[command(name = "fabled")]
#[command(about = "Query fictional calendars")]
struct Args {
    /// Calendar definition in JSON; overrides --preset
    #[arg(long, global = true)]
    calendar: Option<PathBuf>,

    /// Built-in calendar to use when no definition is given
    #[arg(long, value_enum, default_value_t = Preset::Gregorian, global = true)]
    preset: Preset,

    /// Engine configuration in TOML
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Preset {
    Gregorian,
    Harptos,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Describe one date (year-month-day, month 1-based)
    Date { date: String },

    /// Weather for a run of days
    Weather {
        date: String,
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Location id for local weather
        #[arg(long)]
        location: Option<String>,
    },

    /// Leap day occurrences in a range of years
    Leap {
        from: i64,
        to: i64,
        /// Ad-hoc rule such as "400,!100,4" instead of the calendar's leap days
        #[arg(long)]
        rule: Option<String>,
    },

    /// Month grids and festival days of a year
    Layout { year: i64 },

    /// Feed events from a JSON file through the event channel, then list
    /// the events on a date
    Replay { events: PathBuf, date: String },
}

fn load_calendar(args: &Args) -> Result<Calendar> {
    match &args.calendar {
        Some(path) => Calendar::load(path),
        None => Ok(match args.preset {
            Preset::Gregorian => presets::gregorian_calendar(),
            Preset::Harptos => Calendar {
                id: "harptos".into(),
                name: "Calendar of Harptos".into(),
                description: String::new(),
                static_data: presets::harptos(),
                current: CalDate::new(1372, 0, 1),
                locations: Vec::new(),
            },
        }),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fabled_calendar=info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let mut session = CalendarSession::new(load_calendar(&args)?, config)?;

    match &args.command {
        Command::Date { date } => describe_date(&mut session, parse_date(date)?),
        Command::Weather { date, days, location } => {
            let start = parse_date(date)?;
            let location = location.as_deref().map(LocationId::new);
            print_weather(&mut session, start, *days, location.as_ref());
        }
        Command::Leap { from, to, rule } => print_leap_years(&session, *from, *to, rule.as_deref()),
        Command::Layout { year } => print_layout(&session, *year),
        Command::Replay { events, date } => replay(&mut session, events, parse_date(date)?)?,
    }
    Ok(())
}

fn describe_date(session: &mut CalendarSession, date: CalDate) {
    let engine = session.engine();
    println!("{}", format_date(engine, date, None));
    if !engine.is_valid_day(date) {
        return;
    }
    let weekday = engine.weekday_of(date);
    if let Some(day) = engine.data().weekdays.get(weekday) {
        println!("  Weekday: {}", day.name);
    }
    println!("  Epoch day: {}", session.days_before(date));

    if let Some(era) = session.eras_on(date) {
        println!("  Era: {}", format_era(era, date.year));
    }
    if let Some(season) = session.season_on(date) {
        println!(
            "  Season: {} (day {} of {}, {})",
            season.name,
            season.days_passed + 1,
            season.duration,
            season.color
        );
    }
    for moon in session.moons_on(date) {
        let marker = if moon.is_full() {
            " [full]"
        } else if moon.is_new() {
            " [new]"
        } else {
            ""
        };
        println!(
            "  {}: {} ({:.0}% lit){}",
            moon.name,
            moon.phase.name(),
            moon.illumination() * 100.0,
            marker
        );
    }
    let unit = session.calendar().static_data.weather.temperature_unit;
    if let Some(weather) = session.weather_on(date, None) {
        println!("  Weather: {}", weather.summary(unit));
    }
}

fn print_weather(session: &mut CalendarSession, start: CalDate, days: u32, location: Option<&LocationId>) {
    let unit = session.calendar().static_data.weather.temperature_unit;
    for offset in 0..days {
        let date = session.engine().add_days(start, offset as i64);
        let label = format_date(session.engine(), date, Some("YYYY-MM-DD"));
        match session.weather_on(date, location) {
            Some(weather) => println!("{}  {}", label, weather.summary(unit)),
            None => println!("{}  no weather", label),
        }
    }
}

fn print_leap_years(session: &CalendarSession, from: i64, to: i64, rule: Option<&str>) {
    if let Some(rule) = rule {
        let conditions = parse_conditions(rule);
        let years: Vec<String> = (from..=to)
            .filter(|&year| test_leap_day(&conditions, 0, year))
            .map(|year| year.to_string())
            .collect();
        println!("{}: {}", rule, years.join(", "));
        return;
    }
    for leap_day in &session.engine().data().leap_days {
        let years: Vec<String> = (from..=to)
            .filter(|&year| leap_day.applies(year))
            .map(|year| year.to_string())
            .collect();
        println!("{}: {}", leap_day.name, years.join(", "));
    }
}

fn print_layout(session: &CalendarSession, year: i64) {
    let engine = session.engine();
    let header: Vec<String> = engine
        .data()
        .weekdays
        .iter()
        .map(|w| w.name.chars().take(2).collect())
        .collect();
    for block in year_layout(engine, year) {
        match block {
            LayoutBlock::Month(grid) => {
                println!("\n{}", grid.name);
                println!("{}", header.iter().map(|h| format!("{:>3}", h)).collect::<String>());
                for week in &grid.weeks {
                    let row: String = week
                        .iter()
                        .map(|cell| match cell {
                            Some(day) => format!("{:>3}", day),
                            None => "   ".to_string(),
                        })
                        .collect();
                    println!("{}", row);
                }
            }
            LayoutBlock::Intercalary { name, days, .. } => {
                println!("\n{} ({} day{})", name, days.len(), if days.len() == 1 { "" } else { "s" });
            }
            LayoutBlock::LeapDay { name, .. } => println!("\n{}", name),
        }
    }
}

fn replay(session: &mut CalendarSession, path: &Path, date: CalDate) -> Result<()> {
    let content = std::fs::read_to_string(path)?;
    let events: Vec<CalEvent> = serde_json::from_str(&content)?;

    let (_queue, mut inbox, worker) = feed::channel(session.engine().config());
    let rt = Runtime::new()?;
    rt.block_on(async move {
        let sink = worker.events;
        let producer = tokio::spawn(async move {
            for event in events {
                sink.send(EventDelta::Upsert(event));
            }
        });
        if let Err(e) = producer.await {
            tracing::warn!("event producer failed: {}", e);
        }
    });

    let applied = inbox.drain_into(session);
    tracing::info!(applied, "replayed events");
    let label = format_date(session.engine(), date, None);
    for event in session.events_on(date) {
        println!("{}  {}", label, event.name);
    }
    Ok(())
}
