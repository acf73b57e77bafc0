//! The interactive driver: prompt, resolve a station, fetch, aggregate, print.

use chrono::NaiveDate;
use std::io::{BufRead, Write};

use crate::error::{Error, Result};
use crate::meteostat::{Location, Provider};
use crate::report;
use crate::style::{Palette, Style};

/// Everything the driver would otherwise reach for as a global.
#[derive(Debug, Clone)]
pub struct Config {
    pub default_location: Location,
    pub default_place: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub station_limit: usize,
    pub palette: Palette,
}

impl Config {
    pub fn new(palette: Palette) -> Config {
        Config {
            default_location: Location::new(38.75, -90.0333),
            default_place: "St. Louis, MO".to_string(),
            start: NaiveDate::from_ymd_opt(2013, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            station_limit: 5,
            palette,
        }
    }
}

/// One forward pass over stdin-style input and stdout-style output.
///
/// `Err(Error::InvalidCoordinate)` and `Err(Error::NoStations)` are the
/// terminal failures the caller maps to exit code 1. The two empty-data
/// branches print a message and return `Ok(())`.
pub fn run<P, R, W>(config: &Config, provider: &P, input: &mut R, out: &mut W) -> Result<()>
where
    P: Provider,
    R: BufRead,
    W: Write,
{
    let palette = &config.palette;

    writeln!(out, "{}", palette.paint(Style::Header, report::SEPARATOR))?;
    writeln!(
        out,
        "{}",
        palette.paint(Style::Bold, "Temperature Data Retrieval System")
    )?;
    writeln!(out, "{}", palette.paint(Style::Header, report::SEPARATOR))?;

    let lat = prompt_coordinate(
        input,
        out,
        config,
        "Latitude",
        config.default_location.lat(),
    )?;
    let lng = prompt_coordinate(
        input,
        out,
        config,
        "Longitude",
        config.default_location.lng(),
    )?;
    let location = Location::new(lat, lng);

    writeln!(out)?;
    writeln!(
        out,
        "{}",
        palette.paint(Style::Notice, "Fetching the nearest weather station...")
    )?;
    let stations = provider.find_nearby_stations(&location, config.station_limit)?;
    let station = stations.first().ok_or(Error::NoStations)?;

    writeln!(
        out,
        "{}",
        palette.paint(
            Style::Notice,
            &format!(
                "Fetching historical temperature data from {} to {}...",
                config.start, config.end
            ),
        )
    )?;
    let observations = provider.fetch_daily(station, config.start, config.end)?;

    if observations.is_empty() {
        writeln!(
            out,
            "{}",
            palette.paint(
                Style::Alert,
                "No data found for the selected station and date range.",
            )
        )?;
        return Ok(());
    }

    match report::summarize(&observations) {
        Some(summary) => report::render(
            out,
            palette,
            station.name(),
            &location,
            config.start,
            config.end,
            &summary,
        ),
        None => {
            writeln!(
                out,
                "{}",
                palette.paint(
                    Style::Alert,
                    "No valid temperature data found for the selected station and date range.",
                )
            )?;
            Ok(())
        }
    }
}

fn prompt_coordinate<R, W>(
    input: &mut R,
    out: &mut W,
    config: &Config,
    label: &str,
    default: f64,
) -> Result<f64>
where
    R: BufRead,
    W: Write,
{
    write!(
        out,
        "{}",
        config.palette.paint(
            Style::Prompt,
            &format!(
                "Enter {} (OR press Enter for {} - {}): ",
                label, default, config.default_place
            ),
        )
    )?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let line = line.trim();
    if line.is_empty() {
        return Ok(default);
    }
    line.parse::<f64>().map_err(|_| Error::InvalidCoordinate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meteostat::{DailyObservation, Station};
    use std::cell::RefCell;

    struct MockProvider {
        stations: Vec<Station>,
        observations: Vec<DailyObservation>,
        lookups: RefCell<Vec<(f64, f64, usize)>>,
        fetches: RefCell<Vec<(String, NaiveDate, NaiveDate)>>,
    }

    impl MockProvider {
        fn new(stations: Vec<Station>, observations: Vec<DailyObservation>) -> MockProvider {
            MockProvider {
                stations,
                observations,
                lookups: RefCell::new(Vec::new()),
                fetches: RefCell::new(Vec::new()),
            }
        }
    }

    impl Provider for MockProvider {
        fn find_nearby_stations(&self, loc: &Location, limit: usize) -> Result<Vec<Station>> {
            self.lookups.borrow_mut().push((loc.lat(), loc.lng(), limit));
            Ok(self.stations.clone())
        }

        fn fetch_daily(
            &self,
            station: &Station,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<DailyObservation>> {
            self.fetches
                .borrow_mut()
                .push((station.id().to_string(), start, end));
            Ok(self.observations.clone())
        }
    }

    fn station(name: &str) -> Station {
        Station::new(
            "KSUS0".to_string(),
            name.to_string(),
            Some(141),
            Location::new(38.6621, -90.652),
        )
    }

    fn row(day: u32, tmax: Option<f64>, tmin: Option<f64>) -> DailyObservation {
        DailyObservation {
            date: NaiveDate::from_ymd_opt(2020, 6, day).unwrap(),
            tmax,
            tmin,
        }
    }

    fn config() -> Config {
        Config::new(Palette::plain())
    }

    fn run_with(
        provider: &MockProvider,
        input: &str,
    ) -> (Result<()>, String) {
        let mut reader = input.as_bytes();
        let mut out = Vec::new();
        let result = run(&config(), provider, &mut reader, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_empty_input_uses_defaults() {
        let provider = MockProvider::new(vec![], vec![]);
        let (result, _) = run_with(&provider, "\n\n");

        assert!(matches!(result, Err(Error::NoStations)));
        assert_eq!(*provider.lookups.borrow(), vec![(38.75, -90.0333, 5)]);
    }

    #[test]
    fn test_explicit_coordinates_are_forwarded() {
        let provider = MockProvider::new(vec![], vec![]);
        let (_, _) = run_with(&provider, "51.5074\n-0.1278\n");

        assert_eq!(*provider.lookups.borrow(), vec![(51.5074, -0.1278, 5)]);
    }

    #[test]
    fn test_invalid_input_skips_lookup() {
        let provider = MockProvider::new(vec![station("Any")], vec![]);
        let (result, _) = run_with(&provider, "not-a-number\n-90.0\n");

        assert!(matches!(result, Err(Error::InvalidCoordinate)));
        assert!(provider.lookups.borrow().is_empty());
        assert!(provider.fetches.borrow().is_empty());
    }

    #[test]
    fn test_no_stations_skips_fetch() {
        let provider = MockProvider::new(vec![], vec![]);
        let (result, _) = run_with(&provider, "38.75\n-90.0333\n");

        assert!(matches!(result, Err(Error::NoStations)));
        assert!(provider.fetches.borrow().is_empty());
    }

    #[test]
    fn test_empty_table_reports_and_succeeds() {
        let provider = MockProvider::new(vec![station("Any")], vec![]);
        let (result, output) = run_with(&provider, "\n\n");

        assert!(result.is_ok());
        assert!(output.contains("No data found for the selected station and date range."));
    }

    #[test]
    fn test_fully_incomplete_table_reports_and_succeeds() {
        let provider = MockProvider::new(
            vec![station("Any")],
            vec![row(1, Some(30.0), None), row(2, None, Some(10.0))],
        );
        let (result, output) = run_with(&provider, "\n\n");

        assert!(result.is_ok());
        assert!(output
            .contains("No valid temperature data found for the selected station and date range."));
    }

    #[test]
    fn test_full_run_renders_report() {
        let provider = MockProvider::new(
            vec![station("Spirit of  St. Louis Airport"), station("Farther")],
            vec![row(1, Some(30.0), Some(20.0)), row(2, Some(25.0), Some(15.0))],
        );
        let (result, output) = run_with(&provider, "\n\n");
        assert!(result.is_ok());

        // First (nearest) station is queried over the fixed window.
        let fetches = provider.fetches.borrow();
        assert_eq!(fetches.len(), 1);
        assert_eq!(fetches[0].0, "KSUS0");
        assert_eq!(fetches[0].1, NaiveDate::from_ymd_opt(2013, 1, 1).unwrap());
        assert_eq!(fetches[0].2, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());

        assert!(output.contains("Spirit of St. Louis Airport (38.75, -90.0333)"));
        assert!(output.contains("86.00°F"));
        assert!(output.contains("72.50°F"));
        assert!(output.contains("59.00°F"));
    }
}
