//! Aggregation of the daily series and rendering of the final report.

use chrono::NaiveDate;
use std::io::Write;

use crate::error::Result;
use crate::meteostat::{DailyObservation, Location, Temperature};
use crate::style::{Palette, Style};

pub const SEPARATOR: &str = "──────────────────────────────────────────────";

const LABEL_WIDTH: usize = 25;
const VALUE_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub peak_high: Temperature,
    pub peak_low: Temperature,
    pub mid_range: Temperature,
}

/// Aggregate the rows that carry both temperatures. Returns `None` when no
/// complete row remains.
pub fn summarize(rows: &[DailyObservation]) -> Option<Summary> {
    let complete: Vec<(f64, f64)> = rows
        .iter()
        .filter_map(|row| match (row.tmax, row.tmin) {
            (Some(hi), Some(lo)) => Some((hi, lo)),
            _ => None,
        })
        .collect();

    if complete.is_empty() {
        return None;
    }

    let peak_high = complete
        .iter()
        .map(|(hi, _)| *hi)
        .fold(f64::NEG_INFINITY, f64::max);
    let peak_low = complete
        .iter()
        .map(|(_, lo)| *lo)
        .fold(f64::INFINITY, f64::min);
    let mid_range = complete
        .iter()
        .map(|(hi, lo)| (hi + lo) / 2.0)
        .sum::<f64>()
        / complete.len() as f64;

    Some(Summary {
        peak_high: Temperature::from_celsius(peak_high),
        peak_low: Temperature::from_celsius(peak_low),
        mid_range: Temperature::from_celsius(mid_range),
    })
}

pub fn render<W: Write>(
    out: &mut W,
    palette: &Palette,
    station_name: &str,
    loc: &Location,
    start: NaiveDate,
    end: NaiveDate,
    summary: &Summary,
) -> Result<()> {
    let name = collapse_whitespace(station_name);

    writeln!(out)?;
    writeln!(out, "{}", palette.paint(Style::Accent, SEPARATOR))?;
    writeln!(out, "{}", palette.paint(Style::Bold, "Temperature Data for:"))?;
    writeln!(out, "{} {}", name, loc)?;
    writeln!(out)?;
    writeln!(
        out,
        "{} {} to {}",
        palette.paint(Style::Bold, "Date Range:"),
        start,
        end
    )?;
    writeln!(out, "{}", palette.paint(Style::Accent, SEPARATOR))?;

    value_line(out, palette, "Peak High Temp:", summary.peak_high, "🔥")?;
    value_line(out, palette, "Historical Mid Temp:", summary.mid_range, "🌎")?;
    value_line(out, palette, "Peak Low Temp:", summary.peak_low, "❄️")?;

    writeln!(out, "{}", palette.paint(Style::Accent, SEPARATOR))?;
    writeln!(out)?;
    Ok(())
}

fn value_line<W: Write>(
    out: &mut W,
    palette: &Palette,
    label: &str,
    value: Temperature,
    glyph: &str,
) -> Result<()> {
    let line = format!(
        "{:<lw$}{:>vw$.2}°F  {}",
        label,
        value.in_fahrenheit(),
        glyph,
        lw = LABEL_WIDTH,
        vw = VALUE_WIDTH,
    );
    writeln!(out, "{}", palette.paint(Style::Bold, &line))?;
    Ok(())
}

/// Collapse runs of whitespace to single spaces, as some station names carry
/// doubled spaces.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
