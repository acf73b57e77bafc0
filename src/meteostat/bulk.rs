//! Decoders for the Meteostat bulk-data payloads, after gzip decompression.

pub mod stations {
    use serde_derive::Deserialize;
    use std::collections::HashMap;

    use crate::error::Result;
    use crate::meteostat::{Location, Station};

    #[derive(Debug, Deserialize)]
    struct Entry {
        id: String,
        name: HashMap<String, String>,
        location: Coordinates,
    }

    #[derive(Debug, Deserialize)]
    struct Coordinates {
        latitude: f64,
        longitude: f64,
        elevation: Option<i32>,
    }

    impl Entry {
        fn into_station(self) -> Station {
            // Station names come keyed by language; prefer English.
            let name = self
                .name
                .get("en")
                .cloned()
                .or_else(|| self.name.values().next().cloned())
                .unwrap_or_else(|| self.id.clone());
            Station::new(
                self.id,
                name,
                self.location.elevation,
                Location::new(self.location.latitude, self.location.longitude),
            )
        }
    }

    /// Decode the station directory (`stations/lite.json.gz`, decompressed).
    pub fn decode(raw: &[u8]) -> Result<Vec<Station>> {
        let entries: Vec<Entry> = serde_json::from_slice(raw)?;
        Ok(entries.into_iter().map(Entry::into_station).collect())
    }
}

pub mod daily {
    use chrono::NaiveDate;
    use csv::StringRecord;

    use crate::error::Result;
    use crate::meteostat::DailyObservation;

    // Headerless columns: date,tavg,tmin,tmax,prcp,snow,wdir,wspd,wpgt,pres,tsun
    const COL_DATE: usize = 0;
    const COL_TMIN: usize = 2;
    const COL_TMAX: usize = 3;

    /// Decode a station's daily series (`daily/{id}.csv.gz`, decompressed),
    /// keeping rows whose date falls in `start..=end`.
    pub fn decode(raw: &[u8], start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyObservation>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(raw);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let date = match record.get(COL_DATE) {
                Some(v) if !v.is_empty() => NaiveDate::parse_from_str(v, "%Y-%m-%d")?,
                _ => continue,
            };
            if date < start || date > end {
                continue;
            }
            rows.push(DailyObservation {
                date,
                tmax: number(&record, COL_TMAX),
                tmin: number(&record, COL_TMIN),
            });
        }
        Ok(rows)
    }

    fn number(record: &StringRecord, index: usize) -> Option<f64> {
        record
            .get(index)
            .filter(|v| !v.is_empty())
            .and_then(|v| v.parse().ok())
    }
}
