use chrono::NaiveDate;
use flate2::read::GzDecoder;
use reqwest::blocking;
use reqwest::header::USER_AGENT;
use std::cmp::Ordering;
use std::fmt;
use std::io::Read;
use std::rc::Rc;

use crate::error::Result;

mod bulk;

const R: f64 = 6371e3;

const ENDPOINT: &str = "https://bulk.meteostat.net/v2";

/// The two capabilities the driver needs from a climate-data provider.
pub trait Provider {
    /// Stations near `loc`, nearest first, at most `limit` entries.
    fn find_nearby_stations(&self, loc: &Location, limit: usize) -> Result<Vec<Station>>;

    /// Daily observations for `station` with dates in `start..=end`.
    fn fetch_daily(
        &self,
        station: &Station,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyObservation>>;
}

#[derive(Debug)]
struct ClientState {
    ua: String,
    endpoint: String,
    client: blocking::Client,
}

/// Client for the Meteostat bulk-data endpoints.
#[derive(Clone, Debug)]
pub struct Client {
    state: Rc<ClientState>,
}

impl Client {
    pub fn new(ua: &str) -> Client {
        Client::with_endpoint(ua, ENDPOINT)
    }

    pub fn with_endpoint(ua: &str, endpoint: &str) -> Client {
        Client {
            state: Rc::new(ClientState {
                ua: ua.to_string(),
                endpoint: endpoint.trim_end_matches('/').to_string(),
                client: blocking::Client::new(),
            }),
        }
    }

    // The bulk endpoints serve gzip files, not gzip-encoded responses,
    // so the body has to be decompressed by hand.
    fn get_gz(&self, url: &str) -> Result<Vec<u8>> {
        let res = self
            .state
            .client
            .get(url)
            .header(USER_AGENT, &self.state.ua)
            .send()?
            .error_for_status()?;
        let mut raw = Vec::new();
        GzDecoder::new(res).read_to_end(&mut raw)?;
        Ok(raw)
    }
}

impl Provider for Client {
    fn find_nearby_stations(&self, loc: &Location, limit: usize) -> Result<Vec<Station>> {
        let raw = self.get_gz(&format!("{}/stations/lite.json.gz", self.state.endpoint))?;
        let stations = bulk::stations::decode(&raw)?;
        Ok(rank_by_distance(stations, loc, limit))
    }

    fn fetch_daily(
        &self,
        station: &Station,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyObservation>> {
        let raw = self.get_gz(&format!("{}/daily/{}.csv.gz", self.state.endpoint, station.id()))?;
        bulk::daily::decode(&raw, start, end)
    }
}

fn rank_by_distance(mut stations: Vec<Station>, loc: &Location, limit: usize) -> Vec<Station> {
    stations.sort_by(|a, b| {
        let da = Location::distance_between(loc, a.location()).in_meters();
        let db = Location::distance_between(loc, b.location()).in_meters();
        da.partial_cmp(&db).unwrap_or(Ordering::Equal)
    });
    stations.truncate(limit);
    stations
}

#[derive(Clone, Debug)]
pub struct Station {
    id: String,
    name: String,
    elevation: Option<i32>,
    location: Location,
}

impl Station {
    pub(crate) fn new(
        id: String,
        name: String,
        elevation: Option<i32>,
        location: Location,
    ) -> Station {
        Station {
            id,
            name,
            elevation,
            location,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elevation(&self) -> Option<i32> {
        self.elevation
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

#[derive(Clone, Debug)]
pub struct Location {
    lat: f64,
    lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Location {
        Location { lat, lng }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    pub fn distance_between(a: &Location, b: &Location) -> Distance {
        let φ1 = a.lat().to_radians();
        let φ2 = b.lat().to_radians();

        let δφ = (b.lat() - a.lat()).to_radians();
        let δλ = (b.lng() - a.lng()).to_radians();

        let a = (δφ / 2.0).sin() * (δφ / 2.0).sin()
            + φ1.cos() * φ2.cos() * (δλ / 2.0).sin() * (δλ / 2.0).sin();
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        Distance::from_meters(R * c)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Distance {
    m: f64,
}

impl Distance {
    pub fn from_meters(m: f64) -> Distance {
        Distance { m }
    }

    pub fn in_meters(&self) -> f64 {
        self.m
    }

    pub fn in_kilometers(&self) -> f64 {
        self.m / 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    c: f64,
}

impl Temperature {
    pub fn from_celsius(c: f64) -> Temperature {
        Temperature { c }
    }

    pub fn from_fahrenheit(f: f64) -> Temperature {
        Temperature {
            c: (f - 32.0) * 5.0 / 9.0,
        }
    }

    pub fn in_celsius(&self) -> f64 {
        self.c
    }

    pub fn in_fahrenheit(&self) -> f64 {
        self.c * 9.0 / 5.0 + 32.0
    }
}

/// One row of a station's daily time series, in degrees Celsius.
#[derive(Clone, Debug, PartialEq)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub tmax: Option<f64>,
    pub tmin: Option<f64>,
}

impl DailyObservation {
    pub fn is_complete(&self) -> bool {
        self.tmax.is_some() && self.tmin.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, lat: f64, lng: f64) -> Station {
        Station::new(
            id.to_string(),
            format!("Station {}", id),
            None,
            Location::new(lat, lng),
        )
    }

    #[test]
    fn test_haversine_distance() {
        // London to Edinburgh, roughly 534 km.
        let london = Location::new(51.5074, -0.1278);
        let edinburgh = Location::new(55.9533, -3.1883);
        let d = Location::distance_between(&london, &edinburgh);
        assert!((d.in_kilometers() - 534.0).abs() < 10.0);
    }

    #[test]
    fn test_rank_by_distance_orders_nearest_first() {
        let stations = vec![
            station("far", 45.0, -90.0),
            station("near", 38.8, -90.1),
            station("mid", 40.0, -90.0),
        ];
        let query = Location::new(38.75, -90.0333);

        let ranked = rank_by_distance(stations, &query, 5);
        let ids: Vec<&str> = ranked.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
    }

    #[test]
    fn test_rank_by_distance_truncates_to_limit() {
        let stations = vec![
            station("a", 39.0, -90.0),
            station("b", 40.0, -90.0),
            station("c", 41.0, -90.0),
        ];
        let query = Location::new(38.75, -90.0333);

        let ranked = rank_by_distance(stations, &query, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id(), "a");
    }

    #[test]
    fn test_temperature_conversion() {
        assert!((Temperature::from_celsius(30.0).in_fahrenheit() - 86.0).abs() < 1e-9);
        assert!((Temperature::from_celsius(-40.0).in_fahrenheit() - -40.0).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_round_trip() {
        for c in [-89.2, -40.0, 0.0, 22.5, 56.7] {
            let f = Temperature::from_celsius(c).in_fahrenheit();
            let back = Temperature::from_fahrenheit(f).in_celsius();
            assert!((back - c).abs() < 1e-9);
        }
    }
}
