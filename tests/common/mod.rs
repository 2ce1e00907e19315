//! In-memory stand-ins for the network, the clock and the log sink.
#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt::Arguments;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use regiontree::application::services::{GeonamesResolver, ResolverSettings};
use regiontree::application::ApplicationResult;
use regiontree::domain::{Coordinate, GeonameId, Region};
use regiontree::infrastructure::traits::{HttpClient, Sleeper, TransportError};
use regiontree::log::{LogLevel, Logger};
use regiontree::util::testing::init_test_setup;
use regiontree::ChildResolver;

pub const BASE_URL: &str = "http://geonames.test/";

/// Ordered record of boundary calls shared between stubs: `"sleep"`, `"get"`.
pub type EventLog = Arc<Mutex<Vec<&'static str>>>;

// ============================================================
// XML fixtures
// ============================================================

pub fn geoname(id: GeonameId, name: &str) -> String {
    format!(
        "<geoname><toponymName>{name} Toponym</toponymName><name>{name}</name>\
         <lat>1.5</lat><lng>-2.25</lng><geonameId>{id}</geonameId><fcode>PCLI</fcode></geoname>"
    )
}

/// `children` response listing `records`, with the count taken from the list.
pub fn children_xml(records: &[(GeonameId, &str)]) -> String {
    children_xml_with_count(records.len(), records)
}

pub fn children_xml_with_count(count: usize, records: &[(GeonameId, &str)]) -> String {
    let body: String = records.iter().map(|(id, name)| geoname(*id, name)).collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n\
         <geonames style=\"MEDIUM\"><totalResultsCount>{count}</totalResultsCount>{body}</geonames>"
    )
}

pub fn no_children_xml(id: GeonameId) -> String {
    format!(
        "<geonames><status message=\"no children for geonameId={id}\" value=\"12\"/></geonames>"
    )
}

pub fn status_xml(message: &str) -> String {
    format!("<geonames><status message=\"{message}\" value=\"19\"/></geonames>")
}

// ============================================================
// HTTP
// ============================================================

/// Answers by the `geonameId` query parameter; unknown ids get zero results.
#[derive(Default)]
pub struct StubHttpClient {
    responses: Mutex<HashMap<GeonameId, Result<String, TransportError>>>,
    requests: Mutex<Vec<String>>,
    events: EventLog,
}

impl StubHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, id: GeonameId, body: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(id, Ok(body.into()));
        self
    }

    pub fn fail(self, id: GeonameId, error: TransportError) -> Self {
        self.responses.lock().unwrap().insert(id, Err(error));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }
}

fn requested_id(url: &str) -> Option<GeonameId> {
    reqwest::Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(key, _)| key == "geonameId")
        .and_then(|(_, value)| value.parse().ok())
}

impl HttpClient for StubHttpClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.events.lock().unwrap().push("get");
        self.requests.lock().unwrap().push(url.to_string());
        let id = requested_id(url)
            .ok_or_else(|| TransportError::Request(format!("no geonameId in {url}")))?;
        match self.responses.lock().unwrap().get(&id) {
            Some(Ok(body)) => Ok(body.clone().into_bytes()),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(children_xml(&[]).into_bytes()),
        }
    }
}

// ============================================================
// Clock and log
// ============================================================

#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
    events: EventLog,
}

impl RecordingSleeper {
    pub fn with_events(events: EventLog) -> Self {
        Self {
            sleeps: Mutex::default(),
            events,
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.events.lock().unwrap().push("sleep");
        self.sleeps.lock().unwrap().push(duration);
    }
}

#[derive(Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLogger {
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn at(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        self.entries.lock().unwrap().push((level, args.to_string()));
    }
}

// ============================================================
// Wiring
// ============================================================

pub struct Harness {
    pub http: Arc<StubHttpClient>,
    pub sleeper: Arc<RecordingSleeper>,
    pub logger: Arc<RecordingLogger>,
    pub resolver: Arc<GeonamesResolver>,
    pub events: EventLog,
}

impl Harness {
    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

pub fn resolver_settings(throttle: Duration) -> ResolverSettings {
    ResolverSettings {
        base_url: BASE_URL.to_string(),
        username: "tester".to_string(),
        throttle,
    }
}

pub fn harness(http: StubHttpClient, throttle: Duration) -> Harness {
    init_test_setup();
    let events = EventLog::default();
    let http = Arc::new(http.with_events(events.clone()));
    let sleeper = Arc::new(RecordingSleeper::with_events(events.clone()));
    let logger = Arc::new(RecordingLogger::default());
    let resolver = Arc::new(GeonamesResolver::new(
        resolver_settings(throttle),
        http.clone(),
        sleeper.clone(),
        logger.clone(),
    ));
    Harness {
        http,
        sleeper,
        logger,
        resolver,
        events,
    }
}

// ============================================================
// Resolver without HTTP
// ============================================================

pub fn region(id: GeonameId, name: &str) -> Region {
    Region::new(id, name, name, Coordinate::new(0.0, 0.0))
}

/// Children by parent id; unknown ids have none.
#[derive(Default)]
pub struct StubResolver {
    children: HashMap<GeonameId, Vec<Region>>,
    calls: Mutex<Vec<GeonameId>>,
}

impl StubResolver {
    pub fn with(mut self, parent: GeonameId, children: &[(GeonameId, &str)]) -> Self {
        self.children.insert(
            parent,
            children.iter().map(|(id, name)| region(*id, name)).collect(),
        );
        self
    }

    pub fn calls(&self) -> Vec<GeonameId> {
        self.calls.lock().unwrap().clone()
    }
}

impl ChildResolver for StubResolver {
    fn children(&self, region_id: GeonameId) -> ApplicationResult<Vec<Region>> {
        self.calls.lock().unwrap().push(region_id);
        Ok(self.children.get(&region_id).cloned().unwrap_or_default())
    }
}
