//! GeoNames child resolver
//!
//! Turns "give me the children of region X" into a list of [`Region`], one
//! throttled HTTP call at a time.

use std::sync::Arc;
use std::time::Duration;

use itertools::Itertools;
use reqwest::Url;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{ChildrenOutcome, Coordinate, DomainError, DomainResult, GeonameId, Region};
use crate::infrastructure::traits::{HttpClient, Sleeper};
use crate::infrastructure::xml::{self, XmlValue};
use crate::log::Logger;
use crate::{log_debug, log_info, log_warn};

/// Status message prefix GeoNames uses for leaf regions.
pub const NO_CHILDREN_PREFIX: &str = "no children for";

/// Source of a region's direct children.
pub trait ChildResolver: Send + Sync {
    fn children(&self, region_id: GeonameId) -> ApplicationResult<Vec<Region>>;
}

/// Connection parameters of the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    /// Endpoint prefix including trailing slash, e.g. `http://api.geonames.org/`
    pub base_url: String,
    pub username: String,
    /// Delay before every request
    pub throttle: Duration,
}

impl ResolverSettings {
    pub fn from_settings(settings: &Settings) -> ApplicationResult<Self> {
        Ok(Self {
            base_url: settings.base_url(),
            username: settings.username.clone(),
            throttle: settings.throttle()?,
        })
    }
}

/// Rate-limited GeoNames client.
pub struct GeonamesResolver {
    settings: ResolverSettings,
    http: Arc<dyn HttpClient>,
    sleeper: Arc<dyn Sleeper>,
    logger: Arc<dyn Logger>,
}

impl GeonamesResolver {
    pub fn new(
        settings: ResolverSettings,
        http: Arc<dyn HttpClient>,
        sleeper: Arc<dyn Sleeper>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            settings,
            http,
            sleeper,
            logger,
        }
    }

    fn endpoint(&self, api: &str, region_id: GeonameId) -> ApplicationResult<Url> {
        Url::parse_with_params(
            &format!("{}{}", self.settings.base_url, api),
            [
                ("geonameId", region_id.to_string()),
                ("username", self.settings.username.clone()),
            ],
        )
        .map_err(|e| ApplicationError::Config {
            message: format!("invalid base url {:?}: {e}", self.settings.base_url),
        })
    }

    /// Throttle, fetch and decode. The delay applies to every call.
    #[instrument(level = "debug", skip(self))]
    fn do_api_call(&self, api: &str, region_id: GeonameId) -> ApplicationResult<XmlValue> {
        self.sleeper.sleep(self.settings.throttle);

        let url = self.endpoint(api, region_id)?;
        let body = self
            .http
            .get(url.as_str())
            .map_err(|source| ApplicationError::Transport { region_id, source })?;
        debug!(bytes = body.len(), "received response");

        let text = String::from_utf8(body).map_err(|e| ApplicationError::Decode {
            region_id,
            message: e.to_string(),
        })?;
        xml::parse(&text).map_err(|e| ApplicationError::Decode {
            region_id,
            message: e.to_string(),
        })
    }

    /// Fetch and classify the children of `region_id`.
    pub fn resolve_children(&self, region_id: GeonameId) -> ApplicationResult<ChildrenOutcome> {
        let document = self.do_api_call("children", region_id)?;
        Ok(self.classify(&document)?)
    }

    /// Children as a plain list; "no children" and "upstream error" both
    /// come back empty. The difference is only visible in the log.
    pub fn fetch_children(&self, region_id: GeonameId) -> ApplicationResult<Vec<Region>> {
        let outcome = self.resolve_children(region_id)?;
        if let ChildrenOutcome::UpstreamError(reason) = &outcome {
            log_debug!(self.logger, "children of {region_id} unavailable: {reason}");
        }
        Ok(outcome.into_regions())
    }

    /// Raw decoded `get` response, uninterpreted.
    pub fn fetch_detail(&self, region_id: GeonameId) -> ApplicationResult<XmlValue> {
        self.do_api_call("get", region_id)
    }

    fn classify(&self, document: &XmlValue) -> DomainResult<ChildrenOutcome> {
        let Some(geonames) = document.get("geonames") else {
            return Ok(ChildrenOutcome::UpstreamError(
                "response has no <geonames> element".to_string(),
            ));
        };

        let status = geonames
            .path(&["status", "@message"])
            .and_then(XmlValue::as_str);
        if let Some(message) = status {
            if message.starts_with(NO_CHILDREN_PREFIX) {
                log_info!(self.logger, "{message}");
                return Ok(ChildrenOutcome::NoChildren);
            }
            log_warn!(self.logger, "{message}");
        }

        let Some(count) = geonames
            .get("totalResultsCount")
            .and_then(XmlValue::as_str)
        else {
            let reason = status.unwrap_or("response has no totalResultsCount");
            return Ok(ChildrenOutcome::UpstreamError(reason.to_string()));
        };
        let Ok(count) = count.trim().parse::<u64>() else {
            return Ok(ChildrenOutcome::UpstreamError(format!(
                "totalResultsCount is not a number: {count:?}"
            )));
        };
        if count == 0 {
            return Ok(ChildrenOutcome::NoChildren);
        }

        let Some(records) = geonames.get("geoname") else {
            return Ok(ChildrenOutcome::UpstreamError(format!(
                "totalResultsCount is {count} but no geoname records were returned"
            )));
        };
        let records = records.as_list();
        let take = if count == 1 { 1 } else { records.len() };

        let regions = records
            .into_iter()
            .take(take)
            .map(decode_region)
            .collect::<DomainResult<Vec<_>>>()?
            .into_iter()
            .unique_by(|r| r.id)
            .collect();
        Ok(ChildrenOutcome::Children(regions))
    }
}

impl ChildResolver for GeonamesResolver {
    fn children(&self, region_id: GeonameId) -> ApplicationResult<Vec<Region>> {
        self.fetch_children(region_id)
    }
}

/// Text of a record field; an empty element reads as "".
fn field<'a>(record: &'a XmlValue, name: &'static str) -> DomainResult<&'a str> {
    match record.get(name) {
        Some(XmlValue::Null) => Ok(""),
        Some(value) => value.as_str().ok_or(DomainError::InvalidRecord {
            field: name,
            reason: "not a text element".to_string(),
        }),
        None => Err(DomainError::InvalidRecord {
            field: name,
            reason: "missing".to_string(),
        }),
    }
}

/// One `<geoname>` record into a [`Region`].
fn decode_region(record: &XmlValue) -> DomainResult<Region> {
    let raw_id = field(record, "geonameId")?;
    let id = raw_id
        .trim()
        .parse::<GeonameId>()
        .map_err(|_| DomainError::InvalidRecord {
            field: "geonameId",
            reason: format!("not an integer: {raw_id:?}"),
        })?;
    Ok(Region::new(
        id,
        field(record, "name")?,
        field(record, "toponymName")?,
        Coordinate::parse(field(record, "lat")?, field(record, "lng")?)?,
    ))
}
