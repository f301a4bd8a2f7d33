use routeward::HttpMethod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Expected status codes of one route, per method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteExpectation {
    #[serde(rename = "statusCodes", default)]
    pub status_codes: BTreeMap<HttpMethod, u16>,
}

/// Override table: route name -> method -> expected status.
///
/// Serialized as
/// `{"login": {"statusCodes": {"GET": 200}}}`.
///
/// # Example
/// ```
/// use routeward::HttpMethod;
/// use routeward_testing::Expectations;
///
/// let expectations = Expectations::new()
///     .expect("login", HttpMethod::Get, 200)
///     .expect("default", HttpMethod::Get, 200);
///
/// assert_eq!(expectations.status_for("login", HttpMethod::Get), Some(200));
/// assert_eq!(expectations.status_for("login", HttpMethod::Post), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expectations {
    routes: BTreeMap<String, RouteExpectation>,
}

/// A single (route, method, status) entry of an [`Expectations`] table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectationEntry {
    pub route: String,
    pub method: HttpMethod,
    pub status: u16,
}

impl fmt::Display for ExpectationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} => {}", self.route, self.method, self.status)
    }
}

/// A configured expectation an audit run never exercised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drift {
    /// The route was configured but never visited.
    Route(String),
    /// The route was visited but this method/status was never looked up.
    Status(ExpectationEntry),
}

impl Drift {
    pub fn route(&self) -> &str {
        match self {
            Drift::Route(route) => route,
            Drift::Status(entry) => &entry.route,
        }
    }
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Drift::Route(route) => write!(f, "{} (route never visited)", route),
            Drift::Status(entry) => fmt::Display::fmt(entry, f),
        }
    }
}

impl Expectations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn expect(mut self, route: impl Into<String>, method: HttpMethod, status: u16) -> Self {
        self.insert(route, method, status);
        self
    }

    pub fn insert(&mut self, route: impl Into<String>, method: HttpMethod, status: u16) {
        self.routes
            .entry(route.into())
            .or_default()
            .status_codes
            .insert(method, status);
    }

    pub fn status_for(&self, route: &str, method: HttpMethod) -> Option<u16> {
        self.routes
            .get(route)
            .and_then(|expectation| expectation.status_codes.get(&method))
            .copied()
    }

    pub fn route(&self, route: &str) -> Option<&RouteExpectation> {
        self.routes.get(route)
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = ExpectationEntry> + '_ {
        self.routes.iter().flat_map(|(route, expectation)| {
            expectation
                .status_codes
                .iter()
                .map(move |(method, status)| ExpectationEntry {
                    route: route.clone(),
                    method: *method,
                    status: *status,
                })
        })
    }

    /// Record `route` as visited without any status code yet.
    pub fn touch(&mut self, route: impl Into<String>) {
        self.routes.entry(route.into()).or_default();
    }

    /// Everything configured in `self` that `exercised` does not hold.
    ///
    /// Empty exactly when both tables are deeply equal, given that
    /// `exercised` only ever records configured entries.
    pub fn drift_from(&self, exercised: &Expectations) -> Vec<Drift> {
        let mut drift = Vec::new();
        for (route, expectation) in &self.routes {
            let Some(seen) = exercised.route(route) else {
                drift.push(Drift::Route(route.clone()));
                continue;
            };
            for (method, status) in &expectation.status_codes {
                if seen.status_codes.get(method) != Some(status) {
                    drift.push(Drift::Status(ExpectationEntry {
                        route: route.clone(),
                        method: *method,
                        status: *status,
                    }));
                }
            }
        }
        drift
    }
}
