//! Maps Collaborator Boundary
//!
//! Port trait for the external mapping provider plus the
//! Directions-API-backed implementation. The provider is best-effort:
//! unreachable, timed out, or empty responses all surface as a route
//! failure and are never retried here.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Raw routing result for an origin/destination pair.
#[derive(Debug, Clone)]
pub struct RouteLeg {
    pub distance_meters: i64,
    pub duration_seconds: i64,
    /// Encoded path geometry
    pub polyline: String,
}

#[derive(Debug, Error)]
pub enum MapsError {
    #[error("maps provider unreachable: {0}")]
    Unreachable(String),

    #[error("no route between origin and destination")]
    NoRoute,
}

/// Port for the external mapping provider. Implementations are
/// substitutable with test doubles.
#[async_trait]
pub trait MapsClient: Send + Sync {
    async fn directions(&self, origin: &str, destination: &str) -> Result<RouteLeg, MapsError>;
}

/// Directions API client (Google-style wire format, no SDK dependency)
pub struct DirectionsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DirectionsClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url,
            api_key,
        }
    }
}

#[derive(Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Deserialize)]
struct DirectionsRoute {
    overview_polyline: OverviewPolyline,
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Deserialize)]
struct OverviewPolyline {
    points: String,
}

#[derive(Deserialize)]
struct Leg {
    distance: ValueField,
    duration: ValueField,
}

#[derive(Deserialize)]
struct ValueField {
    value: i64,
}

#[async_trait]
impl MapsClient for DirectionsClient {
    async fn directions(&self, origin: &str, destination: &str) -> Result<RouteLeg, MapsError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("origin", origin),
                ("destination", destination),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| MapsError::Unreachable(e.to_string()))?;

        let body: DirectionsResponse = response
            .json()
            .await
            .map_err(|e| MapsError::Unreachable(format!("invalid response body: {e}")))?;

        let route = body.routes.into_iter().next().ok_or(MapsError::NoRoute)?;
        let polyline = route.overview_polyline.points;
        let leg = route.legs.into_iter().next().ok_or(MapsError::NoRoute)?;

        Ok(RouteLeg {
            distance_meters: leg.distance.value,
            duration_seconds: leg.duration.value,
            polyline,
        })
    }
}
