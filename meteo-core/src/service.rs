//! Query orchestration: place name or coordinates in, one render or one
//! message out.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::{
    Config,
    error::QueryError,
    geolocation::{self, LocationSource, PositionOptions},
    model::{Coordinates, Place},
    provider::{ForecastProvider, GeocodingProvider},
    render::{RenderSink, WeatherView},
};

/// How a query ended.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rendered(WeatherView),
    Failed(QueryError),
    /// Empty input; nothing was sent and nothing was shown.
    Ignored,
    /// A newer query started before this one finished. Its result was dropped.
    Superseded,
}

/// Sequence number handed to each query. Only the latest may write to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket(u64);

pub struct WeatherService {
    geocoder: Arc<dyn GeocodingProvider>,
    forecast: Arc<dyn ForecastProvider>,
    sink: Arc<dyn RenderSink>,
    default_timezone: String,
    position_options: PositionOptions,
    /// Latest ticket issued. Held across the check and the sink write.
    latest: Mutex<u64>,
}

impl WeatherService {
    pub fn new(
        geocoder: Arc<dyn GeocodingProvider>,
        forecast: Arc<dyn ForecastProvider>,
        sink: Arc<dyn RenderSink>,
        config: &Config,
    ) -> Self {
        Self {
            geocoder,
            forecast,
            sink,
            default_timezone: config.forecast.default_timezone.clone(),
            position_options: PositionOptions::from(&config.geolocation),
            latest: Mutex::new(0),
        }
    }

    fn issue_ticket(&self) -> Ticket {
        let mut latest = self.latest.lock();
        *latest += 1;
        Ticket(*latest)
    }

    /// Run `write` against the sink only if `ticket` is still the latest query.
    /// No ticket can be issued while `write` runs.
    fn with_sink(&self, ticket: Ticket, write: impl FnOnce(&dyn RenderSink)) -> bool {
        let latest = self.latest.lock();
        if *latest == ticket.0 {
            write(self.sink.as_ref());
            true
        } else {
            tracing::debug!(ticket = ticket.0, "dropping output of superseded query");
            false
        }
    }

    /// Report `err` and turn it into an outcome.
    fn fail(&self, ticket: Ticket, err: QueryError) -> QueryOutcome {
        if self.with_sink(ticket, |s| s.message(&err.to_string())) {
            QueryOutcome::Failed(err)
        } else {
            QueryOutcome::Superseded
        }
    }

    /// Look up `name`, then its current weather.
    pub async fn search_by_city(&self, name: &str) -> QueryOutcome {
        let name = name.trim();
        if name.is_empty() {
            return QueryOutcome::Ignored;
        }

        let ticket = self.issue_ticket();
        self.with_sink(ticket, |s| s.progress("Looking up city..."));

        let place: Place = match self.geocoder.resolve(name).await {
            Ok(Some(place)) => place,
            Ok(None) => return self.fail(ticket, QueryError::NotFound),
            Err(err) => {
                tracing::warn!(query = name, error = %format!("{err:#}"), "geocoding failed");
                return self.fail(ticket, QueryError::network(&err));
            }
        };

        let label = place.label();
        if !self.with_sink(ticket, |s| s.progress(&format!("Fetching weather for {label}..."))) {
            return QueryOutcome::Superseded;
        }

        self.fetch_and_render(ticket, place.coordinates(), &place.timezone, label).await
    }

    /// Current weather at a coordinate, without geocoding.
    pub async fn search_by_coords(&self, latitude: f64, longitude: f64) -> QueryOutcome {
        let ticket = self.issue_ticket();
        self.coords_flow(ticket, Coordinates::new(latitude, longitude)).await
    }

    /// Ask `source` where we are, then behave like [`Self::search_by_coords`].
    pub async fn search_by_location(&self, source: &dyn LocationSource) -> QueryOutcome {
        let ticket = self.issue_ticket();

        if !source.is_supported() {
            return self.fail(ticket, QueryError::GeolocationUnsupported);
        }

        self.with_sink(ticket, |s| s.progress("Getting your location..."));

        match geolocation::acquire(source, &self.position_options).await {
            Ok(coords) => self.coords_flow(ticket, coords).await,
            Err(err) => self.fail(ticket, QueryError::Geolocation(err)),
        }
    }

    async fn coords_flow(&self, ticket: Ticket, coords: Coordinates) -> QueryOutcome {
        if !self.with_sink(ticket, |s| s.progress("Fetching weather for your location...")) {
            return QueryOutcome::Superseded;
        }

        self.fetch_and_render(ticket, coords, &self.default_timezone, coords.label()).await
    }

    async fn fetch_and_render(
        &self,
        ticket: Ticket,
        coords: Coordinates,
        timezone: &str,
        label: String,
    ) -> QueryOutcome {
        let response =
            match self.forecast.fetch_current(coords.latitude, coords.longitude, timezone).await {
                Ok(resp) => resp,
                Err(err) => {
                    tracing::warn!(location = %label, error = %format!("{err:#}"), "forecast failed");
                    return self.fail(ticket, QueryError::network(&err));
                }
            };

        let Some(current) = response.current_weather else {
            return self.fail(ticket, QueryError::NoData);
        };

        let view = WeatherView::new(&current, label);
        let rendered = self.with_sink(ticket, |s| {
            s.clear();
            s.render(&view);
        });

        if rendered {
            tracing::info!(location = %view.location, code = view.code, "rendered current weather");
            QueryOutcome::Rendered(view)
        } else {
            QueryOutcome::Superseded
        }
    }
}
