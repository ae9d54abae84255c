use std::sync::{Arc, Mutex};

use meteo_core::{
    Config, QueryError, QueryOutcome, RenderSink, WeatherService, WeatherView, provider_from_config,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

#[derive(Default)]
struct Screen {
    message: Mutex<Option<String>>,
    shown: Mutex<Option<WeatherView>>,
}

impl RenderSink for Screen {
    fn progress(&self, text: &str) {
        *self.message.lock().unwrap() = Some(text.to_string());
    }
    fn message(&self, text: &str) {
        *self.message.lock().unwrap() = Some(text.to_string());
    }
    fn clear(&self) {
        *self.message.lock().unwrap() = None;
    }
    fn render(&self, view: &WeatherView) {
        *self.shown.lock().unwrap() = Some(view.clone());
    }
}

async fn service_for(server: &MockServer) -> (WeatherService, Arc<Screen>) {
    let mut cfg = Config::default();
    cfg.endpoints.geocoding_url = format!("{}/v1/search", server.uri());
    cfg.endpoints.forecast_url = format!("{}/v1/forecast", server.uri());

    let provider = provider_from_config(&cfg).expect("provider should build");
    let screen = Arc::new(Screen::default());
    let service = WeatherService::new(provider.clone(), provider, screen.clone(), &cfg);
    (service, screen)
}

async fn mount_cairo(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Cairo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "name": "Cairo", "country": "Egypt",
                "latitude": 30.04, "longitude": 31.24, "timezone": "Africa/Cairo"
            }]
        })))
        .mount(server)
        .await;
}

fn clear_noon() -> serde_json::Value {
    json!({
        "current_weather": {
            "temperature": 25.3, "windspeed": 10, "winddirection": 180,
            "weathercode": 0, "time": "2024-01-01T12:00"
        }
    })
}

#[tokio::test]
async fn cairo_end_to_end() {
    let server = MockServer::start().await;
    mount_cairo(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("timezone", "Africa/Cairo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(clear_noon()))
        .expect(1)
        .mount(&server)
        .await;

    let (service, screen) = service_for(&server).await;
    let outcome = service.search_by_city("Cairo").await;

    assert!(matches!(outcome, QueryOutcome::Rendered(_)));
    let shown = screen.shown.lock().unwrap().clone().expect("something rendered");
    assert_eq!(shown.description, "Clear sky");
    assert_eq!(shown.icon, "☀️");
    assert_eq!(shown.temperature, "25°C");
    assert_eq!(shown.location, "Cairo, Egypt");
    assert_eq!(shown.wind, "10 km/h (180°)");
    assert!(screen.message.lock().unwrap().is_none());
}

#[tokio::test]
async fn not_found_sends_no_forecast_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(clear_noon()))
        .expect(0)
        .mount(&server)
        .await;

    let (service, screen) = service_for(&server).await;
    let outcome = service.search_by_city("Nowhereville").await;

    assert_eq!(outcome, QueryOutcome::Failed(QueryError::NotFound));
    assert_eq!(
        screen.message.lock().unwrap().as_deref(),
        Some("City not found. Try another name.")
    );
    assert!(screen.shown.lock().unwrap().is_none());
}

#[tokio::test]
async fn empty_forecast_is_no_data() {
    let server = MockServer::start().await;
    mount_cairo(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let (service, screen) = service_for(&server).await;
    let outcome = service.search_by_city("Cairo").await;

    assert_eq!(outcome, QueryOutcome::Failed(QueryError::NoData));
    assert_eq!(screen.message.lock().unwrap().as_deref(), Some("Error: No data available"));
    assert!(screen.shown.lock().unwrap().is_none());
}

#[tokio::test]
async fn http_failures_surface_as_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>upstream down</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (service, screen) = service_for(&server).await;

    service.search_by_city("Cairo").await;
    assert_eq!(
        screen.message.lock().unwrap().as_deref(),
        Some("Error: Geocoding failed (status 502 Bad Gateway)")
    );

    service.search_by_coords(30.0444, 31.2357).await;
    assert_eq!(
        screen.message.lock().unwrap().as_deref(),
        Some("Error: Weather API failed (status 500 Internal Server Error)")
    );

    assert!(screen.shown.lock().unwrap().is_none());
}

#[tokio::test]
async fn coords_label_and_auto_timezone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "30.0444"))
        .and(query_param("longitude", "31.2357"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(clear_noon()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (service, screen) = service_for(&server).await;
    service.search_by_coords(30.0444, 31.2357).await;

    let shown = screen.shown.lock().unwrap().clone().expect("something rendered");
    assert_eq!(shown.location, "Lat 30.04, Lon 31.24");
}
