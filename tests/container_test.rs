//! Tests for ServiceContainer wiring with injected dependencies.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use regiontree::config::{ExportConfig, Settings};
use regiontree::domain::{SiblingOrder, EARTH_ID};
use regiontree::infrastructure::di::ServiceContainer;
use regiontree::infrastructure::InfraError;

fn container(
    settings: Settings,
    http: Arc<StubHttpClient>,
) -> (ServiceContainer, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::default());
    let container = ServiceContainer::with_deps(
        settings,
        http,
        sleeper.clone(),
        Arc::new(RecordingLogger::default()),
    )
    .unwrap();
    (container, sleeper)
}

#[test]
fn given_settings_when_building_navigator_then_resolver_uses_configured_account_and_throttle() {
    let http = Arc::new(
        StubHttpClient::new()
            .respond(EARTH_ID, children_xml(&[(6255146, "Africa")]))
            .respond(6255146, children_xml(&[(1, "Country1")])),
    );
    let settings = Settings {
        username: "carol".into(),
        throttle_secs: 0.1,
        host: "geonames.test".into(),
        ..Settings::default()
    };
    let (container, sleeper) = container(settings, http.clone());

    let navigator = container.navigator().unwrap();

    assert_eq!(navigator.countries().len(), 1);
    assert!(http.requests()[0].starts_with("http://geonames.test/children?"));
    assert!(http.requests()[0].ends_with("username=carol"));
    assert!(sleeper
        .sleeps()
        .iter()
        .all(|d| *d == Duration::from_millis(100)));
}

#[test]
fn given_sibling_order_setting_when_creating_export_service_then_applied() {
    let settings = Settings {
        export: ExportConfig {
            sibling_order: SiblingOrder::Id,
        },
        ..Settings::default()
    };
    let (container, _) = container(settings, Arc::new(StubHttpClient::new()));
    let tree = regiontree::TreeBuilder::new(Arc::new(
        StubResolver::default().with(EARTH_ID, &[(9, "Z"), (3, "A")]),
    ))
    .build()
    .unwrap();

    let mut out = Vec::new();
    container.export_service().write_report(&tree, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.find("A (3)").unwrap() < text.find("Z (9)").unwrap());
}

#[test]
fn given_invalid_throttle_when_wiring_then_error() {
    let settings = Settings {
        throttle_secs: f64::NAN,
        ..Settings::default()
    };

    let result = ServiceContainer::with_deps(
        settings,
        Arc::new(StubHttpClient::new()),
        Arc::new(RecordingSleeper::default()),
        Arc::new(RecordingLogger::default()),
    );

    assert!(matches!(result, Err(InfraError::Application(_))));
}
