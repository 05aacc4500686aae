use serde_json::json;
use service_framework::mock::MockTransport;
use service_framework::{
    route, Action, Api, Bus, EventBus, Handler, Method, Payload, Query, RequestArgs, ServiceError,
    ServiceRegistry,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const FONT_SERVICE: &str = r#"{
    "font": {
        "destroy": { "methods": ["DELETE"], "parameters": ["font"], "uri": "v2/fonts/{font}" },
        "index": { "methods": ["GET"], "parameters": [], "uri": "v2/fonts" },
        "show": { "methods": ["GET"], "parameters": ["font"], "uri": "v2/fonts/{font}" },
        "store": { "methods": ["POST"], "parameters": [], "uri": "v2/fonts" },
        "update": { "methods": ["PUT", "PATCH"], "parameters": ["font"], "uri": "v2/fonts/{font}" }
    }
}"#;

struct Fixture {
    api: Api,
    bus: Arc<EventBus>,
    transport: Arc<MockTransport>,
}

fn fixture() -> Fixture {
    let registry = ServiceRegistry::from_json(FONT_SERVICE).expect("valid services");
    let bus = EventBus::shared();
    let transport = Arc::new(MockTransport::new());
    let api = Api::new(registry, bus.clone(), transport.clone());
    Fixture { api, bus, transport }
}

fn url(action: Action, query: &Query) -> String {
    let registry = ServiceRegistry::from_json(FONT_SERVICE).expect("valid services");
    let font = registry.get("font").expect("font service");
    route::build_url(font, action, query).expect("route")
}

fn recording() -> (Handler, Arc<Mutex<Vec<Payload>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let slot = seen.clone();
    let handler = Handler::new(move |payload| slot.lock().unwrap().push(payload.clone()));
    (handler, seen)
}

fn counting() -> (Handler, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let handler = Handler::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (handler, calls)
}

// --- Generated request functions ---

#[tokio::test]
async fn test_destroy_request() {
    let Fixture { api, transport, .. } = fixture();
    let query = Query::new().with("font", "test-font");
    transport
        .on_delete(url(Action::Destroy, &query))
        .reply(200, json!({ "message": "success" }));

    let font = api.service("font").unwrap();
    let response = font.destroy(RequestArgs::new().query(query)).await.unwrap();

    assert_eq!(response, Some(json!({ "message": "success" })));
    assert_eq!(transport.requests()[0].method, Method::Delete);
}

#[tokio::test]
async fn test_index_request() {
    let Fixture { api, transport, .. } = fixture();
    transport
        .on_get(url(Action::Index, &Query::new()))
        .reply(200, json!({ "message": "success" }));

    let font = api.service("font").unwrap();
    let response = font.index(RequestArgs::default()).await.unwrap();

    assert_eq!(response.unwrap()["message"], "success");
}

#[tokio::test]
async fn test_show_request() {
    let Fixture { api, transport, .. } = fixture();
    let query = Query::new().with("font", "test-font");
    transport
        .on_get(url(Action::Show, &query))
        .reply(200, json!({ "message": "success" }));

    let font = api.service("font").unwrap();
    let response = font.show(RequestArgs::new().query(query)).await.unwrap();

    assert_eq!(response.unwrap()["message"], "success");
}

#[tokio::test]
async fn test_store_request() {
    let Fixture { api, transport, .. } = fixture();
    // `store` declares no path parameters, so `font` goes to the query string.
    let query = Query::new().with("font", "test-font");
    let expected_url = url(Action::Store, &query);
    assert_eq!(expected_url, "/v2/fonts?font=test-font");
    transport
        .on_post(expected_url)
        .reply(200, json!({ "message": "success" }));

    let font = api.service("font").unwrap();
    let response = font
        .store(RequestArgs::new().query(query).data(json!({ "name": "Inter" })))
        .await
        .unwrap();

    assert_eq!(response.unwrap()["message"], "success");
    assert_eq!(transport.requests()[0].data, Some(json!({ "name": "Inter" })));
}

#[tokio::test]
async fn test_update_request_uses_patch() {
    let Fixture { api, transport, .. } = fixture();
    let query = Query::new().with("font", "test-font");
    transport
        .on_patch(url(Action::Update, &query))
        .reply(200, json!({ "message": "success" }));

    let font = api.service("font").unwrap();
    let response = font.update(RequestArgs::new().query(query)).await.unwrap();

    assert_eq!(response.unwrap()["message"], "success");
}

// --- Outcome events ---

#[tokio::test]
async fn test_success_event_after_successful_request() {
    let Fixture { api, bus, transport } = fixture();
    transport
        .on_get("/v2/fonts")
        .reply(200, json!({ "message": "success" }));
    let (handler, seen) = recording();
    bus.on("font.index.success", handler);

    let font = api.service("font").unwrap();
    let response = font.index(RequestArgs::new()).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], Payload::Data(json!({ "message": "success" })));
    assert_eq!(seen[0].data(), response.as_ref());
}

#[tokio::test]
async fn test_error_event_after_failed_request() {
    let Fixture { api, bus, transport } = fixture();
    transport
        .on_get("/v2/fonts")
        .reply(401, json!({ "message": "error" }));
    let (handler, seen) = recording();
    let (success, success_calls) = counting();
    bus.on("font.index.error", handler);
    bus.on("font.index.success", success);

    let font = api.service("font").unwrap();
    let error = font.index(RequestArgs::new()).await.unwrap_err();

    assert_eq!(error, ServiceError::Rejected(json!({ "message": "error" })));
    let seen = seen.lock().unwrap();
    assert_eq!(*seen, [Payload::Data(json!({ "message": "error" }))]);
    assert_eq!(success_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_events_are_scoped_to_the_calling_service() {
    let registry = ServiceRegistry::from_json(
        r#"{
            "font": { "index": { "uri": "v2/fonts" } },
            "user": { "index": { "uri": "v2/users" } }
        }"#,
    )
    .unwrap();
    let bus = EventBus::shared();
    let transport = Arc::new(MockTransport::new());
    transport.on_get("/v2/users").reply(200, json!([]));
    let api = Api::new(registry, bus.clone(), transport);

    let (font_handler, font_calls) = counting();
    let (user_handler, user_calls) = counting();
    api.service("font").unwrap().on("index.success", font_handler);
    api.service("user").unwrap().on("index.success", user_handler);

    api.service("user").unwrap().index(RequestArgs::new()).await.unwrap();

    assert_eq!(font_calls.load(Ordering::SeqCst), 0);
    assert_eq!(user_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_calls_each_emit_once() {
    let Fixture { api, bus, transport } = fixture();
    for page in 0..10 {
        transport
            .on_get(format!("/v2/fonts?page={page}"))
            .reply(200, json!({ "page": page }));
    }
    let (handler, seen) = recording();
    bus.on("font.index.success", handler);

    let api = Arc::new(api);
    let mut handles = vec![];
    for page in 0..10i64 {
        let api = api.clone();
        handles.push(tokio::spawn(async move {
            api.service("font")
                .unwrap()
                .index(RequestArgs::new().param("page", page))
                .await
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let mut pages: Vec<i64> = seen
        .lock()
        .unwrap()
        .iter()
        .filter_map(|p| p.data().and_then(|d| d["page"].as_i64()))
        .collect();
    pages.sort();
    assert_eq!(pages, (0..10).collect::<Vec<i64>>());
}

// --- Scoped event operations ---

#[test]
fn test_emit_event_for_service() {
    let Fixture { api, bus, .. } = fixture();
    let (handler, calls) = counting();

    bus.on("font.test", handler);
    api.service("font").unwrap().emit("test", json!({}));

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_register_handler_for_service() {
    let Fixture { api, bus, .. } = fixture();
    let (handler, calls) = counting();

    api.service("font").unwrap().on("test", handler);
    bus.emit("font.test", json!({}).into());
    bus.emit("font.test", json!({}).into());

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_register_single_use_handler_for_service() {
    let Fixture { api, bus, .. } = fixture();
    let (handler, calls) = counting();

    api.service("font").unwrap().once("test", handler);
    bus.emit("font.test", json!({}).into());
    bus.emit("font.test", json!({}).into());

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_remove_handler_from_service() {
    let Fixture { api, bus, .. } = fixture();
    let (handler, calls) = counting();

    bus.on("font.test", handler.clone());
    api.service("font").unwrap().off("test", &handler);
    bus.emit("font.test", json!({}).into());

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_retrieve_handlers_for_service() {
    let Fixture { api, bus, .. } = fixture();
    let (handler, _) = counting();
    let font = api.service("font").unwrap();

    bus.on("font.test", handler.clone());
    assert_eq!(font.subscriptions().len(), 1);

    bus.on("font.test-2", handler.clone());
    assert_eq!(font.subscriptions().len(), 2);

    bus.off("font.test", &handler);
    assert_eq!(font.subscriptions().len(), 1);

    bus.off("font.test-2", &handler);
    assert_eq!(font.subscriptions().len(), 0);
}
