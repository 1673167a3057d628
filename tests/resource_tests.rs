//! Integration tests for resource actions against a mock server.
//!
//! These tests verify URL resolution, argument dispatch, in-place filling of
//! placeholders, callbacks, interceptors, and error delivery.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wp_resource::clients::HttpMethod;
use wp_resource::rest::{
    ActionArg, ActionDescriptor, Callback, Item, Outcome, ParamBindings, Placeholder, Resolved,
    Resource, ResourceError, Shape,
};
use wp_resource::{BaseUrl, CancelSignal, ClientConfig, ConfigError, HttpClient, HttpError};

fn client_for(server: &MockServer) -> Arc<HttpClient> {
    let config = ClientConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    Arc::new(HttpClient::new(&config).unwrap())
}

fn cards(server: &MockServer) -> Resource {
    Resource::builder(client_for(server), "/user/:userId/card/:cardId")
        .param_defaults(
            ParamBindings::new()
                .literal("userId", 123)
                .binding("cardId", "@id"),
        )
        .action(
            "charge",
            ActionDescriptor::new(HttpMethod::Post)
                .params(ParamBindings::new().literal("charge", true)),
        )
        .build()
        .unwrap()
}

async fn settle(placeholder: &Placeholder) -> Result<Resolved, ResourceError> {
    placeholder.promise().unwrap().await
}

/// Records callback invocations in order.
#[derive(Clone, Default)]
struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

// ============================================================================
// URL resolution and the built-in actions
// ============================================================================

#[tokio::test]
async fn test_get_resolves_defaults_and_fills_entity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/123/card/456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 456,
            "number": "4111"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let card = cards(&server).get(json!({"cardId": 456})).unwrap();
    let entity = card.as_entity().unwrap().clone();
    assert!(!entity.is_resolved());

    let resolved = tokio_test::assert_ok!(settle(&card).await);

    assert!(entity.is_resolved());
    assert_eq!(entity.get("number"), Some(json!("4111")));
    // The default resolved value is the placeholder itself
    assert!(resolved.into_entity().unwrap().ptr_eq(&entity));
}

#[tokio::test]
async fn test_instance_custom_action_uses_entity_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/123/card/456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 456, "number": "4111"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/123/card/456"))
        .and(query_param("charge", "true"))
        .and(body_json(json!({"id": 456, "number": "4111", "amount": 9.99})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 456,
            "number": "4111",
            "charged": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let card = cards(&server).get(json!({"cardId": 456})).unwrap();
    settle(&card).await.unwrap();

    let entity = card.into_entity().unwrap();
    entity.set("amount", 9.99);
    let resolved = entity.invoke("charge", vec![]).unwrap().await.unwrap();

    assert!(resolved.into_entity().unwrap().ptr_eq(&entity));
    assert_eq!(entity.get("charged"), Some(json!(true)));
    // Fields absent from the response are cleared
    assert_eq!(entity.get("amount"), None);
}

#[tokio::test]
async fn test_save_resolves_data_path_from_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/things/abc"))
        .and(body_json(json!({"someProp": "abc", "title": "x"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"someProp": "abc", "id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let things = Resource::builder(client_for(&server), "/things/:thing")
        .param_defaults(ParamBindings::new().binding("thing", "@someProp"))
        .build()
        .unwrap();

    let saved = things.save(json!({"someProp": "abc", "title": "x"})).unwrap();
    let entity = saved.as_entity().unwrap();
    // The placeholder starts out with the sent data
    assert_eq!(entity.get("title"), Some(json!("x")));

    settle(&saved).await.unwrap();
    assert_eq!(entity.get("id"), Some(json!(1)));
}

#[tokio::test]
async fn test_unmatched_params_become_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/123/card"))
        .and(query_param("sort", "name"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let all = cards(&server)
        .query(json!({"sort": "name", "limit": 5}))
        .unwrap();
    settle(&all).await.unwrap();

    assert!(all.as_collection().unwrap().is_empty());
    assert!(all.is_resolved());
}

#[tokio::test]
async fn test_delete_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/user/123/card/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let removed = cards(&server).delete(json!({"cardId": 7})).unwrap();
    settle(&removed).await.unwrap();

    // A 204 has no body, so nothing is merged
    assert!(removed.as_entity().unwrap().fields().is_empty());
    assert!(removed.is_resolved());
}

#[tokio::test]
async fn test_query_wraps_objects_and_keeps_other_elements() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/123/card"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1},
            "loose",
            null,
            {"id": 2}
        ])))
        .mount(&server)
        .await;

    let all = cards(&server).query(json!({})).unwrap();
    settle(&all).await.unwrap();

    let collection = all.as_collection().unwrap();
    assert_eq!(collection.len(), 4);
    assert_eq!(collection.entities().len(), 2);
    assert!(matches!(collection.get(1), Some(Item::Value(Value::String(s))) if s == "loose"));
    assert!(matches!(collection.get(2), Some(Item::Value(Value::Null))));

    // Wrapped entities can run instance actions of their own
    let first = collection.entities().remove(0);
    assert_eq!(first.resource().template().as_str(), "/user/:userId/card/:cardId");
}

// ============================================================================
// Argument dispatch
// ============================================================================

#[tokio::test]
async fn test_five_arguments_fail_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let noop = || ActionArg::Callback(Callback::new(|_| {}));
    let result = cards(&server).call(
        "get",
        vec![
            ActionArg::Data(json!({})),
            ActionArg::Data(json!({})),
            noop(),
            noop(),
            noop(),
        ],
    );

    let error = tokio_test::assert_err!(result);
    assert!(matches!(
        error,
        ConfigError::InvalidArgumentCount { ref action, count: 5, max: 4 } if action == "get"
    ));
}

#[tokio::test]
async fn test_params_and_body_with_callbacks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/9/card/3"))
        .and(body_json(json!({"nickname": "travel"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "nickname": "travel"})))
        .expect(1)
        .mount(&server)
        .await;

    let journal = Journal::default();
    let on_success = {
        let journal = journal.clone();
        Callback::on_success(move |value, response| {
            let entity = value.as_placeholder().unwrap().as_entity().unwrap();
            journal.push(format!(
                "success {} resolved={} nickname={}",
                response.code,
                entity.is_resolved(),
                entity.get("nickname").unwrap()
            ));
        })
    };
    let on_error = {
        let journal = journal.clone();
        Callback::on_error(move |_| journal.push("error"))
    };

    let saved = cards(&server)
        .call(
            "save",
            vec![
                ActionArg::Data(json!({"userId": 9, "cardId": 3})),
                ActionArg::Data(json!({"nickname": "travel"})),
                on_success.into(),
                on_error.into(),
            ],
        )
        .unwrap();
    settle(&saved).await.unwrap();

    assert_eq!(
        journal.entries(),
        vec![r#"success 200 resolved=true nickname="travel""#.to_string()]
    );
}

#[tokio::test]
async fn test_two_callbacks_are_success_and_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/123/card"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "code": "internal_error",
            "message": "Something broke"
        })))
        .mount(&server)
        .await;

    let journal = Journal::default();
    let success = {
        let journal = journal.clone();
        Callback::new(move |_| journal.push("success"))
    };
    let error = {
        let journal = journal.clone();
        Callback::new(move |outcome| {
            if let Outcome::Failure(e) = outcome {
                journal.push(format!("error {}", e.status().unwrap_or(0)));
            }
        })
    };

    let card = cards(&server)
        .call("get", vec![success.into(), error.into()])
        .unwrap();
    let result = settle(&card).await;

    assert_eq!(result.unwrap_err().status(), Some(500));
    assert_eq!(journal.entries(), vec!["error 500".to_string()]);
}

// ============================================================================
// Response shape and failures
// ============================================================================

#[tokio::test]
async fn test_list_action_with_object_response_fails_and_stays_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/123/card"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .mount(&server)
        .await;

    let journal = Journal::default();
    let on_error = {
        let journal = journal.clone();
        Callback::on_error(move |e| journal.push(e.to_string()))
    };

    let all = cards(&server)
        .call(
            "query",
            vec![
                ActionArg::Data(json!({})),
                Callback::new(|_| {}).into(),
                on_error.into(),
            ],
        )
        .unwrap();
    let error = settle(&all).await.unwrap_err();

    assert!(matches!(
        error,
        ResourceError::ResponseShapeMismatch {
            ref action,
            expected: Shape::Array,
            actual: Shape::Object,
        } if action == "query"
    ));
    assert!(all.as_collection().unwrap().is_empty());
    assert!(all.is_resolved());
    assert_eq!(journal.entries().len(), 1);
    assert!(journal.entries()[0].contains("array"));
}

#[tokio::test]
async fn test_singular_action_with_array_response_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/123/card/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .mount(&server)
        .await;

    let card = cards(&server).get(json!({"cardId": 1})).unwrap();
    let error = settle(&card).await.unwrap_err();

    assert!(matches!(
        error,
        ResourceError::ResponseShapeMismatch {
            expected: Shape::Object,
            actual: Shape::Array,
            ..
        }
    ));
}

#[tokio::test]
async fn test_failed_instance_call_keeps_entity_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/123/card/5"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "code": "rest_invalid_param",
            "message": "Invalid parameter(s): number"
        })))
        .mount(&server)
        .await;

    let resource = cards(&server);
    let entity = resource.entity(json!({"id": 5, "number": "bad"}).as_object().cloned().unwrap());

    let error = entity.save().unwrap().await.unwrap_err();

    match error {
        ResourceError::Http(http) => match http.as_ref() {
            HttpError::Response(e) => {
                assert_eq!(e.code, 422);
                assert_eq!(e.message, "Invalid parameter(s): number");
                assert_eq!(e.error_code.as_deref(), Some("rest_invalid_param"));
            }
            other => panic!("unexpected error: {other}"),
        },
        other => panic!("unexpected error: {other}"),
    }
    assert!(entity.is_resolved());
    assert_eq!(entity.get("number"), Some(json!("bad")));
}

#[tokio::test]
async fn test_instance_list_action_fills_fresh_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/123/card/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 5}, {"id": 6}])))
        .mount(&server)
        .await;

    let entity = cards(&server).entity(json!({"id": 5}).as_object().cloned().unwrap());
    let resolved = entity.invoke("query", vec![]).unwrap().await.unwrap();

    let collection = resolved.into_collection().unwrap();
    assert_eq!(collection.len(), 2);
    // The entity itself is untouched
    assert_eq!(entity.to_value(), json!({"id": 5}));
}

// ============================================================================
// Hooks
// ============================================================================

#[tokio::test]
async fn test_transforms_and_interceptor() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(body_json(json!({"post": {"title": "Hi"}})))
        .and(header("X-Requested-With", "wp-resource"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"ID": 10}})))
        .expect(1)
        .mount(&server)
        .await;

    let posts = Resource::builder(client_for(&server), "/posts")
        .action(
            "create",
            ActionDescriptor::new(HttpMethod::Post)
                .header("X-Requested-With", "wp-resource")
                .transform_request(|body| body.map(|b| json!({"post": b})))
                .transform_response(|body| body.map(|b| b["data"].clone()))
                .interceptor(|placeholder, response| {
                    Resolved::Data(json!({
                        "status": response.code,
                        "id": placeholder.to_value()["ID"].clone()
                    }))
                }),
        )
        .build()
        .unwrap();

    let created = posts.call("create", vec![ActionArg::Data(json!({"title": "Hi"}))]).unwrap();
    let resolved = settle(&created).await.unwrap();

    assert_eq!(resolved.as_data(), Some(&json!({"status": 201, "id": 10})));
    assert_eq!(created.to_value(), json!({"ID": 10}));
}

#[tokio::test]
async fn test_error_interceptor_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not found"})))
        .mount(&server)
        .await;

    let journal = Journal::default();
    let posts = Resource::builder(client_for(&server), "/posts/:id")
        .action(
            "find",
            ActionDescriptor::new(HttpMethod::Get).error_interceptor(|error| {
                (error.status() == Some(404)).then(|| Resolved::Data(Value::Null))
            }),
        )
        .build()
        .unwrap();

    let on_error = {
        let journal = journal.clone();
        Callback::on_error(move |_| journal.push("error callback"))
    };
    let found = posts
        .call(
            "find",
            vec![
                ActionArg::Data(json!({"id": 404})),
                Callback::new(|_| {}).into(),
                on_error.into(),
            ],
        )
        .unwrap();
    let resolved = settle(&found).await.unwrap();

    // The error callback runs before the interceptor recovers
    assert_eq!(journal.entries(), vec!["error callback".to_string()]);
    assert_eq!(resolved.as_data(), Some(&Value::Null));
}

// ============================================================================
// Timeouts and cancellation
// ============================================================================

#[tokio::test]
async fn test_timeout_duration_aborts_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let slow = Resource::builder(client_for(&server), "/slow")
        .action(
            "get",
            ActionDescriptor::new(HttpMethod::Get).timeout(Duration::from_millis(50)),
        )
        .build()
        .unwrap();

    let placeholder = slow.get(json!({})).unwrap();
    let error = settle(&placeholder).await.unwrap_err();

    match error {
        ResourceError::Http(http) => {
            assert!(matches!(http.as_ref(), HttpError::TimedOut { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(placeholder.is_resolved());
}

#[tokio::test]
async fn test_cancel_signal_aborts_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let signal = CancelSignal::new();
    let slow = Resource::builder(client_for(&server), "/slow")
        .action("get", ActionDescriptor::new(HttpMethod::Get).timeout(signal.clone()))
        .build()
        .unwrap();

    let placeholder = slow.get(json!({})).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    signal.cancel();

    let error = settle(&placeholder).await.unwrap_err();
    match error {
        ResourceError::Http(http) => assert!(matches!(http.as_ref(), HttpError::Cancelled)),
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_every_awaiter_sees_the_same_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/123/card/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let card = cards(&server).get(json!({"cardId": 1})).unwrap();
    let handle = card.promise().unwrap();

    let other = handle.clone();
    let (a, b) = tokio::join!(handle.wait(), other.wait());
    let a = a.unwrap().into_entity().unwrap();
    let b = b.unwrap().into_entity().unwrap();
    assert!(a.ptr_eq(&b));
}

#[tokio::test]
async fn test_concurrent_invocations_are_independent() {
    let server = MockServer::start().await;
    for id in [1, 2] {
        Mock::given(method("GET"))
            .and(path(format!("/user/123/card/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": id})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let resource = cards(&server);
    let first = resource.get(json!({"cardId": 1})).unwrap();
    let second = resource.get(json!({"cardId": 2})).unwrap();

    let (r1, r2) = tokio::join!(settle(&first), settle(&second));
    r1.unwrap();
    r2.unwrap();

    assert_eq!(first.to_value(), json!({"id": 1}));
    assert_eq!(second.to_value(), json!({"id": 2}));
}
