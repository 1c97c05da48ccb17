use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::Router;
use degree_admin::api::{ApiClient, HttpSource, ListQuery};
use degree_admin::console::AdminConsole;
use degree_admin::model::*;
use list_controller::{ApiError, LoadStatus, NoticeKind, ResourceListController, SubmitError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A request the fake backend received, path relative to `/api/`.
#[derive(Debug, Clone, PartialEq)]
struct Hit {
    method: String,
    path: String,
    query: Option<String>,
    body: Value,
}

type Reply = (StatusCode, String);

/// Scripted REST backend: replies are queued per `"METHOD path"`; anything
/// unscripted gets an empty 200.
#[derive(Clone, Default)]
struct Backend {
    replies: Arc<Mutex<HashMap<String, VecDeque<Reply>>>>,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl Backend {
    fn reply(&self, route: &str, status: StatusCode, body: Value) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(route.to_string())
            .or_default()
            .push_back((status, body.to_string()));
        self
    }

    fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    fn routes_hit(&self) -> Vec<String> {
        self.hits()
            .into_iter()
            .map(|h| format!("{} {}", h.method, h.path))
            .collect()
    }
}

async fn record(State(backend): State<Backend>, method: Method, uri: Uri, body: Bytes) -> Reply {
    let path = uri.path().trim_start_matches("/api/").to_string();
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let route = format!("{method} {path}");
    backend.hits.lock().unwrap().push(Hit {
        method: method.to_string(),
        path,
        query: uri.query().map(str::to_string),
        body,
    });
    backend
        .replies
        .lock()
        .unwrap()
        .get_mut(&route)
        .and_then(VecDeque::pop_front)
        .unwrap_or((StatusCode::OK, String::new()))
}

async fn serve(backend: Backend) -> ApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(record).with_state(backend);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    ApiClient::with_client(reqwest::Client::new(), &format!("http://{addr}/api/"))
}

fn faculties() -> Value {
    json!({"data": [
        {"id": 1, "name": "Engineering", "code": "ING"},
        {"id": 2, "name": "Law", "code": "DER", "active": false}
    ]})
}

#[tokio::test]
async fn load_reads_enveloped_list_and_sends_query() {
    let backend = Backend::default();
    backend.reply("GET faculties", StatusCode::OK, faculties());
    let client = serve(backend.clone()).await;

    let controller = ResourceListController::new(HttpSource::<Faculty>::new(client, "faculties"));
    let collection = controller
        .load(ListQuery::default().with_status("active"))
        .await;

    assert_eq!(collection.status(), LoadStatus::Loaded);
    let names: Vec<_> = collection.items().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Engineering", "Law"]);
    assert!(!collection.items()[1].active);
    assert_eq!(backend.hits()[0].query.as_deref(), Some("status=active"));
}

#[tokio::test]
async fn program_list_is_filtered_by_parent() {
    let backend = Backend::default();
    backend.reply(
        "GET programs",
        StatusCode::OK,
        json!({"content": [{"id": 5, "name": "Systems", "facultyId": 1}]}),
    );
    let console = AdminConsole::new(serve(backend.clone()).await, Duration::from_secs(3));

    console
        .programs
        .load(ListQuery::default().with_parent("facultyId", 1))
        .await;

    assert_eq!(console.programs.collection().items().len(), 1);
    assert_eq!(backend.hits()[0].query.as_deref(), Some("facultyId=1"));
}

#[tokio::test]
async fn create_posts_the_draft_then_reloads() {
    let backend = Backend::default();
    backend.reply(
        "GET programs",
        StatusCode::OK,
        json!([{"id": 9, "name": "Civil Engineering", "code": "ICV", "facultyId": 2}]),
    );
    let console = AdminConsole::new(serve(backend.clone()).await, Duration::from_secs(3));

    let session = console.programs.begin_create(ProgramDraft {
        name: "Civil Engineering".into(),
        code: "ICV".into(),
        faculty_id: Some(FacultyId(2)),
    });
    console.programs.submit(&session).await.unwrap();

    assert!(session.is_closed());
    assert_eq!(backend.routes_hit(), vec!["POST programs", "GET programs"]);
    assert_eq!(
        backend.hits()[0].body,
        json!({"name": "Civil Engineering", "code": "ICV", "facultyId": 2})
    );
    let notice = console.programs.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.text, "Program created successfully");
    assert_eq!(console.programs.collection().items().len(), 1);
}

#[tokio::test]
async fn edit_puts_to_the_item_path() {
    let backend = Backend::default();
    backend.reply("GET faculties", StatusCode::OK, faculties());
    let console = AdminConsole::new(serve(backend.clone()).await, Duration::from_secs(3));

    console.faculties.load(ListQuery::default()).await;
    let law = console.faculties.collection().items()[1].clone();
    let mut session = console.faculties.begin_edit(&law);
    session.draft_mut().name = "Law and Politics".into();
    console.faculties.submit(&session).await.unwrap();

    let hits = backend.hits();
    assert_eq!(hits[1].method, "PUT");
    assert_eq!(hits[1].path, "faculties/2");
    assert_eq!(
        hits[1].body,
        json!({"name": "Law and Politics", "code": "DER", "description": null})
    );
    // Reload reuses the params of the first load.
    assert_eq!(hits[2].method, "GET");
    assert_eq!(hits[2].query, None);
}

#[tokio::test]
async fn server_message_is_shown_and_session_stays_open() {
    let backend = Backend::default();
    backend.reply(
        "POST faculties",
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({"status": 422, "message": "Code already exists"}),
    );
    let console = AdminConsole::new(serve(backend.clone()).await, Duration::from_secs(3));

    let session = console.faculties.begin_create(FacultyDraft {
        name: "Medicine".into(),
        code: "ING".into(),
        description: None,
    });
    let err = console.faculties.submit(&session).await.unwrap_err();

    assert_eq!(
        err,
        SubmitError::Api(ApiError::Validation {
            status: 422,
            message: Some("Code already exists".into()),
        })
    );
    assert!(session.is_open());
    assert_eq!(console.faculties.notice().unwrap().text, "Code already exists");
    // No reload after a failure.
    assert_eq!(backend.routes_hit(), vec!["POST faculties"]);
}

#[tokio::test]
async fn missing_parent_blocks_the_request() {
    let backend = Backend::default();
    let console = AdminConsole::new(serve(backend.clone()).await, Duration::from_secs(3));

    let session = console.programs.begin_create(ProgramDraft {
        name: "Architecture".into(),
        code: " ".into(),
        faculty_id: None,
    });
    let err = console.programs.submit(&session).await.unwrap_err();

    assert_eq!(
        err,
        SubmitError::MissingFields(vec!["code".into(), "facultyId".into()])
    );
    assert!(backend.hits().is_empty());
}

#[tokio::test]
async fn status_toggle_patches_and_reloads() {
    let backend = Backend::default();
    backend
        .reply("GET faculties", StatusCode::OK, faculties())
        .reply("GET faculties", StatusCode::OK, faculties());
    let console = AdminConsole::new(serve(backend.clone()).await, Duration::from_secs(3));

    console.faculties.load(ListQuery::default()).await;
    let engineering = console.faculties.collection().items()[0].clone();
    console
        .faculties
        .set_active(&engineering, false)
        .await
        .unwrap();

    let hits = backend.hits();
    assert_eq!(hits[1].method, "PATCH");
    assert_eq!(hits[1].path, "faculties/1/status");
    assert_eq!(hits[1].body, json!({"active": false}));
    assert_eq!(hits.len(), 3);
    assert_eq!(console.faculties.notice().unwrap().text, "Faculty status updated");
}

#[tokio::test]
async fn delete_without_server_message_gets_generic_text() {
    let backend = Backend::default();
    backend
        .reply("GET roles", StatusCode::OK, json!({"roles": [{"id": 3, "name": "COORDINATOR"}]}))
        .reply("DELETE roles/3", StatusCode::CONFLICT, json!({}));
    let console = AdminConsole::new(serve(backend.clone()).await, Duration::from_secs(3));

    console.roles.load(ListQuery::default()).await;
    let role = console.roles.collection().items()[0].clone();
    let err = console.roles.delete(&role).await.unwrap_err();

    assert_eq!(
        err,
        ApiError::Validation {
            status: 409,
            message: None
        }
    );
    assert_eq!(
        console.roles.notice().unwrap().text,
        "The server rejected the request to delete roles"
    );
}

#[tokio::test]
async fn council_decision_goes_through_cancellations_screen() {
    let backend = Backend::default();
    let pending = json!([{
        "id": 14, "studentName": "Ana Ruiz", "reason": "Moving abroad", "status": "PENDING"
    }]);
    backend
        .reply("GET cancellation-requests", StatusCode::OK, pending)
        .reply("GET cancellation-requests", StatusCode::OK, json!([]));
    let console = AdminConsole::new(serve(backend.clone()).await, Duration::from_secs(3));

    console
        .cancellations
        .load(ListQuery::default().with_status("PENDING"))
        .await;
    let request = console.cancellations.collection().items()[0].clone();
    console
        .decide_cancellation(&request, Decision::Approved, Some("Documents verified".into()))
        .await
        .unwrap();

    let hits = backend.hits();
    assert_eq!(hits[1].path, "cancellation-requests/14/decision");
    assert_eq!(
        hits[1].body,
        json!({"decision": "APPROVED", "comment": "Documents verified"})
    );
    assert_eq!(hits[2].query.as_deref(), Some("status=PENDING"));
    assert_eq!(
        console.cancellations.notice().unwrap().text,
        "Cancellation request approved"
    );
    assert!(console.cancellations.collection().items().is_empty());
}

#[tokio::test]
async fn role_assignment_posts_under_the_user() {
    let backend = Backend::default();
    backend.reply(
        "GET users",
        StatusCode::OK,
        json!([{"id": 7, "email": "jperez@uni.edu", "roles": ["STUDENT"]}]),
    );
    let console = AdminConsole::new(serve(backend.clone()).await, Duration::from_secs(3));

    console.users.load(ListQuery::default()).await;
    let user = console.users.collection().items()[0].clone();
    console.assign_role(&user, RoleId(3)).await.unwrap();
    console.revoke_role(&user, RoleId(3)).await.unwrap();

    assert_eq!(
        backend.routes_hit(),
        vec![
            "GET users",
            "POST users/7/roles",
            "GET users",
            "DELETE users/7/roles/3",
            "GET users",
        ]
    );
    assert_eq!(backend.hits()[1].body, json!({"roleId": 3}));
    assert_eq!(console.users.notice().unwrap().text, "User role revoked");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = ApiClient::with_client(reqwest::Client::new(), &format!("http://{addr}/api"));
    let console = AdminConsole::new(client, Duration::from_secs(3));

    let collection = console.modalities.load(ListQuery::default()).await;

    assert_eq!(collection.status(), LoadStatus::Error);
    assert_eq!(collection.error(), Some("Could not load modalities"));
    assert!(console.modalities.notice().unwrap().is_error());
}

#[tokio::test]
async fn notices_name_the_screen_in_plain_words() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = ApiClient::with_client(reqwest::Client::new(), &format!("http://{addr}/api"));
    let console = AdminConsole::new(client, Duration::from_secs(3));

    console.cancellations.load(ListQuery::default()).await;
    console.documents.load(ListQuery::default()).await;
    console.program_modalities.load(ListQuery::default()).await;

    assert_eq!(
        console.cancellations.collection().error(),
        Some("Could not load cancellation requests")
    );
    assert_eq!(
        console.documents.collection().error(),
        Some("Could not load required documents")
    );
    assert_eq!(
        console.program_modalities.notice().unwrap().text,
        "Could not load program modalities"
    );
}

#[tokio::test]
async fn envelope_keyed_by_api_plural_still_loads() {
    let backend = Backend::default();
    backend.reply(
        "GET required-documents",
        StatusCode::OK,
        json!({"requiredDocuments": [
            {"id": 4, "name": "Transcript", "modalityId": 1},
            {"name": "Missing id"}
        ], "total": 2}),
    );
    let console = AdminConsole::new(serve(backend.clone()).await, Duration::from_secs(3));

    let collection = console.documents.load(ListQuery::default()).await;

    assert_eq!(collection.status(), LoadStatus::Loaded);
    let names: Vec<_> = collection.items().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Transcript"]);
}
