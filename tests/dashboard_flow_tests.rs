use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use axum_extra::extract::cookie::Key;
use gatehouse::{
    AppState,
    db::{self, DashboardUsersStorage},
    gatehouse_router,
};
use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

/// SQLite file under the temp dir, removed on drop.
struct TempDatabase {
    path: PathBuf,
}

impl TempDatabase {
    fn new(name: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "gatehouse-{name}-{}-{nanos}.sqlite",
            std::process::id()
        ));
        Self { path }
    }

    fn url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

struct Harness {
    app: Router,
    state: AppState,
    dashboard_users: DashboardUsersStorage,
    cookies: HashMap<String, String>,
    _db: TempDatabase,
}

impl Harness {
    async fn new(name: &str) -> Self {
        let db = TempDatabase::new(name);
        let pool = db::connect(&db.url())
            .await
            .expect("failed to open database");
        let dashboard_users = DashboardUsersStorage::new(pool.clone());
        let state = AppState::new(pool, Key::generate(), true);
        let app = gatehouse_router(state.clone());

        Self {
            app,
            state,
            dashboard_users,
            cookies: HashMap::new(),
            _db: db,
        }
    }

    async fn send(&mut self, method: &str, uri: &str, form: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };

        let resp = self
            .app
            .clone()
            .oneshot(builder.body(body).expect("failed to build request"))
            .await
            .expect("request failed");
        self.store_cookies(&resp);
        resp
    }

    async fn get(&mut self, uri: &str) -> Response<Body> {
        self.send("GET", uri, None).await
    }

    async fn post(&mut self, uri: &str, form: &str) -> Response<Body> {
        self.send("POST", uri, Some(form)).await
    }

    fn store_cookies(&mut self, resp: &Response<Body>) {
        for value in resp.headers().get_all(header::SET_COOKIE) {
            let raw = value.to_str().expect("set-cookie was not ascii");
            let pair = raw.split(';').next().unwrap_or_default();
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            if value.is_empty() || raw.contains("Max-Age=0") {
                self.cookies.remove(name.trim());
            } else {
                self.cookies
                    .insert(name.trim().to_string(), value.to_string());
            }
        }
    }

    async fn register_and_login(&mut self) {
        let resp = self
            .post(
                "/register",
                "email=a%40x.com&username=alice&password=p1&confirm_password=p1",
            )
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let resp = self.post("/login", "username=alice&password=p1").await;
        assert_eq!(location(&resp), "/dashboard");
    }
}

fn location(resp: &Response<Body>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn body_text(resp: Response<Body>) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}

#[tokio::test]
async fn register_login_and_manage_dashboard_users() {
    let mut h = Harness::new("flow").await;
    h.register_and_login().await;
    assert_eq!(h.state.accounts.count().await.unwrap(), 1);

    let resp = h.get("/dashboard").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("alice"));
    assert!(html.contains("No users yet."));

    let resp = h
        .post("/create_user", "username=bob&email=b%40x.com&password=pw")
        .await;
    assert_eq!(location(&resp), "/dashboard");
    let records = h.state.records.list().await.unwrap();
    assert_eq!(records.len(), 1);
    let id = records[0].id;
    let html = body_text(h.get("/dashboard").await).await;
    assert!(html.contains("User created successfully"));
    assert!(html.contains(r#"value="bob""#));

    let before = h.dashboard_users.get_by_id(id).await.unwrap().unwrap();
    let resp = h
        .post(
            &format!("/edit_user/{id}"),
            "username=bobby&email=b%40x.com&password=",
        )
        .await;
    assert_eq!(location(&resp), "/dashboard");
    let after = h.dashboard_users.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(after.username, "bobby");
    assert_eq!(after.password_hash, before.password_hash);

    let resp = h.post(&format!("/delete_user/{id}"), "").await;
    assert_eq!(location(&resp), "/dashboard");
    assert!(h.state.records.list().await.unwrap().is_empty());
    let html = body_text(h.get("/dashboard").await).await;
    assert!(html.contains("User deleted successfully"));
    assert!(html.contains("No users yet."));

    // Flash messages are shown once.
    let html = body_text(h.get("/dashboard").await).await;
    assert!(!html.contains("User deleted successfully"));
}

#[tokio::test]
async fn anonymous_requests_are_redirected_without_mutation() {
    let mut h = Harness::new("anonymous").await;
    let id = h
        .state
        .records
        .create("b@x.com", "bob", "pw")
        .await
        .unwrap();

    let resp = h.get("/dashboard").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let resp = h
        .post("/create_user", "username=eve&email=e%40x.com&password=pw")
        .await;
    assert_eq!(location(&resp), "/");

    let resp = h
        .post(&format!("/edit_user/{id}"), "username=eve&email=e%40x.com&password=")
        .await;
    assert_eq!(location(&resp), "/");

    let resp = h.post(&format!("/delete_user/{id}"), "").await;
    assert_eq!(location(&resp), "/");

    let records = h.state.records.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].username, "bob");
}

#[tokio::test]
async fn registration_errors_rerender_the_form() {
    let mut h = Harness::new("register-errors").await;

    let resp = h
        .post(
            "/register",
            "email=a%40x.com&username=alice&password=p1&confirm_password=p2",
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Passwords do not match"));
    assert_eq!(h.state.accounts.count().await.unwrap(), 0);

    h.register_and_login().await;
    let resp = h
        .post(
            "/register",
            "email=a%40x.com&username=someone&password=p&confirm_password=p",
        )
        .await;
    assert!(
        body_text(resp)
            .await
            .contains("Username or email already registered")
    );
    assert_eq!(h.state.accounts.count().await.unwrap(), 1);
}

#[tokio::test]
async fn failed_login_shows_generic_error() {
    let mut h = Harness::new("login-errors").await;
    h.state
        .accounts
        .register("a@x.com", "alice", "p1", "p1")
        .await
        .unwrap();

    let wrong_password = body_text(h.post("/login", "username=alice&password=nope").await).await;
    let unknown_user = body_text(h.post("/login", "username=mallory&password=p1").await).await;

    assert!(wrong_password.contains("Invalid credentials"));
    assert!(unknown_user.contains("Invalid credentials"));
    assert!(h.cookies.is_empty());
}

#[tokio::test]
async fn index_redirects_when_signed_in_and_logout_clears_session() {
    let mut h = Harness::new("session").await;

    let resp = h.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains(r#"action="/login""#));

    h.register_and_login().await;
    let resp = h.get("/").await;
    assert_eq!(location(&resp), "/dashboard");

    let resp = h.get("/logout").await;
    assert_eq!(location(&resp), "/");
    let resp = h.get("/dashboard").await;
    assert_eq!(location(&resp), "/");
}

#[tokio::test]
async fn unknown_ids_return_not_found() {
    let mut h = Harness::new("not-found").await;
    h.register_and_login().await;
    h.state
        .records
        .create("b@x.com", "bob", "pw")
        .await
        .unwrap();

    let resp = h
        .post("/edit_user/999", "username=x&email=x%40x.com&password=")
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = h.post("/delete_user/999", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(h.state.records.count().await.unwrap(), 1);
}

#[tokio::test]
async fn colliding_create_flashes_an_error() {
    let mut h = Harness::new("create-conflict").await;
    h.register_and_login().await;
    h.post("/create_user", "username=bob&email=b%40x.com&password=pw")
        .await;
    h.get("/dashboard").await;

    let resp = h
        .post("/create_user", "username=bob&email=other%40x.com&password=pw")
        .await;
    assert_eq!(location(&resp), "/dashboard");
    assert_eq!(h.state.records.count().await.unwrap(), 1);

    let html = body_text(h.get("/dashboard").await).await;
    assert!(html.contains(r#"<div class="error">Username or email already registered</div>"#));
}

#[tokio::test]
async fn colliding_edit_flashes_an_error() {
    let mut h = Harness::new("edit-conflict").await;
    h.register_and_login().await;
    h.state
        .records
        .create("b@x.com", "bob", "pw")
        .await
        .unwrap();
    let id = h
        .state
        .records
        .create("c@x.com", "carol", "pw")
        .await
        .unwrap();

    let resp = h
        .post(
            &format!("/edit_user/{id}"),
            "username=bob&email=c%40x.com&password=",
        )
        .await;
    assert_eq!(location(&resp), "/dashboard");
    let row = h.dashboard_users.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(row.username, "carol");

    let html = body_text(h.get("/dashboard").await).await;
    assert!(html.contains(r#"<div class="error">Username or email already registered</div>"#));
}

#[tokio::test]
async fn blank_username_cannot_register_or_be_managed() {
    let mut h = Harness::new("blank-fields").await;

    let resp = h
        .post(
            "/register",
            "email=a%40x.com&username=&password=p1&confirm_password=p1",
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        body_text(resp)
            .await
            .contains("Email and username are required")
    );
    assert_eq!(h.state.accounts.count().await.unwrap(), 0);

    let resp = h.post("/login", "username=&password=p1").await;
    assert!(body_text(resp).await.contains("Invalid credentials"));
    assert!(h.cookies.is_empty());

    h.register_and_login().await;
    let id = h
        .state
        .records
        .create("b@x.com", "bob", "pw")
        .await
        .unwrap();

    let resp = h
        .post("/create_user", "username=&email=e%40x.com&password=pw")
        .await;
    assert_eq!(location(&resp), "/dashboard");
    let resp = h
        .post(&format!("/edit_user/{id}"), "username=bob&email=&password=")
        .await;
    assert_eq!(location(&resp), "/dashboard");

    assert_eq!(h.state.records.count().await.unwrap(), 1);
    let row = h.dashboard_users.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(row.email, "b@x.com");
    let html = body_text(h.get("/dashboard").await).await;
    assert!(html.contains(r#"<div class="error">Email and username are required</div>"#));
}
