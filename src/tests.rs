//! Integration tests for the MovieDB web app.
//!
//! The catalog is replaced by an in-process fake OMDb endpoint so every
//! envelope shape, including slow responses, can be exercised.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use reqwest::{redirect::Policy, Client};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::catalog::MISSING_API_KEY_MESSAGE;
use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::errors::GENERIC_FAILURE_MESSAGE;
use crate::forms::SignupFlow;
use crate::pages::INVALID_CREDENTIALS_MESSAGE;
use crate::{create_router, AppState};

const TEST_API_KEY: &str = "test-api-key";
const EMAIL: &str = "demo@example.com";
const PASSWORD: &str = "Password123";

/// Fake OMDb endpoint that counts every request it receives.
#[derive(Clone, Default)]
struct FakeCatalog {
    hits: Arc<AtomicUsize>,
}

fn summary(id: &str, title: &str, poster: &str) -> Value {
    json!({ "Title": title, "Year": "2005", "imdbID": id, "Type": "movie", "Poster": poster })
}

async fn fake_omdb(
    State(fake): State<FakeCatalog>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    fake.hits.fetch_add(1, Ordering::SeqCst);

    if params.get("apikey").map(String::as_str) != Some(TEST_API_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "Response": "False", "Error": "Invalid API key!" })),
        );
    }

    let slow = params.values().any(|v| v == "slow" || v == "ttslow");
    if slow {
        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    let body = if let Some(title) = params.get("s") {
        match title.as_str() {
            "Batman" => json!({
                "Search": [
                    summary("tt0372784", "Batman Begins", "https://example.com/begins.jpg"),
                    summary("tt0096895", "Batman", "https://example.com/batman.jpg"),
                    summary("tt0468569", "The Dark Knight", "N/A"),
                ],
                "totalResults": "3",
                "Response": "True"
            }),
            _ => json!({ "Response": "False", "Error": "Movie not found!" }),
        }
    } else {
        match params.get("i").map(String::as_str) {
            Some("tt0372784") => json!({
                "Title": "Batman Begins",
                "Year": "2005",
                "Rated": "PG-13",
                "Released": "15 Jun 2005",
                "Runtime": "140 min",
                "Genre": "Action, Crime, Drama",
                "Director": "Christopher Nolan",
                "Writer": "Bob Kane, David S. Goyer",
                "Actors": "Christian Bale, Michael Caine",
                "Plot": "A young heir becomes a vigilante.",
                "Language": "English",
                "Country": "United States",
                "Poster": "https://example.com/begins.jpg",
                "imdbRating": "8.2",
                "imdbID": "tt0372784",
                "Type": "movie",
                "BoxOffice": "$206,863,479",
                "Response": "True"
            }),
            Some("tt0000001") => json!({
                "Title": "Carmencita",
                "Year": "1894",
                "Runtime": "1 min",
                "Director": "N/A",
                "Plot": "Performing on what looks like a small wooden stage.",
                "Poster": "N/A",
                "imdbRating": "N/A",
                "imdbID": "tt0000001",
                "Type": "movie",
                "Response": "True"
            }),
            _ => json!({ "Response": "False", "Error": "Incorrect IMDb ID." }),
        }
    };

    (StatusCode::OK, Json(body))
}

/// Bind a router to a random port and return its base URL.
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    catalog_hits: Arc<AtomicUsize>,
    config: Config,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_api_key(Some(TEST_API_KEY.to_string())).await
    }

    async fn with_api_key(api_key: Option<String>) -> Self {
        Self::start(api_key, Duration::ZERO).await
    }

    async fn with_signup_delay(submit_delay: Duration) -> Self {
        Self::start(Some(TEST_API_KEY.to_string()), submit_delay).await
    }

    async fn start(api_key: Option<String>, submit_delay: Duration) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Fake catalog
        let fake = FakeCatalog::default();
        let catalog_hits = fake.hits.clone();
        let catalog_url = spawn(Router::new().route("/", get(fake_omdb)).with_state(fake)).await;

        let config = test_config(db_path, format!("{}/", catalog_url), api_key);
        let state = build_state_with_delay(&config, submit_delay).await;
        let base_url = spawn(create_router(state)).await;

        // Wait for servers to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        TestFixture {
            client: Client::builder().redirect(Policy::none()).build().unwrap(),
            base_url,
            catalog_hits,
            config,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn hits(&self) -> usize {
        self.catalog_hits.load(Ordering::SeqCst)
    }

    async fn login(&self) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .form(&[("email", EMAIL), ("password", PASSWORD)])
            .send()
            .await
            .unwrap()
    }

    async fn get_page(&self, path: &str) -> (reqwest::StatusCode, String) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status();
        (status, resp.text().await.unwrap())
    }
}

fn test_config(db_path: PathBuf, omdb_base_url: String, omdb_api_key: Option<String>) -> Config {
    Config {
        omdb_api_key,
        omdb_base_url,
        request_timeout: Duration::from_millis(300),
        auth_username: Some(EMAIL.to_string()),
        auth_password: Some(PASSWORD.to_string()),
        seed_query: "Batman".to_string(),
        db_path,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "warn".to_string(),
    }
}

async fn build_state(config: &Config) -> AppState {
    build_state_with_delay(config, Duration::ZERO).await
}

async fn build_state_with_delay(config: &Config, submit_delay: Duration) -> AppState {
    let pool = init_database(&config.db_path).await.expect("Failed to init DB");
    let mut state = AppState::build(config.clone(), Repository::new(pool))
        .await
        .expect("Failed to build state");

    // A confirmation that outlives the test
    state.signup = Arc::new(Mutex::new(SignupFlow::new(
        submit_delay,
        Duration::from_secs(60),
    )));
    state
}

fn card_count(html: &str) -> usize {
    html.matches("class=\"movie-card\"").count()
}

fn location(resp: &reqwest::Response) -> Option<&str> {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_page("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_protected_routes_redirect_to_login() {
    let fixture = TestFixture::new().await;

    for path in ["/", "/?q=Batman", "/movie/tt0372784"] {
        let resp = fixture.client.get(fixture.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 303, "{path}");
        assert_eq!(location(&resp), Some("/login"), "{path}");
    }

    assert_eq!(fixture.hits(), 0);
}

#[tokio::test]
async fn test_session_gate_without_network() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(
        temp_dir.path().join("test.sqlite"),
        "http://127.0.0.1:9/".to_string(),
        Some(TEST_API_KEY.to_string()),
    );
    let app = create_router(build_state(&config).await);

    let resp = app
        .oneshot(Request::builder().uri("/movie/tt0372784").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/login");
}

#[tokio::test]
async fn test_login_validation_errors() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/login"))
        .form(&[("email", ""), ("password", "short")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 422);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Email is required"));
    assert!(body.contains("Password must be at least 8 characters"));

    let (status, _) = fixture.get_page("/").await;
    assert_eq!(status, 303);
}

#[tokio::test]
async fn test_login_wrong_credentials() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/login"))
        .form(&[("email", EMAIL), ("password", "WrongPassword1")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body = resp.text().await.unwrap();
    assert!(body.contains(INVALID_CREDENTIALS_MESSAGE));
    // The email is echoed back into the form
    assert!(body.contains(EMAIL));

    let (status, _) = fixture.get_page("/").await;
    assert_eq!(status, 303);
}

#[tokio::test]
async fn test_login_then_seed_search() {
    let fixture = TestFixture::new().await;

    let resp = fixture.login().await;
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), Some("/"));

    let (status, body) = fixture.get_page("/").await;
    assert_eq!(status, 200);
    assert_eq!(card_count(&body), 3);
    assert!(body.contains("href=\"/movie/tt0372784\""));
    assert!(body.contains("href=\"/movie/tt0096895\""));
    assert!(body.contains("href=\"/movie/tt0468569\""));
    assert!(body.contains("Found 3 results"));
    assert!(body.contains("No image"));
    // Username derived from the email
    assert!(body.contains(">demo<"));
    assert_eq!(fixture.hits(), 1);

    // Returning to the page shows the same results without a new request
    let (_, body) = fixture.get_page("/").await;
    assert_eq!(card_count(&body), 3);
    assert_eq!(fixture.hits(), 1);
}

#[tokio::test]
async fn test_login_page_redirects_when_logged_in() {
    let fixture = TestFixture::new().await;
    fixture.login().await;

    let resp = fixture.client.get(fixture.url("/login")).send().await.unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), Some("/"));
}

#[tokio::test]
async fn test_search_not_found_message() {
    let fixture = TestFixture::new().await;
    fixture.login().await;

    let (status, body) = fixture.get_page("/?q=zzzz").await;
    assert_eq!(status, 200);
    assert!(body.contains("Movie not found!"));
    assert_eq!(card_count(&body), 0);
}

#[tokio::test]
async fn test_blank_search_issues_no_request() {
    let fixture = TestFixture::new().await;
    fixture.login().await;

    let (_, body) = fixture.get_page("/").await;
    assert_eq!(card_count(&body), 3);
    assert_eq!(fixture.hits(), 1);

    let (status, body) = fixture.get_page("/?q=%20%20%20").await;
    assert_eq!(status, 200);
    assert_eq!(fixture.hits(), 1);
    assert_eq!(card_count(&body), 3);
}

#[tokio::test]
async fn test_blank_search_keeps_previous_error() {
    let fixture = TestFixture::new().await;
    fixture.login().await;

    fixture.get_page("/?q=zzzz").await;
    let hits = fixture.hits();

    let (_, body) = fixture.get_page("/?q=").await;
    assert_eq!(fixture.hits(), hits);
    assert!(body.contains("Movie not found!"));
}

#[tokio::test]
async fn test_search_timeout_shows_generic_message() {
    let fixture = TestFixture::new().await;
    fixture.login().await;

    let (status, body) = fixture.get_page("/?q=slow").await;
    assert_eq!(status, 200);
    assert!(body.contains(GENERIC_FAILURE_MESSAGE));
    assert_eq!(card_count(&body), 0);
    assert!(!body.contains("Loading movies"));
}

#[tokio::test]
async fn test_detail_renders_present_fields() {
    let fixture = TestFixture::new().await;
    fixture.login().await;

    let (status, body) = fixture.get_page("/movie/tt0372784").await;
    assert_eq!(status, 200);
    assert!(body.contains("Batman Begins"));
    assert!(body.contains("Genres"));
    assert!(body.contains("Action"));
    assert!(body.contains("Drama"));
    assert!(body.contains("Christopher Nolan"));
    assert!(body.contains("8.2"));
    assert!(body.contains("Box Office"));
}

#[tokio::test]
async fn test_detail_omits_absent_fields() {
    let fixture = TestFixture::new().await;
    fixture.login().await;

    let (status, body) = fixture.get_page("/movie/tt0000001").await;
    assert_eq!(status, 200);
    assert!(body.contains("Carmencita"));
    assert!(!body.contains("Genres"));
    assert!(!body.contains("Director"));
    assert!(!body.contains("IMDb Rating"));
    assert!(!body.contains("N/A"));
}

#[tokio::test]
async fn test_detail_not_found() {
    let fixture = TestFixture::new().await;
    fixture.login().await;

    let (status, body) = fixture.get_page("/movie/tt9999999").await;
    assert_eq!(status, 200);
    assert!(body.contains("Incorrect IMDb ID."));
}

#[tokio::test]
async fn test_detail_timeout_shows_generic_message() {
    let fixture = TestFixture::new().await;
    fixture.login().await;

    let (status, body) = fixture.get_page("/movie/ttslow").await;
    assert_eq!(status, 200);
    assert!(body.contains(GENERIC_FAILURE_MESSAGE));
}

#[tokio::test]
async fn test_overlapping_detail_requests_keep_their_own_record() {
    let fixture = TestFixture::new().await;
    fixture.login().await;

    // The slow lookup is still in flight when the second navigation lands
    let slow = fixture.get_page("/movie/ttslow");
    let fast = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        fixture.get_page("/movie/tt0372784").await
    };
    let ((slow_status, slow_body), (fast_status, fast_body)) = tokio::join!(slow, fast);

    assert_eq!(fast_status, 200);
    assert!(fast_body.contains("Batman Begins"));

    assert_eq!(slow_status, 200);
    assert!(!slow_body.contains("Batman Begins"));
    assert!(slow_body.contains(GENERIC_FAILURE_MESSAGE));

    // The shared view still belongs to the latest navigation
    let (_, body) = fixture.get_page("/movie/tt0372784").await;
    assert!(body.contains("Batman Begins"));
}

#[tokio::test]
async fn test_missing_api_key_never_contacts_catalog() {
    let fixture = TestFixture::with_api_key(None).await;
    fixture.login().await;

    let (status, body) = fixture.get_page("/").await;
    assert_eq!(status, 200);
    assert!(body.contains(MISSING_API_KEY_MESSAGE));

    let (status, body) = fixture.get_page("/movie/tt0372784").await;
    assert_eq!(status, 200);
    assert!(body.contains(MISSING_API_KEY_MESSAGE));

    assert_eq!(fixture.hits(), 0);
}

#[tokio::test]
async fn test_rejected_api_key_message() {
    let fixture = TestFixture::with_api_key(Some("wrong-key".to_string())).await;
    fixture.login().await;

    let (status, body) = fixture.get_page("/").await;
    assert_eq!(status, 200);
    assert!(body.contains("Invalid API key!"));
    assert_eq!(card_count(&body), 0);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let fixture = TestFixture::new().await;
    fixture.login().await;

    let resp = fixture.client.post(fixture.url("/logout")).send().await.unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), Some("/login"));

    let (status, _) = fixture.get_page("/").await;
    assert_eq!(status, 303);
}

#[tokio::test]
async fn test_session_restored_after_restart() {
    let fixture = TestFixture::new().await;
    fixture.login().await;

    // A second state over the same database plays the part of a restarted process
    let restarted = build_state(&fixture.config).await;
    let session = restarted.sessions.current().await.expect("restored session");
    assert_eq!(session.email, EMAIL);
    assert_eq!(session.username, "demo");

    fixture.client.post(fixture.url("/logout")).send().await.unwrap();
    let restarted = build_state(&fixture.config).await;
    assert!(!restarted.sessions.is_authenticated().await);
}

#[tokio::test]
async fn test_signup_flow() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_page("/signup").await;
    assert_eq!(status, 200);
    assert!(body.contains("Sign Up"));

    let resp = fixture
        .client
        .post(fixture.url("/signup"))
        .form(&[
            ("name", "Jo"),
            ("email", "jo@example.com"),
            ("password", "Password1"),
            ("confirmPassword", "Password2"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Passwords do not match"));
    assert!(body.contains("jo@example.com"));
    assert!(!body.contains("Password1"));

    let resp = fixture
        .client
        .post(fixture.url("/signup"))
        .form(&[
            ("name", "Jo"),
            ("email", "jo@example.com"),
            ("password", "Password1"),
            ("confirmPassword", "Password1"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("Account created"));

    let (_, body) = fixture.get_page("/signup").await;
    assert!(body.contains("Account created"));

    // Sign-up never creates a session
    let (status, _) = fixture.get_page("/").await;
    assert_eq!(status, 303);
}

fn valid_signup() -> [(&'static str, &'static str); 4] {
    [
        ("name", "Jo"),
        ("email", "jo@example.com"),
        ("password", "Password1"),
        ("confirmPassword", "Password1"),
    ]
}

#[tokio::test]
async fn test_signup_while_submitting_is_rejected() {
    let fixture = TestFixture::with_signup_delay(Duration::from_millis(500)).await;

    let first = async {
        fixture
            .client
            .post(fixture.url("/signup"))
            .form(&valid_signup())
            .send()
            .await
            .unwrap()
    };
    let second = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        fixture
            .client
            .post(fixture.url("/signup"))
            .form(&valid_signup())
            .send()
            .await
            .unwrap()
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(second.status(), 409);
    assert_eq!(first.status(), 200);
    assert!(first.text().await.unwrap().contains("Account created"));
}

#[tokio::test]
async fn test_signup_during_confirmation_is_rejected() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/signup"))
        .form(&valid_signup())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .post(fixture.url("/signup"))
        .form(&valid_signup())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    assert!(resp.text().await.unwrap().contains("Account created"));
}
