use anyhow::{Result, ensure};
use cover::{
    app_lib::{AppConfig, KeyValueStore, MemoryStore},
    features::auth::{AccessClass, Credentials, GuardDecision, RouteGuard, SessionManager},
    routes::{History, Navigator, Outcome, Router, paths},
};
use serde_json::{Value, json};
use std::{net::TcpListener, sync::Arc, time::Duration};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn manager(base_url: &str, history: &Arc<History>) -> Result<(SessionManager, Arc<MemoryStore>)> {
    let config = AppConfig::default().with_base_url(base_url);
    let storage = Arc::new(MemoryStore::new());
    let session = SessionManager::new(&config, storage.clone(), history.clone())?;
    Ok((session, storage))
}

async fn mount_login(server: &MockServer, role: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "T1",
            "user": {"id": 1, "display_name": "Ana", "email": "a@b.com", "role": role}
        })))
        .mount(server)
        .await;
}

fn redirected_to(outcome: &Outcome, target: &str) -> bool {
    matches!(outcome, Outcome::Redirected { to, .. } if to.path == target)
}

#[tokio::test]
async fn signed_out_user_is_sent_to_login() -> Result<()> {
    let history = Arc::new(History::default());
    let (session, _) = manager("http://127.0.0.1:9", &history)?;
    session.restore().await;

    let mut router = Router::new(session.store(), history.clone());

    let outcome = router.open(paths::TABLES).await;
    ensure!(redirected_to(&outcome, paths::LOGIN), "unexpected {outcome:?}");
    ensure!(history.current_path() == paths::LOGIN, "navigator not updated");

    let outcome = router.open(paths::REGISTER).await;
    ensure!(matches!(outcome, Outcome::Rendered(view) if view.path == paths::REGISTER), "unexpected {outcome:?}");

    let outcome = router.open(paths::ROOT).await;
    ensure!(redirected_to(&outcome, paths::LOGIN), "unexpected {outcome:?}");

    ensure!(router.open("/no-such-view").await == Outcome::NotFound, "expected not found");
    Ok(())
}

#[tokio::test]
async fn guard_waits_for_restore_before_deciding() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 1, "email": "a@b.com", "role": "staff"}))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;

    let history = Arc::new(History::new(paths::DASHBOARD));
    let (session, storage) = manager(&server.uri(), &history)?;
    storage.set("token", "T1")?;

    let mut guard = RouteGuard::new(session.store());
    let restoring = session.clone();
    let restore = tokio::spawn(async move { restoring.restore().await });

    // give restore time to start the request
    tokio::time::sleep(Duration::from_millis(20)).await;
    ensure!(
        guard.decide(AccessClass::Protected) == GuardDecision::Loading,
        "protected view must wait"
    );
    ensure!(
        guard.decide(AccessClass::Public) == GuardDecision::Render,
        "public view never waits"
    );

    let decision = guard.settle(AccessClass::Protected).await;
    ensure!(decision == GuardDecision::Render, "unexpected {decision:?}");
    ensure!(restore.await?.is_authenticated(), "restore must authenticate");
    Ok(())
}

#[tokio::test]
async fn roles_gate_restricted_views() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_login(&server, "staff").await;

    let history = Arc::new(History::new(paths::LOGIN));
    let (session, _) = manager(&server.uri(), &history)?;
    session.login(&Credentials::new("a@b.com", "secret123")).await?;

    let mut router = Router::new(session.store(), history.clone());

    let outcome = router.open(paths::FINANCES).await;
    ensure!(matches!(outcome, Outcome::Forbidden(view) if view.path == paths::FINANCES), "unexpected {outcome:?}");

    let outcome = router.open(paths::LOGIN).await;
    ensure!(redirected_to(&outcome, paths::DEFAULT_LANDING), "unexpected {outcome:?}");

    let outcome = router.open(paths::ROOT).await;
    ensure!(redirected_to(&outcome, paths::DEFAULT_LANDING), "unexpected {outcome:?}");
    Ok(())
}

#[tokio::test]
async fn expired_session_redirects_on_next_navigation() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_login(&server, "admin").await;
    Mock::given(method("GET"))
        .and(path("/eventos"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let history = Arc::new(History::new(paths::LOGIN));
    let (session, _) = manager(&server.uri(), &history)?;
    session.login(&Credentials::new("a@b.com", "secret123")).await?;

    let mut router = Router::new(session.store(), history.clone());
    let outcome = router.open(paths::EVENTS).await;
    ensure!(matches!(outcome, Outcome::Rendered(_)), "unexpected {outcome:?}");

    let result = session.gateway().get_json::<Value>("/eventos").await;
    ensure!(result.is_err(), "expected rejection");
    ensure!(history.current_path() == paths::LOGIN, "gateway must redirect");

    let outcome = router.open(paths::EVENTS).await;
    ensure!(redirected_to(&outcome, paths::LOGIN), "unexpected {outcome:?}");
    Ok(())
}
