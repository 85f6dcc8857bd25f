use crate::features::world::MostradorWorld;
use cucumber::{given, then, when};
use futures::future::join_all;
use mostrador_core::api::Credentials;
use mostrador_core::navigator::NavigationEvent;
use mostrador_core::Error;
use serde_json::{json, Value};

#[given(expr = "the back-office API is running")]
async fn given_api_running(world: &mut MostradorWorld) {
    world.start_api().await;
    world.start_in_memory();
    world.ensure_initialized().await;
}

#[given(expr = "{string} has signed in with password {string}")]
async fn given_signed_in_via_api(world: &mut MostradorWorld, username: String, password: String) {
    world
        .backoffice()
        .auth()
        .login(&Credentials::new(username, password))
        .await
        .expect("login");
}

#[when(expr = "{int} concurrent requests to {string} are sent")]
async fn when_concurrent_requests(world: &mut MostradorWorld, count: usize, path: String) {
    let client = world.backoffice().client().clone();
    let requests = (0..count).map(|_| client.get::<Value>(&path));
    world.responses = join_all(requests).await;
}

#[when(expr = "a sale is posted to {string}")]
async fn when_sale_posted(world: &mut MostradorWorld, path: String) {
    let client = world.backoffice().client().clone();
    let response = client.post::<_, Value>(&path, &json!({"total": -1})).await;
    world.responses = vec![response];
}

#[when(expr = "{string} signs in with password {string}")]
async fn when_signs_in(world: &mut MostradorWorld, username: String, password: String) {
    let result = world.backoffice().auth().login(&Credentials::new(username, password)).await;
    world.login_result = Some(result);
}

#[when(expr = "{string} signs out through the API")]
async fn when_signs_out(world: &mut MostradorWorld, _username: String) {
    world.backoffice().auth().logout().await.expect("logout");
}

#[then(expr = "every request fails with an expired session")]
async fn then_all_expired(world: &mut MostradorWorld) {
    assert!(!world.responses.is_empty());
    for response in &world.responses {
        assert!(matches!(response, Err(Error::SessionExpired)), "got {:?}", response);
    }
}

#[then(expr = "the request fails with status {int} and message {string}")]
async fn then_request_fails(world: &mut MostradorWorld, status: u16, message: String) {
    match world.responses.first() {
        Some(Err(Error::ApplicationError { status: actual, payload })) => {
            assert_eq!(*actual, status);
            assert_eq!(payload["message"], Value::String(message));
        }
        other => panic!("expected an application error, got {:?}", other),
    }
}

#[then(expr = "the login fails with status {int}")]
async fn then_login_fails(world: &mut MostradorWorld, status: u16) {
    match &world.login_result {
        Some(Err(err)) => assert_eq!(err.status(), Some(status)),
        other => panic!("expected a failed login, got {:?}", other),
    }
}

#[then(expr = "the session is cleared")]
async fn then_session_cleared(world: &mut MostradorWorld) {
    let state = world.backoffice().session().snapshot();
    assert!(state.identity.is_none());
    assert!(!state.authenticated);
}

#[then(expr = "the persisted session is erased")]
async fn then_persisted_erased(world: &mut MostradorWorld) {
    let persistence = world.persistence.as_ref().expect("no in-memory persistence");
    assert!(persistence.entry().is_none());
    assert_eq!(persistence.erase_count(), 1);
}

#[then(expr = "exactly {int} hard redirect to {string} was issued")]
async fn then_hard_redirects(world: &mut MostradorWorld, count: usize, href: String) {
    let redirects: Vec<NavigationEvent> = world
        .navigator
        .events()
        .into_iter()
        .filter(|event| matches!(event, NavigationEvent::HardRedirect(_)))
        .collect();
    assert_eq!(redirects.len(), count);
    assert!(redirects.iter().all(|event| *event == NavigationEvent::HardRedirect(href.clone())));
}

#[then(expr = "no hard redirect was issued")]
async fn then_no_hard_redirect(world: &mut MostradorWorld) {
    assert_eq!(world.navigator.hard_redirects(), 0);
}

#[then(expr = "the session still belongs to {string}")]
async fn then_session_still(world: &mut MostradorWorld, username: String) {
    let state = world.backoffice().session().snapshot();
    assert!(state.is_authenticated());
    assert_eq!(state.identity.map(|identity| identity.username), Some(username));
}
