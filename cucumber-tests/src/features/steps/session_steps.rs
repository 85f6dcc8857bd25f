use crate::features::world::MostradorWorld;
use cucumber::{given, then, when};

#[given(expr = "a back office persisting sessions to a temporary directory")]
async fn given_persistent_backoffice(world: &mut MostradorWorld) {
    world.start_persistent();
}

#[given(expr = "the back-office API serves it")]
async fn given_api_for_persistent(world: &mut MostradorWorld) {
    world.start_api().await;
    world.restart_backoffice();
    world.ensure_initialized().await;
}

#[when(expr = "the back office restarts")]
async fn when_restarts(world: &mut MostradorWorld) {
    world.restart_backoffice();
    world.ensure_initialized().await;
}

#[when(expr = "the user logs out")]
async fn when_logs_out(world: &mut MostradorWorld) {
    world.backoffice().session().logout().await;
}

#[when(expr = "the session is confirmed with the server")]
async fn when_session_confirmed(world: &mut MostradorWorld) {
    let restored = world.backoffice().auth().restore().await.expect("session check");
    assert!(restored.is_some(), "server rejected the restored session");
}

#[then(expr = "the session belongs to {string}")]
async fn then_session_belongs_to(world: &mut MostradorWorld, username: String) {
    let state = world.backoffice().session().snapshot();
    assert!(state.is_authenticated());
    assert_eq!(state.identity.map(|identity| identity.username), Some(username));
}

#[then(expr = "no one is signed in anymore")]
async fn then_signed_out(world: &mut MostradorWorld) {
    let state = world.backoffice().session().snapshot();
    assert!(state.initialized);
    assert!(state.identity.is_none());
    assert!(!state.authenticated);
}

#[then(expr = "the persisted session file exists")]
async fn then_file_exists(world: &mut MostradorWorld) {
    let dir = world.state_dir.as_ref().expect("no state dir");
    assert!(dir.path().join("mostrador-session.json").exists());
}

#[then(expr = "the persisted session file is gone")]
async fn then_file_gone(world: &mut MostradorWorld) {
    let dir = world.state_dir.as_ref().expect("no state dir");
    assert!(!dir.path().join("mostrador-session.json").exists());
}

#[then(expr = "the persisted cookie jar is gone")]
async fn then_cookie_jar_gone(world: &mut MostradorWorld) {
    let dir = world.state_dir.as_ref().expect("no state dir");
    assert!(!dir.path().join("mostrador-session.cookies.json").exists());
}
