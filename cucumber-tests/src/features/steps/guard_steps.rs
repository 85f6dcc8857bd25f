use crate::features::world::{parse_roles, MostradorWorld};
use cucumber::{given, then, when};
use mostrador_core::guard::GuardDecision;
use mostrador_core::navigator::NavigationEvent;
use mostrador_core::session::Identity;

#[given(expr = "a back office with an in-memory session")]
async fn given_in_memory_backoffice(world: &mut MostradorWorld) {
    world.start_in_memory();
}

#[given(expr = "no one is signed in")]
async fn given_anonymous(world: &mut MostradorWorld) {
    world.ensure_initialized().await;
}

#[given(expr = "the session has not been restored yet")]
async fn given_not_restored(world: &mut MostradorWorld) {
    assert!(!world.backoffice().session().snapshot().initialized);
}

#[given(expr = "{string} is signed in with roles {string}")]
async fn given_signed_in(world: &mut MostradorWorld, username: String, roles: String) {
    world.ensure_initialized().await;
    let id = username.bytes().map(i64::from).sum();
    let identity = Identity::new(id, username, parse_roles(&roles));
    world.backoffice().session().complete_login(identity).await;
}

#[when(expr = "{string} is opened")]
async fn when_opened(world: &mut MostradorWorld, href: String) {
    world.decision = Some(world.backoffice().guard(&href));
}

#[then(expr = "the page is rendered")]
async fn then_rendered(world: &mut MostradorWorld) {
    assert_eq!(world.decision, Some(GuardDecision::Render));
    assert!(world.navigator.events().is_empty());
}

#[then(expr = "the page is not rendered")]
async fn then_not_rendered(world: &mut MostradorWorld) {
    let decision = world.decision.as_ref().expect("no guard evaluated");
    assert!(!decision.should_render());
}

#[then(expr = "the guard is pending")]
async fn then_pending(world: &mut MostradorWorld) {
    assert_eq!(world.decision, Some(GuardDecision::Pending));
}

#[then(expr = "the navigator went to {string}")]
async fn then_navigated(world: &mut MostradorWorld, href: String) {
    assert_eq!(world.navigator.events(), vec![NavigationEvent::Navigate(href)]);
}

#[then(expr = "no navigation happened")]
async fn then_no_navigation(world: &mut MostradorWorld) {
    assert!(world.navigator.events().is_empty());
}
