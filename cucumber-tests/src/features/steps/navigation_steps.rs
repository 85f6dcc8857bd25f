use crate::features::world::{parse_roles, MostradorWorld};
use cucumber::{given, then, when};
use mostrador_core::navigation::{filter_navigation, NavigationTree};
use mostrador_core::rbac::ModulePath;

fn module(raw: &str) -> ModulePath {
    ModulePath::parse(raw).expect("module path")
}

#[given(expr = "the back-office navigation")]
async fn given_backoffice_navigation(world: &mut MostradorWorld) {
    world.start_in_memory();
}

#[when(expr = "the menu is filtered for roles {string}")]
async fn when_menu_filtered(world: &mut MostradorWorld, roles: String) {
    let backoffice = world.backoffice();
    let menu = filter_navigation(backoffice.navigation(), &parse_roles(&roles), backoffice.checker().as_ref());
    world.menu = Some(menu);
}

#[then(expr = "filtering the menu again for roles {string} changes nothing")]
async fn then_filter_idempotent(world: &mut MostradorWorld, roles: String) {
    let menu = world.menu.clone().expect("menu not filtered yet");
    let backoffice = world.backoffice();
    let again = filter_navigation(&menu, &parse_roles(&roles), backoffice.checker().as_ref());
    assert_eq!(again, menu, "filtering is not idempotent");
}

fn menu(world: &MostradorWorld) -> &NavigationTree {
    world.menu.as_ref().expect("menu not filtered yet")
}

#[then(expr = "the menu contains {string}")]
async fn then_menu_contains(world: &mut MostradorWorld, id: String) {
    assert!(menu(world).find(&module(&id)).is_some(), "{} missing from menu", id);
}

#[then(expr = "the menu does not contain {string}")]
async fn then_menu_lacks(world: &mut MostradorWorld, id: String) {
    assert!(menu(world).find(&module(&id)).is_none(), "{} should be hidden", id);
}

#[then(expr = "the menu is empty")]
async fn then_menu_empty(world: &mut MostradorWorld) {
    assert!(menu(world).is_empty());
}

#[then(expr = "the menu lists {string}")]
async fn then_menu_lists(world: &mut MostradorWorld, ids: String) {
    let actual: Vec<String> = menu(world).iter().map(|node| node.id.to_string()).collect();
    let expected: Vec<String> = ids.split(',').map(|id| id.trim().to_string()).collect();
    assert_eq!(actual, expected);
}
