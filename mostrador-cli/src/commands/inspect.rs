use super::backoffice_for;
use anyhow::Result;
use mostrador_core::config::MostradorConfig;
use mostrador_core::guard::GuardDecision;
use mostrador_core::navigation::NavNode;
use mostrador_core::rbac::ModulePath;

pub async fn nav(config: MostradorConfig, roles: Option<Vec<String>>, json: bool) -> Result<()> {
    let backoffice = backoffice_for(config, roles).await?;
    let tree = backoffice.visible_navigation();

    if json {
        println!("{}", tree.to_json_pretty()?);
        return Ok(());
    }
    if tree.is_empty() {
        println!("(no visible entries)");
    }
    for node in tree.nodes() {
        print_node(node, 0);
    }
    Ok(())
}

fn print_node(node: &NavNode, depth: usize) {
    let icon = node.icon.map(|icon| format!("[{}] ", icon)).unwrap_or_default();
    let path = node.path.as_deref().map(|path| format!("  {}", path)).unwrap_or_default();
    println!("{}{}{} ({}){}", "  ".repeat(depth), icon, node.title, node.id, path);
    for child in &node.children {
        print_node(child, depth + 1);
    }
}

pub async fn access(config: MostradorConfig, module: &str, roles: Option<Vec<String>>) -> Result<()> {
    let module = ModulePath::parse(module)?;
    let backoffice = backoffice_for(config, roles).await?;

    let roles = backoffice.session().snapshot().roles().map(ToString::to_string).unwrap_or_default();
    if backoffice.can_access(&module) {
        println!("granted: {} {}", module, roles);
    } else {
        println!("denied: {} {}", module, roles);
    }
    Ok(())
}

pub async fn guard(config: MostradorConfig, href: &str, roles: Option<Vec<String>>) -> Result<()> {
    let backoffice = backoffice_for(config, roles).await?;

    match backoffice.guard(href) {
        GuardDecision::Pending => println!("pending"),
        GuardDecision::Render => println!("render {}", href),
        GuardDecision::Redirect(redirect) => println!("redirect {}", redirect.href),
        GuardDecision::Forbidden { module } => println!("forbidden {}", module),
    }
    Ok(())
}
