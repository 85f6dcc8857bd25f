use super::backoffice_for;
use anyhow::Result;
use mostrador_core::api::Credentials;
use mostrador_core::config::MostradorConfig;
use mostrador_core::session::Identity;

pub async fn login(config: MostradorConfig, username: &str, password: &str) -> Result<()> {
    let backoffice = backoffice_for(config, None).await?;

    match backoffice.auth().login(&Credentials::new(username, password)).await {
        Ok(identity) => {
            println!("Signed in as {}", describe(&identity));
            Ok(())
        }
        Err(e) => anyhow::bail!("Login failed: {}", e.user_message()),
    }
}

pub async fn logout(config: MostradorConfig) -> Result<()> {
    let backoffice = backoffice_for(config, None).await?;
    if backoffice.session().snapshot().identity.is_none() {
        println!("No active session");
        return Ok(());
    }

    backoffice.auth().logout().await?;
    println!("Signed out");
    Ok(())
}

pub async fn whoami(config: MostradorConfig, check: bool) -> Result<()> {
    let backoffice = backoffice_for(config, None).await?;

    if check {
        backoffice.restore().await?;
    }

    match backoffice.session().snapshot().identity {
        Some(identity) => println!("{}", describe(&identity)),
        None => println!("Not signed in"),
    }
    Ok(())
}

fn describe(identity: &Identity) -> String {
    let mut out = format!("{} (id {}) roles {}", identity.username, identity.id, identity.roles);
    if let Some(email) = &identity.email {
        out.push_str(&format!(" <{}>", email));
    }
    if let Some(parent) = identity.parent_id {
        out.push_str(&format!(", sub-account of {}", parent));
    }
    if !identity.active {
        out.push_str(", inactive");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_sub_account() {
        let identity = Identity::new(8, "luis", ["cajero"].into_iter().collect())
            .with_email("luis@mostrador.test")
            .with_parent(7);
        assert_eq!(
            describe(&identity),
            "luis (id 8) roles [cajero] <luis@mostrador.test>, sub-account of 7"
        );
    }
}
