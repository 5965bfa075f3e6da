use clap::Subcommand;
use storefront_api::{ProfileUpdate, Registration};
use storefront_core::{Role, Session};

use crate::{fmt_date, Context};

/// Sub-commands available under `profile`.
#[derive(Debug, Subcommand)]
pub enum ProfileCommands {
    /// Show the profile the server has for the logged-in user
    Show,
    /// Change your display name or email
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
}

pub(crate) async fn run_login(ctx: &Context, email: &str, password: &str) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let session = client.login(email, password).await?;
    let sessions = ctx.sessions();
    sessions.save(&session)?;
    println!(
        "logged in as {} <{}> ({})",
        session.user.name, session.user.email, session.user.role
    );
    tracing::debug!(path = %sessions.path().display(), "session saved");
    Ok(())
}

pub(crate) async fn run_register(
    ctx: &Context,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<()> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        anyhow::bail!("name, email and password must not be blank");
    }
    let registration = Registration {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role,
    };
    ctx.client()?.register(&registration).await?;
    println!("account created for {email}; run `storefront login --email {email}` to sign in");
    Ok(())
}

pub(crate) fn run_logout(ctx: &Context) -> anyhow::Result<()> {
    ctx.sessions().clear()?;
    println!("logged out");
    Ok(())
}

pub(crate) fn run_whoami(ctx: &Context) -> anyhow::Result<()> {
    match ctx.sessions().load() {
        Some(session) => println!(
            "{} <{}> ({})",
            session.user.name, session.user.email, session.user.role
        ),
        None => println!("not logged in"),
    }
    Ok(())
}

pub(crate) async fn run_profile_show(ctx: &Context) -> anyhow::Result<()> {
    let session = ctx.require_session()?;
    let token = session.bearer_token().unwrap_or_default();
    let user = ctx.client()?.get_profile(token).await?;
    println!("id:      {}", user.id);
    println!("name:    {}", user.name);
    println!("email:   {}", user.email);
    println!("role:    {}", user.role);
    println!("joined:  {}", fmt_date(user.created_at));
    if let Some(avatar) = user.avatar.as_deref().filter(|a| !a.is_empty()) {
        println!("avatar:  {avatar}");
    }
    Ok(())
}

/// Apply a profile change and refresh the stored session's copy of the user.
pub(crate) async fn run_profile_update(
    ctx: &Context,
    name: Option<String>,
    email: Option<String>,
) -> anyhow::Result<()> {
    let update = ProfileUpdate {
        name: name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        email: email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
    };
    if update.is_empty() {
        anyhow::bail!("nothing to update; pass --name and/or --email");
    }
    let session = ctx.require_session()?;
    let token = session.bearer_token().unwrap_or_default();
    let user = ctx.client()?.update_profile(token, &update).await?;
    println!("profile updated: {} <{}>", user.name, user.email);

    let refreshed = Session {
        token: session.token.clone(),
        user,
    };
    if let Err(e) = ctx.sessions().save(&refreshed) {
        tracing::warn!(error = %e, "failed to refresh stored session");
    }
    Ok(())
}
