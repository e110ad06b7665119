//! Login, registration and session commands

use crate::context::AppContext;
use crate::output::{print_json, Status};
use crate::OutputFormat;
use anyhow::Result;
use homecook_api_client::endpoints::Credentials;
use owo_colors::OwoColorize;

/// Log in and remember the session
pub async fn login(ctx: &AppContext, email: String, password: String, format: OutputFormat) -> Result<()> {
    let session = ctx.session.login(&Credentials::new(email, password)).await?;

    match format {
        OutputFormat::Json => print_json(&session)?,
        OutputFormat::Text => {
            Status::success(&format!("Logged in as {}", session.display_name().bold()));
            if !session.is_profile_complete {
                Status::info("Add your contact details with `homecook profile save`.");
            }
        }
    }
    Ok(())
}

/// Create an account
pub async fn register(ctx: &AppContext, email: String, password: String) -> Result<()> {
    ctx.session.register(&Credentials::new(email, password)).await?;
    Ok(())
}

/// End the session
pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.session.logout().await?;
    Status::success("Logged out");
    Ok(())
}

/// Show the revalidated session
pub async fn whoami(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let session = ctx.session.initialize().await;

    if format == OutputFormat::Json {
        return print_json(&session);
    }

    let Some(session) = session else {
        return Ok(());
    };

    Status::header(session.display_name());
    Status::field("Id", &session.id.to_string());
    Status::field("Email", &session.user_email);
    Status::field(
        "Profile",
        if session.is_profile_complete { "complete" } else { "incomplete" },
    );
    println!();
    Ok(())
}
