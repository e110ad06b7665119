//! Profile commands

use crate::context::AppContext;
use crate::output::{print_json, Status};
use crate::OutputFormat;
use anyhow::{bail, Result};
use clap::Args;
use homecook_api_client::endpoints::Profile;
use homecook_app::listing::ViewState;
use homecook_app::profile::ProfileView;
use tracing::debug;

/// Fields to change; anything left out keeps its saved value
#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    /// First name
    #[arg(long)]
    pub first_name: Option<String>,

    /// Last name
    #[arg(long)]
    pub last_name: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// First address line
    #[arg(long)]
    pub address: Option<String>,

    /// City
    #[arg(long)]
    pub city: Option<String>,

    /// Post code
    #[arg(long)]
    pub post_code: Option<String>,

    /// Country
    #[arg(long)]
    pub country: Option<String>,
}

impl ProfileArgs {
    fn apply(self, profile: &mut Profile) {
        let fields = [
            (self.first_name, &mut profile.first_name),
            (self.last_name, &mut profile.last_name),
            (self.phone, &mut profile.phone_number),
            (self.address, &mut profile.address_line1),
            (self.city, &mut profile.city),
            (self.post_code, &mut profile.post_code),
            (self.country, &mut profile.country),
        ];
        for (value, field) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

fn view(ctx: &AppContext) -> ProfileView {
    ProfileView::new(ctx.client.clone(), ctx.notifier.clone(), ctx.session.clone())
}

async fn load(view: &ProfileView) -> Result<Profile> {
    match view.load().await {
        ViewState::Ready(profile) => Ok(profile),
        _ => bail!("Could not load profile"),
    }
}

/// Print the saved profile
pub async fn show(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let session = ctx.require_session().await?;
    let view = view(ctx);
    let profile = load(&view).await?;

    if format == OutputFormat::Json {
        return print_json(&profile);
    }

    if !session.is_profile_complete {
        Status::info("No profile saved yet. Use `homecook profile save`.");
        return Ok(());
    }

    Status::header(&format!("{} {}", profile.first_name, profile.last_name));
    Status::field("Phone", &profile.phone_number);
    Status::field("Address", &profile.address_line1);
    Status::field("City", &profile.city);
    Status::field("Post code", &profile.post_code);
    Status::field("Country", &profile.country);
    println!();
    Ok(())
}

/// Create or update the profile
pub async fn save(ctx: &AppContext, args: ProfileArgs) -> Result<()> {
    ctx.require_session().await?;
    let view = view(ctx);
    let label = view.submit_label();

    let mut profile = load(&view).await?;
    args.apply(&mut profile);

    debug!(action = label, "Submitting profile");
    view.save(profile).await?;
    Ok(())
}
