//! Listing creation command

use crate::context::AppContext;
use crate::output::{format_count, print_json, spinner, Status};
use crate::OutputFormat;
use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Args;
use homecook_app::add_food::{AddFoodView, NewFoodForm};
use homecook_app::images::{ImageUploader, PendingFile};
use std::path::PathBuf;
use std::sync::Arc;

/// A dish to put up for sale
#[derive(Args, Debug)]
pub struct AddFoodArgs {
    /// Dish name
    #[arg(long)]
    pub name: String,

    /// Description (at least 20 characters)
    #[arg(long)]
    pub description: String,

    /// Ingredient, repeat for each one
    #[arg(long)]
    pub ingredient: Vec<String>,

    /// Price per portion in pounds
    #[arg(long)]
    pub price: String,

    /// Portions for sale
    #[arg(long)]
    pub quantity: String,

    /// Collection day (YYYY-MM-DD), after today
    #[arg(long)]
    pub date: NaiveDate,

    /// Collection time (HH:MM or HH:MM:SS)
    #[arg(long)]
    pub time: String,

    /// Category id
    #[arg(long)]
    pub category: Option<i64>,

    /// Photo to upload (JPEG, PNG or WebP), repeat for each one
    #[arg(long, required = true)]
    pub image: Vec<PathBuf>,
}

impl AddFoodArgs {
    fn form(&self) -> NewFoodForm {
        let mut form = NewFoodForm {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price.clone(),
            quantity: self.quantity.clone(),
            date: Some(self.date),
            time: self.time.clone(),
            category_id: self.category,
            ..NewFoodForm::default()
        };
        for ingredient in &self.ingredient {
            form.add_ingredient(ingredient);
        }
        form
    }
}

/// Upload the photos and create the listing
pub async fn run(ctx: &AppContext, args: AddFoodArgs, format: OutputFormat) -> Result<()> {
    ctx.require_session().await?;

    // Catch form mistakes before spending an upload
    let form = args.form();
    let problems = form.validate();
    if !problems.is_valid() {
        return Err(homecook_app::AppError::Validation(problems).into());
    }

    let files = args
        .image
        .iter()
        .map(|path| PendingFile::from_path(path))
        .collect::<Result<Vec<_>, _>>()?;

    let uploader = ImageUploader::new(ctx.client.clone(), ctx.client.clone(), ctx.notifier.clone())
        .with_max_files(ctx.config.schema.images.max_files);
    let view = AddFoodView::new(
        ctx.client.clone(),
        ctx.notifier.clone(),
        ctx.history.clone(),
        Arc::new(uploader),
    );

    let pb = spinner(&format!("Uploading {}", format_count(files.len(), "photo", "photos")));
    let outcome = view.uploader().upload(files).await;
    pb.finish_and_clear();
    let outcome = outcome?;

    for name in outcome.failed.iter().chain(&outcome.rejected) {
        Status::warning(&format!("{name} was not uploaded"));
    }
    if !view.can_submit() {
        bail!("No photos were uploaded");
    }

    let food = view.submit(&form).await?;

    match format {
        OutputFormat::Json => print_json(&food)?,
        OutputFormat::Text => Status::success(&format!("Listed {} (id {})", food.name, food.id)),
    }
    Ok(())
}
