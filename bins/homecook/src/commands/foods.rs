//! Browsing commands

use crate::context::AppContext;
use crate::output::{format_count, print_json, truncate, Status};
use crate::OutputFormat;
use anyhow::{bail, Result};
use homecook_api_client::endpoints::Food;
use homecook_app::format::{format_date, format_price};
use homecook_app::listing::{FoodDetailView, FoodFilter, FoodGrid, ViewState};
use owo_colors::OwoColorize;

/// List the category taxonomy
pub async fn categories(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let Some(categories) = ctx.categories.load().await else {
        bail!("Could not load categories");
    };

    if format == OutputFormat::Json {
        return print_json(&categories);
    }

    Status::header("Categories");
    for category in &categories {
        println!("  {:>4}  {}", category.id.dimmed(), category.name);
    }
    println!();
    Ok(())
}

/// List listings, optionally filtered
pub async fn list(
    ctx: &AppContext,
    category: Option<i64>,
    search: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    ctx.require_session().await?;

    let filter = match (category, search) {
        (Some(id), _) => FoodFilter::Category(id),
        (None, Some(term)) => FoodFilter::search(term),
        (None, None) => FoodFilter::All,
    };

    let mut grid = FoodGrid::new(ctx.client.clone(), ctx.notifier.clone(), ctx.categories.clone());
    grid.load(filter).await;
    let ViewState::Ready(foods) = grid.state() else {
        bail!("Could not load listings");
    };

    if format == OutputFormat::Json {
        return print_json(foods);
    }

    let title = match grid.filter() {
        FoodFilter::All => "All food".to_string(),
        FoodFilter::Category(id) => grid
            .categories()
            .await
            .and_then(|all| all.into_iter().find(|c| c.id == *id))
            .map_or_else(|| format!("Category {id}"), |c| c.name),
        FoodFilter::Search(term) => format!("Results for \"{term}\""),
    };
    Status::header(&title);

    if foods.is_empty() {
        Status::info("Nothing for sale right now.");
        return Ok(());
    }

    println!(
        "  {:>5} {:<28} {:>8} {:>5}  {}",
        "Id".dimmed(),
        "Name".dimmed(),
        "Price".dimmed(),
        "Left".dimmed(),
        "Available".dimmed()
    );
    for food in foods {
        print_row(food);
    }
    println!();
    println!("  {}", format_count(foods.len(), "listing", "listings"));
    Ok(())
}

fn print_row(food: &Food) {
    let left = if food.quantity_available == 0 {
        "sold".red().to_string()
    } else {
        food.quantity_available.to_string()
    };
    println!(
        "  {:>5} {:<28} {:>8} {:>5}  {}",
        food.id,
        truncate(&food.name, 28),
        format_price(food.price),
        left,
        format_date(food.available_date.as_deref()).unwrap_or_default()
    );
}

/// Show one listing
pub async fn detail(ctx: &AppContext, id: i64, format: OutputFormat) -> Result<()> {
    ctx.require_session().await?;

    let view = FoodDetailView::new(ctx.client.clone(), ctx.notifier.clone());
    let ViewState::Ready(detail) = view.load(id).await else {
        bail!("Could not load listing {id}");
    };

    if format == OutputFormat::Json {
        return print_json(detail.food());
    }

    let food = detail.food();
    Status::header(&food.name);
    if !food.description.is_empty() {
        println!("  {}", food.description);
        println!();
    }
    Status::field("Price", &detail.price_label());
    if detail.sold_out() {
        Status::field("Left", &"Sold out".red().to_string());
    } else {
        Status::field("Left", &food.quantity_available.to_string());
    }
    if let Some(date) = detail.available_on() {
        Status::field("Available", &date);
    }
    if let Some(category) = &food.category {
        Status::field("Category", &category.name);
    }
    if !food.ingredients.is_empty() {
        Status::field("Ingredients", &food.ingredients.join(", "));
    }
    for url in &food.food_image_urls {
        Status::field("Photo", url);
    }
    println!();
    Ok(())
}
