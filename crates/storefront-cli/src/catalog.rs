//! Product and review command handlers. Browsing needs no login; posting a
//! review does.

use clap::Subcommand;
use storefront_core::catalog::average_rating;
use storefront_core::{Product, Review};

use crate::{fmt_date, fmt_money, truncate, Context};

/// Sub-commands available under `products`.
#[derive(Debug, Subcommand)]
pub enum ProductsCommands {
    /// List the catalog
    List {
        /// Only products in this category ("all" for no filter)
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one product with its reviews
    Show { product_id: String },
}

/// Sub-commands available under `reviews`.
#[derive(Debug, Subcommand)]
pub enum ReviewsCommands {
    /// List reviews for a product
    List { product_id: String },
    /// Review a product (requires login)
    Add {
        product_id: String,
        /// Star rating from 1 to 5
        #[arg(long)]
        rating: i64,
        #[arg(long)]
        comment: String,
    },
}

fn stock_label(product: &Product) -> &'static str {
    if product.in_stock {
        "in stock"
    } else {
        "out of stock"
    }
}

fn print_reviews(reviews: &[Review]) {
    if reviews.is_empty() {
        println!("no reviews yet");
        return;
    }
    if let Some(avg) = average_rating(reviews) {
        println!("{} review(s), average {avg:.1}/5", reviews.len());
    }
    for review in reviews {
        println!(
            "  [{}/5] {} ({}): {}",
            review.rating,
            review.user.name,
            fmt_date(review.created_at),
            review.comment
        );
    }
}

pub(crate) async fn run_products_list(ctx: &Context, category: Option<&str>) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let products = client.list_products(category).await?;

    if products.is_empty() {
        println!(
            "no products found{}",
            category
                .map(|c| format!(" in category {c}"))
                .unwrap_or_default()
        );
        return Ok(());
    }

    let header = format!(
        "{:<26}{:<32}{:<16}{:>10}  STOCK",
        "ID", "NAME", "CATEGORY", "PRICE"
    );
    println!("{header}");
    for product in &products {
        println!(
            "{:<26}{:<32}{:<16}{:>10}  {}",
            truncate(&product.id, 24),
            truncate(&product.name, 29),
            truncate(product.category.as_deref().unwrap_or("\u{2014}"), 14),
            fmt_money(product.price),
            stock_label(product),
        );
    }
    Ok(())
}

pub(crate) async fn run_products_show(ctx: &Context, product_id: &str) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let product = client.get_product(product_id).await?;

    println!("{} ({})", product.name, product.id);
    println!("Price: {}", fmt_money(product.price));
    println!("Availability: {}", stock_label(&product));
    if let Some(category) = &product.category {
        println!("Category: {category}");
    }
    if let Some(description) = product.description.as_deref().filter(|d| !d.trim().is_empty()) {
        println!();
        println!("{description}");
    }
    println!();

    match client.list_reviews(product_id).await {
        Ok(reviews) => print_reviews(&reviews),
        Err(e) => tracing::warn!(error = %e, product_id, "could not load reviews"),
    }
    Ok(())
}

pub(crate) async fn run_reviews_list(ctx: &Context, product_id: &str) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let reviews = client.list_reviews(product_id).await?;
    print_reviews(&reviews);
    Ok(())
}

/// Validate the rating locally, then post the review as the logged-in user.
///
/// # Errors
///
/// Returns an error for an out-of-range rating, a blank comment, a missing
/// session, or a server rejection (for instance a duplicate review).
pub(crate) async fn run_reviews_add(
    ctx: &Context,
    product_id: &str,
    rating: i64,
    comment: &str,
) -> anyhow::Result<()> {
    let rating = Review::validate_rating(rating)?;
    let comment = comment.trim();
    if comment.is_empty() {
        anyhow::bail!("review comment must not be empty");
    }
    let session = ctx.require_session()?;
    let token = session.bearer_token().unwrap_or_default();

    let client = ctx.client()?;
    let review = client.create_review(token, product_id, rating, comment).await?;
    println!("review {} posted ({}/5)", review.id, review.rating);
    Ok(())
}
