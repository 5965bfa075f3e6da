//! Admin store management. The role check here only saves a round trip; the
//! server enforces it as well.

use clap::Subcommand;
use rust_decimal::Decimal;
use storefront_api::{NewProduct, UserUpdate};
use storefront_core::{filter_orders, sort_orders, OrderSort, OrderStatus, Role, Session};

use crate::orders::print_orders;
use crate::{fmt_date, fmt_money, truncate, Context};

/// Sub-commands available under `admin`.
#[derive(Debug, Subcommand)]
pub enum AdminCommands {
    /// List every order in the store
    Orders {
        /// Match order id or item name (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        /// Only orders in this status
        #[arg(long)]
        status: Option<OrderStatus>,
        #[arg(long, default_value_t = OrderSort::DateDesc)]
        sort: OrderSort,
    },
    /// Move an order to a new status
    SetStatus {
        order_id: String,
        /// pending, processing, confirmed, shipped, delivered or cancelled
        status: OrderStatus,
    },
    /// Manage user accounts
    Users {
        #[command(subcommand)]
        command: AdminUsersCommands,
    },
    /// Add or remove catalog products
    Products {
        #[command(subcommand)]
        command: AdminProductsCommands,
    },
    /// Store-wide totals
    Stats,
}

#[derive(Debug, Subcommand)]
pub enum AdminUsersCommands {
    /// List every account
    List,
    /// Rename an account or change its role
    Update {
        user_id: String,
        #[arg(long)]
        name: Option<String>,
        /// user or admin
        #[arg(long)]
        role: Option<Role>,
    },
    /// Delete an account
    Delete { user_id: String },
}

#[derive(Debug, Subcommand)]
pub enum AdminProductsCommands {
    /// Add a product to the catalog
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        category: String,
        /// Image URL or path stored with the product
        #[arg(long)]
        image: String,
        /// List the product as unavailable
        #[arg(long)]
        out_of_stock: bool,
    },
    /// Remove a product from the catalog
    Delete { product_id: String },
}

fn require_admin(ctx: &Context) -> anyhow::Result<Session> {
    let session = ctx.require_session()?;
    if !session.is_admin() {
        anyhow::bail!("{} is not an admin account", session.user.email);
    }
    Ok(session)
}

pub(crate) async fn run_admin_orders(
    ctx: &Context,
    search: Option<&str>,
    status: Option<OrderStatus>,
    sort: OrderSort,
) -> anyhow::Result<()> {
    let session = require_admin(ctx)?;
    let token = session.bearer_token().unwrap_or_default();
    let client = ctx.client()?;
    let orders = client.list_all_orders(token).await?;

    let mut visible = filter_orders(&orders, search.unwrap_or_default());
    if let Some(status) = status {
        visible.retain(|o| o.status == status);
    }
    if visible.is_empty() {
        println!("no matching orders");
        return Ok(());
    }
    sort_orders(&mut visible, sort);
    print_orders(&visible, true);
    println!();
    println!("{} of {} order(s)", visible.len(), orders.len());
    Ok(())
}

pub(crate) async fn run_admin_set_status(
    ctx: &Context,
    order_id: &str,
    status: OrderStatus,
) -> anyhow::Result<()> {
    let session = require_admin(ctx)?;
    let token = session.bearer_token().unwrap_or_default();
    let client = ctx.client()?;
    client.update_order_status(token, order_id, status).await?;
    println!("order {order_id} is now {status}");
    Ok(())
}

pub(crate) async fn run_admin_users_list(ctx: &Context) -> anyhow::Result<()> {
    let session = require_admin(ctx)?;
    let token = session.bearer_token().unwrap_or_default();
    let users = ctx.client()?.list_users(token).await?;
    if users.is_empty() {
        println!("no users");
        return Ok(());
    }
    println!("{:<26}{:<24}{:<32}{:<8}JOINED", "ID", "NAME", "EMAIL", "ROLE");
    for user in &users {
        println!(
            "{:<26}{:<24}{:<32}{:<8}{}",
            user.id,
            truncate(&user.name, 22),
            truncate(&user.email, 30),
            user.role.to_string(),
            fmt_date(user.created_at)
        );
    }
    println!();
    println!("{} user(s)", users.len());
    Ok(())
}

pub(crate) async fn run_admin_users_update(
    ctx: &Context,
    user_id: &str,
    name: Option<String>,
    role: Option<Role>,
) -> anyhow::Result<()> {
    let update = UserUpdate {
        name: name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        role,
    };
    if update.name.is_none() && update.role.is_none() {
        anyhow::bail!("nothing to update; pass --name and/or --role");
    }
    let session = require_admin(ctx)?;
    let token = session.bearer_token().unwrap_or_default();
    ctx.client()?.update_user(token, user_id, &update).await?;
    println!("user {user_id} updated");
    Ok(())
}

pub(crate) async fn run_admin_users_delete(ctx: &Context, user_id: &str) -> anyhow::Result<()> {
    let session = require_admin(ctx)?;
    if session.user.id == user_id {
        anyhow::bail!("refusing to delete the account you are logged in with");
    }
    let token = session.bearer_token().unwrap_or_default();
    ctx.client()?.delete_user(token, user_id).await?;
    println!("user {user_id} deleted");
    Ok(())
}

pub(crate) async fn run_admin_products_create(
    ctx: &Context,
    product: &NewProduct,
) -> anyhow::Result<()> {
    if product.name.trim().is_empty() || product.category.trim().is_empty() {
        anyhow::bail!("product name and category must not be blank");
    }
    if product.price <= Decimal::ZERO {
        anyhow::bail!("price must be greater than zero");
    }
    let session = require_admin(ctx)?;
    let token = session.bearer_token().unwrap_or_default();
    let created = ctx.client()?.create_product(token, product).await?;
    println!(
        "created {} ({}) at {}",
        created.name,
        created.id,
        fmt_money(created.price)
    );
    Ok(())
}

pub(crate) async fn run_admin_products_delete(
    ctx: &Context,
    product_id: &str,
) -> anyhow::Result<()> {
    let session = require_admin(ctx)?;
    let token = session.bearer_token().unwrap_or_default();
    ctx.client()?.delete_product(token, product_id).await?;
    println!("product {product_id} deleted");
    Ok(())
}

pub(crate) async fn run_admin_stats(ctx: &Context) -> anyhow::Result<()> {
    let session = require_admin(ctx)?;
    let token = session.bearer_token().unwrap_or_default();
    let stats = ctx.client()?.admin_stats(token).await?;
    println!("users:    {}", stats.total_users);
    println!("products: {}", stats.total_products);
    println!("orders:   {}", stats.total_orders);
    println!("revenue:  {}", fmt_money(stats.total_revenue));
    Ok(())
}
