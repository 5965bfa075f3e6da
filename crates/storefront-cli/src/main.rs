mod admin;
mod auth;
mod cart;
mod catalog;
mod checkout;
mod orders;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::{Decimal, RoundingStrategy};
use storefront_api::{NewProduct, StorefrontClient};
use storefront_core::{AppConfig, Role, Session};
use storefront_state::{CartStore, JsonFileStorage, SessionStore};
use tracing_subscriber::EnvFilter;

use crate::admin::{AdminCommands, AdminProductsCommands, AdminUsersCommands};
use crate::auth::ProfileCommands;
use crate::cart::CartCommands;
use crate::catalog::{ProductsCommands, ReviewsCommands};
use crate::orders::OrdersCommands;

#[derive(Debug, Parser)]
#[command(name = "storefront")]
#[command(about = "Storefront command line client: browse, fill a cart, place orders")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect and edit the local cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Place an order for everything in the cart
    Checkout,
    /// Log in and keep the session for later commands
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,
        /// user or admin
        #[arg(long, default_value_t = Role::User)]
        role: Role,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// View or edit your account profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        command: ProductsCommands,
    },
    /// Read and write product reviews
    Reviews {
        #[command(subcommand)]
        command: ReviewsCommands,
    },
    /// Your order history
    Orders {
        #[command(subcommand)]
        command: OrdersCommands,
    },
    /// Store-wide order management (admin accounts only)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

/// Configuration plus the handles every command builds from it.
pub(crate) struct Context {
    pub(crate) config: AppConfig,
}

impl Context {
    pub(crate) fn client(&self) -> anyhow::Result<StorefrontClient> {
        Ok(StorefrontClient::new(&self.config)?)
    }

    pub(crate) fn cart_store(&self) -> CartStore<JsonFileStorage> {
        CartStore::open(JsonFileStorage::new(self.config.cart_path()))
    }

    pub(crate) fn sessions(&self) -> SessionStore {
        SessionStore::new(self.config.session_path())
    }

    /// The stored session, or an error telling the user to log in.
    pub(crate) fn require_session(&self) -> anyhow::Result<Session> {
        self.sessions()
            .load()
            .filter(|s| s.bearer_token().is_some())
            .ok_or_else(|| {
                anyhow::anyhow!("not logged in; run `storefront login --email <EMAIL>` first")
            })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = storefront_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        println!("storefront: no command given; run `storefront --help`");
        return Ok(());
    };
    tracing::debug!(env = %config.env, api = %config.api_base_url, "starting");
    let ctx = Context { config };

    match command {
        Commands::Cart { command } => match command {
            CartCommands::Show => cart::run_cart_show(&ctx),
            CartCommands::Add {
                product_id,
                quantity,
            } => cart::run_cart_add(&ctx, &product_id, quantity).await,
            CartCommands::Remove { product_id } => cart::run_cart_remove(&ctx, &product_id),
            CartCommands::Update {
                product_id,
                quantity,
            } => cart::run_cart_update(&ctx, &product_id, quantity),
            CartCommands::Clear => cart::run_cart_clear(&ctx),
        },
        Commands::Checkout => checkout::run_checkout(&ctx).await,
        Commands::Login { email, password } => auth::run_login(&ctx, &email, &password).await,
        Commands::Register {
            name,
            email,
            password,
            role,
        } => auth::run_register(&ctx, &name, &email, &password, role).await,
        Commands::Logout => auth::run_logout(&ctx),
        Commands::Whoami => auth::run_whoami(&ctx),
        Commands::Profile { command } => match command {
            ProfileCommands::Show => auth::run_profile_show(&ctx).await,
            ProfileCommands::Update { name, email } => {
                auth::run_profile_update(&ctx, name, email).await
            }
        },
        Commands::Products { command } => match command {
            ProductsCommands::List { category } => {
                catalog::run_products_list(&ctx, category.as_deref()).await
            }
            ProductsCommands::Show { product_id } => {
                catalog::run_products_show(&ctx, &product_id).await
            }
        },
        Commands::Reviews { command } => match command {
            ReviewsCommands::List { product_id } => {
                catalog::run_reviews_list(&ctx, &product_id).await
            }
            ReviewsCommands::Add {
                product_id,
                rating,
                comment,
            } => catalog::run_reviews_add(&ctx, &product_id, rating, &comment).await,
        },
        Commands::Orders { command } => match command {
            OrdersCommands::List { search, sort } => {
                orders::run_orders_list(&ctx, search.as_deref(), sort).await
            }
            OrdersCommands::Show { order_id } => orders::run_orders_show(&ctx, &order_id).await,
        },
        Commands::Admin { command } => match command {
            AdminCommands::Orders {
                search,
                status,
                sort,
            } => admin::run_admin_orders(&ctx, search.as_deref(), status, sort).await,
            AdminCommands::SetStatus { order_id, status } => {
                admin::run_admin_set_status(&ctx, &order_id, status).await
            }
            AdminCommands::Users { command } => match command {
                AdminUsersCommands::List => admin::run_admin_users_list(&ctx).await,
                AdminUsersCommands::Update {
                    user_id,
                    name,
                    role,
                } => admin::run_admin_users_update(&ctx, &user_id, name, role).await,
                AdminUsersCommands::Delete { user_id } => {
                    admin::run_admin_users_delete(&ctx, &user_id).await
                }
            },
            AdminCommands::Products { command } => match command {
                AdminProductsCommands::Create {
                    name,
                    description,
                    price,
                    category,
                    image,
                    out_of_stock,
                } => {
                    let product = NewProduct {
                        name,
                        description,
                        price,
                        category,
                        in_stock: !out_of_stock,
                        image,
                    };
                    admin::run_admin_products_create(&ctx, &product).await
                }
                AdminProductsCommands::Delete { product_id } => {
                    admin::run_admin_products_delete(&ctx, &product_id).await
                }
            },
            AdminCommands::Stats => admin::run_admin_stats(&ctx).await,
        },
    }
}

/// Format a money amount with two decimals.
pub(crate) fn fmt_money(amount: Decimal) -> String {
    format!(
        "${:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Format an optional timestamp for display, returning `"—"` when `None`.
pub(crate) fn fmt_date(date: Option<DateTime<Utc>>) -> String {
    date.map_or_else(
        || "\u{2014}".to_string(),
        |d| d.format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// Shorten `text` to `max` characters, ending in `...` when cut.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests;
