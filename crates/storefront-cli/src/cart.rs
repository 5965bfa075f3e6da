//! Cart command handlers.
//!
//! Every mutation goes through `CartStore`, which writes the cart file
//! before the command returns.

use clap::Subcommand;
use storefront_state::{Cart, CartStore, JsonFileStorage, ProductDescriptor, QuantityUpdate};

use crate::{fmt_money, truncate, Context};

/// Sub-commands available under `cart`.
#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// List cart contents with item count and total
    Show,
    /// Add a product from the catalog (merges with an existing line)
    Add {
        product_id: String,
        /// How many to add (default 1)
        #[arg(long, short)]
        quantity: Option<i64>,
    },
    /// Remove a product's line entirely
    Remove { product_id: String },
    /// Set a line's quantity; 0 or less removes it
    Update {
        product_id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

pub(crate) fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("cart is empty; add products with `storefront cart add <product-id>`");
        return;
    }

    let header = format!(
        "{:<26}{:<32}{:>10}{:>6}{:>12}",
        "PRODUCT", "NAME", "PRICE", "QTY", "SUBTOTAL"
    );
    println!("{header}");
    for line in cart.items() {
        println!(
            "{:<26}{:<32}{:>10}{:>6}{:>12}",
            truncate(&line.id, 24),
            truncate(&line.name, 29),
            fmt_money(line.unit_price),
            line.quantity,
            fmt_money(line.subtotal()),
        );
    }
    println!();
    println!(
        "{} item(s), total {}",
        cart.total_item_count(),
        fmt_money(cart.total_price())
    );
}

fn warn_if_unsaved(store: &CartStore<JsonFileStorage>) {
    if !store.persistence_healthy() {
        eprintln!(
            "warning: could not save the cart to {}; this change will be lost",
            store.storage().path().display()
        );
    }
}

pub(crate) fn run_cart_show(ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.cart_store();
    print_cart(store.cart());
    Ok(())
}

/// Fetch the product so the cart line carries current catalog data, then add it.
///
/// # Errors
///
/// Returns an error if the product cannot be fetched, is out of stock, or has
/// data the cart refuses (blank id, non-positive price).
pub(crate) async fn run_cart_add(
    ctx: &Context,
    product_id: &str,
    quantity: Option<i64>,
) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let product = client.get_product(product_id).await?;
    if !product.in_stock {
        anyhow::bail!("'{}' is out of stock", product.name);
    }
    let descriptor = ProductDescriptor::try_from(&product)?;

    let mut store = ctx.cart_store();
    let now = store.add_item(&descriptor, quantity);
    warn_if_unsaved(&store);
    println!("added {} to cart; {now} in cart", product.name);
    Ok(())
}

pub(crate) fn run_cart_remove(ctx: &Context, product_id: &str) -> anyhow::Result<()> {
    let mut store = ctx.cart_store();
    if store.remove_item(product_id) {
        println!("removed {product_id} from cart");
    } else {
        println!("{product_id} is not in the cart");
    }
    warn_if_unsaved(&store);
    Ok(())
}

pub(crate) fn run_cart_update(
    ctx: &Context,
    product_id: &str,
    quantity: i64,
) -> anyhow::Result<()> {
    let mut store = ctx.cart_store();
    match store.update_quantity(product_id, quantity) {
        QuantityUpdate::Set(q) => println!("{product_id}: quantity now {q}"),
        QuantityUpdate::Removed => println!("removed {product_id} from cart"),
        QuantityUpdate::NotInCart => println!("{product_id} is not in the cart"),
    }
    warn_if_unsaved(&store);
    Ok(())
}

pub(crate) fn run_cart_clear(ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.cart_store();
    store.clear();
    warn_if_unsaved(&store);
    println!("cart cleared");
    Ok(())
}
