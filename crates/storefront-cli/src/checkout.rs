use std::time::Duration;

use storefront_checkout::{CheckoutError, CheckoutOrchestrator};

use crate::cart::print_cart;
use crate::{fmt_money, Context};

/// Submit the cart as an order and print the confirmation.
///
/// A failed attempt leaves the cart file as it was, so the command can simply
/// be run again.
///
/// # Errors
///
/// Returns an error carrying the message to show the user when the order is
/// not placed.
pub(crate) async fn run_checkout(ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.cart_store();
    let session = ctx.sessions().load();
    let client = ctx.client()?;
    let timeout = Duration::from_secs(ctx.config.checkout_timeout_secs);
    let mut orchestrator = CheckoutOrchestrator::new(client, timeout);

    if !store.cart().is_empty() {
        print_cart(store.cart());
        println!();
    }

    let bearer = session.as_ref().and_then(|s| s.bearer_token());
    match orchestrator.checkout(&mut store, bearer).await {
        Ok(confirmation) => {
            println!("Order placed!");
            println!("  order id: {}", confirmation.order_id);
            println!("  items:    {}", confirmation.item_count);
            println!("  total:    {}", fmt_money(confirmation.total));
            if let Some(status) = confirmation.status {
                println!("  status:   {status}");
            }
            if !store.persistence_healthy() {
                eprintln!(
                    "warning: the order went through but the emptied cart could not be saved to {}",
                    store.storage().path().display()
                );
            }
            Ok(())
        }
        Err(e @ CheckoutError::EmptyCart) => {
            anyhow::bail!(
                "{} Add products with `storefront cart add <PRODUCT_ID>`.",
                e.user_message()
            )
        }
        Err(e) if e.requires_login() => {
            anyhow::bail!("{} Run `storefront login --email <EMAIL>` first.", e.user_message())
        }
        Err(e) => {
            tracing::debug!(error = %e, "checkout error detail");
            anyhow::bail!("{} Your cart was kept.", e.user_message())
        }
    }
}
