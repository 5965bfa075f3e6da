use clap::Subcommand;
use storefront_core::{filter_orders, sort_orders, Order, OrderSort};

use crate::{fmt_date, fmt_money, truncate, Context};

/// Sub-commands available under `orders`.
#[derive(Debug, Subcommand)]
pub enum OrdersCommands {
    /// List your orders
    List {
        /// Match order id or item name (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        /// date-desc, date-asc, total-desc or total-asc
        #[arg(long, default_value_t = OrderSort::DateDesc)]
        sort: OrderSort,
    },
    /// Show one order's items
    Show { order_id: String },
}

/// Print an order table; `with_customer` adds the customer column used by
/// the admin view.
pub(crate) fn print_orders(orders: &[&Order], with_customer: bool) {
    let customer_header = if with_customer {
        format!("{:<28}", "CUSTOMER")
    } else {
        String::new()
    };
    println!(
        "{:<26}{:<18}{customer_header}{:<12}{:>6}{:>12}",
        "ORDER", "DATE", "STATUS", "ITEMS", "TOTAL"
    );
    for order in orders {
        let customer = if with_customer {
            let who = order
                .user
                .as_ref()
                .map(|u| if u.email.is_empty() { u.id.as_str() } else { u.email.as_str() })
                .unwrap_or("\u{2014}");
            format!("{:<28}", truncate(who, 26))
        } else {
            String::new()
        };
        println!(
            "{:<26}{:<18}{customer}{:<12}{:>6}{:>12}",
            truncate(&order.id, 24),
            fmt_date(order.created_at),
            order.status.to_string(),
            order.item_count(),
            fmt_money(order.total),
        );
    }
}

pub(crate) fn print_order_detail(order: &Order) {
    println!("Order {}", order.id);
    println!("Placed: {}", fmt_date(order.created_at));
    println!("Status: {}", order.status);
    if let Some(user) = &order.user {
        if !user.email.is_empty() {
            println!("Customer: {} <{}>", user.name, user.email);
        }
    }
    println!();
    println!("{:<32}{:>10}{:>6}{:>12}", "ITEM", "PRICE", "QTY", "SUBTOTAL");
    for item in &order.items {
        println!(
            "{:<32}{:>10}{:>6}{:>12}",
            truncate(&item.name, 29),
            fmt_money(item.price),
            item.quantity,
            fmt_money(item.subtotal()),
        );
    }
    println!();
    println!("Total: {}", fmt_money(order.total));
}

pub(crate) async fn run_orders_list(
    ctx: &Context,
    search: Option<&str>,
    sort: OrderSort,
) -> anyhow::Result<()> {
    let session = ctx.require_session()?;
    let token = session.bearer_token().unwrap_or_default();
    let client = ctx.client()?;
    let orders = client.list_my_orders(token).await?;

    let mut visible = filter_orders(&orders, search.unwrap_or_default());
    if visible.is_empty() {
        if orders.is_empty() {
            println!("no orders yet");
        } else {
            println!("no orders match '{}'", search.unwrap_or_default());
        }
        return Ok(());
    }
    sort_orders(&mut visible, sort);
    print_orders(&visible, false);
    Ok(())
}

pub(crate) async fn run_orders_show(ctx: &Context, order_id: &str) -> anyhow::Result<()> {
    let session = ctx.require_session()?;
    let token = session.bearer_token().unwrap_or_default();
    let client = ctx.client()?;
    let order = client.get_order(token, order_id).await?;
    print_order_detail(&order);
    Ok(())
}
