use super::*;
use storefront_core::{OrderSort, OrderStatus, Role};

fn parse(args: &[&str]) -> Cli {
    let mut full = vec!["storefront"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).expect("expected valid cli args")
}

#[test]
fn no_command_is_none() {
    let cli = parse(&[]);
    assert!(cli.command.is_none());
}

#[test]
fn parses_cart_show() {
    assert!(matches!(
        parse(&["cart", "show"]).command,
        Some(Commands::Cart {
            command: CartCommands::Show
        })
    ));
}

#[test]
fn cart_add_quantity_is_optional() {
    let cli = parse(&["cart", "add", "p1"]);
    let Some(Commands::Cart {
        command: CartCommands::Add {
            product_id,
            quantity,
        },
    }) = cli.command
    else {
        panic!("expected cart add");
    };
    assert_eq!(product_id, "p1");
    assert_eq!(quantity, None);

    let cli = parse(&["cart", "add", "p1", "--quantity", "3"]);
    assert!(matches!(
        cli.command,
        Some(Commands::Cart {
            command: CartCommands::Add {
                quantity: Some(3),
                ..
            }
        })
    ));
}

#[test]
fn cart_update_accepts_zero_and_negative_quantities() {
    assert!(matches!(
        parse(&["cart", "update", "p1", "0"]).command,
        Some(Commands::Cart {
            command: CartCommands::Update { quantity: 0, .. }
        })
    ));
    assert!(matches!(
        parse(&["cart", "update", "p1", "-2"]).command,
        Some(Commands::Cart {
            command: CartCommands::Update { quantity: -2, .. }
        })
    ));
}

#[test]
fn cart_update_requires_quantity() {
    assert!(Cli::try_parse_from(["storefront", "cart", "update", "p1"]).is_err());
}

#[test]
fn parses_checkout() {
    assert!(matches!(parse(&["checkout"]).command, Some(Commands::Checkout)));
}

#[test]
fn parses_login() {
    let cli = parse(&["login", "--email", "ana@example.com", "--password", "pw"]);
    let Some(Commands::Login { email, password }) = cli.command else {
        panic!("expected login");
    };
    assert_eq!(email, "ana@example.com");
    assert_eq!(password, "pw");
}

#[test]
fn products_list_category_filter() {
    let cli = parse(&["products", "list", "--category", "lighting"]);
    let Some(Commands::Products {
        command: ProductsCommands::List { category },
    }) = cli.command
    else {
        panic!("expected products list");
    };
    assert_eq!(category.as_deref(), Some("lighting"));
}

#[test]
fn reviews_add_takes_rating_and_comment() {
    let cli = parse(&["reviews", "add", "p1", "--rating", "5", "--comment", "great"]);
    assert!(matches!(
        cli.command,
        Some(Commands::Reviews {
            command: ReviewsCommands::Add { rating: 5, .. }
        })
    ));
}

#[test]
fn orders_list_defaults_to_newest_first() {
    assert!(matches!(
        parse(&["orders", "list"]).command,
        Some(Commands::Orders {
            command: OrdersCommands::List {
                search: None,
                sort: OrderSort::DateDesc
            }
        })
    ));
}

#[test]
fn orders_list_parses_sort_and_search() {
    assert!(matches!(
        parse(&["orders", "list", "--search", "lamp", "--sort", "total-asc"]).command,
        Some(Commands::Orders {
            command: OrdersCommands::List {
                search: Some(_),
                sort: OrderSort::TotalAsc
            }
        })
    ));
}

#[test]
fn orders_list_rejects_unknown_sort() {
    assert!(Cli::try_parse_from(["storefront", "orders", "list", "--sort", "random"]).is_err());
}

#[test]
fn admin_set_status_parses_status() {
    assert!(matches!(
        parse(&["admin", "set-status", "o1", "Shipped"]).command,
        Some(Commands::Admin {
            command: AdminCommands::SetStatus {
                status: OrderStatus::Shipped,
                ..
            }
        })
    ));
    assert!(Cli::try_parse_from(["storefront", "admin", "set-status", "o1", "lost"]).is_err());
}

#[test]
fn admin_orders_status_filter() {
    assert!(matches!(
        parse(&["admin", "orders", "--status", "pending"]).command,
        Some(Commands::Admin {
            command: AdminCommands::Orders {
                status: Some(OrderStatus::Pending),
                ..
            }
        })
    ));
}

#[test]
fn register_defaults_to_user_role() {
    let cli = parse(&[
        "register", "--name", "Ana", "--email", "ana@example.com", "--password", "pw",
    ]);
    let Some(Commands::Register { name, role, .. }) = cli.command else {
        panic!("expected register");
    };
    assert_eq!(name, "Ana");
    assert_eq!(role, Role::User);

    assert!(matches!(
        parse(&[
            "register", "--name", "Ana", "--email", "a@x.io", "--password", "pw", "--role", "admin",
        ])
        .command,
        Some(Commands::Register {
            role: Role::Admin,
            ..
        })
    ));
    assert!(Cli::try_parse_from([
        "storefront", "register", "--name", "A", "--email", "a@x.io", "--password", "pw",
        "--role", "owner",
    ])
    .is_err());
}

#[test]
fn profile_update_takes_optional_fields() {
    let cli = parse(&["profile", "update", "--email", "new@example.com"]);
    let Some(Commands::Profile {
        command: ProfileCommands::Update { name, email },
    }) = cli.command
    else {
        panic!("expected profile update");
    };
    assert_eq!(name, None);
    assert_eq!(email.as_deref(), Some("new@example.com"));
    assert!(matches!(
        parse(&["profile", "show"]).command,
        Some(Commands::Profile {
            command: ProfileCommands::Show
        })
    ));
}

#[test]
fn admin_users_subcommands() {
    assert!(matches!(
        parse(&["admin", "users", "list"]).command,
        Some(Commands::Admin {
            command: AdminCommands::Users {
                command: AdminUsersCommands::List
            }
        })
    ));
    assert!(matches!(
        parse(&["admin", "users", "update", "u2", "--role", "admin"]).command,
        Some(Commands::Admin {
            command: AdminCommands::Users {
                command: AdminUsersCommands::Update {
                    role: Some(Role::Admin),
                    name: None,
                    ..
                }
            }
        })
    ));
    assert!(matches!(
        parse(&["admin", "users", "delete", "u2"]).command,
        Some(Commands::Admin {
            command: AdminCommands::Users {
                command: AdminUsersCommands::Delete { .. }
            }
        })
    ));
}

#[test]
fn admin_products_create_parses_price_and_stock() {
    let cli = parse(&[
        "admin", "products", "create", "--name", "Lamp", "--price", "25.50", "--category",
        "lighting", "--image", "lamp.png", "--out-of-stock",
    ]);
    let Some(Commands::Admin {
        command:
            AdminCommands::Products {
                command:
                    AdminProductsCommands::Create {
                        price,
                        description,
                        out_of_stock,
                        ..
                    },
            },
    }) = cli.command
    else {
        panic!("expected admin products create");
    };
    assert_eq!(price, Decimal::new(2550, 2));
    assert_eq!(description, "");
    assert!(out_of_stock);

    assert!(Cli::try_parse_from([
        "storefront", "admin", "products", "create", "--name", "Lamp", "--price", "cheap",
        "--category", "lighting", "--image", "lamp.png",
    ])
    .is_err());
}

#[test]
fn admin_products_delete_and_stats() {
    assert!(matches!(
        parse(&["admin", "products", "delete", "p1"]).command,
        Some(Commands::Admin {
            command: AdminCommands::Products {
                command: AdminProductsCommands::Delete { .. }
            }
        })
    ));
    assert!(matches!(
        parse(&["admin", "stats"]).command,
        Some(Commands::Admin {
            command: AdminCommands::Stats
        })
    ));
}

#[test]
fn money_is_formatted_with_two_decimals() {
    assert_eq!(fmt_money(Decimal::new(20, 0)), "$20.00");
    assert_eq!(fmt_money(Decimal::new(12345, 3)), "$12.35");
}

#[test]
fn truncate_marks_cut_text() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("abcdefghij", 4), "abcd...");
}

#[test]
fn missing_date_renders_as_dash() {
    assert_eq!(fmt_date(None), "\u{2014}");
}

fn temp_context(label: &str) -> Context {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let data_dir = std::env::temp_dir().join(format!(
        "storefront-cli-{label}-{}-{nanos}",
        std::process::id()
    ));
    Context {
        config: AppConfig {
            env: storefront_core::Environment::Test,
            api_base_url: "http://127.0.0.1:9/api".to_string(),
            data_dir,
            log_level: "warn".to_string(),
            http_timeout_secs: 1,
            checkout_timeout_secs: 1,
            user_agent: "storefront-test/0.1".to_string(),
            max_retries: 0,
            retry_backoff_base_ms: 0,
        },
    }
}

#[tokio::test]
async fn checkout_with_empty_cart_is_an_error() {
    let ctx = temp_context("empty-checkout");
    let err = checkout::run_checkout(&ctx)
        .await
        .expect_err("an empty cart must not count as a successful checkout");
    assert!(err.to_string().contains("Your cart is empty."), "{err}");
    let _ = std::fs::remove_dir_all(&ctx.config.data_dir);
}

#[tokio::test]
async fn admin_commands_require_a_session() {
    let ctx = temp_context("admin-no-session");
    let err = admin::run_admin_users_list(&ctx)
        .await
        .expect_err("no stored session");
    assert!(err.to_string().contains("not logged in"), "{err}");
}

#[tokio::test]
async fn profile_update_without_fields_is_rejected() {
    let ctx = temp_context("profile-empty");
    let err = auth::run_profile_update(&ctx, Some("  ".to_string()), None)
        .await
        .expect_err("blank update");
    assert!(err.to_string().contains("nothing to update"), "{err}");
}
