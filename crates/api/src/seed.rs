//! Demo data for local runs.

use chrono::{TimeZone, Utc};
use domain::{DomainError, Order, OrderStatus, Product, ShopRepository, User};

use crate::routes::AppState;

/// Inserts two users, five products and three orders through the services.
///
/// Does nothing if the store already holds users, so restarting against
/// a seeded database is harmless.
#[tracing::instrument(skip(state))]
pub async fn seed_demo_data<S: ShopRepository>(state: &AppState<S>) -> Result<(), DomainError> {
    if !state.users.find_all().await?.is_empty() {
        tracing::info!("store already has users, skipping demo data");
        return Ok(());
    }

    let maria = state
        .users
        .insert(User::new("Maria Brown", "maria@gmail.com", "988888888", "123456"))
        .await?;
    let alex = state
        .users
        .insert(User::new("Alex Green", "alex@gmail.com", "977777777", "123456"))
        .await?;

    let mut products = Vec::new();
    for (name, description, price) in [
        ("The Lord of the Rings", "Lorem ipsum dolor sit amet, consectetur.", 90.5),
        ("Smart TV", "Nulla eu imperdiet purus. Maecenas ante.", 2190.0),
        ("Macbook Pro", "Nam eleifend maximus tortor, at mollis.", 1250.0),
        ("PC Gamer", "Donec aliquet odio ac rhoncus cursus.", 1200.0),
        ("Rails for Dummies", "Cras fringilla convallis sem vel faucibus.", 100.99),
    ] {
        products.push(
            state
                .products
                .insert(Product::new(name, description, price, ""))
                .await?,
        );
    }

    let at = |y, mo, d, h, mi, s| {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .ok_or_else(|| DomainError::Internal("invalid seed timestamp".to_string()))
    };

    let mut first = Order::new(at(2019, 6, 20, 19, 53, 7)?, OrderStatus::Paid, maria.clone());
    first.add_product(&products[0], 2);
    first.add_product(&products[2], 1);

    let mut second = Order::new(at(2019, 7, 21, 3, 42, 10)?, OrderStatus::WaitingPayment, alex);
    second.add_product(&products[2], 2);

    let mut third = Order::new(at(2019, 7, 22, 15, 21, 22)?, OrderStatus::WaitingPayment, maria);
    third.add_product(&products[4], 2);

    for order in [first, second, third] {
        state.orders.insert(order).await?;
    }

    tracing::info!("demo data inserted");
    Ok(())
}
