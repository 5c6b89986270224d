//! Development data seeder.
//!
//! Creates two demo accounts and a synthetic product catalogue so a
//! fresh checkout has something to sell:
//!
//! ```text
//! cargo run -p till-db --bin seed -- --db till.db --products 24
//! ```
//!
//! Refuses to touch a database that already contains data.

use chrono::Utc;
use std::time::Instant;
use till_core::{Product, Role, User};
use till_db::{password, Database, DbConfig};
use uuid::Uuid;

const CATEGORIES: &[&str] = &[
    "Beverages",
    "Bakery",
    "Dairy",
    "Snacks",
    "Household",
    "Produce",
];

const ITEMS: &[&str] = &[
    "Cola", "Bread", "Milk", "Crisps", "Soap", "Tomatoes", "Juice", "Rolls", "Yoghurt", "Nuts",
    "Candles", "Onions",
];

const DEMO_USERS: &[(&str, &str, &str, Role)] = &[
    ("admin", "admin@till.local", "admin123", Role::Manager),
    ("cashier", "cashier@till.local", "cashier1", Role::Cashier),
];

fn print_help() {
    println!("seed - populate a Till POS database with demo data");
    println!();
    println!("USAGE:");
    println!("    seed [--db <path>] [--products <count>]");
    println!();
    println!("OPTIONS:");
    println!("    --db <path>          database file (default: till.db)");
    println!("    --products <count>   number of products (default: 24)");
    println!("    -h, --help           show this help");
}

fn synthetic_product(i: usize) -> Product {
    let now = Utc::now();
    let price_cents = 300 + (i as i64 * 137) % 4700;
    Product {
        id: Uuid::new_v4().to_string(),
        name: format!("{} #{}", ITEMS[i % ITEMS.len()], i + 1),
        description: None,
        barcode: Some(format!("600123{:07}", i + 1)),
        cost_cents: price_cents * 60 / 100,
        price_cents,
        stock_quantity: 20 + (i as i64 * 7) % 80,
        min_stock_level: 5 + (i as i64 % 10),
        category: Some(CATEGORIES[i % CATEGORIES.len()].to_string()),
        created_at: now,
        updated_at: now,
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut db_path = "till.db".to_string();
    let mut product_count: usize = 24;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => {
                db_path = args.next().ok_or("--db needs a value")?;
            }
            "--products" => {
                product_count = args.next().ok_or("--products needs a value")?.parse()?;
            }
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            other => {
                return Err(format!("unknown argument: {other} (try --help)").into());
            }
        }
    }

    println!("Seeding {db_path} ...");
    let db = Database::new(DbConfig::new(&db_path)).await?;

    if db.users().count().await? > 0 || db.products().count().await? > 0 {
        println!("⚠ database already contains data, nothing to do");
        return Ok(());
    }

    let started = Instant::now();

    for (username, email, pass, role) in DEMO_USERS {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password::hash_password(pass)?,
            role: *role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.users().insert(&user).await?;
        println!("✓ user {username} (password: {pass})");
    }

    for i in 0..product_count {
        db.products().insert(&synthetic_product(i)).await?;
    }

    let elapsed = started.elapsed();
    println!(
        "✓ {} products in {:.2}s ({:.0}/s)",
        product_count,
        elapsed.as_secs_f64(),
        product_count as f64 / elapsed.as_secs_f64().max(0.001)
    );

    db.close().await;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("seed failed: {e}");
        std::process::exit(1);
    }
}
