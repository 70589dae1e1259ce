//! # Seed Data Generator
//!
//! Populates the database with sample data for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p caja-db --bin seed
//! cargo run -p caja-db --bin seed -- --db ./data/caja.db
//! ```
//!
//! Skips seeding if the database already has products.

use std::env;

use caja_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

/// (name, description)
const CATEGORIES: &[(&str, &str)] = &[
    ("Electronics", "Electronic goods and gadgets"),
    ("Clothing", "Garments and accessories"),
    ("Home", "Household items"),
    ("Food", "Food products"),
    ("Office", "Office supplies"),
];

/// (name, price_cents, stock, category index into CATEGORIES)
const PRODUCTS: &[(&str, i64, i64, usize)] = &[
    ("Laptop 14\"", 89_999, 10, 0),
    ("Smartphone", 49_999, 15, 0),
    ("Basic T-Shirt", 1_999, 50, 1),
    ("Denim Jeans", 3_999, 30, 1),
    ("LED Lamp", 2_999, 20, 2),
    ("Bed Sheet Set", 4_999, 15, 2),
    ("Gourmet Coffee", 1_299, 40, 3),
    ("Premium Chocolate", 599, 100, 3),
    ("Executive Notebook", 899, 60, 4),
    ("Ballpoint Pen Set", 499, 80, 4),
];

/// (name, phone, tax_id, address)
const CUSTOMERS: &[(&str, &str, &str, &str)] = &[
    ("Juan Perez", "555-1234", "12345678A", "123 Main Street"),
    ("Maria Garcia", "555-5678", "87654321B", "456 Central Avenue"),
    ("Carlos Lopez", "555-9012", "23456789C", "789 Market Square"),
];

/// (name, email, phone, address)
const EMPLOYEES: &[(&str, &str, &str, &str)] = &[
    ("Ana Martinez", "ana@example.com", "555-3456", "234 Second Street"),
    ("Pedro Sanchez", "pedro@example.com", "555-7890", "567 North Avenue"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./caja_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Caja POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./caja_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Caja POS Seed Data Generator");
    println!("============================");
    println!("Database: {db_path}");
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("Database already has {existing} products, skipping seed.");
        println!("Delete the database file to regenerate.");
        return Ok(());
    }

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for &(name, description) in CATEGORIES {
        let category = db.categories().insert(name, Some(description)).await?;
        category_ids.push(category.id);
    }
    println!("Inserted {} categories", category_ids.len());

    for &(name, price_cents, stock, category_idx) in PRODUCTS {
        db.products()
            .insert(name, price_cents, stock, Some(category_ids[category_idx]))
            .await?;
    }
    println!("Inserted {} products", PRODUCTS.len());

    for &(name, phone, tax_id, address) in CUSTOMERS {
        db.customers()
            .insert(name, Some(phone), Some(tax_id), Some(address))
            .await?;
    }
    println!("Inserted {} customers", CUSTOMERS.len());

    for &(name, email, phone, address) in EMPLOYEES {
        db.employees()
            .insert(name, Some(email), Some(phone), Some(address))
            .await?;
    }
    println!("Inserted {} employees", EMPLOYEES.len());

    println!();
    println!("Seed complete!");

    Ok(())
}
