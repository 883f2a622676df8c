//! Development data seeder for Hearth.
//!
//! Seeds ledger 1 with starter accounts and a small category tree. Rows
//! whose name already exists are skipped, so the seeder can run repeatedly.
//!
//! Usage:
//!   seeder                          - Seed ledger 1 using DATABASE_URL
//!   seeder hash-password <password> - Print an Argon2 hash for `auth.password_hash`

use anyhow::{Context, bail};
use hearth_core::{
    auth::hash_password,
    ledger::{AccountType, CategoryKind},
};
use hearth_db::{
    AccountRepository, CategoryRepository,
    repositories::{AccountFilter, CreateAccountInput, CreateCategoryInput},
};
use hearth_shared::{config::DatabaseConfig, types::DEFAULT_LEDGER_ID};
use sea_orm::DatabaseConnection;

const DEFAULT_CURRENCY: &str = "CNY";

const ACCOUNTS: [(&str, AccountType); 2] = [
    ("Cash", AccountType::Cash),
    ("Brokerage", AccountType::Investment),
];

/// `(name, kind, parent name)`; parents are listed before their children.
const CATEGORIES: [(&str, CategoryKind, Option<&str>); 8] = [
    ("Salary", CategoryKind::Income, None),
    ("Interest", CategoryKind::Income, None),
    ("Dividends", CategoryKind::Income, Some("Interest")),
    ("Living", CategoryKind::Expense, None),
    ("Food", CategoryKind::Expense, Some("Living")),
    ("Rent", CategoryKind::Expense, Some("Living")),
    ("Fees", CategoryKind::Expense, None),
    ("Taxes", CategoryKind::Expense, None),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => seed().await,
        [command, password] if command == "hash-password" => {
            let hash = hash_password(password).context("failed to hash password")?;
            println!("{hash}");
            Ok(())
        }
        _ => bail!("usage: seeder [hash-password <password>]"),
    }
}

async fn seed() -> anyhow::Result<()> {
    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = hearth_db::connect(&DatabaseConfig {
        url,
        max_connections: 2,
        min_connections: 1,
        run_migrations: false,
    })
    .await
    .context("failed to connect to database")?;

    println!("Seeding accounts...");
    seed_accounts(&db).await?;

    println!("Seeding categories...");
    seed_categories(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_accounts(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = AccountRepository::new(db.clone());
    let existing = repo
        .list_accounts(DEFAULT_LEDGER_ID, AccountFilter::default())
        .await?;

    for (name, account_type) in ACCOUNTS {
        if existing.iter().any(|account| account.name == name) {
            println!("  Account {name} already exists, skipping...");
            continue;
        }
        let account = repo
            .create_account(CreateAccountInput {
                ledger_id: DEFAULT_LEDGER_ID,
                name: name.to_string(),
                account_type,
                currency: DEFAULT_CURRENCY.to_string(),
                is_active: true,
            })
            .await?;
        println!("  Created account {name} (id {})", account.id);
    }
    Ok(())
}

async fn seed_categories(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = CategoryRepository::new(db.clone());
    let mut existing = repo.list_categories(DEFAULT_LEDGER_ID, None).await?;

    for (name, kind, parent) in CATEGORIES {
        if existing.iter().any(|category| category.name == name) {
            println!("  Category {name} already exists, skipping...");
            continue;
        }
        let parent_id = match parent {
            Some(parent) => Some(
                existing
                    .iter()
                    .find(|category| category.name == parent)
                    .map(|category| category.id)
                    .with_context(|| format!("parent category {parent} is missing"))?,
            ),
            None => None,
        };

        let category = repo
            .create_category(CreateCategoryInput {
                ledger_id: DEFAULT_LEDGER_ID,
                name: name.to_string(),
                kind,
                parent_id,
            })
            .await?;
        println!("  Created category {name} (id {})", category.id);
        existing.push(category);
    }
    Ok(())
}
