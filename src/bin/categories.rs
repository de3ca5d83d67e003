//! Category maintenance. The web app only reads categories, so they are
//! seeded from here:
//!
//!   categories list
//!   categories add <name>...
//!   categories remove <id>...

use sqlx::sqlite::SqlitePoolOptions;

use training_admin::config::AppConfig;
use training_admin::repository;

const USAGE: &str = "usage: categories list | add <name>... | remove <id>...";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    let config = AppConfig::new_from_env()?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    match command.as_str() {
        "list" => {
            for category in repository::fetch_categories(&pool).await? {
                let state = if category.lifecycle.is_live() { "live" } else { "deleted" };
                println!("{}\t{}\t{}", category.id, state, category.name);
            }
        }
        "add" if !rest.is_empty() => {
            for name in rest {
                let category = repository::insert_category(&pool, name.trim()).await?;
                println!("Added {} -> {}", category.name, category.id);
            }
        }
        "remove" if !rest.is_empty() => {
            for id in rest {
                if repository::soft_delete_category(&pool, id).await? {
                    println!("Removed {}", id);
                } else {
                    println!("No live category {}", id);
                }
            }
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}
