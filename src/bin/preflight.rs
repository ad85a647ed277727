use dealer_reviews_api::app::seed::load_file;
use dealer_reviews_api::infra::config::StoreBackend;
use dealer_reviews_api::infra::logging;
use dealer_reviews_api::{Config, Dealership, Review};
use sqlx::postgres::PgPoolOptions;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Reads the same env vars as the server:\n\
           PORT, BIND_ADDR, DATABASE_URL, STORE_BACKEND, DB_ACQUIRE_TIMEOUT_SECS,\n\
           REVIEWS_SEED_PATH, DEALERSHIPS_SEED_PATH, FRONTEND_DIR\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let config = Config::from_env()?;

    println!("> Preflight:");
    println!("  listen address: {}", config.listen_addr());
    println!("  store backend: {:?}", config.store_backend);

    let mut ok = true;

    match load_file::<Review>(&config.reviews_seed_path, "reviews").await {
        Ok(v) => println!("  reviews seed: {} records", v.len()),
        Err(e) => {
            ok = false;
            eprintln!("  reviews seed: {}", e);
        }
    }
    match load_file::<Dealership>(&config.dealerships_seed_path, "dealerships").await {
        Ok(v) => println!("  dealerships seed: {} records", v.len()),
        Err(e) => {
            ok = false;
            eprintln!("  dealerships seed: {}", e);
        }
    }

    if let Some(dir) = &config.frontend_dir {
        if dir.join("index.html").is_file() {
            println!("  front-end bundle: {}", dir.display());
        } else {
            ok = false;
            eprintln!("  front-end bundle: {} has no index.html", dir.display());
        }
    }

    // Read-only check: a bare connection and `SELECT 1`, no schema changes.
    if config.store_backend == StoreBackend::Postgres {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await;
        match pool {
            Ok(pool) => {
                match sqlx::query("SELECT 1").execute(&pool).await {
                    Ok(_) => println!("  database: reachable"),
                    Err(e) => {
                        ok = false;
                        eprintln!("  database: ping failed: {}", e);
                    }
                }
                pool.close().await;
            }
            Err(e) => {
                ok = false;
                eprintln!("  database: {}", e);
            }
        }
    }

    if !ok {
        return Err(anyhow::anyhow!("preflight found problems (see above)"));
    }
    println!("> Preflight OK.");
    Ok(())
}
