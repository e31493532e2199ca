mod api;
mod blockchain;
mod config;
mod error;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::error;
use std::io::Write;

use api::AppState;
use blockchain::Chain;
use config::Config;

/// Payloads appended right after genesis when `SEED_DEMO` is on.
const DEMO_PAYLOADS: [&str; 3] = [
    "First Block after Genesis",
    "Second Block after Genesis",
    "Third Block after Genesis",
];

fn build_chain(config: &Config) -> error::Result<Chain> {
    let mut chain = Chain::new(config.difficulty)?;
    if config.seed_demo {
        for payload in DEMO_PAYLOADS {
            let mut stdout = std::io::stdout();
            chain.append_with(payload, |_, hash| {
                // progress output is best-effort
                let _ = write!(stdout, "\r{}", hex::encode(hash));
                let _ = stdout.flush();
            })?;
            println!("\r{}", hex::encode(chain.tip().hash()));
        }
    }
    Ok(chain)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();
    println!("⛏️ Mining genesis at difficulty {}", config.difficulty);

    let chain = match build_chain(&config) {
        Ok(chain) => chain,
        Err(e) => {
            error!("failed to build chain: {}", e);
            std::process::exit(1);
        }
    };

    for block in &chain {
        println!("{}", block);
        println!("PoW: {}", block.check_proof(chain.target()).is_ok());
        println!();
    }

    println!("Chain valid: {}", chain.is_valid());

    if !config.serve {
        return Ok(());
    }

    println!(
        "⛓️ Starting blockchain API at http://{}:{}",
        config.host, config.port
    );

    let state = web::Data::new(AppState::new(chain));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
