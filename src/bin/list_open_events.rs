use dotenvy::dotenv;

use club_portal::config::AppConfig;
use club_portal::database::backend::RestBackend;
use club_portal::database::events_repo;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let backend = match RestBackend::new(&config.baas_url, &config.baas_anon_key, config.baas_timeout)
    {
        Ok(b) => b,
        Err(e) => {
            eprintln!("backend client setup failed: {}", e);
            std::process::exit(1);
        }
    };

    match events_repo::list_open_events(&backend).await {
        Ok(events) => {
            if events.is_empty() {
                println!("no open events");
            }
            for event in events {
                let capacity = event
                    .team_member_limit
                    .map(|n| format!("{} players", n))
                    .unwrap_or_else(|| "unbounded".to_string());
                println!("{}\t{}\t{}\t{}", event.event_id, event.date, event.name, capacity);
            }
        }
        Err(e) => {
            eprintln!("open event listing failed: {}", e);
            std::process::exit(1);
        }
    }
}
