use std::sync::Arc;

use accord_core::{config::Config, db::Db, extract::Extractor, llm::LlmGateway, mediator::Mediator};
use accord_server::{router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "accord_server=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    std::fs::create_dir_all(&config.data_dir)?;
    let db_path = format!("{}/accord.db", config.data_dir);
    let mut db = Db::open(&db_path)?;
    db.migrate()?;

    let state = Arc::new(AppState {
        db: Arc::new(db),
        extractor: Extractor::new(&config.ocr_cmd, &config.pdf_render_cmd),
        mediator: Mediator::new(LlmGateway::new(
            &config.llm_base_url,
            &config.llm_api_key,
            &config.llm_model,
        )),
    });

    let app = router(state);

    let addr = format!("{}:{}", config.web_bind, config.web_port);
    info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
