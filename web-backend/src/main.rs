use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use anyhow::Result;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod state;

use api::create_api_router;
use config::Config;
use state::AppState;

async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Security Engine is Running"
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loglens_web=debug,loglens_core=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 初始化配置与状态，签名目录构建失败直接退出
    let config = Config::from_env()?;
    let state = AppState::new(&config)?;

    let bind_address = config.bind.clone();
    tracing::info!("loglens web server listening on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            // API 路由
            .service(create_api_router())
            // 存活探针
            .route("/", web::get().to(home))
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
