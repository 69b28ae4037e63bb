/// Media Upload Service - HTTP server
///
/// Handles thumbnail and video uploads, updates the owning video record,
/// and serves disk-stored assets.
use std::io;
use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer};
use sqlx::postgres::PgPoolOptions;

use media_upload_service::auth::TokenValidator;
use media_upload_service::handlers;
use media_upload_service::middleware;
use media_upload_service::services::storage;
use media_upload_service::services::video::processor::VideoProcessor;
use media_upload_service::services::video::s3;
use media_upload_service::Config;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("Failed to load configuration");
    let bind_address = format!("{}:{}", config.app.host, config.app.port);

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    let s3_client = s3::get_s3_client(&config.s3).await;
    let validator = Arc::new(TokenValidator::new(&config.auth.jwt_secret));
    let thumbnail_store = storage::build_store(&config.assets);
    let processor = VideoProcessor::new(&config.media_tools);

    tracing::info!(
        %bind_address,
        env = %config.app.env,
        bucket = %config.s3.bucket,
        "media upload service starting"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(s3_client.clone()))
            .app_data(web::Data::new(processor.clone()))
            .app_data(web::Data::from(thumbnail_store.clone()))
            .wrap(middleware::RequestTiming)
            .route(
                "/health",
                web::get()
                    .to(|| async { HttpResponse::Ok().json(serde_json::json!({"status": "ok"})) }),
            )
            .route("/assets/{name}", web::get().to(handlers::serve_asset))
            .service(
                web::scope("/videos")
                    .wrap(middleware::JwtAuth::new(validator.clone()))
                    .route("", web::get().to(handlers::list_videos))
                    .route("/{video_id}", web::get().to(handlers::get_video))
                    .route(
                        "/{video_id}/thumbnail",
                        web::post().to(handlers::upload_thumbnail),
                    )
                    .route("/{video_id}/video", web::post().to(handlers::upload_video)),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
