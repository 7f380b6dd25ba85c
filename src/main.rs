use poem::endpoint::StaticFilesEndpoint;
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;

use ocorrencias_backend::api::{AuthApi, HealthApi, NotificacaoApi, OcorrenciaApi, UserApi};
use ocorrencias_backend::app_data::AppData;
use ocorrencias_backend::config::{init_database, init_logging, migrate, AppSettings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logging()?;

    let settings = AppSettings::from_env()?;

    let db = init_database(&settings.database_url).await?;
    migrate(&db).await?;

    let app_data = AppData::init(db, &settings);

    // Expired CSRF tokens are reaped hourly in the background
    app_data.csrf_store.spawn_sweeper();

    let auth_api = AuthApi::new(
        app_data.user_service.clone(),
        app_data.user_store.clone(),
        app_data.token_service.clone(),
        app_data.csrf_store.clone(),
    );
    let ocorrencia_api = OcorrenciaApi::new(
        app_data.ocorrencia_service.clone(),
        app_data.user_store.clone(),
        app_data.token_service.clone(),
        app_data.csrf_store.clone(),
    );
    let user_api = UserApi::new(
        app_data.user_service.clone(),
        app_data.user_store.clone(),
        app_data.token_service.clone(),
        app_data.csrf_store.clone(),
    );
    let notificacao_api = NotificacaoApi::new(
        app_data.notificacao_service.clone(),
        app_data.user_store.clone(),
        app_data.token_service.clone(),
        app_data.csrf_store.clone(),
    );

    let api_service = OpenApiService::new(
        (HealthApi, auth_api, ocorrencia_api, user_api, notificacao_api),
        "Ocorrências Municipais",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("{}/api", settings.public_base_url));

    let ui = api_service.swagger_ui();

    let app = Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui)
        .nest(
            "/media",
            StaticFilesEndpoint::new(&settings.media_root),
        );

    tracing::info!("Starting server on http://{}", settings.bind_address);
    tracing::info!("Swagger UI available at {}/swagger", settings.public_base_url);

    Server::new(TcpListener::bind(settings.bind_address.clone()))
        .run(app)
        .await?;

    Ok(())
}
