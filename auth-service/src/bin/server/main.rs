use std::sync::Arc;
use std::time::Duration;

use auth::TokenAuthority;
use auth_service::config::Config;
use auth_service::config::MailProvider;
use auth_service::domain::account::ports::AccountServicePort;
use auth_service::domain::account::ports::MailDispatcher;
use auth_service::domain::account::service::AccountService;
use auth_service::inbound::grpc::AuthGrpcService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::mail::LogMailDispatcher;
use auth_service::outbound::mail::MailLinks;
use auth_service::outbound::mail::SendGridMailDispatcher;
use auth_service::outbound::repositories::PostgresUserRepository;
use auth_service::proto::auth_service_server::AuthServiceServer;
use sqlx::postgres::PgPoolOptions;
use tonic::transport::Server;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn build_account_service<MD: MailDispatcher>(
    repository: Arc<PostgresUserRepository>,
    mailer: MD,
    authority: Arc<TokenAuthority>,
) -> Arc<dyn AccountServicePort> {
    Arc::new(AccountService::new(repository, Arc::new(mailer), authority))
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        grpc_port = config.server.grpc_port,
        request_timeout_seconds = config.server.request_timeout_seconds,
        token_issuer = %config.tokens.issuer,
        mail_provider = ?config.mail.provider,
        "Configuration loaded"
    );

    let authority = Arc::new(TokenAuthority::new(config.token_authority_config()?));

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let links = MailLinks::new(&config.mail.activation_url, &config.mail.reset_url);

    let account_service = match config.mail.provider {
        MailProvider::Log => build_account_service(
            user_repository,
            LogMailDispatcher::new(links),
            Arc::clone(&authority),
        ),
        MailProvider::SendGrid => build_account_service(
            user_repository,
            SendGridMailDispatcher::new(
                &config.mail.sendgrid_endpoint,
                &config.mail.sendgrid_api_key,
                &config.mail.from_email,
                &config.mail.from_name,
                links,
            )?,
            Arc::clone(&authority),
        ),
    };

    let request_timeout = Duration::from_secs(config.server.request_timeout_seconds);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(Arc::clone(&account_service), request_timeout);
    let http_server =
        tokio::spawn(async move { axum::serve(http_listener, http_application).await });

    let grpc_address = format!("0.0.0.0:{}", config.server.grpc_port).parse()?;
    let grpc_service = AuthGrpcService::new(Arc::clone(&account_service));
    tracing::info!(
        address = %grpc_address,
        port = config.server.grpc_port,
        protocol = "grpc",
        "gRpc server listening"
    );

    let grpc_server = tokio::spawn(async move {
        Server::builder()
            .timeout(request_timeout)
            .add_service(AuthServiceServer::new(grpc_service))
            .serve(grpc_address)
            .await
    });

    match tokio::try_join!(http_server, grpc_server) {
        Ok((_, _)) => tracing::info!("Servers exited successfully"),
        Err(e) => tracing::error!(error = %e, "Server error"),
    };

    Ok(())
}
