use lib_config::config::configuration;
use lib_config::db::db::establish_connection;
use review_service::startup::Application;
use utils::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("review_srv".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = configuration::Settings::new()?;
    let pool = establish_connection(&config.database.connection_string())?;

    let application = Application::build(pool, &config).await?;
    application.run_until_stopped().await?;
    Ok(())
}
