use clap::Parser;
use innoscream::config::{MemeConfig, setup_logging};
use innoscream::meme::MemePipeline;
use innoscream::meme::metrics::FontFile;
use innoscream::supermeme::Supermeme;
use innoscream::web::{AppState, ServicePipeline};
use sea_orm_migration::MigratorTrait;
use tracing::error;

#[tokio::main(flavor = "multi_thread", worker_threads = 32)]
async fn main() {
    let cli = innoscream::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    let config = match MemeConfig::try_from(&cli) {
        Ok(config) => config,
        Err(err) => {
            error!("Configuration error: {}", err);
            return;
        }
    };

    let db = match innoscream::db::connect_db(&cli.database_path).await {
        Ok(db) => db,
        Err(err) => {
            error!("Database connection error: {}", err);
            return;
        }
    };

    if let Err(err) = innoscream::db::migrations::Migrator::up(&db, None).await {
        error!("Database migration error: {}", err);
        return;
    }

    let supermeme = match Supermeme::from_config(&config) {
        Ok(supermeme) => supermeme,
        Err(err) => {
            error!("Failed to build template service client: {}", err);
            return;
        }
    };

    let pipeline: ServicePipeline =
        MemePipeline::new(db, supermeme, FontFile::new(&config.captions_font));

    if let Err(err) = innoscream::web::setup_server(
        &cli.listen_address,
        cli.port,
        AppState::new(pipeline, config.generate_deadline),
    )
    .await
    {
        error!("Application error: {}", err);
    }
}
