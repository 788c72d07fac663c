use catalogflow::cli::{create_superadmin, migrate};
use catalogflow_config::DatabaseConfig;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "catalogflow-cli")]
#[command(about = "CatalogFlow CLI - Administrative tools for CatalogFlow", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create the first superadmin account
    CreateSuperadmin {
        /// Display name
        #[arg(short = 'n', long)]
        full_name: String,

        /// Email address
        #[arg(short = 'e', long)]
        email: String,

        /// Password
        #[arg(short = 'p', long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    let db_config = DatabaseConfig::from_env()?;

    match cli.command {
        Commands::Migrate => {
            migrate(&db_config).await?;
            println!("Migrations applied");
        }
        Commands::CreateSuperadmin {
            full_name,
            email,
            password,
        } => {
            let user = create_superadmin(&db_config, full_name, email, password).await?;
            println!("Superadmin created");
            println!("   Id: {}", user.id);
            println!("   Email: {}", user.email);
        }
    }

    Ok(())
}
