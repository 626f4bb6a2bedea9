use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use gatehouse_cli::create_admin;
use gatehouse_config::{DatabaseConfig, PasswordConfig};
use gatehouse_db::{PgUserRepository, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "gatehouse-cli")]
#[command(about = "Gatehouse CLI - Administrative tools for Gatehouse", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an active administrator account
    CreateAdmin {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let database = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&database).await?;

    match cli.command {
        Commands::CreateAdmin { email, password } => {
            let email = match email {
                Some(email) => email,
                None => Input::new().with_prompt("Email address").interact_text()?,
            };
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords don't match")
                    .interact()?,
            };

            let password_config = PasswordConfig::from_env()?;
            password_config.validate()?;

            run_migrations(&pool).await?;
            let repository = PgUserRepository::new(pool);
            match create_admin(&repository, &email, &password, password_config.bcrypt_cost).await
            {
                Ok(admin) => {
                    println!("\n✅ Admin created successfully!");
                    println!("   Id: {}", admin.id);
                    println!("   Email: {}", admin.email);
                }
                Err(e) => {
                    eprintln!("\n❌ Error creating admin: {e:#}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Migrate => {
            run_migrations(&pool).await?;
            println!("✅ Migrations applied");
        }
    }

    Ok(())
}
