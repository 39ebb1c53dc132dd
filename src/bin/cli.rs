use anyhow::Context;
use clap::{Parser, Subcommand};
use ecoswap::{
    db,
    models::{UserQuery, UserRole, DEFAULT_CATEGORIES},
    repositories::{
        CategoryRepository, RepositoryError, SqliteCategoryRepository, SqliteUserRepository,
    },
    services::user_service::{RegisterRequest, UserService},
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ecoswap-cli")]
#[command(about = "CLI tool for managing EcoSwap users and categories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Category management commands
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        location: String,

        /// Create the account with the admin role
        #[arg(long)]
        admin: bool,
    },

    /// List users
    List {
        /// Filter by name or email
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Delete a user and every item they own
    Delete {
        /// Email address of the user to delete
        #[arg(short, long)]
        email: String,
    },

    /// Set a new password for a user
    SetPassword {
        /// Email address of the user
        #[arg(short, long)]
        email: String,

        /// New password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Activate or deactivate a user
    SetActive {
        #[arg(short, long)]
        email: String,

        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Add a category
    Add {
        #[arg(short, long)]
        name: String,
    },
    /// List every category, active or not
    List,
    /// Insert the default category list, skipping existing names
    Seed,
}

fn get_password(prompt: &str) -> anyhow::Result<String> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

fn prompt_new_password(prompt: &str) -> anyhow::Result<String> {
    let password = get_password(prompt)?;
    let confirm = get_password("Confirm password")?;
    if password != confirm {
        eprintln!("❌ Passwords do not match");
        std::process::exit(1);
    }
    Ok(password)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = db::create_pool(&database_url).await?;
    db::migrate(&pool).await?;

    match cli.command {
        Commands::User { command } => {
            let user_service = UserService::new(Arc::new(SqliteUserRepository::new(pool)));
            run_user_command(&user_service, command).await
        }
        Commands::Category { command } => {
            let categories = SqliteCategoryRepository::new(pool);
            run_category_command(&categories, command).await
        }
    }
}

async fn run_user_command(user_service: &UserService, command: UserCommands) -> anyhow::Result<()> {
    match command {
        UserCommands::Create {
            name,
            email,
            password,
            phone,
            location,
            admin,
        } => {
            let password = match password {
                Some(pw) => pw,
                None => prompt_new_password("Password")?,
            };
            let role = if admin { UserRole::Admin } else { UserRole::User };
            let request = RegisterRequest {
                name,
                email,
                password,
                phone,
                location,
            };

            match user_service.create_account(request, role).await {
                Ok(user) => {
                    println!("✅ User created successfully!");
                    println!("  ID: {}", user.id);
                    println!("  Email: {}", user.email);
                    println!("  Role: {}", user.role.as_str());
                }
                Err(err) => {
                    eprintln!("❌ Failed to create user: {}", err);
                    std::process::exit(1);
                }
            }
        }

        UserCommands::List { search } => {
            let query = UserQuery {
                search,
                ..UserQuery::default()
            };
            let users = user_service.list_users(query).await?;
            if users.is_empty() {
                println!("No users found.");
            } else {
                println!(
                    "{:<5} {:<25} {:<35} {:<6} {:<7} {:<20}",
                    "ID", "Name", "Email", "Role", "Active", "Created"
                );
                println!("{}", "-".repeat(100));
                for user in users {
                    println!(
                        "{:<5} {:<25} {:<35} {:<6} {:<7} {:<20}",
                        user.id,
                        user.name,
                        user.email,
                        user.role.as_str(),
                        if user.active { "Yes" } else { "No" },
                        user.created_at.format("%Y-%m-%d %H:%M:%S")
                    );
                }
            }
        }

        UserCommands::Delete { email } => {
            let user = find_or_exit(user_service, &email).await?;
            match user_service.delete_account(user.id).await {
                Ok(()) => println!("✅ User '{}' deleted successfully!", email),
                Err(err) => {
                    eprintln!("❌ Failed to delete user: {}", err);
                    std::process::exit(1);
                }
            }
        }

        UserCommands::SetPassword { email, password } => {
            let user = find_or_exit(user_service, &email).await?;
            let password = match password {
                Some(pw) => pw,
                None => prompt_new_password("New password")?,
            };

            match user_service.set_password(user.id, &password).await {
                Ok(()) => println!("✅ Password updated successfully for '{}'!", email),
                Err(err) => {
                    eprintln!("❌ Failed to update password: {}", err);
                    std::process::exit(1);
                }
            }
        }

        UserCommands::SetActive { email, active } => {
            let user = find_or_exit(user_service, &email).await?;
            match user_service.set_user_active(user.id, active).await {
                Ok(()) => println!(
                    "✅ User '{}' is now {}",
                    email,
                    if active { "active" } else { "inactive" }
                ),
                Err(err) => {
                    eprintln!("❌ Failed to update user: {}", err);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

async fn find_or_exit(
    user_service: &UserService,
    email: &str,
) -> anyhow::Result<ecoswap::models::User> {
    match user_service.find_user_by_email(email).await? {
        Some(user) => Ok(user),
        None => {
            eprintln!("❌ User '{}' not found", email);
            std::process::exit(1);
        }
    }
}

async fn run_category_command(
    categories: &dyn CategoryRepository,
    command: CategoryCommands,
) -> anyhow::Result<()> {
    match command {
        CategoryCommands::Add { name } => match categories.create(name.trim()).await {
            Ok(category) => println!("✅ Category '{}' added (ID {})", category.name, category.id),
            Err(RepositoryError::AlreadyExists) => {
                eprintln!("❌ Category '{}' already exists", name);
                std::process::exit(1);
            }
            Err(err) => return Err(err.into()),
        },

        CategoryCommands::List => {
            let all = categories.list_all().await?;
            if all.is_empty() {
                println!("No categories found. Run `ecoswap-cli category seed` to add defaults.");
            }
            for category in all {
                println!(
                    "{:<5} {:<25} {}",
                    category.id,
                    category.name,
                    if category.active { "active" } else { "inactive" }
                );
            }
        }

        CategoryCommands::Seed => {
            let mut added = 0;
            for name in DEFAULT_CATEGORIES {
                match categories.create(name).await {
                    Ok(_) => added += 1,
                    Err(RepositoryError::AlreadyExists) => {}
                    Err(err) => return Err(err.into()),
                }
            }
            println!("✅ Seeded {} categories", added);
        }
    }

    Ok(())
}
