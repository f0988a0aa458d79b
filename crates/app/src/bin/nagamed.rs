//! NagaMed command-line client
//!
//! # Usage
//!
//! ```bash
//! # Create an account, then sign in
//! nagamed register -f "Alice Reyes" -u alice
//! nagamed login -u alice
//!
//! # Screens
//! nagamed home
//! nagamed appointments
//! nagamed status
//!
//! # Profile management
//! nagamed profile show
//! nagamed profile update --fullname "Alice Santos"
//! nagamed logout
//! nagamed delete-account
//! ```
//!
//! Passwords are read from `--password` or the `NAGAMED_PASSWORD` variable.

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use nagamed_app::appointments::{load_appointments, load_status, AppointmentBook};
use nagamed_app::auth::{sign_in, sign_up, SignInForm, SignUpForm, SIGN_IN_FALLBACK, SIGN_UP_FALLBACK};
use nagamed_app::deletion::{
    delete_account, ConfirmationPrompt, Confirmer, DeletionOutcome, DELETE_ACCOUNT_FALLBACK,
};
use nagamed_app::home::load_home;
use nagamed_app::identity::IdentityView;
use nagamed_app::profile::{
    load_failure_message, load_profile, logout, update_profile, PROFILE_LOAD_FALLBACK,
    PROFILE_UPDATE_FALLBACK,
};
use nagamed_app::App;
use nagamed_common::Config;

#[derive(Parser)]
#[command(name = "nagamed")]
#[command(author, version, about = "NagaMed appointment client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Subcommand)]
enum Commands {
    /// Create a patient account
    Register {
        /// Full name
        #[arg(short, long)]
        fullname: String,

        /// Username
        #[arg(short, long)]
        username: String,

        /// Password (at least 8 characters)
        #[arg(short, long, env = "NAGAMED_PASSWORD", hide_env_values = true)]
        password: String,

        /// Password confirmation; defaults to the password
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Sign in and store the session on this device
    Login {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long, env = "NAGAMED_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the home dashboard
    Home,
    /// Show upcoming appointments
    Appointments,
    /// Show the status of every appointment
    Status,
    /// View or edit the profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Delete the account after two confirmations
    DeleteAccount,
}

#[derive(Clone, Subcommand)]
enum ProfileAction {
    /// Show the profile
    Show,
    /// Update the profile
    Update {
        /// New full name
        #[arg(short, long)]
        fullname: Option<String>,

        /// New username
        #[arg(short, long)]
        username: Option<String>,

        /// New password; the password is left unchanged when omitted
        #[arg(long, env = "NAGAMED_NEW_PASSWORD", hide_env_values = true)]
        new_password: Option<String>,
    },
}

impl Commands {
    /// Text shown to the user when this command fails
    fn failure_message(&self, err: &nagamed_common::Error) -> String {
        let fallback = match self {
            Self::Register { .. } => SIGN_UP_FALLBACK,
            Self::Login { .. } => SIGN_IN_FALLBACK,
            Self::Logout => "Failed to log out.",
            Self::Profile {
                action: ProfileAction::Update { .. },
            } => PROFILE_UPDATE_FALLBACK,
            Self::DeleteAccount => DELETE_ACCOUNT_FALLBACK,
            Self::Profile {
                action: ProfileAction::Show,
            } => return load_failure_message(err),
            Self::Home | Self::Appointments | Self::Status => PROFILE_LOAD_FALLBACK,
        };
        err.user_message(fallback)
    }
}

/// Asks confirmation questions on the terminal
struct TerminalConfirmer;

#[async_trait::async_trait]
impl Confirmer for TerminalConfirmer {
    async fn confirm(&self, prompt: &ConfirmationPrompt) -> bool {
        let mut stdout = tokio::io::stdout();
        let question = format!("{}\n{}\nContinue? [y/N] ", prompt.title, prompt.message);
        if stdout.write_all(question.as_bytes()).await.is_err() || stdout.flush().await.is_err() {
            return false;
        }

        let mut answer = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        match stdin.read_line(&mut answer).await {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                error!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app = App::from_config(&config).map_err(|e| {
        error!("Failed to create application: {}", e);
        e
    })?;

    let command = cli.command;
    if let Err(e) = run(&app, command.clone()).await {
        error!(kind = ?e.kind(), "Command failed: {}", e);
        eprintln!("Error: {}", command.failure_message(&e));
        std::process::exit(1);
    }

    Ok(())
}

async fn run(app: &App, command: Commands) -> nagamed_common::Result<()> {
    match command {
        Commands::Register {
            fullname,
            username,
            password,
            confirm_password,
        } => {
            let form = SignUpForm {
                fullname,
                username,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
            };
            let next = sign_up(app, &form).await?;
            println!("Account created successfully.");
            info!(next = %next, "Registration complete");
        }
        Commands::Login { username, password } => {
            let next = sign_in(app, &SignInForm { username, password }).await?;
            println!("Login successful. Welcome back!");
            info!(next = %next, "Sign-in complete");
        }
        Commands::Logout => {
            logout(app).await?;
            println!("You have been logged out successfully.");
        }
        Commands::Home => {
            let home = load_home(app).await;
            println!("{}", home.greeting());
            print_identity_error(&home.identity);
            println!();
            println!("Health tips:");
            for tip in home.tips {
                println!("  {} <{}>", tip.title, tip.url);
            }
        }
        Commands::Appointments => {
            let view = load_appointments(app, &AppointmentBook::sample()).await;
            println!("{}", view.heading());
            print_identity_error(&view.identity);
            println!();
            println!("Upcoming Appointments");
            if view.upcoming.is_empty() {
                println!("  No upcoming appointments.");
            }
            for appointment in &view.upcoming {
                println!(
                    "  {} ({}) - {}",
                    appointment.doctor,
                    appointment.specialty,
                    appointment.when()
                );
            }
        }
        Commands::Status => {
            let view = load_status(app, &AppointmentBook::sample()).await;
            println!("{}", view.greeting());
            print_identity_error(&view.identity);
            println!();
            for appointment in &view.appointments {
                println!(
                    "  [{}] {} ({}) - {}",
                    appointment.status,
                    appointment.doctor,
                    appointment.specialty,
                    appointment.when()
                );
            }
        }
        Commands::Profile { action } => match action {
            ProfileAction::Show => {
                let editor = load_profile(app).await?;
                println!("Full Name: {}", editor.profile.fullname);
                println!("Username:  {}", editor.profile.username);
            }
            ProfileAction::Update {
                fullname,
                username,
                new_password,
            } => {
                let mut editor = load_profile(app).await?;
                if let Some(fullname) = fullname {
                    editor.fullname = fullname;
                }
                if let Some(username) = username {
                    editor.username = username;
                }
                if let Some(new_password) = new_password {
                    editor.change_password = true;
                    editor.new_password = new_password;
                }
                update_profile(app, &mut editor).await?;
                println!("Profile updated successfully.");
            }
        },
        Commands::DeleteAccount => match delete_account(app, &TerminalConfirmer).await? {
            DeletionOutcome::Declined => println!("Account deletion cancelled."),
            DeletionOutcome::Deleted(_) => {
                println!("Your account has been deleted successfully.")
            }
        },
    }

    Ok(())
}

fn print_identity_error(identity: &IdentityView) {
    if let Some(error) = &identity.error {
        println!("{error}");
    }
}
