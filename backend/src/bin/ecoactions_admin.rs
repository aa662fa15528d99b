//! Account administration against the configured database.
//!
//! ```text
//! ecoactions-admin create-staff --username ada --email ada@example.org
//! ecoactions-admin promote --username grace
//! ```
//!
//! The password for `create-staff` is read from `ECOACTIONS_ADMIN_PASSWORD`
//! or, when that is unset, from the first line of standard input.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::ffi::OsString;
use std::io::{self, BufRead};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use zeroize::Zeroizing;

use ecoactions::domain::auth::RegistrationInput;
use ecoactions::domain::{AccountService, FormError};
use ecoactions::outbound::persistence::{
    DbPool, DieselActivityRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use ecoactions::outbound::security::Argon2PasswordHasher;
use ecoactions::settings::AppSettings;

const PASSWORD_ENV: &str = "ECOACTIONS_ADMIN_PASSWORD";

#[derive(Debug, Parser)]
#[command(
    name = "ecoactions-admin",
    about = "Create and promote staff accounts",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `ECOACTIONS_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new account with staff rights.
    CreateStaff {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },
    /// Grant staff rights to an existing account.
    Promote {
        #[arg(long)]
        username: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let database_url = resolve_database_url(args.database_url)?;
    run_pending_migrations(&database_url)
        .await
        .wrap_err("apply migrations")?;
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(2))
        .await
        .wrap_err("create database pool")?;
    let accounts = AccountService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselActivityRepository::new(pool)),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(DefaultClock),
    );

    match args.command {
        Command::CreateStaff { username, email } => {
            let password = read_password()?;
            let input = RegistrationInput {
                username: Some(username),
                email: Some(email),
                password1: Some(password.to_string()),
                password2: Some(password.to_string()),
            };
            let user = accounts.create_staff(&input).await.map_err(|err| match err {
                FormError::Invalid(errors) => eyre!("account rejected: {errors}"),
                FormError::Failed(err) => eyre!("account creation failed: {err}"),
            })?;
            println!("created staff account {} ({})", user.username, user.id);
        }
        Command::Promote { username } => {
            accounts
                .promote(&username)
                .await
                .map_err(|err| eyre!("promotion failed: {err}"))?;
            println!("{username} is now staff");
        }
    }
    Ok(())
}

fn resolve_database_url(flag: Option<String>) -> Result<String> {
    if let Some(url) = flag.filter(|url| !url.trim().is_empty()) {
        return Ok(url);
    }
    let settings = AppSettings::load_from_iter([OsString::from("ecoactions-admin")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    settings
        .database_url()
        .map(str::to_owned)
        .ok_or_else(|| eyre!("no database configured; pass --database-url or set ECOACTIONS_DATABASE_URL"))
}

fn read_password() -> Result<Zeroizing<String>> {
    if let Ok(password) = env::var(PASSWORD_ENV) {
        return Ok(Zeroizing::new(password));
    }
    let mut line = Zeroizing::new(String::new());
    io::stdin()
        .lock()
        .read_line(&mut line)
        .wrap_err("read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_owned();
    if password.is_empty() {
        return Err(eyre!("empty password; set {PASSWORD_ENV} or pipe one on stdin"));
    }
    Ok(Zeroizing::new(password))
}
