//! Run one authentication gateway operation against the Identity Toolkit.

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use auth_gateway::TraceId;
use auth_gateway::domain::ports::{AuthenticationGateway, GatewayOperation};
use auth_gateway::domain::{AuthenticationError, Credentials, ProviderAuthenticationGateway};
use auth_gateway::outbound::identity_toolkit::{IdentityToolkitProvider, IdentityToolkitSettings};
use clap::{Parser, Subcommand};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `auth-gateway` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "auth-gateway",
    about = "Run authentication gateway operations against the Identity Toolkit",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Sign in with email and password.
    Login {
        #[arg(long, value_name = "email")]
        email: String,
        #[arg(long, value_name = "password")]
        password: String,
    },
    /// Create an account.
    Signup {
        #[arg(long, value_name = "email")]
        email: String,
        #[arg(long, value_name = "password")]
        password: String,
        /// Create the account without switching the current session.
        #[arg(long = "no-auto-login")]
        prevent_automatic_login: bool,
    },
    /// End the current session.
    ///
    /// Each run is a fresh process with an in-memory session, so no session
    /// from an earlier run is ever present and this always succeeds.
    Logout,
    /// Send a password reset email.
    RequestPasswordReset {
        #[arg(long, value_name = "email")]
        email: String,
    },
    /// Apply a new password with a reset code.
    ResetPassword {
        #[arg(long = "new-password", value_name = "password")]
        new_password: String,
        #[arg(long = "code", value_name = "oob-code")]
        confirmation_code: String,
    },
    /// Report whether a session is active.
    ///
    /// Each run starts with an empty in-memory session, so this reports
    /// `false`.
    Authenticated,
}

impl Command {
    const fn operation(&self) -> GatewayOperation {
        match self {
            Self::Login { .. } => GatewayOperation::Login,
            Self::Signup { .. } => GatewayOperation::Signup,
            Self::Logout => GatewayOperation::Logout,
            Self::RequestPasswordReset { .. } => GatewayOperation::RequestPasswordReset,
            Self::ResetPassword { .. } => GatewayOperation::ResetPassword,
            Self::Authenticated => GatewayOperation::Authenticated,
        }
    }
}

fn main() -> io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = IdentityToolkitSettings::load_from_iter([OsString::from("auth-gateway")])
        .map_err(|error| io::Error::other(format!("load identity toolkit settings: {error}")))?;
    let provider = IdentityToolkitProvider::new(&settings)
        .map_err(|error| io::Error::other(format!("create identity toolkit client: {error}")))?;
    let gateway = ProviderAuthenticationGateway::new(Arc::new(provider));

    let trace_id = TraceId::generate();
    println!("operation={}", args.command.operation().as_str());
    println!("trace_id={trace_id}");

    match TraceId::scope(trace_id, run(&gateway, args.command)).await {
        Ok(lines) => {
            println!("status=ok");
            for (key, value) in lines {
                println!("{key}={value}");
            }
            Ok(())
        }
        Err(error) => {
            println!("status=error");
            println!("error_kind={}", error.kind());
            println!("cause={}", error.cause());
            Err(io::Error::other(format!(
                "{} failed: {error}",
                error.kind()
            )))
        }
    }
}

async fn run(
    gateway: &dyn AuthenticationGateway,
    command: Command,
) -> Result<Vec<(&'static str, String)>, AuthenticationError> {
    match command {
        Command::Login { email, password } => {
            gateway.login(&Credentials::new(email, password)).await?;
            Ok(Vec::new())
        }
        Command::Signup {
            email,
            password,
            prevent_automatic_login,
        } => {
            let account_id = gateway
                .signup(
                    &Credentials::new(email, password),
                    prevent_automatic_login,
                )
                .await?;
            Ok(vec![("account_id", account_id)])
        }
        Command::Logout => {
            gateway.logout().await?;
            Ok(Vec::new())
        }
        Command::RequestPasswordReset { email } => {
            gateway.request_password_reset(&email).await?;
            Ok(Vec::new())
        }
        Command::ResetPassword {
            new_password,
            confirmation_code,
        } => {
            gateway
                .reset_password(&new_password, &confirmation_code)
                .await?;
            Ok(Vec::new())
        }
        Command::Authenticated => {
            let authenticated = gateway.authenticated().await?;
            Ok(vec![("authenticated", authenticated.to_string())])
        }
    }
}
