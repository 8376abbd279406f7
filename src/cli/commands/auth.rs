use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{client_for, load_session, save_session};
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::client::{ClientError, Registration};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Create an account")]
    Register {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Accept the terms of use")]
        accept_terms: bool,
    },

    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout and forget the saved token")]
    Logout,

    #[command(about = "Show current user information")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, server: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut session = load_session()?;

    match cmd {
        AuthCommands::Register { name, email, password, accept_terms } => {
            let (password, confirm_password) = match password {
                Some(password) => (password.clone(), password),
                None => (read_line("Password: ")?, read_line("Confirm password: ")?),
            };
            let registration = Registration {
                name,
                email,
                password,
                confirm_password,
                accept_terms,
            };

            let client = client_for(&session, server.as_deref())?;
            let user = match client.register(&registration).await {
                Ok(user) => user,
                Err(e) => return fail(&output_format, e),
            };

            output_success(
                &output_format,
                &format!("Registered {} <{}>", user.nome, user.email),
                Some(serde_json::to_value(&user)?),
            )
        }
        AuthCommands::Login { email, password } => {
            let password = value_or_prompt(password, "Password: ")?;
            let server_url = session.server_url(server.as_deref());

            let mut client = client_for(&session, Some(server_url.as_str()))?;
            let response = match client.login(&email, &password).await {
                Ok(response) => response,
                Err(e) => return fail(&output_format, e),
            };

            session.start(server_url, response.user.email.clone(), response.token.clone());
            save_session(&session)?;

            output_success(
                &output_format,
                &format!("Logged in as {}", response.user.email),
                Some(json!({ "user": response.user, "expiresIn": response.expires_in })),
            )
        }
        AuthCommands::Logout => {
            let mut client = client_for(&session, server.as_deref())?;
            if let Err(e) = client.logout().await {
                tracing::debug!("Server logout failed, clearing local session anyway: {}", e);
            }

            session.clear();
            save_session(&session)?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Whoami => {
            if session.token.is_none() {
                anyhow::bail!("not logged in; run `fintrack auth login <email>` first");
            }

            let client = client_for(&session, server.as_deref())?;
            let identity = match client.me().await {
                Ok(identity) => identity,
                Err(e) => return fail(&output_format, e),
            };

            match output_format {
                OutputFormat::Json => output_json(&identity),
                OutputFormat::Text => {
                    println!("{} <{}>", identity.display_name, identity.email);
                    println!("id: {}", identity.id);
                    Ok(())
                }
            }
        }
    }
}

/// Report a client failure and end the command with an error
pub(crate) fn fail(output_format: &OutputFormat, err: ClientError) -> anyhow::Result<()> {
    output_client_error(output_format, &err)?;
    Err(err.into())
}
