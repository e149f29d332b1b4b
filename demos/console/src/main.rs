//! Logs a demo account in and prints what it may open.
//!
//! ```text
//! console                            # restore the last session, if any
//! console user@platform.com          # log in as any role
//! console broker@platform.com admin  # log in requiring a role (fails)
//! console --logout
//! ```
//!
//! The session is kept under `.algotrade/` in the working directory, so a
//! second run without arguments picks it up again. The configuration file,
//! if present, is read as JSON.

use std::path::{Path, PathBuf};

use algotrade::prelude::*;
use clap::Parser;

const STORAGE_DIR: &str = ".algotrade";

/// Walk through the AlgoTrade access rules from the command line.
#[derive(Debug, Parser)]
#[command(name = "console")]
#[command(version, long_about = None)]
struct Cli {
    /// Email of the account to log in as. Omit to restore the last session.
    #[arg(conflicts_with = "logout")]
    email: Option<String>,

    /// Role the account must have (user, broker, admin, super_admin).
    #[arg(requires = "email")]
    role: Option<Role>,

    /// End the stored session instead of logging in.
    #[arg(long)]
    logout: bool,

    /// Configuration file. Ignored if it doesn't exist.
    #[arg(long, default_value = "algotrade.json")]
    config: PathBuf,
}

/// Renders who is logged in, where each route leads, and the sidebar.
fn report(state: &SessionState, routes: &RouteTable, menu: &NavMenu) -> String {
    let mut out = String::new();

    match state.user() {
        Some(user) => out.push_str(&format!("{} <{}> as {}\n", user.name, user.email, user.role)),
        None => match state.error_message() {
            Some(message) => out.push_str(&format!("not logged in: {message}\n")),
            None => out.push_str("not logged in\n"),
        },
    }

    out.push_str("\nroutes:\n");
    for path in routes.paths() {
        let outcome = match routes.navigate(path, state) {
            Navigation::Render { .. } => "open".to_string(),
            Navigation::Redirect { to } => format!("-> {to}"),
            Navigation::NotFound => "not found".to_string(),
        };
        out.push_str(&format!("  {path:<20} {outcome}\n"));
    }

    out.push_str("\nsidebar:\n");
    for item in menu.visible(state) {
        out.push_str(&format!("  {}\n", item.label));
    }
    out
}

fn load_config(path: &Path) -> Result<AlgotradeConfig, AlgotradeError> {
    if path.exists() {
        AlgotradeConfig::load(path)
    } else {
        Ok(AlgotradeConfig::default())
    }
}

#[tokio::main]
async fn main() -> Result<(), AlgotradeError> {
    let cli = Cli::parse();
    algotrade::logging::init("info");

    let config = load_config(&cli.config)?;
    let session = SessionStore::spawn(
        MockDirectory::seeded(config.directory.clone()),
        FilePersistence::new(STORAGE_DIR),
        config.session.clone(),
    );

    if cli.logout {
        session.logout().await;
    } else if let Some(email) = cli.email {
        let mut credentials = Credentials::new(email.as_str(), DEMO_PASSWORD);
        if let Some(role) = cli.role {
            credentials = credentials.with_role(role);
        }
        if !session.login(credentials).await {
            tracing::warn!(%email, "login refused");
        }
    }

    let routes = RouteTable::platform(config.guard);
    print!("{}", report(&session.state(), &routes, &NavMenu::platform()));

    session.shutdown().await;
    Ok(())
}
