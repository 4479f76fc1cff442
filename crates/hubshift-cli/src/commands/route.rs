//! Usage: hubshift route <PATH> [--role <ROLE> | --no-role] [--loading]
//!
//! Prints the route guard's decision as JSON. Without `--role` or
//! `--no-role` the visitor is anonymous.

use clap::Args;
use hubshift_core::model::{AuthProvider, Role, User};
use hubshift_core::routing::{evaluate, GuardDecision, Location, RouteTable, SessionState};
use serde_json::json;

#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Page path, optionally with a query string
    pub path: String,

    /// Signed in and acting as this role
    #[arg(long, conflicts_with = "no_role")]
    pub role: Option<Role>,

    /// Signed in without having picked a role
    #[arg(long)]
    pub no_role: bool,

    /// Session lookup still in flight
    #[arg(long)]
    pub loading: bool,
}

pub fn execute(args: RouteArgs) -> anyhow::Result<()> {
    let user = match (args.role, args.no_role) {
        (Some(role), _) => {
            let mut user = User::new("cli@hubshift.local", AuthProvider::Email);
            user.select_role(role);
            Some(user)
        }
        (None, true) => Some(User::new("cli@hubshift.local", AuthProvider::Email)),
        (None, false) => None,
    };

    let location = Location::parse(&args.path);
    let requirement = RouteTable::standard().lookup(&location.path);
    let decision = evaluate(
        SessionState::from_parts(user.as_ref(), args.loading),
        &location,
        &requirement,
    );

    let output = match &decision {
        GuardDecision::Redirect(redirect) => json!({
            "decision": decision,
            "location": redirect.location(),
        }),
        _ => json!({ "decision": decision }),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
