use super::{rates, ui};
use crate::core::{CommandOutcome, Controller, ExchangeApi};
use anyhow::{Context, Result, bail};
use console::Term;

/// A single command with its form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Convert {
        from: String,
        to: String,
        amount: String,
    },
    Rate {
        from: String,
        to: Option<String>,
    },
    Quota {
        admin: String,
        password: String,
    },
}

/// Fills the matching panel and runs its handler, with a spinner while the
/// request is pending.
pub async fn dispatch<A: ExchangeApi>(
    controller: &mut Controller<A>,
    request: Request,
) -> CommandOutcome {
    let (command, outcome) = match request {
        Request::Convert { from, to, amount } => {
            controller.convert.source.set(from);
            controller.convert.target.set(to);
            controller.convert.amount.set(amount);
            let pb = ui::new_spinner("Converting...");
            let outcome = controller.convert().await;
            pb.finish_and_clear();
            ("convert", outcome)
        }
        Request::Rate { from, to } => {
            controller.rate.source.set(from);
            controller.rate.target.set(to.unwrap_or_default());
            let pb = ui::new_spinner("Fetching exchange rates...");
            let outcome = controller.get_rate().await;
            pb.finish_and_clear();
            ("rate", outcome)
        }
        Request::Quota { admin, password } => {
            controller.quota.admin.set(admin);
            controller.quota.password.set(password);
            let pb = ui::new_spinner("Checking quota...");
            let outcome = controller.check_quota().await;
            pb.finish_and_clear();
            ("quota", outcome)
        }
    };
    tracing::debug!(command, success = outcome.is_success(), "Command finished");
    outcome
}

pub fn print_outcome(outcome: &CommandOutcome) {
    match outcome {
        CommandOutcome::RateTable(table) => rates::display_rate_table(table),
        other => {
            if let Some(line) = ui::outcome_line(other) {
                println!("{line}");
            }
        }
    }
}

/// Turns a rejected or failed outcome into an error, leaving the caller to
/// report it once.
pub fn into_result(outcome: CommandOutcome) -> Result<CommandOutcome> {
    match outcome {
        CommandOutcome::Rejected(text) => bail!("{}", text),
        CommandOutcome::Failed(reason) => bail!("Request failed: {}", reason),
        shown => Ok(shown),
    }
}

/// Runs one command, printing what it shows. Failures are returned, not
/// printed.
pub async fn run<A: ExchangeApi>(controller: &mut Controller<A>, request: Request) -> Result<()> {
    let outcome = into_result(dispatch(controller, request).await)?;
    print_outcome(&outcome);
    Ok(())
}

/// Asks for whichever admin credential was not passed on the command line.
pub fn prompt_credentials(admin: Option<String>, password: Option<String>) -> Result<(String, String)> {
    let term = Term::stderr();
    let admin = match admin {
        Some(admin) => admin,
        None => {
            term.write_str("Admin: ")?;
            term.read_line().context("Failed to read admin name")?
        }
    };
    let password = match password {
        Some(password) => password,
        None => {
            term.write_str("Password: ")?;
            term.read_secure_line().context("Failed to read password")?
        }
    };
    Ok((admin, password))
}
