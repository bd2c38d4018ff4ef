//! Interactive session that keeps the three panels alive between commands,
//! so results expire and inputs clear the way they do in a form.

use super::commands::{self, Request};
use super::{guide, ui};
use crate::core::{Controller, ExchangeApi, Phase};
use anyhow::{Result, bail};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Run(Request),
    Status,
    Help,
    Quit,
}

/// Parses one shell line. Returns `Ok(None)` for a blank line.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((name, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match (name.to_lowercase().as_str(), args) {
        ("convert", [from, to, amount]) => ShellCommand::Run(Request::Convert {
            from: from.to_string(),
            to: to.to_string(),
            amount: amount.to_string(),
        }),
        ("convert", _) => bail!("Usage: convert FROM TO AMOUNT"),
        ("rate", [from]) => ShellCommand::Run(Request::Rate {
            from: from.to_string(),
            to: None,
        }),
        ("rate", [from, to]) => ShellCommand::Run(Request::Rate {
            from: from.to_string(),
            to: Some(to.to_string()),
        }),
        ("rate", _) => bail!("Usage: rate FROM [TO]"),
        ("quota", [admin, password]) => ShellCommand::Run(Request::Quota {
            admin: admin.to_string(),
            password: password.to_string(),
        }),
        // Credential check decides; a missing password is just a wrong one
        ("quota", [admin]) => ShellCommand::Run(Request::Quota {
            admin: admin.to_string(),
            password: String::new(),
        }),
        ("quota", []) => ShellCommand::Run(Request::Quota {
            admin: String::new(),
            password: String::new(),
        }),
        ("quota", _) => bail!("Usage: quota ADMIN PASSWORD"),
        ("status", []) => ShellCommand::Status,
        ("help", _) => ShellCommand::Help,
        ("quit" | "exit", _) => ShellCommand::Quit,
        (other, _) => bail!("Unknown command: {}. Type 'help' for usage", other),
    };
    Ok(Some(command))
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::Pending => "pending",
        Phase::Displaying => "displaying",
    }
}

/// Current message and phase of each panel.
pub fn status_lines<A: ExchangeApi>(controller: &Controller<A>) -> Vec<String> {
    [
        ("Convert", controller.convert.phase(), controller.convert.result.text()),
        ("Rate", controller.rate.phase(), controller.rate.result.text()),
        ("Quota", controller.quota.phase(), controller.quota.result.text()),
    ]
    .into_iter()
    .map(|(name, phase, text)| format!("{name} [{}]: {text}", phase_label(phase)))
    .collect()
}

pub async fn run<A: ExchangeApi>(controller: &mut Controller<A>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!(
        "{}",
        ui::style_text("xrate shell. Type 'help' for commands.", ui::StyleType::Title)
    );
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(ShellCommand::Help)) => println!("{}", guide::SHELL_HELP),
            Ok(Some(ShellCommand::Status)) => {
                for line in status_lines(controller) {
                    println!("{line}");
                }
            }
            Ok(Some(ShellCommand::Run(request))) => {
                let outcome = commands::dispatch(controller, request).await;
                commands::print_outcome(&outcome);
            }
            Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
        }
    }
    debug!("Shell closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_line("convert usd eur 100").unwrap(),
            Some(ShellCommand::Run(Request::Convert {
                from: "usd".to_string(),
                to: "eur".to_string(),
                amount: "100".to_string(),
            }))
        );
        assert_eq!(
            parse_line("  RATE USD ").unwrap(),
            Some(ShellCommand::Run(Request::Rate {
                from: "USD".to_string(),
                to: None,
            }))
        );
        assert_eq!(
            parse_line("rate USD EUR").unwrap(),
            Some(ShellCommand::Run(Request::Rate {
                from: "USD".to_string(),
                to: Some("EUR".to_string()),
            }))
        );
        assert_eq!(
            parse_line("quota admin").unwrap(),
            Some(ShellCommand::Run(Request::Quota {
                admin: "admin".to_string(),
                password: String::new(),
            }))
        );
        assert_eq!(parse_line("status").unwrap(), Some(ShellCommand::Status));
        assert_eq!(parse_line("exit").unwrap(), Some(ShellCommand::Quit));
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_line("convert usd eur").unwrap_err().to_string(),
            "Usage: convert FROM TO AMOUNT"
        );
        assert_eq!(
            parse_line("rate").unwrap_err().to_string(),
            "Usage: rate FROM [TO]"
        );
        assert!(
            parse_line("swap usd")
                .unwrap_err()
                .to_string()
                .starts_with("Unknown command: swap")
        );
    }
}
