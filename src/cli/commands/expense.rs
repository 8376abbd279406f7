use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::cli::config::{client_for, load_session};
use crate::cli::prompt::TerminalPrompt;
use crate::cli::utils::*;
use crate::cli::view::render_expenses;
use crate::cli::OutputFormat;
use crate::client::{ListState, ResourceList};
use crate::database::models::{Expense, Natureza, NewExpense};

#[derive(Subcommand)]
pub enum ExpenseCommands {
    #[command(about = "List your expenses, newest first")]
    List,

    #[command(about = "Record an expense")]
    Add {
        #[arg(help = "Amount, e.g. 42.50")]
        valor: Decimal,
        #[arg(long, help = "Category id")]
        category: Uuid,
        #[arg(long, help = "NECESSARIO, SUPERFLUO or EMERGENCIAL", default_value = "NECESSARIO")]
        natureza: String,
        #[arg(long, help = "Date as YYYY-MM-DD or RFC 3339 (defaults to now)")]
        date: Option<String>,
    },

    #[command(about = "Delete an expense")]
    Delete {
        #[arg(help = "Expense id")]
        id: Uuid,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

pub async fn handle(cmd: ExpenseCommands, server: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = load_session()?;
    let client = client_for(&session, server.as_deref())?;

    match cmd {
        ExpenseCommands::List => {
            let list: ResourceList<Expense, _> = ResourceList::mount(client, TerminalPrompt::new(false)).await;

            if let ListState::Failed(message) = list.state() {
                anyhow::bail!("{}", message);
            }

            match output_format {
                OutputFormat::Json => output_json(&list.items()),
                OutputFormat::Text => {
                    print!("{}", render_expenses(list.items()));
                    Ok(())
                }
            }
        }
        ExpenseCommands::Add { valor, category, natureza, date } => {
            let new = NewExpense {
                valor,
                data: parse_date(date.as_deref())?,
                natureza: Natureza::try_from(natureza.trim().to_ascii_uppercase()).map_err(anyhow::Error::msg)?,
                category_id: category,
            };

            let mut list: ResourceList<Expense, _> = ResourceList::new(client, TerminalPrompt::new(false));
            match list.create(&new).await {
                Some(expense) => output_success(
                    &output_format,
                    &format!("Recorded {} in '{}' ({})", expense.valor, expense.category.nome, expense.id),
                    Some(serde_json::to_value(&expense)?),
                ),
                None => anyhow::bail!("expense was not recorded"),
            }
        }
        ExpenseCommands::Delete { id, yes } => {
            let mut list: ResourceList<Expense, _> = ResourceList::new(client, TerminalPrompt::new(yes));

            if list.delete(id).await {
                output_success(&output_format, &format!("Deleted expense {}", id), None)
            } else {
                anyhow::bail!("expense {} was not deleted", id)
            }
        }
    }
}

/// `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp
fn parse_date(value: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    let Some(value) = value else {
        return Ok(Utc::now());
    };

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow::anyhow!("invalid date '{}': {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_dates_are_midnight_utc() {
        let parsed = parse_date(Some("2024-03-01")).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }

    #[test]
    fn accepts_rfc3339_with_offset() {
        let parsed = parse_date(Some("2024-03-01T10:00:00-03:00")).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-01T13:00:00+00:00");
    }

    #[test]
    fn rejects_nonsense() {
        assert!(parse_date(Some("yesterday")).is_err());
    }
}
