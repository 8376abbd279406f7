use clap::Subcommand;
use uuid::Uuid;

use crate::cli::config::{client_for, load_session};
use crate::cli::prompt::TerminalPrompt;
use crate::cli::utils::*;
use crate::cli::view::render_categories;
use crate::cli::OutputFormat;
use crate::client::{ListState, ResourceList};
use crate::database::models::{ExpenseCategory, NewExpenseCategory};

#[derive(Subcommand)]
pub enum CategoryCommands {
    #[command(about = "List your categories")]
    List,

    #[command(about = "Create a category")]
    Add {
        #[arg(help = "Category name")]
        nome: String,
        #[arg(long, help = "Optional description")]
        descricao: Option<String>,
    },

    #[command(about = "Delete an unused category")]
    Delete {
        #[arg(help = "Category id")]
        id: Uuid,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

pub async fn handle(cmd: CategoryCommands, server: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = load_session()?;
    let client = client_for(&session, server.as_deref())?;

    match cmd {
        CategoryCommands::List => {
            let list: ResourceList<ExpenseCategory, _> =
                ResourceList::mount(client, TerminalPrompt::new(false)).await;

            if let ListState::Failed(message) = list.state() {
                anyhow::bail!("{}", message);
            }

            match output_format {
                OutputFormat::Json => output_json(&list.items()),
                OutputFormat::Text => {
                    print!("{}", render_categories(list.items()));
                    Ok(())
                }
            }
        }
        CategoryCommands::Add { nome, descricao } => {
            let mut list: ResourceList<ExpenseCategory, _> =
                ResourceList::new(client, TerminalPrompt::new(false));

            match list.create(&NewExpenseCategory { nome, descricao }).await {
                Some(category) => output_success(
                    &output_format,
                    &format!("Created category '{}' ({})", category.nome, category.id),
                    Some(serde_json::to_value(&category)?),
                ),
                None => anyhow::bail!("category was not created"),
            }
        }
        CategoryCommands::Delete { id, yes } => {
            let mut list: ResourceList<ExpenseCategory, _> =
                ResourceList::new(client, TerminalPrompt::new(yes));

            if list.delete(id).await {
                output_success(&output_format, &format!("Deleted category {}", id), None)
            } else {
                anyhow::bail!("category {} was not deleted", id)
            }
        }
    }
}
