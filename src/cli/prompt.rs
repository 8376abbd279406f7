use crate::cli::utils::read_line;
use crate::client::Prompt;

/// Terminal implementation of [`Prompt`]: notices go to stderr, confirmation
/// reads a y/N answer from stdin unless `assume_yes` is set.
pub struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompt for TerminalPrompt {
    fn notify(&mut self, message: &str) {
        eprintln!("! {}", message);
    }

    fn confirm(&mut self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        match read_line(&format!("{} [y/N] ", question)) {
            Ok(answer) => is_yes(&answer),
            Err(e) => {
                tracing::debug!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "s" | "sim")
}
