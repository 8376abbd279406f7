//! Plain-text list rendering for the terminal.

use crate::database::models::{Expense, ExpenseCategory};
use crate::messages::Message;

/// What to show when a list has nothing in it
#[derive(Debug, Clone)]
pub struct EmptyState {
    pub glyph: &'static str,
    pub title: String,
    pub message: String,
}

/// Titled list with a count badge, or an empty-state block.
#[derive(Debug, Clone)]
pub struct ListView {
    pub title: String,
    pub glyph: &'static str,
    pub singular: String,
    pub plural: String,
    pub empty: EmptyState,
}

impl ListView {
    pub fn noun(&self, count: usize) -> &str {
        if count == 1 {
            &self.singular
        } else {
            &self.plural
        }
    }

    pub fn render(&self, rows: &[String]) -> String {
        if rows.is_empty() {
            return format!("{}\n{}\n{}\n", self.empty.glyph, self.empty.title, self.empty.message);
        }

        let mut out = format!(
            "{} {} ({} {})\n",
            self.glyph,
            self.title,
            rows.len(),
            self.noun(rows.len())
        );
        for row in rows {
            out.push_str("  ");
            out.push_str(row);
            out.push('\n');
        }
        out
    }
}

pub fn category_view() -> ListView {
    ListView {
        title: Message::CategoriesTitle.text().to_string(),
        glyph: "#",
        singular: Message::CategoryNoun.text().to_string(),
        plural: Message::CategoriesNoun.text().to_string(),
        empty: EmptyState {
            glyph: "[ ]",
            title: Message::NoCategoriesTitle.text().to_string(),
            message: Message::NoCategoriesHint.text().to_string(),
        },
    }
}

pub fn expense_view() -> ListView {
    ListView {
        title: Message::ExpensesTitle.text().to_string(),
        glyph: "$",
        singular: Message::ExpenseNoun.text().to_string(),
        plural: Message::ExpensesNoun.text().to_string(),
        empty: EmptyState {
            glyph: "[ ]",
            title: Message::NoExpensesTitle.text().to_string(),
            message: Message::NoExpensesHint.text().to_string(),
        },
    }
}

pub fn category_row(category: &ExpenseCategory) -> String {
    match &category.descricao {
        Some(descricao) => format!("{}  {} - {}", category.id, category.nome, descricao),
        None => format!("{}  {}", category.id, category.nome),
    }
}

pub fn expense_row(expense: &Expense) -> String {
    format!(
        "{}  {}  {:>12}  {:<11}  {}",
        expense.id,
        expense.data.format("%Y-%m-%d"),
        expense.valor.round_dp(2).to_string(),
        expense.natureza.as_str(),
        expense.category.nome
    )
}

pub fn render_categories(categories: &[ExpenseCategory]) -> String {
    let rows: Vec<String> = categories.iter().map(category_row).collect();
    category_view().render(&rows)
}

pub fn render_expenses(expenses: &[Expense]) -> String {
    let rows: Vec<String> = expenses.iter().map(expense_row).collect();
    expense_view().render(&rows)
}
