pub mod category;
pub mod expense;
pub mod user;

pub use category::{ExpenseCategory, NewExpenseCategory};
pub use expense::{Expense, Natureza, NewExpense};
pub use user::{NewUser, TipoUsuario, User};
