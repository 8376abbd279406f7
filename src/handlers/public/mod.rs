// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Account creation and session acquisition. Every input is untrusted and
// goes through the validation schemas before touching the store.
pub mod auth;
