// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (token required)
pub mod public;    // /api/auth/register, /api/auth/login, /api/auth/logout
pub mod protected; // /api/auth/me, /api/expenses/*, /api/expense-categories/*
