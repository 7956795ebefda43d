//! Routers grouped by who may call them. `create_router` nests all three under `/api`
//! and applies the access layer each group needs.

/// Anonymous reads, sign-up and login.
pub mod public;

/// Routes behind the `AuthUser` middleware.
pub mod authenticated;

/// Routes behind the admin middleware, nested under `/admin`.
pub mod admin;
