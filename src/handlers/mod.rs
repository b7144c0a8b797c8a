// Handler tiers:
// public (no auth) → dashboard (JWT + staff) → elevated (JWT + staff or superuser)
pub mod dashboard;
pub mod elevated;
pub mod public;
