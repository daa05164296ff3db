//! User account feature: profile, password, settings and storage usage.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/users/me` | Get own profile |
//! | PUT | `/users/me` | Update name, email and bio |
//! | POST | `/users/change-password` | Change password |
//! | GET | `/users/settings` | Get settings (created with defaults on first access) |
//! | PUT | `/users/settings` | Partially update settings |
//! | GET | `/users/storage` | Storage usage against the quota |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod services;
