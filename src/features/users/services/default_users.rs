use tracing::{error, info};

use crate::core::error::Result;
use crate::features::users::models::{NewUser, UserRole};
use crate::features::users::password::PasswordHasher;
use crate::features::users::repositories::UserRepository;

struct DefaultUser {
    username: &'static str,
    password: &'static str,
    first_name: &'static str,
    email: &'static str,
    role: UserRole,
}

const DEFAULT_USERS: [DefaultUser; 2] = [
    DefaultUser {
        username: "alice",
        password: "password123",
        first_name: "Alice",
        email: "alice@example.com",
        role: UserRole::User,
    },
    DefaultUser {
        username: "admin",
        password: "adminPass",
        first_name: "Admin",
        email: "admin@example.com",
        role: UserRole::Admin,
    },
];

async fn seed(users: &dyn UserRepository, hasher: &PasswordHasher) -> Result<usize> {
    let mut created = 0;
    for default in &DEFAULT_USERS {
        if users.find_by_username(default.username).await?.is_some() {
            continue;
        }

        info!("Creating user: {}", default.username);
        let password_hash = hasher.hash_blocking(default.password).await?;
        users
            .create(NewUser {
                username: default.username.to_string(),
                password_hash,
                first_name: default.first_name.to_string(),
                last_name: "User".to_string(),
                email: Some(default.email.to_string()),
                role: default.role,
            })
            .await?;
        created += 1;
    }
    Ok(created)
}

/// Create the demo accounts that do not exist yet.
/// Failures are logged; startup continues either way.
pub async fn seed_default_users(users: &dyn UserRepository, hasher: &PasswordHasher) {
    info!("Seeding database with default users");
    match seed(users, hasher).await {
        Ok(created) => info!("Default user seeding done, {} created", created),
        Err(e) => error!("Error seeding default users: {}", e),
    }
}
