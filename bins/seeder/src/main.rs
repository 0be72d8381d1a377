//! Database seeder for GauRakshak development and testing.
//!
//! Seeds an active admin account and a pending member so the approval flow
//! can be exercised locally.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use gaurakshak_core::approval::{UserRole, UserStatus};
use gaurakshak_core::auth::hash_password;
use gaurakshak_db::entities::users;

/// Admin user ID (consistent for all seeds)
const ADMIN_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Pending member ID (consistent for all seeds)
const MEMBER_ID: &str = "00000000-0000-0000-0000-000000000002";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = gaurakshak_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding admin user...");
    seed_admin(&db).await;

    println!("Seeding pending member...");
    seed_pending_member(&db).await;

    println!("Seeding complete!");
}

fn admin_id() -> Uuid {
    Uuid::parse_str(ADMIN_ID).unwrap()
}

fn member_id() -> Uuid {
    Uuid::parse_str(MEMBER_ID).unwrap()
}

async fn user_exists(db: &DatabaseConnection, email: &str) -> bool {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
}

/// Seeds an active admin account for development.
async fn seed_admin(db: &DatabaseConnection) {
    if user_exists(db, "admin@gaurakshak.dev").await {
        println!("  Admin user already exists, skipping...");
        return;
    }

    let hash = hash_password("admin-password").expect("Failed to hash admin password");
    let user = users::ActiveModel {
        id: Set(admin_id()),
        email: Set("admin@gaurakshak.dev".to_string()),
        password_hash: Set(hash),
        name: Set("Admin User".to_string()),
        address: Set(None),
        mobile_no: Set(None),
        role: Set(UserRole::Admin.as_str().to_string()),
        status: Set(UserStatus::Active.as_str().to_string()),
        customer_id: Set(None),
        validity_date: Set(None),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert admin user: {e}");
    } else {
        println!("  Created admin user: admin@gaurakshak.dev");
    }
}

/// Seeds a pending member awaiting approval.
async fn seed_pending_member(db: &DatabaseConnection) {
    if user_exists(db, "member@gaurakshak.dev").await {
        println!("  Pending member already exists, skipping...");
        return;
    }

    let hash = hash_password("member-password").expect("Failed to hash member password");
    let user = users::ActiveModel {
        id: Set(member_id()),
        email: Set("member@gaurakshak.dev".to_string()),
        password_hash: Set(hash),
        name: Set("Demo Member".to_string()),
        address: Set(Some("Village Road, Vrindavan".to_string())),
        mobile_no: Set(Some("9876543210".to_string())),
        role: Set(UserRole::User.as_str().to_string()),
        status: Set(UserStatus::Pending.as_str().to_string()),
        customer_id: Set(None),
        validity_date: Set(None),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert pending member: {e}");
    } else {
        println!("  Created pending member: member@gaurakshak.dev");
    }
}
