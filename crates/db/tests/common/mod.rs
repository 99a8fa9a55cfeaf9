#![allow(dead_code)]

use marro_core::lifecycle::{ClientStatus, ProjectStatus};
use marro_core::types::{Day, DbId, OwnerId};
use marro_db::models::client::{Client, CreateClient};
use marro_db::models::project::{CreateProject, Project};
use marro_db::repositories::{ClientRepo, ProjectRepo};
use sqlx::PgPool;

pub fn day(s: &str) -> Day {
    s.parse().unwrap()
}

pub fn new_client(company: &str) -> CreateClient {
    CreateClient {
        name: "Jordan Lee".to_string(),
        email: "jordan@example.com".to_string(),
        company: company.to_string(),
        status: None,
        profile_picture: None,
    }
}

pub fn new_project(client_id: DbId, name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: None,
        client_id,
        status: None,
        progress: None,
        start_date: Some(day("2024-03-04")),
        end_date: None,
        budget: None,
    }
}

/// Insert a client whose slug is derived from `company` the way the API does.
pub async fn create_client(pool: &PgPool, owner: OwnerId, company: &str) -> Client {
    let slug = marro_core::portal::company_slug(company).unwrap();
    ClientRepo::create(
        pool,
        owner,
        &new_client(company),
        ClientStatus::default().as_str(),
        &slug,
    )
    .await
    .unwrap()
}

pub async fn create_project(
    pool: &PgPool,
    owner: OwnerId,
    client_id: DbId,
    status: ProjectStatus,
) -> Project {
    ProjectRepo::create(
        pool,
        owner,
        &new_project(client_id, "Website refresh"),
        status.as_str(),
        status.default_progress(),
    )
    .await
    .unwrap()
    .expect("client belongs to owner")
}
