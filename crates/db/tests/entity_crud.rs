//! Integration tests for client, project, document, and message CRUD.
//!
//! Exercises the repository layer against a real database:
//! - Portal slug allocation across owners and deleted clients
//! - Owner scoping of inserts guarded by client ownership
//! - Document records, messages, and analytics entries

mod common;

use assert_matches::assert_matches;
use common::{create_client, create_project};
use marro_core::lifecycle::{MessageKind, MessageStatus, ProjectStatus};
use marro_db::models::analytics::CreateAnalyticsEntry;
use marro_db::models::document::CreateDocument;
use marro_db::models::message::{CreateMessage, UpdateMessage};
use marro_db::repositories::{AnalyticsRepo, ClientRepo, DocumentRepo, MessageRepo, ProjectRepo};
use sqlx::PgPool;
use uuid::Uuid;

fn new_document(name: &str, project_id: Option<i64>) -> CreateDocument {
    CreateDocument {
        name: name.to_string(),
        project_id,
        size_bytes: 48_213,
        content_type: "application/pdf".to_string(),
        url: format!("https://files.example.com/{name}"),
        is_contract: true,
    }
}

fn new_message(client_id: i64, project_id: Option<i64>) -> CreateMessage {
    CreateMessage {
        client_id,
        project_id,
        content: "The homepage draft is ready for review.".to_string(),
        kind: MessageKind::Approval.as_str().to_string(),
        status: None,
        attachments: vec!["https://files.example.com/draft.png".to_string()],
    }
}

// ---------------------------------------------------------------------------
// Portal slugs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_same_company_under_two_owners_gets_numbered_slug(pool: PgPool) {
    let first = create_client(&pool, Uuid::new_v4(), "Acme").await;
    let second = create_client(&pool, Uuid::new_v4(), "Acme").await;
    let third = create_client(&pool, Uuid::new_v4(), "ACME!").await;

    assert_eq!(first.portal_slug, "acme");
    assert_eq!(second.portal_slug, "acme-2");
    assert_eq!(third.portal_slug, "acme-3");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_client_releases_its_slug(pool: PgPool) {
    let owner = Uuid::new_v4();
    let original = create_client(&pool, owner, "Acme").await;
    assert!(ClientRepo::soft_delete(&pool, owner, original.id).await.unwrap());

    let recreated = create_client(&pool, owner, "Acme").await;
    assert_eq!(recreated.portal_slug, "acme");

    let found = ClientRepo::find_by_portal_slug(&pool, "acme").await.unwrap();
    assert_eq!(found.map(|c| c.id), Some(recreated.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_client_update_keeps_slug(pool: PgPool) {
    let owner = Uuid::new_v4();
    let client = create_client(&pool, owner, "Design Co").await;

    let update = marro_db::models::client::UpdateClient {
        name: None,
        email: None,
        company: Some("Design Collective".to_string()),
        status: Some("active".to_string()),
        profile_picture: None,
    };
    let updated = ClientRepo::update(&pool, owner, client.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.company, "Design Collective");
    assert_eq!(updated.status, "active");
    assert_eq!(updated.portal_slug, "design-co");
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_under_foreign_client_is_not_created(pool: PgPool) {
    let client = create_client(&pool, Uuid::new_v4(), "Acme").await;

    let created = ProjectRepo::create(
        &pool,
        Uuid::new_v4(),
        &common::new_project(client.id, "Stolen"),
        "planning",
        0,
    )
    .await
    .unwrap();
    assert!(created.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_list_filters_by_client(pool: PgPool) {
    let owner = Uuid::new_v4();
    let a = create_client(&pool, owner, "Alpha").await;
    let b = create_client(&pool, owner, "Beta").await;
    let in_a = create_project(&pool, owner, a.id, ProjectStatus::Planning).await;
    create_project(&pool, owner, b.id, ProjectStatus::Review).await;

    let all = ProjectRepo::list(&pool, owner, None).await.unwrap();
    assert_eq!(all.len(), 2);

    let only_a = ProjectRepo::list(&pool, owner, Some(a.id)).await.unwrap();
    assert_eq!(only_a.iter().map(|p| p.id).collect::<Vec<_>>(), vec![in_a.id]);

    let other_owner = ProjectRepo::list(&pool, Uuid::new_v4(), None).await.unwrap();
    assert!(other_owner.is_empty());
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_document_records_list_newest_first(pool: PgPool) {
    let owner = Uuid::new_v4();
    let client = create_client(&pool, owner, "Acme").await;
    let project = create_project(&pool, owner, client.id, ProjectStatus::Planning).await;

    let contract = DocumentRepo::create(
        &pool,
        owner,
        client.id,
        &new_document("contract.pdf", None),
    )
    .await
    .unwrap()
    .unwrap();
    let brief = DocumentRepo::create(
        &pool,
        owner,
        client.id,
        &new_document("brief.pdf", Some(project.id)),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(brief.project_id, Some(project.id));

    let listed = DocumentRepo::list_for_client(&pool, owner, client.id).await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![brief.id, contract.id]);

    assert!(DocumentRepo::soft_delete(&pool, owner, client.id, contract.id).await.unwrap());
    let listed = DocumentRepo::list_for_client(&pool, owner, client.id).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_document_project_must_belong_to_client(pool: PgPool) {
    let owner = Uuid::new_v4();
    let acme = create_client(&pool, owner, "Acme").await;
    let other = create_client(&pool, owner, "Other").await;
    let other_project = create_project(&pool, owner, other.id, ProjectStatus::Planning).await;

    let created = DocumentRepo::create(
        &pool,
        owner,
        acme.id,
        &new_document("brief.pdf", Some(other_project.id)),
    )
    .await
    .unwrap();
    assert!(created.is_none());

    let foreign = DocumentRepo::create(&pool, Uuid::new_v4(), acme.id, &new_document("x", None))
        .await
        .unwrap();
    assert!(foreign.is_none());
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_message_lifecycle(pool: PgPool) {
    let owner = Uuid::new_v4();
    let client = create_client(&pool, owner, "Acme").await;
    let project = create_project(&pool, owner, client.id, ProjectStatus::Review).await;

    let message = MessageRepo::create(
        &pool,
        owner,
        &new_message(client.id, Some(project.id)),
        MessageKind::Approval.as_str(),
        MessageStatus::default().as_str(),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(message.kind, "approval");
    assert_eq!(message.status, "unread");
    assert_eq!(message.attachments.len(), 1);

    let update = UpdateMessage {
        content: None,
        status: Some(MessageStatus::Responded.as_str().to_string()),
    };
    let updated = MessageRepo::update(&pool, owner, message.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, "responded");
    assert_eq!(updated.content, message.content);

    let for_client = MessageRepo::list(&pool, owner, Some(client.id)).await.unwrap();
    assert_eq!(for_client.len(), 1);
    assert!(MessageRepo::find_by_id(&pool, Uuid::new_v4(), message.id)
        .await
        .unwrap()
        .is_none());

    assert!(MessageRepo::soft_delete(&pool, owner, message.id).await.unwrap());
    assert!(!MessageRepo::soft_delete(&pool, owner, message.id).await.unwrap());
    assert!(MessageRepo::list(&pool, owner, None).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_message_kind_is_check_constrained(pool: PgPool) {
    let owner = Uuid::new_v4();
    let client = create_client(&pool, owner, "Acme").await;

    let input = new_message(client.id, None);
    let result = MessageRepo::create(&pool, owner, &input, "memo", "unread").await;
    assert_matches!(
        result,
        Err(sqlx::Error::Database(err)) if err.constraint() == Some("ck_messages_kind")
    );
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_analytics_list_by_period_newest_first(pool: PgPool) {
    let owner = Uuid::new_v4();
    let entries = [
        ("2024-02-01", "monthly"),
        ("2024-03-01", "monthly"),
        ("2024-03-04", "weekly"),
    ];
    for (date, period) in entries {
        let input = CreateAnalyticsEntry {
            metric: "revenue".to_string(),
            value: 1250.5,
            period: period.to_string(),
            date: common::day(date),
        };
        AnalyticsRepo::create(&pool, owner, &input, period).await.unwrap();
    }

    let monthly = AnalyticsRepo::list(&pool, owner, Some("monthly")).await.unwrap();
    let dates: Vec<_> = monthly.iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![common::day("2024-03-01"), common::day("2024-02-01")]);

    assert_eq!(AnalyticsRepo::list(&pool, owner, None).await.unwrap().len(), 3);
    assert!(AnalyticsRepo::list(&pool, Uuid::new_v4(), None).await.unwrap().is_empty());
}
