use crate::domain::{
    chat::entity::{chat_room, message},
    project::entity::project,
    review::entity::review,
    user::entity::user,
};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema, Statement,
};
use std::env;
use tracing::info;

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());

    // 인메모리 SQLite는 커넥션마다 별도의 DB가 생기므로 단일 커넥션으로 고정
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    info!("Successfully connected to the database.");

    // Check if schema update is enabled
    let should_update_schema = env::var("DB_SCHEMA_UPDATE")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid DB_SCHEMA_UPDATE value, defaulting to false. Use 'true' or 'false'."
            );
            false
        });

    if should_update_schema {
        create_tables(&db).await?;
    } else {
        info!("Skipping database schema synchronization (DB_SCHEMA_UPDATE is not true).");
    }

    Ok(db)
}

/// 엔티티 기준으로 테이블과 인덱스를 생성합니다. 여러 번 호출해도 안전합니다.
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    info!("Starting database schema synchronization...");

    // Order matters for foreign keys! (Parent first, then Child)

    // 1. Independent Entities
    create_table_if_not_exists(db, &schema, user::Entity).await?;

    // 2. Dependent Entities (Level 1)
    create_table_if_not_exists(db, &schema, project::Entity).await?;

    // 3. Dependent Entities (Level 2)
    create_table_if_not_exists(db, &schema, review::Entity).await?;
    create_table_if_not_exists(db, &schema, chat_room::Entity).await?;

    // 4. Dependent Entities (Level 3)
    create_table_if_not_exists(db, &schema, message::Entity).await?;

    // 프로젝트 + 참여자 쌍당 채팅방 하나 (동시 최초 접촉 시 중복 생성 방지)
    create_unique_index_if_not_exists(
        db,
        "uq_chat_room_project_participants",
        "chat_room",
        &["project_id", "participant_low", "participant_high"],
    )
    .await?;
    create_index_if_not_exists(
        db,
        "idx_message_chat_room",
        "message",
        &["chat_room_id", "message_id"],
    )
    .await?;
    create_index_if_not_exists(db, "idx_project_room_type", "project", &["room_type"]).await?;
    create_index_if_not_exists(db, "idx_review_project", "review", &["project_id"]).await?;

    info!("Database schema synchronization completed.");
    Ok(())
}

async fn create_index_if_not_exists(
    db: &DatabaseConnection,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
) -> Result<(), DbErr> {
    let sql = format!(
        "CREATE INDEX {} ON {} ({})",
        index_name,
        table_name,
        columns.join(", ")
    );
    execute_ignoring_existing(db, index_name, sql).await
}

async fn create_unique_index_if_not_exists(
    db: &DatabaseConnection,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
) -> Result<(), DbErr> {
    let sql = format!(
        "CREATE UNIQUE INDEX {} ON {} ({})",
        index_name,
        table_name,
        columns.join(", ")
    );
    execute_ignoring_existing(db, index_name, sql).await
}

async fn execute_ignoring_existing(
    db: &DatabaseConnection,
    index_name: &str,
    sql: String,
) -> Result<(), DbErr> {
    let stmt = Statement::from_string(db.get_database_backend(), sql);
    match db.execute(stmt).await {
        Ok(_) => Ok(()),
        Err(e) => {
            // Ignore duplicate index errors for idempotency.
            let err_str = e.to_string().to_lowercase();
            if err_str.contains("duplicate") || err_str.contains("exists") {
                Ok(())
            } else {
                tracing::error!("Failed to create index {}: {}", index_name, e);
                Err(e)
            }
        }
    }
}

async fn create_table_if_not_exists<E>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr>
where
    E: sea_orm::EntityTrait,
{
    let backend = db.get_database_backend();
    let create_stmt: Statement =
        backend.build(schema.create_table_from_entity(entity).if_not_exists());

    db.execute(create_stmt).await.map(|_| ()).map_err(|e| {
        tracing::error!("Failed to create table: {}", e);
        e
    })
}
