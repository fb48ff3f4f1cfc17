use anyhow::Context;
use diesel::sql_query;
use diesel_async::pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager};
use diesel_async::RunQueryDsl;
use diesel_async::{AsyncConnection, AsyncPgConnection};

pub type PgPool = Pool<AsyncPgConnection>;

/******************************************/
// Establishing Db Connection
/******************************************/
pub fn establish_connection(database_url: &str) -> Result<PgPool, anyhow::Error> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);

    Pool::builder(manager)
        .max_size(16)
        .build()
        .context("Failed to create pool")
}

/******************************************/
// Creating new db for tests
/******************************************/
pub async fn create_database(database_name: &str, maintenance_url: &str) -> Result<(), anyhow::Error> {
    let mut connection = AsyncPgConnection::establish(maintenance_url)
        .await
        .context("Failed to connect to Postgres")?;

    let create_db_query = format!(r#"CREATE DATABASE "{}";"#, database_name);
    sql_query(&create_db_query)
        .execute(&mut connection)
        .await
        .context("Failed to create database")?;
    tracing::info!("Database '{}' created", database_name);
    Ok(())
}

/******************************************/
// Dropping db code
/******************************************/
pub async fn drop_database(database_name: &str, maintenance_url: &str) {
    let mut connection = match AsyncPgConnection::establish(maintenance_url).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!("Failed to connect to the maintenance database: {}", e);
            return;
        }
    };

    // A database with open sessions can't be dropped.
    let terminate_query = format!(
        r#"
        SELECT pg_terminate_backend(pid)
        FROM pg_stat_activity
        WHERE datname = '{}';
    "#,
        database_name
    );

    if let Err(e) = sql_query(&terminate_query).execute(&mut connection).await {
        tracing::error!("Failed to terminate connections: {}", e);
        return;
    }

    let drop_query = format!(r#"DROP DATABASE IF EXISTS "{}";"#, database_name);

    if let Err(e) = sql_query(&drop_query).execute(&mut connection).await {
        tracing::error!("Failed to drop database: {}", e);
    } else {
        tracing::info!("Database '{}' dropped successfully.", database_name);
    }
}
