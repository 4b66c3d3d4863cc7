use std::sync::Arc;

use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use vmhive_error::io::{IoError, IoResult};

use crate::models::{DBConn, Pool};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Run a store operation on the blocking pool.
/// Every repository call goes through here so request handlers and the
/// background loops never block the runtime on the database.
pub(crate) async fn exec_blocking<T, F>(f: F) -> IoResult<T>
where
  F: FnOnce() -> IoResult<T> + Send + 'static,
  T: Send + 'static,
{
  tokio::task::spawn_blocking(f)
    .await
    .map_err(|err| IoError::interrupted("Blocking task", &err.to_string()))?
}

/// Create a connection pool to the relational store
pub(crate) async fn create_pool(store_url: &str) -> IoResult<Pool> {
  let db_url = store_url.to_owned();
  let pool = exec_blocking(move || {
    let manager = ConnectionManager::<PgConnection>::new(db_url);
    r2d2::Pool::builder().build(manager).map_err(|err| {
      IoError::interrupted("Store", &format!("Unable to create pool {err}"))
    })
  })
  .await?;
  Ok(Arc::new(pool))
}

/// Get a connection from the pool
pub(crate) fn get_pool_conn(pool: &Pool) -> IoResult<DBConn> {
  let conn = match pool.get() {
    Ok(conn) => conn,
    Err(err) => {
      return Err(IoError::new(
        "Store connection",
        std::io::Error::new(std::io::ErrorKind::NotConnected, err),
      ))
    }
  };
  Ok(conn)
}

/// Connect to the store and align the schema.
/// Migrations are embedded in the binary and are idempotent.
pub(crate) async fn init(store_url: &str) -> IoResult<Pool> {
  log::info!("Connecting to store at: {store_url}");
  let pool = create_pool(store_url).await?;
  let migration_pool = Arc::clone(&pool);
  exec_blocking(move || {
    let mut conn = get_pool_conn(&migration_pool)?;
    conn
      .run_pending_migrations(MIGRATIONS)
      .map_err(|err| IoError::interrupted("Store migration", &format!("{err}")))?;
    Ok(())
  })
  .await?;
  log::info!("Store connected, migrations applied");
  Ok(pool)
}
