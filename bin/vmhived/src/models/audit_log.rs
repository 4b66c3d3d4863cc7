use diesel::prelude::*;

use vmhive_stubs::logs::AuditLog;

use crate::schema::audit_logs;

/// One authenticated http request, appended by the audit consumer
#[derive(Clone, Debug, Queryable, Identifiable)]
#[diesel(primary_key(id))]
#[diesel(table_name = audit_logs)]
pub struct AuditLogDb {
  pub id: i64,
  pub uid: String,
  pub username: String,
  pub module: String,
  pub method: String,
  pub uri: String,
  pub status: i32,
  pub duration_ms: i64,
  pub source_ip: String,
  pub created_at: i64,
}

impl From<AuditLogDb> for AuditLog {
  fn from(db: AuditLogDb) -> Self {
    Self {
      id: db.id,
      uid: db.uid,
      username: db.username,
      module: db.module,
      method: db.method,
      uri: db.uri,
      status: db.status,
      duration_ms: db.duration_ms,
      source_ip: db.source_ip,
      created_at: db.created_at,
    }
  }
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = audit_logs)]
pub struct NewAuditLogDb {
  pub uid: String,
  pub username: String,
  pub module: String,
  pub method: String,
  pub uri: String,
  pub status: i32,
  pub duration_ms: i64,
  pub source_ip: String,
  pub created_at: i64,
}
