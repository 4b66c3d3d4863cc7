use diesel::prelude::*;

use vmhive_stubs::logs::{EventKind, EventLog, ResourceKind};

use crate::schema::event_logs;

/// A resource scoped lifecycle event
#[derive(Clone, Debug, Queryable, Identifiable)]
#[diesel(primary_key(id))]
#[diesel(table_name = event_logs)]
pub struct EventLogDb {
  pub id: i64,
  pub resource_kind: String,
  pub resource_uid: String,
  pub event_kind: String,
  pub operation: String,
  pub created_at: i64,
  pub creator: String,
}

impl From<EventLogDb> for EventLog {
  fn from(db: EventLogDb) -> Self {
    let resource_kind = match db.resource_kind.as_str() {
      "image" => ResourceKind::Image,
      _ => ResourceKind::Vm,
    };
    let event_kind = match db.event_kind.as_str() {
      "creation" => EventKind::Creation,
      "deletion" => EventKind::Deletion,
      "start" => EventKind::Start,
      "stop" => EventKind::Stop,
      "update" => EventKind::Update,
      _ => EventKind::Error,
    };
    Self {
      id: db.id,
      resource_kind,
      resource_uid: db.resource_uid,
      event_kind,
      operation: db.operation,
      created_at: db.created_at,
      creator: db.creator,
    }
  }
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = event_logs)]
pub struct NewEventLogDb {
  pub resource_kind: String,
  pub resource_uid: String,
  pub event_kind: String,
  pub operation: String,
  pub created_at: i64,
  pub creator: String,
}

impl NewEventLogDb {
  pub fn vm(uid: &str, kind: EventKind, operation: &str, creator: &str) -> Self {
    Self {
      resource_kind: ResourceKind::Vm.to_string(),
      resource_uid: uid.to_owned(),
      event_kind: kind.to_string(),
      operation: operation.to_owned(),
      created_at: crate::utils::key::now_millis(),
      creator: creator.to_owned(),
    }
  }
}
