#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

/// Kind of resource an event log row is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResourceKind {
  Vm,
  Image,
}

impl std::fmt::Display for ResourceKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ResourceKind::Vm => write!(f, "vm"),
      ResourceKind::Image => write!(f, "image"),
    }
  }
}

/// Kind of lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventKind {
  Creation,
  Deletion,
  Start,
  Stop,
  Update,
  Error,
}

impl std::fmt::Display for EventKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      EventKind::Creation => write!(f, "creation"),
      EventKind::Deletion => write!(f, "deletion"),
      EventKind::Start => write!(f, "start"),
      EventKind::Stop => write!(f, "stop"),
      EventKind::Update => write!(f, "update"),
      EventKind::Error => write!(f, "error"),
    }
  }
}

/// One authenticated http request as recorded by the audit middleware
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AuditLog {
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

/// A resource scoped lifecycle event
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventLog {
  pub id: i64,
  pub resource_kind: ResourceKind,
  pub resource_uid: String,
  pub event_kind: EventKind,
  pub operation: String,
  pub created_at: i64,
  pub creator: String,
}

/// One image catalog change applied by the importer
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageOperationLog {
  pub id: i64,
  pub image_id: i64,
  pub operation: String,
  pub status: String,
  pub message: String,
  pub created_at: i64,
  pub creator: String,
}

/// One attempted vm operation with its outcome
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VmOperationLog {
  pub id: i64,
  pub vm_id: i64,
  pub operation: String,
  pub status: String,
  pub message: String,
  pub created_at: i64,
  pub creator: String,
}
