use std::collections::HashMap;
use std::sync::Arc;

use futures::channel::mpsc;

use vmhive_stubs::config::DaemonConfig;

use crate::auth::{DirectoryClient, TokenManager};
use crate::vm::VmController;

use super::{NewAuditLogDb, NewEventLogDb, Pool};

/// Capacity of the bounded log queues, producers drop with a warning when
/// a queue is full
pub const LOG_QUEUE_CAPACITY: usize = 1024;

pub type AuditSender = mpsc::Sender<NewAuditLogDb>;
pub type AuditReceiver = mpsc::Receiver<NewAuditLogDb>;
pub type EventSender = mpsc::Sender<NewEventLogDb>;
pub type EventReceiver = mpsc::Receiver<NewEventLogDb>;

/// Shared state of the daemon, one clone per handler invocation.
///
/// The http layer holds the controller, the controller holds the store and
/// substrate handles, nothing points back. The group cache and node ip index
/// are built once at startup and read only afterwards.
#[derive(Clone)]
pub struct SystemState {
  /// The store connection pool
  pub pool: Pool,
  /// Resolved daemon configuration
  pub config: DaemonConfig,
  /// Token issuer and verifier
  pub tokens: TokenManager,
  /// Directory service client
  pub directory: DirectoryClient,
  /// Directory gid to group name cache
  pub groups: Arc<HashMap<String, String>>,
  /// The reconciliation core
  pub controller: VmController,
  /// Producer side of the audit log queue
  pub audit_tx: AuditSender,
}

impl SystemState {
  /// Queue an audit row, dropping it with a warning when the queue is full
  pub fn push_audit(&self, row: NewAuditLogDb) {
    let mut tx = self.audit_tx.clone();
    if tx.try_send(row).is_err() {
      log::warn!("audit: queue full, dropping audit row");
    }
  }
}
