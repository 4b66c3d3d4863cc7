use futures_util::StreamExt;
use ntex::rt;

use crate::models::{
  AuditLogDb, AuditReceiver, EventLogDb, EventReceiver, Pool,
};

/// Drain the bounded log queues into the store.
/// One consumer per queue, the loops end when every producer is gone.
pub(crate) fn spawn_consumers(
  pool: Pool,
  mut audit_rx: AuditReceiver,
  mut event_rx: EventReceiver,
) {
  let audit_pool = pool.clone();
  rt::Arbiter::new().exec_fn(move || {
    rt::spawn(async move {
      while let Some(row) = audit_rx.next().await {
        if let Err(err) = AuditLogDb::create(row, &audit_pool).await {
          log::warn!("audit consumer: {err}");
        }
      }
      log::info!("audit consumer stopped");
    });
    rt::spawn(async move {
      while let Some(row) = event_rx.next().await {
        if let Err(err) = EventLogDb::create(row, &pool).await {
          log::warn!("event consumer: {err}");
        }
      }
      log::info!("event consumer stopped");
    });
  });
}
