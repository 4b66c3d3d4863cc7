use std::time::Duration;

use futures::channel::mpsc;
use ntex::{rt, time};

use vmhive_error::io::IoResult;

use vmhive_stubs::vm::VmStatus;

use crate::models::{Pool, VmDb};
use crate::utils;

use super::controller::{ShutdownReceiver, ShutdownSender, VmController};

/// Cadence of the retention sweep
const REAP_INTERVAL: Duration = Duration::from_secs(120);

/// Background garbage collector for tombstoned rows.
///
/// Rows flagged `marked_for_deletion` and rows soft deleted through the api
/// both age against the retention window, once past it their substrate
/// resources are destroyed and the row is removed for good.
pub struct VmReaper {
  pool: Pool,
  controller: VmController,
  retention_hours: i64,
}

impl VmReaper {
  pub fn new(pool: Pool, controller: VmController, retention_hours: i64) -> Self {
    Self {
      pool,
      controller,
      retention_hours,
    }
  }

  async fn collect(&self, deadline_ms: i64) -> IoResult<Vec<VmDb>> {
    let mut rows = VmDb::list_status_before(
      VmStatus::MarkedForDeletion,
      deadline_ms,
      &self.pool,
    )
    .await?;
    let tombstoned =
      VmDb::list_soft_deleted_before(deadline_ms, &self.pool).await?;
    for row in tombstoned {
      if !rows.iter().any(|r| r.id == row.id) {
        rows.push(row);
      }
    }
    Ok(rows)
  }

  /// One sweep. Failures are isolated per row, a failed row stays and is
  /// retried on the next tick.
  async fn reap(&self, rx: &mut ShutdownReceiver) {
    let deadline_ms =
      utils::key::now_millis() - self.retention_hours * 3_600_000;
    let rows = match self.collect(deadline_ms).await {
      Ok(rows) => rows,
      Err(err) => {
        log::error!("vm_reaper: listing expired rows: {err}");
        return;
      }
    };
    for vm in rows {
      if super::controller::shutdown_requested(rx) {
        break;
      }
      if let Err(err) = self.controller.delete_vm(&vm, "").await {
        log::error!("vm_reaper: destroy vm {} ({}): {err}", vm.name, vm.id);
        continue;
      }
      if let Err(err) = VmDb::hard_delete(vm.id, &self.pool).await {
        log::error!("vm_reaper: remove row {} ({}): {err}", vm.name, vm.id);
        continue;
      }
      log::info!("vm_reaper: reclaimed vm {} ({})", vm.name, vm.id);
    }
  }

  /// Long lived retention loop, stopped by closing the returned sender
  pub fn spawn(self) -> ShutdownSender {
    let (tx, mut rx) = mpsc::channel::<()>(1);
    rt::Arbiter::new().exec_fn(move || {
      rt::spawn(async move {
        log::info!("vm_reaper: started, retention {}h", self.retention_hours);
        let interval = time::interval(REAP_INTERVAL);
        loop {
          interval.tick().await;
          if super::controller::shutdown_requested(&mut rx) {
            break;
          }
          self.reap(&mut rx).await;
        }
        log::info!("vm_reaper: stopped");
      });
    });
    tx
  }
}
