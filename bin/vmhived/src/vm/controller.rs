use std::sync::Arc;
use std::time::Duration;

use futures::channel::mpsc;
use ntex::{rt, time};
use tokio::sync::Mutex;

use vmhive_error::io::{IoError, IoResult};

use vmhive_stubs::config::DaemonConfig;
use vmhive_stubs::logs::EventKind;
use vmhive_stubs::vm::VmStatus;

use crate::models::{
  EventSender, NewEventLogDb, Pool, VmDb, VmImageDb, VmUpdateDb,
};
use crate::substrate::{pod, NodeIpIndex, PodPhase, SubstrateClient};
use crate::utils;

use super::port;

/// Cadence of the reconciliation loop
const RECONCILE_INTERVAL: Duration = Duration::from_secs(2);
/// Attempt budget for substrate calls the reconciler owns
const RETRY_ATTEMPTS: usize = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);
/// Whole allocation retries after a lost port commit race
const PORT_COMMIT_TRIES: usize = 3;

/// Sender used to signal the reconciler to stop, dropping it closes the loop
pub type ShutdownSender = mpsc::Sender<()>;
pub type ShutdownReceiver = mpsc::Receiver<()>;

pub(crate) fn shutdown_requested(rx: &mut ShutdownReceiver) -> bool {
  !matches!(rx.try_next(), Err(_))
}

/// Map an observed pod phase onto the vm lifecycle
pub(crate) fn vm_status_for_phase(phase: PodPhase) -> VmStatus {
  match phase {
    PodPhase::Pending => VmStatus::Pending,
    PodPhase::Running => VmStatus::Running,
    PodPhase::Failed => VmStatus::Failed,
    PodPhase::Succeeded => VmStatus::Stopped,
    PodPhase::Unknown => VmStatus::Error,
  }
}

/// The reconciliation core.
///
/// Every user facing operation is idempotent with respect to the desired
/// state in the store. The mutex only serializes user operations against each
/// other, the reconciler reads rows without it and relies on the store.
#[derive(Clone)]
pub struct VmController {
  pool: Pool,
  substrate: SubstrateClient,
  node_ip: Arc<NodeIpIndex>,
  namespace: String,
  ssh_port_start: i32,
  ssh_port_end: i32,
  ops_lock: Arc<Mutex<()>>,
  event_tx: EventSender,
}

impl VmController {
  pub fn new(
    pool: Pool,
    substrate: SubstrateClient,
    node_ip: Arc<NodeIpIndex>,
    config: &DaemonConfig,
    event_tx: EventSender,
  ) -> Self {
    Self {
      pool,
      substrate,
      node_ip,
      namespace: config.vm_namespace.clone(),
      ssh_port_start: config.ssh_port_start,
      ssh_port_end: config.ssh_port_end,
      ops_lock: Arc::new(Mutex::new(())),
      event_tx,
    }
  }

  fn emit_event(&self, uid: &str, kind: EventKind, operation: &str, actor: &str) {
    let mut tx = self.event_tx.clone();
    if tx
      .try_send(NewEventLogDb::vm(uid, kind, operation, actor))
      .is_err()
    {
      log::warn!("vm_controller: event queue full, dropping event for {uid}");
    }
  }

  /// Allocate a port and commit it to the row. The committing update is the
  /// collision detector, a lost race restarts the whole allocation.
  async fn allocate_and_commit_port(
    &self,
    vm: &VmDb,
    actor: &str,
  ) -> IoResult<i32> {
    for _ in 0..PORT_COMMIT_TRIES {
      let candidate =
        port::allocate_ssh_port(self.ssh_port_start, self.ssh_port_end, &self.pool)
          .await?;
      match VmDb::commit_ssh_port(vm.id, candidate, actor, &self.pool).await {
        Ok(_) => return Ok(candidate),
        Err(err) if err.inner.kind() == std::io::ErrorKind::AlreadyExists => {
          log::warn!(
            "vm_controller: port {candidate} lost the commit race for vm {}, retrying",
            vm.uid
          );
          continue;
        }
        Err(err) => return Err(err),
      }
    }
    Err(IoError::permission_denied(
      "SshPort",
      "unable to commit a free port",
    ))
  }

  /// Create the pod and service backing a pending row.
  ///
  /// The row must already exist with `status = pending` and `image_id` set.
  /// On a partial success (pod up, service failed) the operation still
  /// commits, the reconciler recovers the service on a later tick.
  pub async fn create_vm(&self, vm: &VmDb, actor: &str) -> IoResult<VmDb> {
    let updated = self.provision(vm, actor).await?;
    self.emit_event(&updated.uid, EventKind::Creation, "create", actor);
    Ok(updated)
  }

  async fn provision(&self, vm: &VmDb, actor: &str) -> IoResult<VmDb> {
    let _guard = self.ops_lock.lock().await;
    let mut ssh_port = vm.ssh_port;
    if ssh_port == 0 {
      ssh_port = self.allocate_and_commit_port(vm, actor).await?;
    }
    let image = VmImageDb::find_by_id(vm.image_id, &self.pool)
      .await?
      .ok_or_else(|| {
        IoError::not_found("VmImage", &format!("image {} not found", vm.image_id))
      })?;
    let pod = pod::build_pod(vm, &image.image_url, &self.namespace);
    self.substrate.create_pod(&self.namespace, &pod).await?;
    let values = VmUpdateDb {
      status: Some(VmStatus::Pending.to_string()),
      pod_name: Some(vm.uid.clone()),
      namespace: Some(self.namespace.clone()),
      ssh_port: Some(ssh_port),
      node_ip: Some(self.node_ip.get(&vm.node_name)),
      ..Default::default()
    };
    let updated = match VmDb::update_by_id(vm.id, values, actor, &self.pool).await
    {
      Ok(updated) => updated,
      Err(err) => {
        // the row is the source of truth, do not leave an orphan pod behind
        if let Err(derr) =
          self.substrate.delete_pod(&self.namespace, &vm.uid).await
        {
          log::error!(
            "vm_controller: cleanup of pod {} after failed update: {derr}",
            vm.uid
          );
        }
        return Err(err);
      }
    };
    let service = pod::build_service(&updated, &self.namespace);
    if let Err(err) = self.substrate.create_service(&self.namespace, &service).await
    {
      log::error!(
        "vm_controller: create service for vm {}: {err}, the reconciler will retry",
        updated.uid
      );
    }
    Ok(updated)
  }

  /// Delete the pod and tombstone the row. Calling this twice is
  /// indistinguishable from calling it once.
  pub async fn delete_vm(&self, vm: &VmDb, actor: &str) -> IoResult<()> {
    let _guard = self.ops_lock.lock().await;
    if !vm.pod_name.is_empty() && !vm.namespace.is_empty() {
      self.substrate.delete_pod(&vm.namespace, &vm.pod_name).await?;
    }
    VmDb::soft_delete(vm.id, actor, &self.pool).await?;
    self.emit_event(&vm.uid, EventKind::Deletion, "delete", actor);
    Ok(())
  }

  /// Delete the pod but keep the row and its allocated port
  pub async fn stop_vm(&self, vm: &VmDb, actor: &str) -> IoResult<()> {
    let _guard = self.ops_lock.lock().await;
    if !vm.pod_name.is_empty() && !vm.namespace.is_empty() {
      self.substrate.delete_pod(&vm.namespace, &vm.pod_name).await?;
    }
    let values = VmUpdateDb {
      status: Some(VmStatus::Stopped.to_string()),
      pod_ip: Some(String::new()),
      ..Default::default()
    };
    VmDb::update_by_id(vm.id, values, actor, &self.pool).await?;
    self.emit_event(&vm.uid, EventKind::Stop, "stop", actor);
    Ok(())
  }

  /// Recreate the pod for a stopped row, keeping the same port
  pub async fn start_vm(&self, vm: &VmDb, actor: &str) -> IoResult<VmDb> {
    if vm.status() != VmStatus::Stopped {
      return Err(IoError::invalid_input(
        "Vm",
        &format!("vm {} is not stopped", vm.name),
      ));
    }
    let updated = self.provision(vm, actor).await?;
    self.emit_event(&vm.uid, EventKind::Start, "start", actor);
    Ok(updated)
  }

  /// Converge stored status with substrate state for every active row
  async fn sync_vm_status(&self, rx: &mut ShutdownReceiver) -> IoResult<()> {
    let vms = VmDb::list_active(&self.pool).await?;
    for vm in vms {
      if shutdown_requested(rx) {
        break;
      }
      if vm.pod_name.is_empty() || vm.namespace.is_empty() {
        continue;
      }
      if let Err(err) = self.sync_one(&vm).await {
        log::error!("vm_controller: sync status of {}: {err}", vm.uid);
      }
    }
    Ok(())
  }

  async fn sync_one(&self, vm: &VmDb) -> IoResult<()> {
    let view = self.substrate.get_pod(&vm.namespace, &vm.pod_name).await?;
    match view {
      None => {
        let values = VmUpdateDb {
          status: Some(VmStatus::Stopped.to_string()),
          pod_ip: Some(String::new()),
          node_name: Some(String::new()),
          message: Some("pod not found".to_owned()),
          ..Default::default()
        };
        VmDb::update_checked(vm.id, values, "", &self.pool).await?;
      }
      Some(view) => {
        let status = vm_status_for_phase(view.phase);
        if status != vm.status() {
          let values = VmUpdateDb {
            status: Some(status.to_string()),
            pod_ip: Some(view.pod_ip),
            node_name: Some(view.node_name.clone()),
            node_ip: Some(self.node_ip.get(&view.node_name)),
            ..Default::default()
          };
          VmDb::update_checked(vm.id, values, "", &self.pool).await?;
        }
      }
    }
    Ok(())
  }

  /// Make sure every active row has its ssh service, allocating a port late
  /// when a row somehow lost it
  async fn ensure_vm_services(&self, rx: &mut ShutdownReceiver) -> IoResult<()> {
    let vms = VmDb::list_active(&self.pool).await?;
    for mut vm in vms {
      if shutdown_requested(rx) {
        break;
      }
      if vm.pod_name.is_empty() || vm.namespace.is_empty() {
        continue;
      }
      let svc_name = pod::service_name(&vm.uid);
      match self.substrate.get_service(&vm.namespace, &svc_name).await {
        Ok(Some(_)) => {}
        Ok(None) => {
          log::info!(
            "vm_controller: ssh service {svc_name} missing for vm {}, creating",
            vm.name
          );
          if vm.ssh_port == 0 {
            match self.allocate_and_commit_port(&vm, "").await {
              Ok(port) => vm.ssh_port = port,
              Err(err) => {
                log::error!(
                  "vm_controller: allocate port for {}: {err}",
                  vm.name
                );
                continue;
              }
            }
          }
          let service = pod::build_service(&vm, &vm.namespace);
          let res = utils::retry::retry(RETRY_ATTEMPTS, RETRY_DELAY, || {
            let substrate = self.substrate.clone();
            let namespace = vm.namespace.clone();
            let service = service.clone();
            async move { substrate.create_service(&namespace, &service).await }
          })
          .await;
          if let Err(err) = res {
            log::error!(
              "vm_controller: create ssh service for {}: {err}",
              vm.name
            );
          }
        }
        Err(err) => {
          log::error!("vm_controller: get ssh service {svc_name}: {err}");
        }
      }
    }
    Ok(())
  }

  /// Long lived reconciliation loop. Returns the sender whose drop (or
  /// explicit close) stops the loop before its next tick. One loop walks the
  /// whole active set each tick, there are no per vm workers.
  pub fn spawn_reconciler(&self) -> ShutdownSender {
    let (tx, mut rx) = mpsc::channel::<()>(1);
    let ctrl = self.clone();
    rt::Arbiter::new().exec_fn(move || {
      rt::spawn(async move {
        log::info!("vm_controller: reconciler started");
        let interval = time::interval(RECONCILE_INTERVAL);
        loop {
          interval.tick().await;
          if shutdown_requested(&mut rx) {
            break;
          }
          if let Err(err) = ctrl.sync_vm_status(&mut rx).await {
            log::error!("vm_controller: status sync: {err}");
          }
          if let Err(err) = ctrl.ensure_vm_services(&mut rx).await {
            log::error!("vm_controller: service assurance: {err}");
          }
        }
        log::info!("vm_controller: reconciler stopped");
      });
    });
    tx
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn phase_mapping_follows_the_state_machine() {
    assert_eq!(vm_status_for_phase(PodPhase::Pending), VmStatus::Pending);
    assert_eq!(vm_status_for_phase(PodPhase::Running), VmStatus::Running);
    assert_eq!(vm_status_for_phase(PodPhase::Failed), VmStatus::Failed);
    assert_eq!(vm_status_for_phase(PodPhase::Succeeded), VmStatus::Stopped);
    assert_eq!(vm_status_for_phase(PodPhase::Unknown), VmStatus::Error);
  }

  #[test]
  fn closed_channel_counts_as_shutdown() {
    let (tx, mut rx) = mpsc::channel::<()>(1);
    assert!(!shutdown_requested(&mut rx));
    drop(tx);
    assert!(shutdown_requested(&mut rx));
  }

  #[test]
  fn explicit_signal_counts_as_shutdown() {
    let (mut tx, mut rx) = mpsc::channel::<()>(1);
    tx.try_send(()).unwrap();
    assert!(shutdown_requested(&mut rx));
  }
}
