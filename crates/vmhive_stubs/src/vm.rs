#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

/// Lifecycle status of a virtual machine.
///
/// `Terminating` and `MarkedForDeletion` are terminal from the reconciler's
/// point of view, only the reaper may remove such rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VmStatus {
  Pending,
  Running,
  Stopped,
  Failed,
  Terminating,
  Error,
  MarkedForDeletion,
}

impl std::fmt::Display for VmStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      VmStatus::Pending => write!(f, "pending"),
      VmStatus::Running => write!(f, "running"),
      VmStatus::Stopped => write!(f, "stopped"),
      VmStatus::Failed => write!(f, "failed"),
      VmStatus::Terminating => write!(f, "terminating"),
      VmStatus::Error => write!(f, "error"),
      VmStatus::MarkedForDeletion => write!(f, "marked_for_deletion"),
    }
  }
}

impl std::str::FromStr for VmStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(VmStatus::Pending),
      "running" => Ok(VmStatus::Running),
      "stopped" => Ok(VmStatus::Stopped),
      "failed" => Ok(VmStatus::Failed),
      "terminating" => Ok(VmStatus::Terminating),
      "error" => Ok(VmStatus::Error),
      "marked_for_deletion" => Ok(VmStatus::MarkedForDeletion),
      _ => Err(format!("unknown vm status {s}")),
    }
  }
}

impl VmStatus {
  /// Statuses the reconciler is forbidden to overwrite
  pub fn is_sticky(&self) -> bool {
    matches!(self, VmStatus::Terminating | VmStatus::MarkedForDeletion)
  }
}

/// Payload to create a virtual machine
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VmPartial {
  /// Display name, unique per owner
  pub name: String,
  /// Number of cpu cores
  pub cpu_cores: i32,
  /// Memory size in MiB
  pub memory_mb: i32,
  /// Disk size in GiB
  pub disk_gb: i32,
  /// Name of the catalog image to boot from
  pub image_name: String,
  /// Public key injected into the machine on boot
  #[cfg_attr(feature = "serde", serde(default))]
  pub ssh_key: String,
}

/// A virtual machine as returned by the api
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vm {
  pub id: i64,
  /// Short opaque identifier, also the substrate resource name
  pub uid: String,
  pub name: String,
  pub user_uid: String,
  pub user_name: String,
  pub cpu_cores: i32,
  pub memory_mb: i32,
  pub disk_gb: i32,
  pub status: VmStatus,
  pub pod_name: String,
  pub namespace: String,
  pub node_name: String,
  pub pod_ip: String,
  pub node_ip: String,
  pub ssh_port: i32,
  pub image_name: String,
  pub image_id: i64,
  pub created_at: i64,
  pub creator: String,
  pub updated_at: i64,
  pub updater: String,
  pub message: String,
  pub ssh_key: String,
}

/// Kind of operation recorded in the vm operation log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VmOperation {
  Create,
  Start,
  Stop,
  Delete,
  MarkForDeletion,
}

impl std::fmt::Display for VmOperation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      VmOperation::Create => write!(f, "create"),
      VmOperation::Start => write!(f, "start"),
      VmOperation::Stop => write!(f, "stop"),
      VmOperation::Delete => write!(f, "delete"),
      VmOperation::MarkForDeletion => write!(f, "mark_for_deletion"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_display_parse_round_trip() {
    let all = [
      VmStatus::Pending,
      VmStatus::Running,
      VmStatus::Stopped,
      VmStatus::Failed,
      VmStatus::Terminating,
      VmStatus::Error,
      VmStatus::MarkedForDeletion,
    ];
    for status in all {
      let parsed: VmStatus = status.to_string().parse().unwrap();
      assert_eq!(parsed, status);
    }
    assert!("nonsense".parse::<VmStatus>().is_err());
  }

  #[test]
  fn only_reaper_statuses_are_sticky() {
    assert!(VmStatus::Terminating.is_sticky());
    assert!(VmStatus::MarkedForDeletion.is_sticky());
    assert!(!VmStatus::Running.is_sticky());
    assert!(!VmStatus::Stopped.is_sticky());
    assert!(!VmStatus::Failed.is_sticky());
    assert!(!VmStatus::Error.is_sticky());
    assert!(!VmStatus::Pending.is_sticky());
  }
}
