#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

/// Resolved daemon configuration, merged from command line arguments and
/// environment overrides at startup.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DaemonConfig {
  /// Address the http server binds to
  pub bind_address: String,
  /// Port the http server listens on
  pub port: u16,
  /// Secret used to sign api tokens
  pub jwt_secret: String,
  /// Hours a tombstoned virtual machine is kept before the reaper
  /// destroys it for good
  pub deleted_vm_retention_period: i64,
  /// Path to the image catalog file, relative to the project root
  pub image_csv_file_path: String,
  /// Substrate namespace the virtual machine pods live in
  pub vm_namespace: String,
  /// First node port usable for ssh exposure
  pub ssh_port_start: i32,
  /// Last node port usable for ssh exposure
  pub ssh_port_end: i32,
  /// Storage class recorded on provisioned volumes
  pub storage_class_name: String,
  /// Path to a kubeconfig file when not running in cluster
  pub kube_config_path: String,
  /// Use the in-cluster service account instead of a kubeconfig
  pub kube_in_cluster: bool,
  /// Connection url of the relational store
  pub store_url: String,
  /// Directory service host
  pub ldap_host: String,
  /// Directory service port
  pub ldap_port: u16,
  /// Admin bind dn used for directory searches
  pub ldap_bind_dn: String,
  /// Admin bind password
  pub ldap_bind_password: String,
  /// Base dn of the directory search scope
  pub ldap_base_dn: String,
}
