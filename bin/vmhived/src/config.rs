use vmhive_stubs::config::DaemonConfig;

use crate::cli::Cli;
use crate::error::CliError;

fn validate(config: &DaemonConfig) -> Result<(), CliError> {
  if config.jwt_secret.is_empty() {
    return Err(CliError::new(1, "jwt secret cannot be empty"));
  }
  if config.ssh_port_start <= 0 || config.ssh_port_end > 65535 {
    return Err(CliError::new(
      1,
      format!(
        "ssh port range [{}, {}] is out of bounds",
        config.ssh_port_start, config.ssh_port_end
      ),
    ));
  }
  if config.ssh_port_start > config.ssh_port_end {
    return Err(CliError::new(
      1,
      format!(
        "ssh port range start {} is past end {}",
        config.ssh_port_start, config.ssh_port_end
      ),
    ));
  }
  if config.deleted_vm_retention_period <= 0 {
    return Err(CliError::new(1, "retention period must be positive"));
  }
  if config.vm_namespace.is_empty() {
    return Err(CliError::new(1, "vm namespace cannot be empty"));
  }
  Ok(())
}

/// Resolve the daemon configuration from command line arguments.
/// Environment overrides are handled by the argument parser itself.
pub fn init(args: &Cli) -> Result<DaemonConfig, CliError> {
  let config = DaemonConfig {
    bind_address: args.bind_address.clone(),
    port: args.port,
    jwt_secret: args.jwt_secret.clone(),
    deleted_vm_retention_period: args.deleted_vm_retention_period,
    image_csv_file_path: args.image_csv_file_path.clone(),
    vm_namespace: args.vm_namespace.clone(),
    ssh_port_start: args.ssh_port_start,
    ssh_port_end: args.ssh_port_end,
    storage_class_name: args.storage_class_name.clone(),
    kube_config_path: args.kube_config_path.clone(),
    kube_in_cluster: args.kube_in_cluster,
    store_url: args.store_url.clone(),
    ldap_host: args.ldap_host.clone(),
    ldap_port: args.ldap_port,
    ldap_bind_dn: args.ldap_bind_dn.clone(),
    ldap_bind_password: args.ldap_bind_password.clone(),
    ldap_base_dn: args.ldap_base_dn.clone(),
  };
  validate(&config)?;
  Ok(config)
}

/// Config unit test
#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::*;

  #[test]
  fn init_with_defaults() {
    let args = Cli::parse_from(["vmhived"]);
    let config = init(&args).unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.ssh_port_start, 30000);
    assert_eq!(config.ssh_port_end, 32767);
  }

  #[test]
  fn init_rejects_inverted_port_range() {
    let args = Cli::parse_from([
      "vmhived",
      "--ssh-port-start",
      "32000",
      "--ssh-port-end",
      "31000",
    ]);
    assert!(init(&args).is_err());
  }

  #[test]
  fn init_rejects_empty_secret() {
    let args = Cli::parse_from(["vmhived", "--jwt-secret", ""]);
    assert!(init(&args).is_err());
  }

  #[test]
  fn init_rejects_zero_retention() {
    let args =
      Cli::parse_from(["vmhived", "--deleted-vm-retention-period", "0"]);
    assert!(init(&args).is_err());
  }
}
