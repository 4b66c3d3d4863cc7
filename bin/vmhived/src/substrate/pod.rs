use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{
  Container, ContainerPort, EnvVar, Pod, PodSpec, ResourceRequirements,
  Service, ServicePort, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use crate::models::VmDb;

/// Shell bootstrap run as pid 1 inside the vm container.
/// Provisions the authorized key from the environment then execs the ssh
/// daemon in the foreground.
const SSH_BOOTSTRAP: &str = r#"
mkdir -p /run/sshd
chmod 0755 /run/sshd
mkdir -p /root/.ssh

if [ ! -z "$SSH_PUBLIC_KEY" ]; then
  echo "$SSH_PUBLIC_KEY" > /root/.ssh/authorized_keys
  chmod 600 /root/.ssh/authorized_keys
fi

exec /usr/sbin/sshd -D
"#;

/// Name of the node port service exposing a vm's ssh daemon
pub fn service_name(uid: &str) -> String {
  format!("vm-{uid}-ssh")
}

fn vm_labels(vm: &VmDb) -> BTreeMap<String, String> {
  BTreeMap::from([
    ("app".to_owned(), "vm".to_owned()),
    ("vm".to_owned(), vm.name.clone()),
  ])
}

/// Build the pod backing a virtual machine.
/// Requests equal limits so the machine gets exactly the sizing it asked for.
pub fn build_pod(vm: &VmDb, image_url: &str, namespace: &str) -> Pod {
  let mut resources = BTreeMap::new();
  resources.insert(
    "cpu".to_owned(),
    Quantity(format!("{}m", i64::from(vm.cpu_cores) * 1000)),
  );
  resources.insert("memory".to_owned(), Quantity(format!("{}Mi", vm.memory_mb)));
  let mut env = Vec::new();
  if !vm.ssh_key.is_empty() {
    env.push(EnvVar {
      name: "SSH_PUBLIC_KEY".to_owned(),
      value: Some(vm.ssh_key.clone()),
      ..Default::default()
    });
  }
  Pod {
    metadata: ObjectMeta {
      name: Some(vm.uid.clone()),
      namespace: Some(namespace.to_owned()),
      labels: Some(vm_labels(vm)),
      ..Default::default()
    },
    spec: Some(PodSpec {
      containers: vec![Container {
        name: "vm".to_owned(),
        image: Some(image_url.to_owned()),
        resources: Some(ResourceRequirements {
          requests: Some(resources.clone()),
          limits: Some(resources),
          ..Default::default()
        }),
        ports: Some(vec![ContainerPort {
          name: Some("ssh".to_owned()),
          container_port: 22,
          protocol: Some("TCP".to_owned()),
          ..Default::default()
        }]),
        env: Some(env),
        command: Some(vec![
          "/bin/sh".to_owned(),
          "-c".to_owned(),
          SSH_BOOTSTRAP.to_owned(),
        ]),
        ..Default::default()
      }],
      ..Default::default()
    }),
    ..Default::default()
  }
}

/// Build the node port service mapping the allocated ssh port to port 22 of
/// the vm pod. The selector matches on labels, not readiness, so the service
/// may legally exist before the pod is up.
pub fn build_service(vm: &VmDb, namespace: &str) -> Service {
  Service {
    metadata: ObjectMeta {
      name: Some(service_name(&vm.uid)),
      namespace: Some(namespace.to_owned()),
      labels: Some(vm_labels(vm)),
      ..Default::default()
    },
    spec: Some(ServiceSpec {
      type_: Some("NodePort".to_owned()),
      ports: Some(vec![ServicePort {
        name: Some("ssh".to_owned()),
        port: 22,
        target_port: Some(IntOrString::Int(22)),
        node_port: Some(vm.ssh_port),
        protocol: Some("TCP".to_owned()),
        ..Default::default()
      }]),
      selector: Some(vm_labels(vm)),
      ..Default::default()
    }),
    ..Default::default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use vmhive_stubs::vm::VmStatus;

  fn sample_vm() -> VmDb {
    VmDb {
      id: 1,
      name: "dev1".to_owned(),
      uid: "abc123".to_owned(),
      user_uid: "u1".to_owned(),
      user_name: "alice".to_owned(),
      cpu_cores: 2,
      memory_mb: 4096,
      disk_gb: 20,
      status: VmStatus::Pending.to_string(),
      pod_name: String::new(),
      namespace: String::new(),
      node_name: String::new(),
      pod_ip: String::new(),
      node_ip: String::new(),
      ssh_port: 30022,
      image_name: "ubuntu-22.04".to_owned(),
      image_id: 1,
      created_at: 0,
      creator: "u1".to_owned(),
      updated_at: 0,
      updater: "u1".to_owned(),
      message: String::new(),
      ssh_key: "ssh-ed25519 AAAA test".to_owned(),
    deleted_at: None,
    }
  }

  #[test]
  fn pod_requests_equal_limits() {
    let pod = build_pod(&sample_vm(), "registry.local/ubuntu:22.04", "vmhive");
    let spec = pod.spec.unwrap();
    let container = &spec.containers[0];
    let resources = container.resources.as_ref().unwrap();
    let requests = resources.requests.as_ref().unwrap();
    let limits = resources.limits.as_ref().unwrap();
    assert_eq!(requests.get("cpu").unwrap().0, "2000m");
    assert_eq!(requests.get("memory").unwrap().0, "4096Mi");
    assert_eq!(requests, limits);
    assert_eq!(
      container.image.as_deref(),
      Some("registry.local/ubuntu:22.04")
    );
  }

  #[test]
  fn pod_injects_ssh_key_env() {
    let pod = build_pod(&sample_vm(), "img", "vmhive");
    let env = pod.spec.unwrap().containers[0].env.clone().unwrap();
    assert_eq!(env[0].name, "SSH_PUBLIC_KEY");
    assert_eq!(env[0].value.as_deref(), Some("ssh-ed25519 AAAA test"));
  }

  #[test]
  fn service_maps_allocated_node_port() {
    let svc = build_service(&sample_vm(), "vmhive");
    assert_eq!(svc.metadata.name.as_deref(), Some("vm-abc123-ssh"));
    let spec = svc.spec.unwrap();
    assert_eq!(spec.type_.as_deref(), Some("NodePort"));
    let port = &spec.ports.unwrap()[0];
    assert_eq!(port.port, 22);
    assert_eq!(port.node_port, Some(30022));
    assert_eq!(port.target_port, Some(IntOrString::Int(22)));
    let selector = spec.selector.unwrap();
    assert_eq!(selector.get("app").map(String::as_str), Some("vm"));
    assert_eq!(selector.get("vm").map(String::as_str), Some("dev1"));
  }
}
