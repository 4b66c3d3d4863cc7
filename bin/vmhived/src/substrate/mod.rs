use std::time::Duration;

use k8s_openapi::api::core::v1::{Node, Pod, Service};
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};

use vmhive_error::io::{FromIo, IoError, IoResult};

use vmhive_stubs::config::DaemonConfig;
use vmhive_stubs::node::NodeItem;

pub mod pod;

mod node_ip;
pub use node_ip::*;

/// Timeout applied to every outbound substrate call
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Phase reported by the substrate for a pod
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodPhase {
  Pending,
  Running,
  Succeeded,
  Failed,
  Unknown,
}

/// The slice of pod state the controller cares about
#[derive(Debug, Clone)]
pub struct PodView {
  pub phase: PodPhase,
  pub pod_ip: String,
  pub node_name: String,
}

fn parse_pod_view(pod: &Pod) -> PodView {
  let phase = pod
    .status
    .as_ref()
    .and_then(|s| s.phase.as_deref())
    .map(|p| match p {
      "Pending" => PodPhase::Pending,
      "Running" => PodPhase::Running,
      "Succeeded" => PodPhase::Succeeded,
      "Failed" => PodPhase::Failed,
      _ => PodPhase::Unknown,
    })
    .unwrap_or(PodPhase::Unknown);
  let pod_ip = pod
    .status
    .as_ref()
    .and_then(|s| s.pod_ip.clone())
    .unwrap_or_default();
  let node_name = pod
    .spec
    .as_ref()
    .and_then(|s| s.node_name.clone())
    .unwrap_or_default();
  PodView {
    phase,
    pod_ip,
    node_name,
  }
}

async fn with_timeout<T>(
  fut: impl std::future::Future<Output = Result<T, kube::Error>>,
) -> IoResult<T> {
  match tokio::time::timeout(CALL_TIMEOUT, fut).await {
    Ok(res) => res.map_err(|err| *err.map_err_context(|| "Substrate")),
    Err(_) => Err(IoError::interrupted("Substrate", "call timed out")),
  }
}

/// Thin typed adapter over the container scheduling substrate.
/// Thread safe and long lived, every component shares one clone.
#[derive(Clone)]
pub struct SubstrateClient {
  client: kube::Client,
}

impl SubstrateClient {
  /// Connect using either the in-cluster service account or the configured
  /// kubeconfig file
  pub async fn new(config: &DaemonConfig) -> IoResult<Self> {
    let client = if config.kube_in_cluster {
      let conf = kube::Config::incluster().map_err(|err| {
        IoError::invalid_data("Substrate config", &err.to_string())
      })?;
      kube::Client::try_from(conf)
        .map_err(|err| *err.map_err_context(|| "Substrate"))?
    } else if !config.kube_config_path.is_empty() {
      let kubeconfig =
        Kubeconfig::read_from(&config.kube_config_path).map_err(|err| {
          IoError::invalid_data("Substrate config", &err.to_string())
        })?;
      let conf = kube::Config::from_custom_kubeconfig(
        kubeconfig,
        &KubeConfigOptions::default(),
      )
      .await
      .map_err(|err| {
        IoError::invalid_data("Substrate config", &err.to_string())
      })?;
      kube::Client::try_from(conf)
        .map_err(|err| *err.map_err_context(|| "Substrate"))?
    } else {
      kube::Client::try_default()
        .await
        .map_err(|err| *err.map_err_context(|| "Substrate"))?
    };
    Ok(Self { client })
  }

  fn pods(&self, namespace: &str) -> Api<Pod> {
    Api::namespaced(self.client.clone(), namespace)
  }

  fn services(&self, namespace: &str) -> Api<Service> {
    Api::namespaced(self.client.clone(), namespace)
  }

  pub async fn create_pod(&self, namespace: &str, pod: &Pod) -> IoResult<()> {
    with_timeout(self.pods(namespace).create(&PostParams::default(), pod))
      .await?;
    Ok(())
  }

  pub async fn get_pod(
    &self,
    namespace: &str,
    name: &str,
  ) -> IoResult<Option<PodView>> {
    match tokio::time::timeout(CALL_TIMEOUT, self.pods(namespace).get(name))
      .await
    {
      Ok(Ok(pod)) => Ok(Some(parse_pod_view(&pod))),
      Ok(Err(kube::Error::Api(err))) if err.code == 404 => Ok(None),
      Ok(Err(err)) => Err(*err.map_err_context(|| "Substrate")),
      Err(_) => Err(IoError::interrupted("Substrate", "get_pod timed out")),
    }
  }

  /// Idempotent, a missing pod counts as deleted
  pub async fn delete_pod(&self, namespace: &str, name: &str) -> IoResult<()> {
    match tokio::time::timeout(
      CALL_TIMEOUT,
      self.pods(namespace).delete(name, &DeleteParams::default()),
    )
    .await
    {
      Ok(Ok(_)) => Ok(()),
      Ok(Err(kube::Error::Api(err))) if err.code == 404 => Ok(()),
      Ok(Err(err)) => Err(*err.map_err_context(|| "Substrate")),
      Err(_) => Err(IoError::interrupted("Substrate", "delete_pod timed out")),
    }
  }

  /// Idempotent, an already existing service counts as created
  pub async fn create_service(
    &self,
    namespace: &str,
    service: &Service,
  ) -> IoResult<()> {
    match tokio::time::timeout(
      CALL_TIMEOUT,
      self.services(namespace).create(&PostParams::default(), service),
    )
    .await
    {
      Ok(Ok(_)) => Ok(()),
      Ok(Err(kube::Error::Api(err))) if err.code == 409 => Ok(()),
      Ok(Err(err)) => Err(*err.map_err_context(|| "Substrate")),
      Err(_) => {
        Err(IoError::interrupted("Substrate", "create_service timed out"))
      }
    }
  }

  /// Returns the external port of the service when it exists
  pub async fn get_service(
    &self,
    namespace: &str,
    name: &str,
  ) -> IoResult<Option<i32>> {
    match tokio::time::timeout(CALL_TIMEOUT, self.services(namespace).get(name))
      .await
    {
      Ok(Ok(service)) => {
        let node_port = service
          .spec
          .as_ref()
          .and_then(|s| s.ports.as_ref())
          .and_then(|ports| ports.first())
          .and_then(|p| p.node_port)
          .unwrap_or_default();
        Ok(Some(node_port))
      }
      Ok(Err(kube::Error::Api(err))) if err.code == 404 => Ok(None),
      Ok(Err(err)) => Err(*err.map_err_context(|| "Substrate")),
      Err(_) => Err(IoError::interrupted("Substrate", "get_service timed out")),
    }
  }

  /// List substrate nodes with their internal addresses
  pub async fn list_nodes(&self) -> IoResult<Vec<NodeItem>> {
    let nodes: Api<Node> = Api::all(self.client.clone());
    let list = with_timeout(nodes.list(&ListParams::default())).await?;
    let mut items = Vec::new();
    for node in list {
      let name = node.metadata.name.clone().unwrap_or_default();
      let internal_ip = node
        .status
        .as_ref()
        .and_then(|s| s.addresses.as_ref())
        .and_then(|addrs| {
          addrs
            .iter()
            .find(|a| a.type_ == "InternalIP")
            .map(|a| a.address.clone())
        })
        .unwrap_or_default();
      items.push(NodeItem { name, internal_ip });
    }
    Ok(items)
  }
}
