use std::collections::HashMap;
use std::sync::Arc;

use futures::channel::mpsc;

use vmhive_error::io::IoResult;

use vmhive_stubs::config::DaemonConfig;

use crate::auth::{DirectoryClient, TokenManager, TtlCache};
use crate::models::{SystemState, LOG_QUEUE_CAPACITY};
use crate::substrate::{NodeIpIndex, SubstrateClient};
use crate::utils;
use crate::vm::{ImageImporter, ShutdownSender, VmController, VmReaper};

mod logs;

/// Everything `init` hands back to main, the shutdown senders keep the
/// background loops alive until the process stops
pub struct BootState {
  pub state: SystemState,
  pub reconciler_tx: ShutdownSender,
  pub reaper_tx: ShutdownSender,
}

/// Boot the internal dependencies in order: store, substrate, node index,
/// image catalog, directory group cache, log consumers, then the background
/// loops.
pub async fn init(config: &DaemonConfig) -> IoResult<BootState> {
  let pool = utils::store::init(&config.store_url).await?;
  let substrate = SubstrateClient::new(config).await?;
  let node_ip = Arc::new(NodeIpIndex::init(&substrate).await?);
  if node_ip.is_empty() {
    log::warn!("Node ip index is empty, vm rows will carry no node ip");
  } else {
    log::info!("Node ip index built with {} nodes", node_ip.len());
  }

  let project_root = std::env::current_dir()?;
  let importer =
    ImageImporter::new(pool.clone(), &project_root, &config.image_csv_file_path);
  importer.import().await?;

  let directory = DirectoryClient::new(config);
  let mut groups = HashMap::new();
  for (gid, name) in directory.list_groups().await? {
    groups.insert(gid, name);
  }
  log::info!("Directory group cache built with {} groups", groups.len());

  let (audit_tx, audit_rx) = mpsc::channel(LOG_QUEUE_CAPACITY);
  let (event_tx, event_rx) = mpsc::channel(LOG_QUEUE_CAPACITY);
  logs::spawn_consumers(pool.clone(), audit_rx, event_rx);

  let tokens = TokenManager::new(&config.jwt_secret, TtlCache::new());
  let controller = VmController::new(
    pool.clone(),
    substrate.clone(),
    Arc::clone(&node_ip),
    config,
    event_tx,
  );
  let reconciler_tx = controller.spawn_reconciler();
  let reaper_tx = VmReaper::new(
    pool.clone(),
    controller.clone(),
    config.deleted_vm_retention_period,
  )
  .spawn();

  let state = SystemState {
    pool,
    config: config.clone(),
    tokens,
    directory,
    groups: Arc::new(groups),
    controller,
    audit_tx,
  };
  Ok(BootState {
    state,
    reconciler_tx,
    reaper_tx,
  })
}
