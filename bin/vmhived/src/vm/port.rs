use rand::Rng;

use vmhive_error::io::{IoError, IoResult};

use crate::models::{Pool, VmDb};

const MAX_TRIES: usize = 10;

/// Pick an external ssh port inside the configured node port range that no
/// live row currently holds.
///
/// The allocator is stateless and deliberately racy, the store is the single
/// source of truth. Two concurrent allocations can pick the same free port,
/// the loser fails the unique constraint when committing it and retries the
/// whole allocation.
pub async fn allocate_ssh_port(
  start: i32,
  end: i32,
  pool: &Pool,
) -> IoResult<i32> {
  for _ in 0..MAX_TRIES {
    let candidate = {
      let mut rng = rand::thread_rng();
      rng.gen_range(start..=end)
    };
    if !VmDb::ssh_port_exists(candidate, pool).await? {
      return Ok(candidate);
    }
  }
  Err(IoError::permission_denied(
    "SshPort",
    &format!("no free port after {MAX_TRIES} tries in [{start}, {end}]"),
  ))
}
