use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Current time as milliseconds since the unix epoch
pub fn now_millis() -> i64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_millis() as i64)
    .unwrap_or_default()
}

/// Generate a short opaque identifier, unique within the process and
/// monotonic over time. The value packs the millisecond timestamp with a
/// wrapping sequence number and is rendered in base36 so it stays a valid
/// substrate resource name.
pub fn generate_uid() -> String {
  let seq = COUNTER.fetch_add(1, Ordering::Relaxed) & 0xffff;
  let packed = ((now_millis() as u64) << 16) | seq;
  to_base36(packed)
}

fn to_base36(mut value: u64) -> String {
  const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
  if value == 0 {
    return "0".to_owned();
  }
  let mut out = Vec::new();
  while value > 0 {
    out.push(ALPHABET[(value % 36) as usize]);
    value /= 36;
  }
  out.reverse();
  String::from_utf8(out).expect("base36 is ascii")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn uid_is_unique_and_short() {
    let mut seen = std::collections::HashSet::new();
    for _ in 0..1000 {
      let uid = generate_uid();
      assert!(uid.len() <= 32, "uid too long: {uid}");
      assert!(seen.insert(uid));
    }
  }

  #[test]
  fn uid_is_monotonic() {
    let decode = |s: &str| u64::from_str_radix(s, 36).unwrap();
    let a = decode(&generate_uid());
    let b = decode(&generate_uid());
    assert!(b > a, "expected {b} > {a}");
  }

  #[test]
  fn base36_encodes_zero() {
    assert_eq!(to_base36(0), "0");
    assert_eq!(to_base36(35), "z");
    assert_eq!(to_base36(36), "10");
  }
}
