use ldap3::{drive, ldap_escape, Ldap, LdapConnAsync, Scope, SearchEntry};

use vmhive_error::io::{IoError, IoResult};

use vmhive_stubs::config::DaemonConfig;

/// A user entry as the directory service returns it
#[derive(Debug, Clone, Default)]
pub struct DirectoryUser {
  pub dn: String,
  pub cn: String,
  pub uid_number: String,
  pub gid_number: String,
  pub mail: String,
  pub display_name: String,
}

/// Client for the directory service.
///
/// Every operation opens a fresh connection bound with the configured admin
/// credentials, the directory is only consulted on login and at startup.
#[derive(Clone)]
pub struct DirectoryClient {
  host: String,
  port: u16,
  bind_dn: String,
  bind_password: String,
  base_dn: String,
}

fn attr(entry: &SearchEntry, name: &str) -> String {
  entry
    .attrs
    .get(name)
    .and_then(|values| values.first())
    .cloned()
    .unwrap_or_default()
}

impl DirectoryClient {
  pub fn new(config: &DaemonConfig) -> Self {
    Self {
      host: config.ldap_host.clone(),
      port: config.ldap_port,
      bind_dn: config.ldap_bind_dn.clone(),
      bind_password: config.ldap_bind_password.clone(),
      base_dn: config.ldap_base_dn.clone(),
    }
  }

  async fn connect(&self) -> IoResult<Ldap> {
    let url = format!("ldap://{}:{}", self.host, self.port);
    let (conn, mut ldap) = LdapConnAsync::new(&url)
      .await
      .map_err(|err| IoError::interrupted("Directory", &err.to_string()))?;
    drive!(conn);
    ldap
      .simple_bind(&self.bind_dn, &self.bind_password)
      .await
      .map_err(|err| IoError::interrupted("Directory", &err.to_string()))?
      .success()
      .map_err(|err| IoError::permission_denied("Directory", &err.to_string()))?;
    Ok(ldap)
  }

  /// Find a user entry by common name
  pub async fn find_user_by_cn(
    &self,
    cn: &str,
  ) -> IoResult<Option<DirectoryUser>> {
    let mut ldap = self.connect().await?;
    let filter = format!("(cn={})", ldap_escape(cn));
    let (entries, _res) = ldap
      .search(
        &self.base_dn,
        Scope::Subtree,
        &filter,
        vec!["cn", "uidNumber", "gidNumber", "mail", "displayName"],
      )
      .await
      .map_err(|err| IoError::interrupted("Directory", &err.to_string()))?
      .success()
      .map_err(|err| IoError::interrupted("Directory", &err.to_string()))?;
    let _ = ldap.unbind().await;
    let Some(entry) = entries.into_iter().next() else {
      return Ok(None);
    };
    let entry = SearchEntry::construct(entry);
    Ok(Some(DirectoryUser {
      dn: entry.dn.clone(),
      cn: attr(&entry, "cn"),
      uid_number: attr(&entry, "uidNumber"),
      gid_number: attr(&entry, "gidNumber"),
      mail: attr(&entry, "mail"),
      display_name: attr(&entry, "displayName"),
    }))
  }

  /// Authenticate a user by binding with its own dn.
  /// Returns the directory entry on success.
  pub async fn authenticate(
    &self,
    cn: &str,
    password: &str,
  ) -> IoResult<DirectoryUser> {
    let user = self.find_user_by_cn(cn).await?.ok_or_else(|| {
      IoError::not_found("Directory", &format!("user {cn} not found"))
    })?;
    let url = format!("ldap://{}:{}", self.host, self.port);
    let (conn, mut ldap) = LdapConnAsync::new(&url)
      .await
      .map_err(|err| IoError::interrupted("Directory", &err.to_string()))?;
    drive!(conn);
    ldap
      .simple_bind(&user.dn, password)
      .await
      .map_err(|err| IoError::interrupted("Directory", &err.to_string()))?
      .success()
      .map_err(|_| {
        IoError::permission_denied("Directory", "invalid credentials")
      })?;
    let _ = ldap.unbind().await;
    Ok(user)
  }

  /// List every posix group, used to build the gid to name cache at startup
  pub async fn list_groups(&self) -> IoResult<Vec<(String, String)>> {
    let mut ldap = self.connect().await?;
    let (entries, _res) = ldap
      .search(
        &self.base_dn,
        Scope::Subtree,
        "(objectClass=posixGroup)",
        vec!["cn", "gidNumber"],
      )
      .await
      .map_err(|err| IoError::interrupted("Directory", &err.to_string()))?
      .success()
      .map_err(|err| IoError::interrupted("Directory", &err.to_string()))?;
    let _ = ldap.unbind().await;
    let mut groups = Vec::new();
    for entry in entries {
      let entry = SearchEntry::construct(entry);
      let gid = attr(&entry, "gidNumber");
      let name = attr(&entry, "cn");
      if !gid.is_empty() && !name.is_empty() {
        groups.push((gid, name));
      }
    }
    Ok(groups)
  }
}
