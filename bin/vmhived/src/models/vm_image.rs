use diesel::prelude::*;

use vmhive_stubs::vm_image::{ImageStatus, VmImage, VmImagePartial};

use crate::schema::vm_images;

/// An operating system image row, maintained by the catalog importer
#[derive(Clone, Debug, Queryable, Identifiable)]
#[diesel(primary_key(id))]
#[diesel(table_name = vm_images)]
pub struct VmImageDb {
  pub id: i64,
  pub name: String,
  pub display_name: String,
  pub os_type: String,
  pub os_version: String,
  pub architecture: String,
  pub image_url: String,
  pub status: String,
  pub public: bool,
  pub default_user: String,
  pub default_password: String,
  pub default_ssh_key: String,
  pub description: String,
  pub picture_url: String,
  pub created_at: i64,
  pub creator: String,
  pub updated_at: i64,
  pub updater: String,
  pub deleted_at: Option<i64>,
}

impl From<VmImageDb> for VmImage {
  fn from(db: VmImageDb) -> Self {
    Self {
      id: db.id,
      name: db.name,
      display_name: db.display_name,
      os_type: db.os_type,
      os_version: db.os_version,
      architecture: db.architecture,
      image_url: db.image_url,
      status: db.status.parse().unwrap_or(ImageStatus::Unavailable),
      public: db.public,
      default_user: db.default_user,
      description: db.description,
      picture_url: db.picture_url,
      created_at: db.created_at,
      updated_at: db.updated_at,
    }
  }
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = vm_images)]
pub struct NewVmImageDb {
  pub name: String,
  pub display_name: String,
  pub os_type: String,
  pub os_version: String,
  pub architecture: String,
  pub image_url: String,
  pub status: String,
  pub public: bool,
  pub default_user: String,
  pub default_password: String,
  pub default_ssh_key: String,
  pub description: String,
  pub picture_url: String,
  pub created_at: i64,
  pub creator: String,
  pub updated_at: i64,
  pub updater: String,
}

impl NewVmImageDb {
  /// Build an importable row out of a parsed catalog record.
  /// Catalog images are always public and available.
  pub fn from_partial(item: &VmImagePartial, now: i64) -> Self {
    Self {
      name: item.name.clone(),
      display_name: item.display_name.clone(),
      os_type: item.os_type.clone(),
      os_version: item.os_version.clone(),
      architecture: item.architecture.clone(),
      image_url: item.image_url.clone(),
      status: ImageStatus::Available.to_string(),
      public: true,
      default_user: item.default_user.clone(),
      default_password: item.default_password.clone(),
      default_ssh_key: String::new(),
      description: item.description.clone(),
      picture_url: item.picture_url.clone(),
      created_at: now,
      creator: String::new(),
      updated_at: now,
      updater: String::new(),
    }
  }
}

/// Partial update of an image row, used when the catalog changes
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = vm_images)]
pub struct VmImageUpdateDb {
  pub display_name: Option<String>,
  pub os_type: Option<String>,
  pub os_version: Option<String>,
  pub architecture: Option<String>,
  pub image_url: Option<String>,
  pub status: Option<String>,
  pub public: Option<bool>,
  pub default_user: Option<String>,
  pub default_password: Option<String>,
  pub description: Option<String>,
  pub picture_url: Option<String>,
  pub updated_at: Option<i64>,
  pub updater: Option<String>,
}
