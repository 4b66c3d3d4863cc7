use std::path::{Path, PathBuf};

use vmhive_error::io::{FromIo, IoError, IoResult};

use vmhive_stubs::vm_image::VmImagePartial;

use crate::models::{
  ImageOperationLogDb, NewImageOperationLogDb, NewVmImageDb, Pool, VmImageDb,
  VmImageUpdateDb,
};
use crate::utils;

/// Imports the operating system catalog into the store at startup.
///
/// The catalog is a comma separated file with a header row. Rows missing a
/// required field, or pointing at a picture that does not exist under the
/// project root, are logged and skipped, one bad row never aborts the batch.
pub struct ImageImporter {
  pool: Pool,
  base_path: PathBuf,
  csv_file_path: String,
}

/// Parse one catalog record.
/// Columns: name, display_name, os_type, os_version, architecture,
/// image_url, default_user, default_password, picture_relative_path,
/// description.
fn parse_record(line: &str) -> IoResult<VmImagePartial> {
  let fields: Vec<&str> = line.split(',').map(str::trim).collect();
  if fields.len() < 7 {
    return Err(IoError::invalid_data(
      "ImageCatalog",
      &format!("invalid record length: {}", fields.len()),
    ));
  }
  let get = |idx: usize| fields.get(idx).copied().unwrap_or_default().to_owned();
  let image = VmImagePartial {
    name: get(0),
    display_name: get(1),
    os_type: get(2),
    os_version: get(3),
    architecture: get(4),
    image_url: get(5),
    default_user: get(6),
    default_password: get(7),
    picture_url: get(8),
    description: get(9),
  };
  if image.name.is_empty()
    || image.os_type.is_empty()
    || image.os_version.is_empty()
    || image.architecture.is_empty()
    || image.image_url.is_empty()
    || image.default_user.is_empty()
  {
    return Err(IoError::invalid_data("ImageCatalog", "missing required fields"));
  }
  Ok(image)
}

impl ImageImporter {
  pub fn new(pool: Pool, base_path: &Path, csv_file_path: &str) -> Self {
    Self {
      pool,
      base_path: base_path.to_path_buf(),
      csv_file_path: csv_file_path.to_owned(),
    }
  }

  async fn import_record(&self, image: &VmImagePartial) -> IoResult<()> {
    if !image.picture_url.is_empty() {
      let picture_path = self.base_path.join(&image.picture_url);
      if !picture_path.exists() {
        return Err(IoError::invalid_data(
          "ImageCatalog",
          &format!("picture file not found: {}", picture_path.display()),
        ));
      }
    }
    let now = utils::key::now_millis();
    let (row, operation) =
      match VmImageDb::find_by_name(&image.name, &self.pool).await? {
        Some(_) => {
          let values = VmImageUpdateDb {
            display_name: Some(image.display_name.clone()),
            os_type: Some(image.os_type.clone()),
            os_version: Some(image.os_version.clone()),
            architecture: Some(image.architecture.clone()),
            image_url: Some(image.image_url.clone()),
            status: Some("available".to_owned()),
            public: Some(true),
            default_user: Some(image.default_user.clone()),
            default_password: Some(image.default_password.clone()),
            description: Some(image.description.clone()),
            picture_url: Some(image.picture_url.clone()),
            ..Default::default()
          };
          let row =
            VmImageDb::update_by_name(&image.name, values, &self.pool).await?;
          (row, "update")
        }
        None => {
          let row =
            VmImageDb::create(NewVmImageDb::from_partial(image, now), &self.pool)
              .await?;
          (row, "create")
        }
      };
    if let Err(err) = ImageOperationLogDb::create(
      NewImageOperationLogDb::new(row.id, operation),
      &self.pool,
    )
    .await
    {
      log::warn!("image_importer: recording operation log: {err}");
    }
    Ok(())
  }

  /// Run the import. Returns the number of rows imported.
  pub async fn import(&self) -> IoResult<usize> {
    let path = self.base_path.join(&self.csv_file_path);
    let content = tokio::fs::read_to_string(&path).await.map_err(|err| {
      err.map_err_context(|| format!("ImageCatalog {}", path.display()))
    })?;
    let mut imported = 0;
    // the first line is the header
    for line in content.lines().skip(1) {
      if line.trim().is_empty() {
        continue;
      }
      let image = match parse_record(line) {
        Ok(image) => image,
        Err(err) => {
          log::error!("image_importer: skipping record: {err} ({line})");
          continue;
        }
      };
      if let Err(err) = self.import_record(&image).await {
        log::error!("image_importer: skipping {}: {err}", image.name);
        continue;
      }
      imported += 1;
    }
    log::info!("image_importer: {imported} images imported");
    Ok(imported)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn record_parses_all_columns() {
    let image = parse_record(
      "ubuntu-22.04, Ubuntu 22.04, linux, 22.04, x86_64, registry.local/ubuntu:22.04, root, secret, , LTS image",
    )
    .unwrap();
    assert_eq!(image.name, "ubuntu-22.04");
    assert_eq!(image.display_name, "Ubuntu 22.04");
    assert_eq!(image.os_type, "linux");
    assert_eq!(image.architecture, "x86_64");
    assert_eq!(image.image_url, "registry.local/ubuntu:22.04");
    assert_eq!(image.default_user, "root");
    assert_eq!(image.default_password, "secret");
    assert_eq!(image.picture_url, "");
    assert_eq!(image.description, "LTS image");
  }

  #[test]
  fn record_missing_required_field_is_rejected() {
    // os_type empty
    let err = parse_record("img,, , 22.04, x86_64, url, root").unwrap_err();
    assert_eq!(err.inner.kind(), std::io::ErrorKind::InvalidData);
  }

  #[test]
  fn short_record_is_rejected() {
    let err = parse_record("a,b,c").unwrap_err();
    assert_eq!(err.inner.kind(), std::io::ErrorKind::InvalidData);
  }

  #[test]
  fn record_without_optional_tail_is_accepted() {
    let image = parse_record("img, , linux, 22.04, x86_64, url, root").unwrap();
    assert_eq!(image.default_password, "");
    assert_eq!(image.description, "");
  }
}
