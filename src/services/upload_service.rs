use std::path::{Path, PathBuf};

/// Resolves a stored image URL (`/uploads/products/foo.webp`) to a path under
/// the configured uploads directory. Returns `None` for URLs that escape the
/// uploads tree or point elsewhere entirely.
fn asset_path(uploads_dir: &Path, url: &str) -> Option<PathBuf> {
    let relative = url.strip_prefix("/uploads/")?;

    if relative.split('/').any(|part| part == ".." || part.is_empty()) {
        return None;
    }

    Some(uploads_dir.join(relative))
}

/// Best-effort removal of image files belonging to a deleted record. Failures
/// are logged and skipped; the record deletion proceeds regardless.
pub async fn remove_assets(uploads_dir: &Path, urls: &[String]) -> usize {
    let mut removed = 0;

    for url in urls {
        let Some(path) = asset_path(uploads_dir, url) else {
            continue;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!("Failed to remove asset {}: {}", path.display(), e);
            }
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_upload_urls_into_the_uploads_dir() {
        let dir = Path::new("/srv/uploads");
        assert_eq!(
            asset_path(dir, "/uploads/products/a.webp"),
            Some(PathBuf::from("/srv/uploads/products/a.webp"))
        );
    }

    #[test]
    fn rejects_foreign_and_traversing_urls() {
        let dir = Path::new("/srv/uploads");
        assert_eq!(asset_path(dir, "https://cdn.example.com/a.webp"), None);
        assert_eq!(asset_path(dir, "/uploads/../etc/passwd"), None);
        assert_eq!(asset_path(dir, "/uploads//products/a.webp"), None);
    }
}
