// src/app/cache.rs — on-disk poster cache
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Once, OnceLock};
use std::time::{Duration, SystemTime};

use image::GenericImageView;
use tracing::warn;

use crate::config::{load_config, resolve_relative_path};

// Chosen once on first call
static CACHE_DIR_ONCE: OnceLock<PathBuf> = OnceLock::new();
static POSTER_DIR_ONCE: OnceLock<PathBuf> = OnceLock::new();
static POSTER_PRUNE_ONCE: Once = Once::new();

const POSTER_RETENTION_DAYS: u64 = 30;
const POSTER_RETENTION_SECS: u64 = POSTER_RETENTION_DAYS * 24 * 60 * 60;

pub fn cache_dir() -> PathBuf {
    CACHE_DIR_ONCE
        .get_or_init(|| {
            let cfg = load_config();
            let mut path = cfg
                .cache_dir
                .clone()
                .map(PathBuf::from)
                .unwrap_or_else(|| resolve_relative_path(".tmdx_cache"));

            if let Err(e) = fs::create_dir_all(&path) {
                warn!("failed to create cache dir {}: {e}", path.display());
                // Fall back to local folder if creation failed
                path = resolve_relative_path(".tmdx_cache");
                let _ = fs::create_dir_all(&path);
            }
            path
        })
        .clone()
}

pub fn poster_cache_dir() -> PathBuf {
    let dir = POSTER_DIR_ONCE.get_or_init(|| {
        let mut path = cache_dir().join("posters");
        if let Err(e) = fs::create_dir_all(&path) {
            warn!("failed to create poster cache dir {}: {e}", path.display());
            path = cache_dir();
        }
        path
    });

    POSTER_PRUNE_ONCE.call_once({
        let path = dir.clone();
        move || {
            if let Err(err) = prune_poster_cache_in_dir(&path) {
                warn!("poster cache prune failed: {err}");
            }
        }
    });

    dir.clone()
}

/// Age out posters the user hasn't touched for a month; films scroll out of
/// the discover feed and their artwork goes with them.
fn prune_poster_cache_in_dir(dir: &Path) -> std::io::Result<usize> {
    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(POSTER_RETENTION_SECS))
        .unwrap_or(SystemTime::UNIX_EPOCH);
    let mut removed = 0usize;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png" | "part") {
            continue;
        }
        let metadata = entry.metadata()?;
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        if modified < cutoff || metadata.len() == 0 {
            let _ = fs::remove_file(&path);
            removed += 1;
        }
    }
    Ok(removed)
}

pub fn url_to_cache_key(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

pub fn find_cached_poster(key: &str) -> Option<PathBuf> {
    let poster_dir = poster_cache_dir();
    for ext in ["jpg", "png"] {
        let p = poster_dir.join(format!("{key}.{ext}"));
        if p.exists() {
            return Some(p);
        }
    }
    None
}

/// Return (width, height, RGBA8 bytes) decoded from a cached poster file.
pub fn load_rgba(path: &Path) -> Result<(u32, u32, Vec<u8>), String> {
    if !path.exists() {
        return Err("not found".into());
    }
    let img = image::ImageReader::open(path)
        .map_err(|e| format!("open image {}: {e}", path.display()))?
        .with_guessed_format()
        .map_err(|e| format!("guess format {}: {e}", path.display()))?
        .decode()
        .map_err(|e| format!("decode {}: {e}", path.display()))?;
    let (w, h) = img.dimensions();
    Ok((w, h, img.to_rgba8().to_vec()))
}

/// Download a poster with the shared client, downscale if wider than
/// `max_width`, and store as JPEG with `quality`. Returns the on-disk path.
///
/// Writes `<poster_cache_dir>/<key>.jpg` via a `.part` temp file.
pub fn download_and_store_poster(
    client: &reqwest::blocking::Client,
    url: &str,
    key: &str,
    max_width: u32,
    quality: u8,
) -> Result<PathBuf, String> {
    use image::{imageops::FilterType, DynamicImage};

    let dest = poster_cache_dir().join(format!("{key}.jpg"));

    // If already present, return immediately.
    if dest.exists() {
        return Ok(dest);
    }

    let bytes = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .map_err(|e| format!("download bytes: {e}"))?;

    let img = image::load_from_memory(&bytes).map_err(|e| format!("decode poster {url}: {e}"))?;

    // Resize if needed, keep aspect
    let (w, h) = img.dimensions();
    let out: DynamicImage = if w > max_width {
        let new_h = ((h as f32) * (max_width as f32 / w as f32)).round().max(1.0) as u32;
        img.resize_exact(max_width, new_h, FilterType::CatmullRom)
    } else {
        img
    };

    let mut jpeg_bytes: Vec<u8> = Vec::new();
    {
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_bytes, quality);
        encoder.encode_image(&out).map_err(|e| format!("jpeg encode: {e}"))?;
    }

    if let Some(parent) = dest.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let tmp = dest.with_extension("jpg.part");
    {
        let mut f = fs::File::create(&tmp).map_err(|e| format!("create tmp: {e}"))?;
        f.write_all(&jpeg_bytes).map_err(|e| format!("write: {e}"))?;
    }
    fs::rename(&tmp, &dest).map_err(|e| format!("rename: {e}"))?;

    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_keys_are_stable_md5_hex() {
        let key = url_to_cache_key("https://image.tmdb.org/t/p/w342/abc.jpg");
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, url_to_cache_key("https://image.tmdb.org/t/p/w342/abc.jpg"));
        assert_ne!(key, url_to_cache_key("https://image.tmdb.org/t/p/w342/def.jpg"));
    }

    #[test]
    fn prune_removes_only_stale_image_files() {
        let dir = tempfile::tempdir().unwrap();
        let fresh = dir.path().join("fresh.jpg");
        fs::write(&fresh, b"jpeg bytes").unwrap();
        let keeper = dir.path().join("notes.txt");
        fs::write(&keeper, b"keep me").unwrap();
        let empty = dir.path().join("broken.png");
        fs::write(&empty, b"").unwrap();

        let removed = prune_poster_cache_in_dir(dir.path()).unwrap();
        assert_eq!(removed, 1); // only the zero-byte image
        assert!(fresh.exists());
        assert!(keeper.exists());
        assert!(!empty.exists());
    }
}
