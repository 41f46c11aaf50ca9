// src/app/favorites.rs — persisted favorites set
use std::collections::HashSet;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;

use tracing::warn;

/// Favorited movie ids, mirrored to disk as a flat JSON array after every
/// mutation. Iteration (and the persisted array) follow insertion order.
pub struct Favorites {
    ids: Vec<u32>,
    index: HashSet<u32>,
    path: PathBuf,
}

impl Favorites {
    /// Load once at startup. A missing or corrupt file yields an empty set;
    /// it never surfaces as an error.
    pub fn load(path: PathBuf) -> Self {
        let stored: Vec<u32> = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(list) => list,
                Err(err) => {
                    warn!(
                        "favorites file {} is corrupt ({err}); starting empty",
                        path.display()
                    );
                    Vec::new()
                }
            },
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    warn!("failed to read favorites {}: {err}", path.display());
                }
                Vec::new()
            }
        };

        // keep first occurrence if the stored array ever carries duplicates
        let mut index = HashSet::new();
        let ids: Vec<u32> = stored.into_iter().filter(|id| index.insert(*id)).collect();

        Self { ids, index, path }
    }

    pub fn has(&self, id: u32) -> bool {
        self.index.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Insertion order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }

    pub fn add(&mut self, id: u32) {
        if self.index.insert(id) {
            self.ids.push(id);
            self.save();
        }
    }

    pub fn remove(&mut self, id: u32) {
        if self.index.remove(&id) {
            self.ids.retain(|&x| x != id);
            self.save();
        }
    }

    /// Flip membership; returns the new state.
    pub fn toggle(&mut self, id: u32) -> bool {
        if self.has(id) {
            self.remove(id);
            false
        } else {
            self.add(id);
            true
        }
    }

    fn save(&self) {
        if let Err(err) = self.write_to_disk() {
            warn!("failed to persist favorites to {}: {err}", self.path.display());
        }
    }

    fn write_to_disk(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec(&self.ids).map_err(io::Error::other)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("favorites.json")
    }

    #[test]
    fn add_then_remove_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = scratch_path(&dir);

        let mut favs = Favorites::load(path.clone());
        favs.add(42);
        assert!(favs.has(42));
        favs.remove(42);
        assert!(!favs.has(42));
        assert_eq!(favs.len(), 0);

        let persisted = fs::read_to_string(&path).unwrap();
        assert_eq!(persisted, "[]");
    }

    #[test]
    fn persists_and_reloads_in_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = scratch_path(&dir);

        {
            let mut favs = Favorites::load(path.clone());
            favs.add(550);
            favs.add(13);
            favs.add(680);
            favs.add(550); // duplicate add is a no-op
        }

        let favs = Favorites::load(path);
        assert_eq!(favs.iter().collect::<Vec<_>>(), vec![550, 13, 680]);
        assert_eq!(favs.len(), 3);
    }

    #[test]
    fn corrupt_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = scratch_path(&dir);
        fs::write(&path, b"{not json").unwrap();

        let favs = Favorites::load(path);
        assert!(favs.is_empty());
    }

    #[test]
    fn stored_duplicates_collapse_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = scratch_path(&dir);
        fs::write(&path, b"[7,7,9,7]").unwrap();

        let favs = Favorites::load(path);
        assert_eq!(favs.iter().collect::<Vec<_>>(), vec![7, 9]);
    }

    #[test]
    fn toggle_reports_membership() {
        let dir = tempfile::tempdir().unwrap();
        let mut favs = Favorites::load(scratch_path(&dir));

        assert!(favs.toggle(3));
        assert!(favs.has(3));
        assert!(!favs.toggle(3));
        assert!(!favs.has(3));
    }

    #[test]
    fn missing_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let favs = Favorites::load(scratch_path(&dir));
        assert!(favs.is_empty());
    }
}
