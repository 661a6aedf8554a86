use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dishpoll_shared::{Error, Result, Storage};
use tracing::debug;

/// Keeps each key as `<key>.json` inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| Error::storage(format!("Failed to create {}", dir.display()), e))?;
        Ok(Self { dir })
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::storage(format!("Failed to read '{key}'"), e)),
        }
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<()> {
        let path = self.path(key);
        write_atomic(&path, blob.as_bytes())
            .map_err(|e| Error::storage(format!("Failed to write '{key}'"), e))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::storage(format!("Failed to remove '{key}'"), e)),
        }
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = path.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path has no parent directory")
    })?;
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let tmp_path = dir.join(format!("{}.tmp", file_name.to_string_lossy()));
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    #[cfg(windows)]
    {
        if path.exists() {
            fs::remove_file(path)?;
        }
    }

    fs::rename(tmp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dishpoll_shared::{notify::Silent, ErrorCode, Rank, VoteStore, VOTES_KEY};
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_key_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("nested")).unwrap();
        assert_eq!(storage.load(VOTES_KEY).unwrap(), None);
    }

    #[test]
    fn save_load_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();

        storage.save("currentUser", r#"{"id":1,"username":"user1"}"#).unwrap();
        assert!(dir.path().join("currentUser.json").is_file());
        assert!(!dir.path().join("currentUser.json.tmp").exists());
        assert_eq!(storage.load("currentUser").unwrap().as_deref(), Some(r#"{"id":1,"username":"user1"}"#));

        storage.remove("currentUser").unwrap();
        storage.remove("currentUser").unwrap();
        assert_eq!(storage.load("currentUser").unwrap(), None);
    }

    #[test]
    fn save_replaces_existing_blob() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();

        storage.save(VOTES_KEY, r#"{"1":{"1":3}}"#).unwrap();
        storage.save(VOTES_KEY, r#"{"1":{"2":3}}"#).unwrap();
        assert_eq!(storage.load(VOTES_KEY).unwrap().as_deref(), Some(r#"{"1":{"2":3}}"#));
        assert!(!dir.path().join("allVotes.json.tmp").exists());
    }

    #[test]
    fn votes_survive_a_restart() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = VoteStore::load(FileStorage::open(dir.path()).unwrap(), Box::new(Silent)).unwrap();
        store.set_vote(1, 3, Some(Rank::First)).unwrap();
        store.set_vote(2, 3, Some(Rank::Third)).unwrap();
        let before = store.table().clone();

        let reopened = VoteStore::load(FileStorage::open(dir.path()).unwrap(), Box::new(Silent)).unwrap();
        assert_eq!(reopened.table(), &before);
    }

    #[test]
    fn corrupt_file_is_a_hard_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("allVotes.json"), "[1, 2").unwrap();

        let result = VoteStore::load(FileStorage::open(dir.path()).unwrap(), Box::new(Silent));
        assert!(result.err().unwrap().is(ErrorCode::CorruptData));
    }
}
