//! Library persisted as a single JSON array on disk

use super::sort_newest_first;
use async_trait::async_trait;
use songmaster_application::{RepositoryError, SavedSong, SongRepository};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// JSON-file song library.
///
/// Saving an id that already exists replaces that entry.
pub struct JsonFileSongRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileSongRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<SavedSong>, RepositoryError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, songs: &[SavedSong]) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(songs)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SongRepository for JsonFileSongRepository {
    async fn save(&self, song: SavedSong) -> Result<SavedSong, RepositoryError> {
        let _guard = self.lock.lock().await;
        let mut songs = self.load().await?;
        songs.retain(|s| s.id != song.id);
        songs.push(song.clone());
        self.store(&songs).await?;
        debug!(id = %song.id, total = songs.len(), "Song saved to library");
        Ok(song)
    }

    async fn get(&self, id: Uuid) -> Result<Option<SavedSong>, RepositoryError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.into_iter().find(|s| s.id == id))
    }

    async fn list(&self) -> Result<Vec<SavedSong>, RepositoryError> {
        let _guard = self.lock.lock().await;
        let mut songs = self.load().await?;
        sort_newest_first(&mut songs);
        Ok(songs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songmaster_domain::{AgentId, SongCandidate};

    fn song(name: &str) -> SavedSong {
        SavedSong::from_candidate(&SongCandidate::new(name, "indie", "verse"), 1)
    }

    #[tokio::test]
    async fn test_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library").join("songs.json");

        let mut saved = song("Harbor Lights");
        saved.winner_agent_id = Some(AgentId::new("claude"));
        saved.winner_reason = Some("Best imagery".to_string());
        JsonFileSongRepository::new(&path)
            .save(saved.clone())
            .await
            .unwrap();

        let reopened = JsonFileSongRepository::new(&path);
        assert_eq!(reopened.get(saved.id).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn test_save_same_id_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileSongRepository::new(dir.path().join("songs.json"));

        let mut first = song("Draft");
        repo.save(first.clone()).await.unwrap();
        first.name = "Final".to_string();
        repo.save(first.clone()).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Final");
    }

    #[tokio::test]
    async fn test_missing_or_empty_file_is_empty_library() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("songs.json");
        let repo = JsonFileSongRepository::new(&path);
        assert!(repo.list().await.unwrap().is_empty());

        std::fs::write(&path, "\n").unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("songs.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonFileSongRepository::new(&path).list().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Serialization(_)));
    }
}
