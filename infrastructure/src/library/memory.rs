use super::sort_newest_first;
use async_trait::async_trait;
use songmaster_application::{RepositoryError, SavedSong, SongRepository};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Library that lives for the process; used by `serve` without a library path.
#[derive(Default)]
pub struct InMemorySongRepository {
    songs: RwLock<HashMap<Uuid, SavedSong>>,
}

impl InMemorySongRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SongRepository for InMemorySongRepository {
    async fn save(&self, song: SavedSong) -> Result<SavedSong, RepositoryError> {
        self.songs.write().await.insert(song.id, song.clone());
        Ok(song)
    }

    async fn get(&self, id: Uuid) -> Result<Option<SavedSong>, RepositoryError> {
        Ok(self.songs.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<SavedSong>, RepositoryError> {
        let mut songs: Vec<_> = self.songs.read().await.values().cloned().collect();
        sort_newest_first(&mut songs);
        Ok(songs)
    }
}
