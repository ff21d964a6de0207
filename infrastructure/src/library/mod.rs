//! Song library adapters
//!
//! Implementations of the [`SongRepository`](songmaster_application::SongRepository) port.

mod json_file;
mod memory;

pub use json_file::JsonFileSongRepository;
pub use memory::InMemorySongRepository;

use songmaster_application::SavedSong;

/// Newest first, id as a stable tiebreak.
fn sort_newest_first(songs: &mut [SavedSong]) {
    songs.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
