//! Fresh-generation prompt rendering

use super::template::render_template;
use crate::artist::ArtistProfile;
use crate::song::SongRequest;

/// Renders the song generation template for a request
pub struct SongPrompt;

impl SongPrompt {
    pub fn render(template: &str, request: &SongRequest) -> String {
        let artist_context = ArtistProfile::context_or_default(request.artist.as_ref());
        render_template(
            template,
            &[
                ("artist_context", &artist_context),
                ("song_description", &request.description),
                ("style_description", &request.style),
            ],
        )
    }
}
