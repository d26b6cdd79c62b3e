//! Well-known catalog content type names.
//!
//! These must match the `ck_content_type` check constraint on the `content`
//! table.

/// A feature film; tracked as a single unit.
pub const CONTENT_TYPE_MOVIE: &str = "MOVIE";

/// A series; progress is tracked per episode, never against the show itself.
pub const CONTENT_TYPE_TV_SHOW: &str = "TV_SHOW";

/// A one-off special; tracked as a single unit like a movie.
pub const CONTENT_TYPE_SPECIAL: &str = "SPECIAL";

/// Whether progress for this content type is keyed by episode.
pub fn is_episodic(content_type: &str) -> bool {
    content_type == CONTENT_TYPE_TV_SHOW
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_tv_shows_are_episodic() {
        assert!(is_episodic(CONTENT_TYPE_TV_SHOW));
        assert!(!is_episodic(CONTENT_TYPE_MOVIE));
        assert!(!is_episodic(CONTENT_TYPE_SPECIAL));
    }
}
