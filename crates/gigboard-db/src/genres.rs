//! Genre tags live in a single comma-joined text column. The encoding is a
//! storage concern only: everything above this module works with `Vec<String>`.

/// Join a list of genre tags into the stored column format. Tags are
/// trimmed; empty tags are dropped.
pub fn join_genres(tags: &[String]) -> String {
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Split a stored genres column back into a list of tags.
pub fn split_genres(stored: &str) -> Vec<String> {
    stored
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_genres() {
        let tags = vec!["Jazz".to_string(), "Classical".to_string()];
        assert_eq!(join_genres(&tags), "Jazz,Classical");
    }

    #[test]
    fn test_join_trims_and_drops_empty() {
        let tags = vec![" Jazz ".to_string(), "".to_string(), "Folk".to_string()];
        assert_eq!(join_genres(&tags), "Jazz,Folk");
    }

    #[test]
    fn test_split_genres() {
        assert_eq!(
            split_genres("Rock n Roll,Jazz,Classical"),
            vec!["Rock n Roll", "Jazz", "Classical"]
        );
    }

    #[test]
    fn test_split_empty_column() {
        assert!(split_genres("").is_empty());
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let tags = vec![
            "Hip-Hop".to_string(),
            "R&B".to_string(),
            "Soul".to_string(),
        ];
        assert_eq!(split_genres(&join_genres(&tags)), tags);
    }
}
