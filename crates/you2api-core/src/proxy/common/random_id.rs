use rand::Rng;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Random 6-letter lowercase stem for an upload artifact.
pub fn generate_short_file_stem() -> String {
    let mut rng = rand::thread_rng();
    (0..6).map(|_| char::from(LOWERCASE[rng.gen_range(0..LOWERCASE.len())])).collect()
}

/// `<stem>.txt`
pub fn generate_short_file_name() -> String {
    format!("{}.txt", generate_short_file_stem())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_file_name_shape() {
        for _ in 0..32 {
            let name = generate_short_file_name();
            assert_eq!(name.len(), 10);
            let stem = name.strip_suffix(".txt").unwrap();
            assert!(stem.chars().all(|c| c.is_ascii_lowercase()), "bad stem: {stem}");
        }
    }
}
