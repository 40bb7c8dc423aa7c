use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StageError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(StageError::render("x").to_string().contains("render error:"));
    assert!(StageError::encode("x").to_string().contains("encode error:"));
    assert!(
        StageError::StaleHandle {
            index: 3,
            generation: 7
        }
        .to_string()
        .contains("stale handle: slot 3 generation 7")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StageError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
