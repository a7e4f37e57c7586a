use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(
        ReelError::caption_render("x")
            .to_string()
            .contains("caption render failure:")
    );
    assert!(
        ReelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn encode_error_names_path_and_keeps_message() {
    let err = ReelError::encode("out/show.mp4", "Unknown encoder 'libx999'");
    let msg = err.to_string();
    assert!(msg.contains("out/show.mp4"));
    assert!(msg.contains("Unknown encoder 'libx999'"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
