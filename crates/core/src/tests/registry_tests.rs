use super::*;
use image::{GenericImageView, Rgb, RgbImage};

fn write_source(dir: &Path, file: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(file);
    RgbImage::from_pixel(width, height, Rgb([40, 120, 200]))
        .save(&path)
        .expect("source image should be written");
    path
}

fn registry_in(dir: &Path) -> CharacterRegistry {
    CharacterRegistry::new(dir.join("script_project"), PortraitSpec::default())
}

#[test]
fn registered_portrait_has_fixed_square_size() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = write_source(dir.path(), "wide.png", 640, 320);
    let mut registry = registry_in(dir.path());

    for name in ["Alice", "bob_2", "X"] {
        registry
            .register(Some(&source), name, [10.0, 10.0])
            .expect("registration should succeed");
        let character = registry.lookup(name).expect("registered");
        let stored = image::open(&character.portrait_path).expect("portrait readable");
        assert_eq!(stored.dimensions(), (100, 100));
        assert_eq!(character.image_name(), format!("{name}.jpg"));
    }
    assert_eq!(registry.len(), 3);
}

#[test]
fn invalid_name_leaves_registry_unchanged() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = write_source(dir.path(), "face.png", 200, 200);
    let mut registry = registry_in(dir.path());
    registry
        .register(Some(&source), "Alice", [0.0, 0.0])
        .expect("first registration");

    for bad in ["", "has space", "dash-name", "ドット", "a/b"] {
        let err = registry
            .register(Some(&source), bad, [0.0, 0.0])
            .expect_err("must reject");
        assert!(matches!(err, ScriptError::InvalidName(_)), "{bad}");
    }
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Alice"]);
}

#[test]
fn missing_image_is_an_input_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut registry = registry_in(dir.path());
    let err = registry
        .register(None, "Alice", [0.0, 0.0])
        .expect_err("no image");
    assert!(matches!(err, ScriptError::MissingImage));
    assert!(registry.is_empty());
    assert!(!registry.project_dir().exists());
}

#[test]
fn unsupported_extension_is_rejected_before_io() {
    let dir = tempfile::tempdir().expect("tempdir");
    let registry = registry_in(dir.path());
    let err = registry
        .begin(Some(Path::new("voice.ogg")), "Alice")
        .expect_err("not an image");
    assert!(matches!(err, ScriptError::UnsupportedImage(_)));
}

#[test]
fn missing_source_file_is_a_file_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let registry = registry_in(dir.path());
    let err = registry
        .begin(Some(&dir.path().join("nope.png")), "Alice")
        .expect_err("missing file");
    assert!(matches!(err, ScriptError::File { .. }));
}

#[test]
fn reregistering_replaces_path_and_keeps_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = write_source(dir.path(), "face.png", 200, 200);
    let mut registry = registry_in(dir.path());
    registry
        .register(Some(&source), "Alice", [0.0, 0.0])
        .expect("alice");
    registry
        .register(Some(&source), "Bob", [0.0, 0.0])
        .expect("bob");
    registry
        .register(Some(&source), "Alice", [50.0, 50.0])
        .expect("alice again");

    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Alice", "Bob"]);
    assert_eq!(registry.first().map(|c| c.name.as_str()), Some("Alice"));
}

#[test]
fn pending_registration_exposes_crop_frame() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = write_source(dir.path(), "tall.png", 300, 600);
    let registry = registry_in(dir.path());

    let mut pending = registry.begin(Some(&source), "  Carol ").expect("begin");
    assert_eq!(pending.name().as_str(), "Carol");
    assert_eq!(pending.frame.shown_size(), [250, 500]);
    pending.frame.move_to(1000.0, 1000.0);
    assert_eq!(pending.frame.origin(), [150.0, 400.0]);
}

#[test]
fn discover_rebuilds_mapping_from_project_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = write_source(dir.path(), "face.png", 120, 120);
    let mut registry = registry_in(dir.path());
    registry
        .register(Some(&source), "Zed", [0.0, 0.0])
        .expect("zed");
    registry
        .register(Some(&source), "Amy", [0.0, 0.0])
        .expect("amy");
    std::fs::write(registry.project_dir().join("not valid.jpg"), b"x").expect("junk");
    std::fs::write(registry.project_dir().join("notes.txt"), b"x").expect("junk");

    let found = CharacterRegistry::discover(registry.project_dir(), PortraitSpec::default())
        .expect("discover");
    assert_eq!(found.names().collect::<Vec<_>>(), vec!["Amy", "Zed"]);
    assert_eq!(found.image_name("Zed").as_deref(), Some("Zed.jpg"));
}

#[test]
fn discover_ignores_source_images_in_project_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = write_source(dir.path(), "face.png", 120, 120);
    let mut registry = registry_in(dir.path());
    registry
        .register(Some(&source), "Alice", [0.0, 0.0])
        .expect("alice");
    write_source(registry.project_dir(), "hero.png", 300, 200);
    write_source(registry.project_dir(), "Alice.png", 100, 100);

    let found = CharacterRegistry::discover(registry.project_dir(), PortraitSpec::default())
        .expect("discover");
    assert_eq!(found.names().collect::<Vec<_>>(), vec!["Alice"]);
    assert_eq!(found.image_name("Alice").as_deref(), Some("Alice.jpg"));
}

#[test]
fn discover_skips_portraits_of_the_wrong_size() {
    let dir = tempfile::tempdir().expect("tempdir");
    let project = dir.path().join("script_project");
    std::fs::create_dir_all(&project).expect("project dir");
    write_source(&project, "Wide.jpg", 300, 200);
    write_source(&project, "Square.jpg", 100, 100);

    let found = CharacterRegistry::discover(&project, PortraitSpec::default()).expect("discover");
    assert_eq!(found.names().collect::<Vec<_>>(), vec!["Square"]);
}

#[test]
fn discover_on_missing_dir_is_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let found = CharacterRegistry::discover(dir.path().join("absent"), PortraitSpec::default())
        .expect("discover");
    assert!(found.is_empty());
}

#[test]
fn portrait_for_image_rejects_paths() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = write_source(dir.path(), "face.png", 120, 120);
    let mut registry = registry_in(dir.path());
    registry
        .register(Some(&source), "Amy", [0.0, 0.0])
        .expect("amy");

    assert!(registry.portrait_for_image("Amy.jpg").is_some());
    assert!(registry.portrait_for_image("../face.png").is_none());
    assert!(registry.portrait_for_image("Missing.jpg").is_none());
}
