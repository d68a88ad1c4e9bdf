//! Named frame stores driven through a patch.

use gem::*;

fn patch() -> Patch {
    Patch::new(Settings::defaults(), StoreRegistry::new())
}

fn f(v: f32) -> Atom {
    Atom::Float(v)
}

fn red() -> PixelImage {
    PixelImage::from_raw(2, 2, PixelFormat::Rgba, [255, 0, 0, 255].repeat(4)).unwrap()
}

#[test]
fn write_then_read_across_frames() {
    let mut patch = patch();
    let store = patch.create("pix_buffer", &["clips".into(), f(4.0)]).unwrap();
    let writer = patch.create("pix_buffer_write", &["clips".into()]).unwrap();
    assert_eq!(patch.send(&store, "bang", &[]).unwrap(), Some(4.0));

    let host = NodeId::next();
    patch.send(&writer, "frame", &[f(2.0)]).unwrap();
    patch.render_with(|s| s.set_pix(host, Some(red())));
    let stored = patch
        .registry()
        .with_store("clips", |s| s.get(2).cloned())
        .unwrap();
    assert_eq!(stored, Some(red()));

    // one write per arming
    patch.render_with(|s| s.set_pix(host, None));
    assert_eq!(
        patch.registry().with_store("clips", |s| s.occupied()).unwrap(),
        1
    );

    assert!(patch.remove(&writer));
    let reader = patch.create("pix_buffer_read", &["clips".into()]).unwrap();
    patch.send(&reader, "frame", &[f(2.0)]).unwrap();
    assert_eq!(patch.render().pix(), Some(&red()));

    patch.send(&reader, "frame", &[f(3.0)]).unwrap();
    assert_eq!(patch.render().pix(), None);
}

#[test]
fn duplicate_names_are_rejected() {
    let mut patch = patch();
    patch.create("pix_buffer", &["twice".into()]).unwrap();
    let err = patch.create("pix_depot", &["twice".into()]).unwrap_err();
    assert!(matches!(err, Error::Store(PixError::BindingConflict(name)) if name == "twice"));
}

#[test]
fn removing_the_owner_frees_the_name() {
    let mut patch = patch();
    let store = patch.create("pix_buffer", &["short".into()]).unwrap();
    assert!(patch.registry().lookup("short").is_some());
    assert!(patch.remove(&store));
    assert!(patch.registry().lookup("short").is_none());
    patch.create("pix_buffer", &["short".into()]).unwrap();
}

#[test]
fn unnamed_stores_get_generated_names() {
    let mut patch = patch();
    let Handle::Store(name) = patch.create("pix_buffer", &[]).unwrap() else {
        panic!("expected a store handle");
    };
    assert!(name.starts_with("pix_buffer_"));
    assert_eq!(patch.registry().names(), vec![name]);
}

#[test]
fn allocate_fills_every_slot() {
    let mut patch = patch();
    let store = patch.create("pix_buffer", &["blank".into(), f(3.0)]).unwrap();
    patch
        .send(&store, "allocate", &[f(8.0), f(4.0), f(1.0)])
        .unwrap();
    let formats = patch
        .registry()
        .with_store("blank", |s| {
            (0..3)
                .filter_map(|i| s.get(i).map(|img| (img.width(), img.height(), img.format())))
                .collect::<Vec<_>>()
        })
        .unwrap();
    assert_eq!(formats, vec![(8, 4, PixelFormat::Luminance); 3]);

    let err = patch.send(&store, "allocate", &[f(0.0), f(4.0)]).unwrap_err();
    assert!(matches!(err, Error::Store(PixError::InvalidGeometry(_))));

    let err = patch
        .send(&store, "allocate", &[f(1e9), f(1e9), f(4.0)])
        .unwrap_err();
    assert!(matches!(err, Error::Store(PixError::InvalidGeometry(_))));
    assert_eq!(patch.registry().with_store("blank", |s| s.occupied()).unwrap(), 3);
}

#[test]
fn save_and_open_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("frame.png");
    let file_atom: Atom = Atom::symbol(file.to_string_lossy());

    let mut patch = patch();
    let store = patch.create("pix_buffer", &["disk".into(), f(2.0)]).unwrap();
    let writer = patch.create("pix_buffer_write", &["disk".into()]).unwrap();
    patch.send(&writer, "frame", &[f(0.0)]).unwrap();
    let host = NodeId::next();
    patch.render_with(|s| s.set_pix(host, Some(red())));

    patch
        .send(&store, "save", &[file_atom.clone(), f(0.0)])
        .unwrap();
    assert!(file.exists());

    patch.send(&store, "open", &[file_atom, f(1.0)]).unwrap();
    let loaded = patch
        .registry()
        .with_store("disk", |s| s.get(1).cloned())
        .unwrap()
        .unwrap();
    assert_eq!((loaded.width(), loaded.height()), (2, 2));
    assert_eq!(loaded.pixel(0, 0), Some(&[255, 0, 0, 255][..]));
}

#[test]
fn save_failures_are_distinct() {
    let dir = tempfile::tempdir().unwrap();
    let file: Atom = Atom::symbol(dir.path().join("x.png").to_string_lossy());
    let mut patch = patch();
    let store = patch.create("pix_buffer", &["errs".into(), f(2.0)]).unwrap();

    let err = patch.send(&store, "save", &[]).unwrap_err();
    assert!(matches!(err, Error::Store(PixError::NoFilename)));

    let err = patch.send(&store, "save", &[file.clone(), f(1.0)]).unwrap_err();
    assert!(matches!(err, Error::Store(PixError::SlotEmpty { index: 1, .. })));

    let err = patch.send(&store, "open", &[file, f(5.0)]).unwrap_err();
    assert!(matches!(err, Error::Store(PixError::IndexOutOfRange { index: 5, capacity: 2 })));
}

#[test]
fn open_rejects_non_images() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.png");
    std::fs::write(&path, b"not an image").unwrap();

    let mut patch = patch();
    let store = patch.create("pix_buffer", &["bad".into()]).unwrap();
    let err = patch
        .send(&store, "open", &[Atom::symbol(path.to_string_lossy()), f(0.0)])
        .unwrap_err();
    assert!(matches!(err, Error::Store(PixError::Decode { .. })));
    assert_eq!(patch.registry().with_store("bad", |s| s.occupied()).unwrap(), 0);
}

#[test]
fn write_to_unknown_store_is_harmless() {
    let mut patch = patch();
    let writer = patch.create("pix_buffer_write", &["nowhere".into()]).unwrap();
    patch.send(&writer, "frame", &[f(0.0)]).unwrap();
    let host = NodeId::next();
    let state = patch.render_with(|s| s.set_pix(host, Some(red())));
    assert_eq!(state.pix(), Some(&red()));
}
