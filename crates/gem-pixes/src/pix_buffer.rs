//! The `pix_buffer` owner object and the nodes that address it by name.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use gem_core::node::{expect_args, float_arg, symbol_arg};
use gem_core::{
    truncate_i32, Arity, Atom, GemError, Modified, NodeId, PixelFormat, RenderState, StatefulNode,
};

use crate::error::{PixError, PixResult};
use crate::frame_store::FrameStore;
use crate::registry::{lock, StoreId, StoreRegistry};

/// Owns a frame store and its name binding.
///
/// Dropping the owner releases the binding.
pub struct PixBuffer {
    registry: StoreRegistry,
    id: StoreId,
    name: String,
    base_dir: Option<PathBuf>,
}

impl PixBuffer {
    /// Host-visible class name.
    pub const CLASS: &'static str = "pix_buffer";
    /// Alternative class name accepted by the factory.
    pub const ALIAS: &'static str = "pix_depot";
    /// Constructor arity: `[name] [capacity]`.
    pub const ARITY: Arity = Arity::up_to(2);

    /// Creates a store named `name` with `capacity` slots.
    pub fn new(registry: &StoreRegistry, name: Option<&str>, capacity: i64) -> PixResult<Self> {
        let id = registry.create(name, capacity)?;
        let name = registry.name_of(id).unwrap_or_default();
        Ok(Self {
            registry: registry.clone(),
            id,
            name,
            base_dir: None,
        })
    }

    /// Creates a store from constructor arguments.
    ///
    /// The capacity defaults to 100 frames.
    pub fn from_args(registry: &StoreRegistry, args: &[Atom]) -> PixResult<Self> {
        Self::ARITY.check(Self::CLASS, args)?;
        let name = match args.first() {
            None => None,
            Some(Atom::Symbol(s)) => Some(s.as_str()),
            Some(Atom::Float(_)) => {
                return Err(
                    GemError::invalid_argument(Self::CLASS, "name", "expected a symbol").into(),
                );
            }
        };
        let capacity = float_arg(Self::CLASS, "capacity", args, 1, 100.0)?;
        Self::new(registry, name, i64::from(truncate_i32(capacity)))
    }

    /// Sets the directory relative file names are resolved against.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Returns the bound name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the store's id.
    #[must_use]
    pub fn id(&self) -> StoreId {
        self.id
    }

    fn with_store<R>(&self, f: impl FnOnce(&mut FrameStore) -> R) -> PixResult<R> {
        let store = self
            .registry
            .resolve(self.id)
            .ok_or_else(|| PixError::UnknownStore(self.name.clone()))?;
        let mut guard = lock(&store);
        Ok(f(&mut guard))
    }

    fn resolve_path(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Returns the capacity.
    pub fn count(&self) -> PixResult<usize> {
        self.with_store(|s| s.count())
    }

    /// Reallocates every slot to `width` x `height` x `channels`.
    ///
    /// Zero channels means four.
    pub fn allocate(&self, width: i32, height: i32, channels: i32) -> PixResult<()> {
        if width < 1 || height < 1 || channels < 0 {
            return Err(PixError::InvalidGeometry(format!(
                "{width}x{height}x{channels}"
            )));
        }
        let channels = if channels == 0 { 4 } else { channels };
        let format = u8::try_from(channels)
            .ok()
            .and_then(PixelFormat::from_channels)
            .ok_or_else(|| PixError::InvalidGeometry(format!("{channels} channels")))?;
        // both are >= 1 here
        let (width, height) = (width.unsigned_abs(), height.unsigned_abs());
        self.with_store(|s| s.reallocate(width, height, format))?
    }

    /// Loads an image file into slot `index`.
    pub fn open(&self, file: &str, index: i64) -> PixResult<()> {
        let path = self.resolve_path(file);
        self.with_store(|s| s.load(&path, index))?
    }

    /// Saves slot `index` to an image file.
    pub fn save(&self, file: Option<&str>, index: i64) -> PixResult<()> {
        let path = file.filter(|f| !f.is_empty()).map(|f| self.resolve_path(f));
        self.with_store(|s| s.save(path.as_deref(), index))?
    }

    /// Handles a control message.
    ///
    /// `bang` answers with the capacity; other messages answer nothing.
    /// Failures are logged and returned; the store is unchanged.
    pub fn message(&self, selector: &str, args: &[Atom]) -> PixResult<Option<f32>> {
        let result = self.dispatch(selector, args);
        if let Err(e) = &result {
            log::warn!("{}: {e}", Self::CLASS);
        }
        result
    }

    #[allow(clippy::cast_precision_loss)]
    fn dispatch(&self, selector: &str, args: &[Atom]) -> PixResult<Option<f32>> {
        let class = Self::CLASS;
        match selector {
            "bang" => {
                expect_args(class, selector, args, 0, 0)?;
                Ok(Some(self.count()? as f32))
            }
            "allocate" => {
                expect_args(class, selector, args, 0, 3)?;
                let x = float_arg(class, "width", args, 0, 0.0)?;
                let y = float_arg(class, "height", args, 1, 0.0)?;
                let c = float_arg(class, "channels", args, 2, 0.0)?;
                self.allocate(truncate_i32(x), truncate_i32(y), truncate_i32(c))?;
                Ok(None)
            }
            "open" => {
                expect_args(class, selector, args, 2, 2)?;
                let file = symbol_arg(class, "filename", args, 0)?;
                let index = float_arg(class, "index", args, 1, 0.0)?;
                self.open(file, i64::from(truncate_i32(index)))?;
                Ok(None)
            }
            "save" => {
                expect_args(class, selector, args, 0, 2)?;
                let file = args.first().and_then(Atom::as_symbol);
                let index = float_arg(class, "index", args, 1, 0.0)?;
                self.save(file, i64::from(truncate_i32(index)))?;
                Ok(None)
            }
            _ => Err(GemError::unknown_selector(class, selector).into()),
        }
    }
}

impl Drop for PixBuffer {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

fn store_name_arg(class: &'static str, args: &[Atom]) -> gem_core::Result<Option<String>> {
    match args.first() {
        None => Ok(None),
        Some(_) => symbol_arg(class, "name", args, 0).map(|s| Some(s.to_string())),
    }
}

fn frame_arg(class: &'static str, args: &[Atom]) -> gem_core::Result<i64> {
    expect_args(class, "frame", args, 1, 1)?;
    let index = float_arg(class, "index", args, 0, 0.0)?;
    Ok(i64::from(truncate_i32(index)))
}

const UNARMED: i64 = i64::MIN;

/// Writes the current pixel block into a named store.
///
/// Each `frame <index>` message arms exactly one write, performed on the next
/// traversal.
pub struct PixBufferWrite {
    id: NodeId,
    modified: Modified,
    registry: StoreRegistry,
    store: Option<String>,
    armed: AtomicI64,
}

impl PixBufferWrite {
    /// Host-visible class name.
    pub const CLASS: &'static str = "pix_buffer_write";
    /// Constructor arity: `[name]`.
    pub const ARITY: Arity = Arity::up_to(1);

    /// Creates a writer, optionally bound to a store name.
    pub fn new(registry: &StoreRegistry, args: &[Atom]) -> gem_core::Result<Self> {
        Self::ARITY.check(Self::CLASS, args)?;
        Ok(Self {
            id: NodeId::next(),
            modified: Modified::new(),
            registry: registry.clone(),
            store: store_name_arg(Self::CLASS, args)?,
            armed: AtomicI64::new(UNARMED),
        })
    }

    /// Returns the store name written to.
    #[must_use]
    pub fn store_name(&self) -> Option<&str> {
        self.store.as_deref()
    }

    /// Returns the index of the pending write.
    #[must_use]
    pub fn pending(&self) -> Option<i64> {
        Some(self.armed.load(Ordering::Acquire)).filter(|&i| i != UNARMED)
    }
}

impl StatefulNode for PixBufferWrite {
    fn id(&self) -> NodeId {
        self.id
    }

    fn class_name(&self) -> &'static str {
        Self::CLASS
    }

    fn arity(&self) -> Arity {
        Self::ARITY
    }

    fn update(&mut self, selector: &str, args: &[Atom]) -> gem_core::Result<()> {
        match selector {
            "set" => {
                expect_args(Self::CLASS, selector, args, 1, 1)?;
                self.store = store_name_arg(Self::CLASS, args)?;
            }
            "frame" => {
                let index = frame_arg(Self::CLASS, args)?;
                self.armed.store(index, Ordering::Release);
            }
            _ => return Err(GemError::unknown_selector(Self::CLASS, selector)),
        }
        self.modified.mark();
        Ok(())
    }

    fn apply(&self, state: &mut RenderState) {
        let index = self.armed.swap(UNARMED, Ordering::AcqRel);
        if index == UNARMED {
            return;
        }
        let Some(name) = &self.store else {
            log::warn!("{}: no store set", Self::CLASS);
            return;
        };
        let result = self
            .registry
            .with_store(name, |s| s.put(index, state.pix()))
            .and_then(|r| r);
        if let Err(e) = result {
            log::warn!("{}: '{name}': {e}", Self::CLASS);
        }
    }

    fn is_modified(&self) -> bool {
        self.modified.is_set()
    }

    fn take_modified(&mut self) -> bool {
        self.modified.take()
    }

    fn is_volatile(&self) -> bool {
        true
    }
}

/// Copies a slot of a named store into the current pixel block.
pub struct PixBufferRead {
    id: NodeId,
    modified: Modified,
    registry: StoreRegistry,
    store: Option<String>,
    frame: i64,
}

impl PixBufferRead {
    /// Host-visible class name.
    pub const CLASS: &'static str = "pix_buffer_read";
    /// Constructor arity: `[name]`.
    pub const ARITY: Arity = Arity::up_to(1);

    /// Creates a reader, optionally bound to a store name.
    pub fn new(registry: &StoreRegistry, args: &[Atom]) -> gem_core::Result<Self> {
        Self::ARITY.check(Self::CLASS, args)?;
        Ok(Self {
            id: NodeId::next(),
            modified: Modified::new(),
            registry: registry.clone(),
            store: store_name_arg(Self::CLASS, args)?,
            frame: 0,
        })
    }

    /// Returns the store name read from.
    #[must_use]
    pub fn store_name(&self) -> Option<&str> {
        self.store.as_deref()
    }

    /// Returns the selected frame index.
    #[must_use]
    pub fn frame(&self) -> i64 {
        self.frame
    }
}

impl StatefulNode for PixBufferRead {
    fn id(&self) -> NodeId {
        self.id
    }

    fn class_name(&self) -> &'static str {
        Self::CLASS
    }

    fn arity(&self) -> Arity {
        Self::ARITY
    }

    fn update(&mut self, selector: &str, args: &[Atom]) -> gem_core::Result<()> {
        match selector {
            "set" => {
                expect_args(Self::CLASS, selector, args, 1, 1)?;
                self.store = store_name_arg(Self::CLASS, args)?;
            }
            "frame" => self.frame = frame_arg(Self::CLASS, args)?,
            _ => return Err(GemError::unknown_selector(Self::CLASS, selector)),
        }
        self.modified.mark();
        Ok(())
    }

    fn apply(&self, state: &mut RenderState) {
        let Some(name) = &self.store else {
            return;
        };
        let image = self
            .registry
            .with_store(name, |s| s.try_get(self.frame).cloned())
            .and_then(|r| r);
        match image {
            Ok(image) => state.set_pix(self.id, Some(image)),
            Err(e @ (PixError::IndexOutOfRange { .. } | PixError::SlotEmpty { .. })) => {
                log::debug!("{}: '{name}': {e}", Self::CLASS);
                state.set_pix(self.id, None);
            }
            Err(e) => {
                log::warn!("{}: {e}", Self::CLASS);
                state.set_pix(self.id, None);
            }
        }
    }

    fn is_modified(&self) -> bool {
        self.modified.is_set()
    }

    fn take_modified(&mut self) -> bool {
        self.modified.take()
    }

    fn is_volatile(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gem_core::{PixelImage, StateCategory};

    fn rgba(fill: u8) -> PixelImage {
        PixelImage::from_raw(2, 1, PixelFormat::Rgba, vec![fill; 8]).unwrap()
    }

    fn f(v: f32) -> Atom {
        Atom::Float(v)
    }

    #[test]
    fn owner_binds_and_releases() {
        let registry = StoreRegistry::new();
        {
            let buffer = PixBuffer::from_args(&registry, &["depot".into(), f(5.0)]).unwrap();
            assert_eq!(buffer.name(), "depot");
            assert_eq!(buffer.message("bang", &[]).unwrap(), Some(5.0));
            assert!(registry.lookup("depot").is_some());
        }
        assert!(registry.lookup("depot").is_none());
    }

    #[test]
    fn owner_defaults() {
        let registry = StoreRegistry::new();
        let buffer = PixBuffer::from_args(&registry, &[]).unwrap();
        assert!(buffer.name().starts_with("pix_buffer_"));
        assert_eq!(buffer.count().unwrap(), 100);
    }

    #[test]
    fn owner_rejects_bad_construction() {
        let registry = StoreRegistry::new();
        assert!(matches!(
            PixBuffer::from_args(&registry, &["a".into(), f(1.0), f(2.0)]),
            Err(PixError::Message(GemError::InvalidConfiguration { .. }))
        ));
        let _first = PixBuffer::new(&registry, Some("taken"), 1).unwrap();
        assert!(matches!(
            PixBuffer::new(&registry, Some("taken"), 1),
            Err(PixError::BindingConflict(_))
        ));
    }

    #[test]
    fn allocate_validation() {
        let registry = StoreRegistry::new();
        let buffer = PixBuffer::new(&registry, Some("alloc"), 2).unwrap();

        assert!(matches!(
            buffer.message("allocate", &[f(0.0), f(4.0)]),
            Err(PixError::InvalidGeometry(_))
        ));
        assert!(matches!(
            buffer.message("allocate", &[f(4.0), f(4.0), f(-1.0)]),
            Err(PixError::InvalidGeometry(_))
        ));
        assert!(matches!(
            buffer.message("allocate", &[f(4.0), f(4.0), f(5.0)]),
            Err(PixError::InvalidGeometry(_))
        ));
        assert_eq!(registry.with_store("alloc", |s| s.occupied()).unwrap(), 0);

        buffer.message("allocate", &[f(4.0), f(3.0)]).unwrap();
        let img = registry
            .with_store("alloc", |s| s.get(1).cloned())
            .unwrap()
            .unwrap();
        assert_eq!((img.width(), img.height(), img.channels()), (4, 3, 4));

        buffer.allocate(2, 2, 1).unwrap();
        let img = registry
            .with_store("alloc", |s| s.get(0).cloned())
            .unwrap()
            .unwrap();
        assert_eq!(img.format(), PixelFormat::Luminance);
    }

    #[test]
    fn allocate_beyond_memory_is_an_error() {
        let registry = StoreRegistry::new();
        let buffer = PixBuffer::new(&registry, Some("huge"), 2).unwrap();
        buffer.allocate(2, 2, 1).unwrap();

        assert!(matches!(
            buffer.message("allocate", &[f(1e9), f(1e9), f(4.0)]),
            Err(PixError::InvalidGeometry(_))
        ));
        let img = registry
            .with_store("huge", |s| s.get(1).cloned())
            .unwrap()
            .unwrap();
        assert_eq!((img.width(), img.height(), img.channels()), (2, 2, 1));
    }

    #[test]
    fn save_and_open_relative_to_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let registry = StoreRegistry::new();
        let buffer = PixBuffer::new(&registry, Some("files"), 2)
            .unwrap()
            .with_base_dir(dir.path());
        registry
            .with_store("files", |s| s.put(0, Some(&rgba(50))))
            .unwrap()
            .unwrap();

        buffer.message("save", &["shot.png".into(), f(0.0)]).unwrap();
        assert!(dir.path().join("shot.png").exists());

        buffer.message("open", &["shot.png".into(), f(1.0)]).unwrap();
        let back = registry
            .with_store("files", |s| s.get(1).cloned())
            .unwrap();
        assert_eq!(back, Some(rgba(50)));
    }

    #[test]
    fn save_reports_missing_filename_and_empty_slot() {
        let dir = tempfile::tempdir().unwrap();
        let registry = StoreRegistry::new();
        let buffer = PixBuffer::new(&registry, Some("s"), 1)
            .unwrap()
            .with_base_dir(dir.path());

        assert!(matches!(buffer.message("save", &[]), Err(PixError::NoFilename)));
        assert!(matches!(
            buffer.message("save", &["x.png".into(), f(0.0)]),
            Err(PixError::SlotEmpty { .. })
        ));
        assert!(!dir.path().join("x.png").exists());
    }

    #[test]
    fn unknown_owner_message() {
        let registry = StoreRegistry::new();
        let buffer = PixBuffer::new(&registry, Some("m"), 1).unwrap();
        assert!(matches!(
            buffer.message("frobnicate", &[]),
            Err(PixError::Message(GemError::UnknownSelector { .. }))
        ));
    }

    #[test]
    fn write_is_armed_once() {
        let registry = StoreRegistry::new();
        let _buffer = PixBuffer::new(&registry, Some("w"), 3).unwrap();
        let mut writer = PixBufferWrite::new(&registry, &["w".into()]).unwrap();

        let mut state = RenderState::new();
        state.set_pix(NodeId::next(), Some(rgba(9)));

        writer.apply(&mut state);
        assert_eq!(registry.with_store("w", |s| s.occupied()).unwrap(), 0);

        writer.update("frame", &[f(2.0)]).unwrap();
        assert_eq!(writer.pending(), Some(2));
        writer.apply(&mut state);
        assert_eq!(writer.pending(), None);
        assert_eq!(
            registry.with_store("w", |s| s.get(2).cloned()).unwrap(),
            Some(rgba(9))
        );

        state.set_pix(NodeId::next(), Some(rgba(1)));
        writer.apply(&mut state);
        assert_eq!(
            registry.with_store("w", |s| s.get(2).cloned()).unwrap(),
            Some(rgba(9))
        );
    }

    #[test]
    fn write_out_of_range_leaves_store_alone() {
        let registry = StoreRegistry::new();
        let _buffer = PixBuffer::new(&registry, Some("w2"), 1).unwrap();
        let mut writer = PixBufferWrite::new(&registry, &["w2".into()]).unwrap();
        let mut state = RenderState::new();
        state.set_pix(NodeId::next(), Some(rgba(9)));

        writer.update("frame", &[f(7.0)]).unwrap();
        writer.apply(&mut state);
        assert_eq!(registry.with_store("w2", |s| s.occupied()).unwrap(), 0);
    }

    #[test]
    fn read_copies_slot_into_state() {
        let registry = StoreRegistry::new();
        let _buffer = PixBuffer::new(&registry, Some("r"), 2).unwrap();
        registry
            .with_store("r", |s| s.put(1, Some(&rgba(33))))
            .unwrap()
            .unwrap();

        let mut reader = PixBufferRead::new(&registry, &[]).unwrap();
        reader.update("set", &["r".into()]).unwrap();
        reader.update("frame", &[f(1.0)]).unwrap();

        let mut state = RenderState::new();
        reader.apply(&mut state);
        assert_eq!(state.pix(), Some(&rgba(33)));
        assert_eq!(state.last_modifier(StateCategory::Pix), Some(reader.id()));

        reader.update("frame", &[f(0.0)]).unwrap();
        reader.apply(&mut state);
        assert!(state.pix().is_none());
    }

    #[test]
    fn nodes_reject_bad_messages() {
        let registry = StoreRegistry::new();
        let mut reader = PixBufferRead::new(&registry, &["r".into()]).unwrap();
        reader.take_modified();

        assert!(reader.update("frame", &["x".into()]).is_err());
        assert!(reader.update("frame", &[]).is_err());
        assert!(reader.update("set", &[f(1.0)]).is_err());
        assert!(reader.update("bogus", &[]).is_err());
        assert_eq!(reader.store_name(), Some("r"));
        assert!(!reader.is_modified());

        assert!(PixBufferWrite::new(&registry, &["a".into(), "b".into()]).is_err());
        assert!(PixBufferRead::new(&registry, &[f(3.0)]).is_err());
    }
}
