//! Process setup.

/// Installs the logger and loads the process-wide settings.
///
/// Safe to call more than once; later calls only re-log the settings state.
///
/// # Example
///
/// ```no_run
/// gem::init();
/// let font = gem::settings::get("font.face");
/// println!("{font:?}");
/// ```
pub fn init() {
    // a host may have installed its own logger already
    let _ = env_logger::try_init();
    let keys = gem_core::settings::with_settings(gem_core::Settings::len);
    log::info!("gem-rs initialized ({keys} settings)");
}

/// Returns whether the process-wide settings have been loaded.
#[must_use]
pub fn is_initialized() -> bool {
    gem_core::settings::is_initialized()
}
