use segue::config::Settings;

/// Load settings, falling back to defaults when the file or environment is
/// unusable. The returned note explains the fallback; it is logged by the
/// caller once the subscriber is installed.
pub fn load_settings() -> (Settings, Option<String>) {
    settle(Settings::load())
}

fn settle(loaded: Result<Settings, config::ConfigError>) -> (Settings, Option<String>) {
    match loaded {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(e) => (Settings::default(), Some(format!("invalid config, using defaults: {e}"))),
        },
        Err(e) => (
            Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}
