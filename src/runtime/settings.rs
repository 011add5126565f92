use crate::cli::Args;
use crate::config;

pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("albumdeck: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("albumdeck: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}

/// Command-line flags win over the config file.
pub fn apply_args(settings: &mut config::Settings, args: &Args) {
    if let Some(folder) = args.folder.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
        settings.library.default_folder = Some(folder.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_flag_overrides_default_folder() {
        let mut settings = config::Settings::default();
        settings.library.default_folder = Some("from-config".into());

        apply_args(&mut settings, &Args::default());
        assert_eq!(settings.library.default_folder.as_deref(), Some("from-config"));

        let args = Args {
            folder: Some("ncs".into()),
            ..Args::default()
        };
        apply_args(&mut settings, &args);
        assert_eq!(settings.library.default_folder.as_deref(), Some("ncs"));
    }
}
