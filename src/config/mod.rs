mod core;
mod loader;

pub use self::core::{
    default_history_limit, default_max_comments, default_parallel, default_sample_size,
    default_supported_platforms, AnalysisSettings, HistoryConfig, PlatformsConfig,
    SentimapConfig,
};

pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
