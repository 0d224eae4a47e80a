//! Configuration module.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, load_config_file,
    load_config_with_precedence, merge_config, ConfigError, ConfigFile, ResolvedConfig,
};

/// Runtime options of the alignment engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Two views next to each other; `false` renders one combined inline view.
    pub render_side_by_side: bool,
    /// In inline mode, draw hunks made only of single-line edits as decorations.
    pub use_true_inline_diff_rendering: bool,
    /// Offer a revert affordance next to pure deletions.
    pub render_margin_revert_icon: bool,
    /// How long a vanished moved-block padding stays before it is removed.
    pub top_padding_reset_delay_ms: u64,
    /// Length of scroll-offset animations.
    pub scroll_animation_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_side_by_side: true,
            use_true_inline_diff_rendering: false,
            render_margin_revert_icon: true,
            top_padding_reset_delay_ms: 400,
            scroll_animation_ms: 300,
        }
    }
}
