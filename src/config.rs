//! Manager-wide configuration: locale-dependent labels and sizing.

use crate::constants::{
    CONFIRM_DIALOG_WIDTH, CONTEXT_MENU_MIN_WIDTH, POPUP_WIDTH, PROMPT_DIALOG_WIDTH,
    VIEWPORT_MARGIN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Locale {
    #[default]
    English,
    Japanese,
}

/// Default texts used when the caller does not supply its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub popup_title: String,
    pub cancel: String,
    pub confirm: String,
    /// Confirm label of the prompt dialog.
    pub save: String,
    pub close_glyph: String,
}

impl Labels {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::English => Self {
                popup_title: "Plugin".to_string(),
                cancel: "Cancel".to_string(),
                confirm: "Confirm".to_string(),
                save: "Save".to_string(),
                close_glyph: "✕".to_string(),
            },
            Locale::Japanese => Self {
                popup_title: "プラグイン".to_string(),
                cancel: "キャンセル".to_string(),
                confirm: "確認".to_string(),
                save: "保存".to_string(),
                close_glyph: "✕".to_string(),
            },
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::for_locale(Locale::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    pub labels: Labels,
    pub margin: i32,
    pub popup_width: u16,
    pub confirm_width: u16,
    pub prompt_width: u16,
    pub menu_min_width: u16,
}

impl OverlayConfig {
    pub fn new(locale: Locale) -> Self {
        Self {
            labels: Labels::for_locale(locale),
            margin: VIEWPORT_MARGIN,
            popup_width: POPUP_WIDTH,
            confirm_width: CONFIRM_DIALOG_WIDTH,
            prompt_width: PROMPT_DIALOG_WIDTH,
            menu_min_width: CONTEXT_MENU_MIN_WIDTH,
        }
    }

    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_is_default() {
        let labels = Labels::default();
        assert_eq!(labels.cancel, "Cancel");
        assert_eq!(labels.confirm, "Confirm");
        assert_eq!(labels.save, "Save");
    }

    #[test]
    fn japanese_labels() {
        let labels = Labels::for_locale(Locale::Japanese);
        assert_eq!(labels.cancel, "キャンセル");
        assert_eq!(labels.popup_title, "プラグイン");
    }

    #[test]
    fn default_margin_is_ten() {
        assert_eq!(OverlayConfig::default().margin, 10);
    }
}
