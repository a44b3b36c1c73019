// config.rs — 命令行 / 环境变量配置

use crate::panorama::Variant;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_IMAGE: &str = "assets/austin-panorama.jpg";

#[derive(Debug, Clone, Parser)]
#[command(name = "skyline_panorama", about = "360° skyline panorama viewer")]
pub struct Config {
    /// Equirectangular panorama to display.
    #[arg(long, default_value = DEFAULT_IMAGE)]
    pub image: PathBuf,

    /// Camera model: `orbit` (damped orbit, distance zoom) or `drag`
    /// (look-around, field-of-view zoom).
    #[arg(long, value_enum, default_value_t = Variant::Drag)]
    pub variant: Variant,

    /// Open straight into the viewer.
    #[arg(long)]
    pub no_landing: bool,

    /// Start in borderless fullscreen.
    #[arg(long)]
    pub fullscreen: bool,

    /// UI language code; strings load from assets/i18n/<lang>.json.
    #[arg(long, env = "SKYLINE_LANG", default_value = "en")]
    pub lang: String,
}

impl Config {
    pub fn show_landing(&self) -> bool {
        !self.no_landing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::try_parse_from(["skyline_panorama"]).unwrap();
        assert_eq!(cfg.image, PathBuf::from(DEFAULT_IMAGE));
        assert_eq!(cfg.variant, Variant::Drag);
        assert!(cfg.show_landing());
        assert!(!cfg.fullscreen);
    }

    #[test]
    fn flags() {
        let cfg = Config::try_parse_from([
            "skyline_panorama",
            "--image",
            "pano.png",
            "--variant",
            "orbit",
            "--no-landing",
            "--lang",
            "fr",
        ])
        .unwrap();
        assert_eq!(cfg.image, PathBuf::from("pano.png"));
        assert_eq!(cfg.variant, Variant::Orbit);
        assert!(!cfg.show_landing());
        assert_eq!(cfg.lang, "fr");
    }

    #[test]
    fn rejects_unknown_variant() {
        assert!(Config::try_parse_from(["skyline_panorama", "--variant", "fly"]).is_err());
    }
}
