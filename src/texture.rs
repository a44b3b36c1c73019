// texture.rs — 全景纹理加载与预处理
//
// GPU 无关：这里只负责解码、缩放、补齐 2:1、生成 mip 链，
// 以及描述采样参数。renderer.rs 负责把结果映射到 wgpu。

use image::io::Reader as ImageReader;
use image::{imageops::FilterType, DynamicImage, GenericImageView, Rgba, RgbaImage};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;

// wgpu 的 anisotropy_clamp 上限
pub const MAX_ANISOTROPY: u16 = 16;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Open { path, .. } | LoadError::Decode { path, .. } => path,
        }
    }

    // (文件名, 目录)
    pub fn remediation(&self) -> (String, String) {
        let path = self.path();
        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let folder = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.display().to_string(),
            _ => ".".to_string(),
        };
        (file, folder)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Srgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    ClampToEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinFilter {
    Linear,
    LinearMipmapLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fidelity {
    Standard,
    Maximum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSettings {
    pub color_space: ColorSpace,
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
    pub min_filter: MinFilter,
    pub mipmaps: bool,
    pub anisotropy: u16,
}

impl TextureSettings {
    pub fn for_fidelity(fidelity: Fidelity, anisotropic: bool) -> Self {
        match fidelity {
            Fidelity::Standard => Self {
                color_space: ColorSpace::Srgb,
                wrap_u: WrapMode::Repeat,
                wrap_v: WrapMode::ClampToEdge,
                min_filter: MinFilter::Linear,
                mipmaps: false,
                anisotropy: 1,
            },
            Fidelity::Maximum => Self {
                color_space: ColorSpace::Srgb,
                wrap_u: WrapMode::Repeat,
                wrap_v: WrapMode::ClampToEdge,
                min_filter: MinFilter::LinearMipmapLinear,
                mipmaps: true,
                anisotropy: if anisotropic { MAX_ANISOTROPY } else { 1 },
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreparedTexture {
    pub levels: Vec<RgbaImage>,
    pub settings: TextureSettings,
}

impl PreparedTexture {
    pub fn dimensions(&self) -> (u32, u32) {
        self.levels.first().map(|l| l.dimensions()).unwrap_or((0, 0))
    }
}

pub fn decode(path: &Path) -> Result<RgbaImage, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decode_err = |source: image::ImageError| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?;
    reader.no_limits();
    let img = reader.decode().map_err(decode_err)?;

    let (w, h) = img.dimensions();
    log::info!("decoded {} ({}x{})", path.display(), w, h);
    Ok(img.to_rgba8())
}

// 后台线程解码 + 预处理（缩放、补齐、mip），结果通过通道发回主循环
pub fn spawn_load(
    path: PathBuf,
    settings: TextureSettings,
    max_dimension: u32,
    tx: Sender<Result<PreparedTexture, LoadError>>,
) {
    thread::spawn(move || {
        log::info!("loading panorama in background: {}", path.display());
        let result = decode(&path).map(|img| prepare(img, settings, max_dimension));
        if let Err(e) = &result {
            log::error!("{e}");
        }
        if tx.send(result).is_err() {
            log::warn!("viewer closed before {} finished loading", path.display());
        }
    });
}

pub fn prepare(img: RgbaImage, settings: TextureSettings, max_dimension: u32) -> PreparedTexture {
    let img = fit_to_limit(img, max_dimension);
    let img = pad_to_equirect(img);

    let levels = if settings.mipmaps {
        mip_chain(img)
    } else {
        vec![img]
    };

    PreparedTexture { levels, settings }
}

fn fit_to_limit(img: RgbaImage, max_dimension: u32) -> RgbaImage {
    let (src_w, src_h) = img.dimensions();
    if max_dimension == 0 || (src_w <= max_dimension && src_h <= max_dimension) {
        return img;
    }

    let scale = max_dimension as f32 / src_w.max(src_h) as f32;
    let new_w = ((src_w as f32 * scale) as u32).clamp(1, max_dimension);
    let new_h = ((src_h as f32 * scale) as u32).clamp(1, max_dimension);
    log::warn!(
        "panorama {}x{} exceeds GPU limit {}, scaled to {}x{}",
        src_w,
        src_h,
        max_dimension,
        new_w,
        new_h
    );
    DynamicImage::ImageRgba8(img)
        .resize_exact(new_w, new_h, FilterType::Lanczos3)
        .to_rgba8()
}

// 高度不足 2:1 时在顶部补黑，原图贴底
fn pad_to_equirect(img: RgbaImage) -> RgbaImage {
    let (w, h) = img.dimensions();
    let target_h = w / 2;
    if target_h == 0 || h >= target_h {
        return img;
    }

    let mut canvas = RgbaImage::from_pixel(w, target_h, Rgba([0, 0, 0, 255]));
    image::imageops::replace(&mut canvas, &img, 0, i64::from(target_h - h));
    canvas
}

fn mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let mut levels = vec![base];
    loop {
        let Some(last) = levels.last() else { break };
        let (w, h) = last.dimensions();
        if w <= 1 && h <= 1 {
            break;
        }
        let next = image::imageops::resize(last, (w / 2).max(1), (h / 2).max(1), FilterType::Triangle);
        levels.push(next);
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_images_are_padded_at_the_top() {
        let img = RgbaImage::from_pixel(8, 2, Rgba([255, 255, 255, 255]));
        let out = pad_to_equirect(img);
        assert_eq!(out.dimensions(), (8, 4));
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(out.get_pixel(0, 3), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn mip_chain_halves_down_to_one_pixel() {
        let img = RgbaImage::new(16, 8);
        let prepared = prepare(img, TextureSettings::for_fidelity(Fidelity::Maximum, true), 8192);
        let dims: Vec<_> = prepared.levels.iter().map(|l| l.dimensions()).collect();
        assert_eq!(dims, vec![(16, 8), (8, 4), (4, 2), (2, 1), (1, 1)]);
    }

    #[test]
    fn oversized_images_fit_the_gpu_limit() {
        let img = RgbaImage::new(64, 32);
        let prepared = prepare(img, TextureSettings::for_fidelity(Fidelity::Standard, false), 16);
        assert_eq!(prepared.levels.len(), 1);
        assert_eq!(prepared.dimensions(), (16, 8));
    }

    #[test]
    fn fidelity_controls_filtering() {
        let std = TextureSettings::for_fidelity(Fidelity::Standard, true);
        assert_eq!(std.anisotropy, 1);
        assert!(!std.mipmaps);

        let max = TextureSettings::for_fidelity(Fidelity::Maximum, true);
        assert_eq!(max.anisotropy, MAX_ANISOTROPY);
        assert_eq!(max.min_filter, MinFilter::LinearMipmapLinear);
        assert_eq!(max.color_space, ColorSpace::Srgb);
        assert_eq!((max.wrap_u, max.wrap_v), (WrapMode::Repeat, WrapMode::ClampToEdge));

        let no_aniso = TextureSettings::for_fidelity(Fidelity::Maximum, false);
        assert_eq!(no_aniso.anisotropy, 1);
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("skyline-{}-{name}", std::process::id()))
    }

    #[test]
    fn undecodable_file_names_the_asset() {
        let path = scratch_path("garbage.jpg");
        std::fs::write(&path, b"this is not a jpeg at all").unwrap();

        let err = decode(&path).unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
        assert!(err.to_string().contains("garbage.jpg"));
        let (file, folder) = err.remediation();
        assert!(file.ends_with("garbage.jpg"));
        assert_eq!(PathBuf::from(folder), std::env::temp_dir());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn background_load_delivers_prepared_texture() {
        let path = scratch_path("pano.png");
        RgbaImage::from_pixel(32, 8, Rgba([10, 20, 30, 255])).save(&path).unwrap();

        let (tx, rx) = std::sync::mpsc::channel();
        let settings = TextureSettings::for_fidelity(Fidelity::Maximum, false);
        spawn_load(path.clone(), settings, 8192, tx);
        let prepared = rx
            .recv_timeout(std::time::Duration::from_secs(10))
            .unwrap()
            .unwrap();

        // 32x8 补齐到 32x16
        assert_eq!(prepared.dimensions(), (32, 16));
        assert_eq!(prepared.levels.len(), 6);
        assert_eq!(prepared.settings, settings);
        assert_eq!(prepared.levels[0].get_pixel(0, 15), &Rgba([10, 20, 30, 255]));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn background_load_reports_missing_file() {
        let (tx, rx) = std::sync::mpsc::channel();
        let settings = TextureSettings::for_fidelity(Fidelity::Standard, false);
        spawn_load(PathBuf::from("assets/no-such-panorama.jpg"), settings, 8192, tx);
        let err = rx
            .recv_timeout(std::time::Duration::from_secs(10))
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert_eq!(err.remediation().0, "no-such-panorama.jpg");
    }

    #[test]
    fn missing_file_names_the_asset() {
        let err = decode(Path::new("assets/definitely-missing.jpg")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(err.to_string().contains("definitely-missing.jpg"));
        let (file, folder) = err.remediation();
        assert_eq!(file, "definitely-missing.jpg");
        assert_eq!(folder, "assets");
    }
}
