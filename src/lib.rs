// lib.rs — 全景查看器的平台无关部分（相机、状态机、纹理、网格、配置）

pub mod camera;
pub mod config;
pub mod i18n;
pub mod input;
pub mod landing;
pub mod mesh;
pub mod panorama;
pub mod texture;
pub mod view;
