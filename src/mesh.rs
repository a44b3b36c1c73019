// mesh.rs — 全景球网格生成
// 相机位于球心，纹理贴在内表面

use std::f32::consts::PI;

/// 等距柱状图的水平方向修正。两种方式等价，只能选其一。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seam {
    /// X 轴镜像 (scale -1, 1, 1)
    Mirror,
    /// 绕 Y 轴旋转 180°
    Rotate180,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Interleaved vertex data for upload.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.uvs)
            .map(|(&position, &uv)| Vertex { position, uv })
            .collect()
    }
}

pub fn build_sphere(radius: f32, width_segments: usize, height_segments: usize, seam: Seam) -> SphereMesh {
    let w = width_segments.max(3);
    let h = height_segments.max(2);

    let mut positions = Vec::with_capacity((h + 1) * (w + 1));
    let mut uvs = Vec::with_capacity((h + 1) * (w + 1));
    let mut indices = Vec::with_capacity(w * h * 6);

    for i in 0..=h {
        let v = i as f32 / h as f32;
        let theta = PI * v;
        let y = radius * theta.cos();
        let sin_t = theta.sin();

        for j in 0..=w {
            let u = j as f32 / w as f32;
            let phi = 2.0 * PI * u;

            let x = -radius * phi.cos() * sin_t;
            let z = radius * phi.sin() * sin_t;

            let (x, z) = match seam {
                Seam::Mirror => (-x, z),
                Seam::Rotate180 => (-x, -z),
            };

            positions.push([x, y, z]);
            // wgpu 纹理坐标 v=0 对应图像第一行（天空）
            uvs.push([u, v]);
        }
    }

    let stride = (w + 1) as u32;
    for i in 0..h as u32 {
        for j in 0..w as u32 {
            let a = i * stride + j;
            let b = a + stride;

            indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
        }
    }

    SphereMesh {
        positions,
        uvs,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn counts_follow_segments() {
        let mesh = build_sphere(500.0, 60, 40, Seam::Mirror);
        assert_eq!(mesh.positions.len(), 61 * 41);
        assert_eq!(mesh.uvs.len(), mesh.positions.len());
        assert_eq!(mesh.indices.len(), 60 * 40 * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.positions.len()));
    }

    #[test]
    fn every_vertex_sits_on_the_radius() {
        let mesh = build_sphere(500.0, 120, 60, Seam::Mirror);
        for p in &mesh.positions {
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert_relative_eq!(r, 500.0, epsilon = 1e-2);
        }
    }

    #[test]
    fn mirror_flips_x_only_and_rotate_flips_x_and_z() {
        let m = build_sphere(1.0, 8, 4, Seam::Mirror);
        let r = build_sphere(1.0, 8, 4, Seam::Rotate180);
        for (a, b) in m.positions.iter().zip(&r.positions) {
            assert_relative_eq!(a[0], b[0], epsilon = 1e-6);
            assert_relative_eq!(a[1], b[1], epsilon = 1e-6);
            assert_relative_eq!(a[2], -b[2], epsilon = 1e-6);
        }
    }

    #[test]
    fn top_row_maps_to_top_of_image() {
        let mesh = build_sphere(500.0, 60, 40, Seam::Mirror);
        assert_relative_eq!(mesh.positions[0][1], 500.0);
        assert_eq!(mesh.uvs[0][1], 0.0);
        assert_eq!(mesh.uvs.last().map(|uv| uv[1]), Some(1.0));
    }
}
