use nannou::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use super::layout::Layout;
use crate::controller::Button;
use crate::grid::{Grid, ImageId, ImagePools};

/// One texture per pool entry, loaded once. Missing files stay absent and
/// are drawn as flat colour.
pub struct ImageLibrary {
    textures: HashMap<ImageId, wgpu::Texture>,
}

impl ImageLibrary {
    pub fn load(app: &App, dir: &Path, pools: &ImagePools) -> Self {
        let mut textures = HashMap::new();
        for id in pools.ids() {
            let Some(name) = pools.name(id) else { continue };
            let path = dir.join(name);
            match wgpu::Texture::from_path(app, &path) {
                Ok(texture) => {
                    debug!(path = %path.display(), "loaded cell image");
                    textures.insert(id, texture);
                }
                Err(e) => warn!(
                    "Could not load cell image {}: {e}; using a flat colour",
                    path.display()
                ),
            }
        }
        Self { textures }
    }

    pub fn get(&self, id: ImageId) -> Option<&wgpu::Texture> {
        self.textures.get(&id)
    }
}

pub struct GridView {
    pub images: ImageLibrary,
    pub gap: f32,
    pub dim_alpha: f32,
}

impl GridView {
    pub fn new(images: ImageLibrary) -> Self {
        Self {
            images,
            gap: 1.0,
            dim_alpha: 0.6,
        }
    }

    pub fn draw(&self, app: &App, frame: Frame, grid: &Grid, button: &Button, layout: &Layout) {
        let draw = app.draw();
        draw.background().color(BLACK);

        // 1. cells
        for (row, col, cell) in grid.iter() {
            let r = layout.cell_rect(row, col);
            let (w, h) = ((r.w() - self.gap).max(0.0), (r.h() - self.gap).max(0.0));
            let view = cell.view();

            match self.images.get(view.image) {
                Some(texture) => {
                    draw.texture(texture).xy(r.xy()).w_h(w, h);
                }
                None => {
                    draw.rect().xy(r.xy()).w_h(w, h).color(fallback_color(view.image));
                }
            }

            // dimmed look for cells that are off
            if view.dimmed {
                draw.rect()
                    .xy(r.xy())
                    .w_h(w, h)
                    .color(srgba(0.0, 0.0, 0.0, self.dim_alpha));
            }
        }

        // 2. play/stop button
        let b = layout.button_rect();
        let (fill, text) = if button.enabled {
            (srgb(0.22, 0.22, 0.26), srgb(1.0, 1.0, 1.0))
        } else {
            (srgb(0.12, 0.12, 0.12), srgb(0.5, 0.5, 0.5))
        };
        draw.rect().xy(b.xy()).wh(b.wh()).color(fill);
        draw.text(button.label)
            .xy(b.xy())
            .wh(b.wh())
            .font_size(18)
            .color(text);

        if let Err(e) = draw.to_frame(app, &frame) {
            warn!("Failed to draw frame: {e:?}");
        }
    }
}

/// Stand-in colour per image id: greys for unlit, warm tones for lit.
pub fn fallback_color(id: ImageId) -> Srgb<f32> {
    const UNLIT: [(f32, f32, f32); 2] = [(0.30, 0.30, 0.32), (0.24, 0.25, 0.28)];
    const LIT: [(f32, f32, f32); 4] = [
        (1.00, 0.78, 0.25),
        (1.00, 0.55, 0.15),
        (0.98, 0.90, 0.45),
        (0.95, 0.40, 0.20),
    ];
    let (r, g, b) = match id {
        ImageId::Inactive(i) => UNLIT[i % UNLIT.len()],
        ImageId::Active(i) => LIT[i % LIT.len()],
    };
    srgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lit_fallbacks_are_brighter_than_unlit() {
        let luma = |c: Srgb<f32>| 0.2126 * c.red + 0.7152 * c.green + 0.0722 * c.blue;
        for off in 0..2 {
            for on in 0..4 {
                assert!(
                    luma(fallback_color(ImageId::Active(on)))
                        > luma(fallback_color(ImageId::Inactive(off)))
                );
            }
        }
    }

    #[test]
    fn fallbacks_wrap_for_larger_pools() {
        assert_eq!(fallback_color(ImageId::Active(5)), fallback_color(ImageId::Active(1)));
    }
}
