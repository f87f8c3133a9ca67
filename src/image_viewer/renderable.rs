use glium::texture::RawImage2d;
use glium::texture::Texture2d;
use image::RgbaImage;

use crate::error::Result;

// Transformation that draws an image of `image` pixels at its native size, centred in a window
// of `window` pixels. The quad spans the whole window in clip space (-1..1), so each axis is
// scaled by the fraction of the window the image covers.
pub fn fit_matrix(image: (u32, u32), window: (u32, u32)) -> [[f32; 4]; 4] {
    let (sx, sy) = (
        image.0 as f32 / window.0.max(1) as f32,
        image.1 as f32 / window.1.max(1) as f32,
    );

    [
        [sx,  0.0, 0.0, 0.0],
        [0.0, sy,  0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0]
    ]
}

pub struct Renderable {
    size: (u32, u32),               // Image size in pixels

    img: Option<RgbaImage>,         // Decoded image, dropped once uploaded
    texture: Option<Texture2d>,     // Lazy loaded texture object from above
}

impl Renderable {
    pub fn from_image(img: RgbaImage) -> Self {
        Renderable {
            size: img.dimensions(),
            img: Some(img),
            texture: None,
        }
    }

    // Transformation Matrix for the window as it is right now. Fullscreen is applied by the
    // window system after creation, so this is worked out per frame rather than stored
    pub fn matrix(&self, window: (u32, u32)) -> [[f32; 4]; 4] {
        fit_matrix(self.size, window)
    }

    pub fn get_texture(&mut self, display: &glium::Display) -> Result<&Texture2d> {
        // We lazy load the texture, the first draw after a refresh does the upload
        if let Some(image) = self.img.take() {
            let image_dim = image.dimensions();
            let image = RawImage2d::from_raw_rgba_reversed(&image.into_raw(), image_dim);
            self.texture = Some(Texture2d::new(display, image)?);
        }

        match &self.texture {
            Some(tex) => Ok(tex),
            None => unreachable!("renderable holds either an image or a texture"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_filling_window_is_untransformed() {
        let m = fit_matrix((1440, 900), (1440, 900));
        assert_eq!(m[0][0], 1.0);
        assert_eq!(m[1][1], 1.0);
        assert_eq!(m[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn radar_is_centred_at_native_size() {
        let m = fit_matrix((967, 900), (1440, 900));
        assert!((m[0][0] - 967.0 / 1440.0).abs() < 1e-6);
        assert_eq!(m[1][1], 1.0);
        // No translation, the quad stays centred
        assert_eq!(m[3][0], 0.0);
        assert_eq!(m[3][1], 0.0);
    }

    #[test]
    fn matrix_follows_the_window_at_draw_time() {
        let radar = Renderable::from_image(RgbaImage::new(967, 900));

        // Size reported before the fullscreen request took effect
        let early = radar.matrix((800, 600));
        assert!(early[0][0] > 1.0);

        let fullscreen = radar.matrix((1440, 900));
        assert!((fullscreen[0][0] - 967.0 / 1440.0).abs() < 1e-6);
        assert_eq!(fullscreen[1][1], 1.0);
        assert_eq!(fullscreen, fit_matrix((967, 900), (1440, 900)));
    }

    #[test]
    fn zero_sized_window_does_not_divide_by_zero() {
        let m = fit_matrix((967, 900), (0, 0));
        assert!(m[0][0].is_finite());
        assert!(m[1][1].is_finite());
    }
}
