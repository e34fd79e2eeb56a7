//! PNG decoding shared by the flipbook frames, the minimized icon and the tray icon

use std::io::Cursor;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

/// Decoded image, RGBA8 unpremultiplied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaImage {
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(self.size(), &self.pixels)
    }

    /// ARGB32 in network byte order, as StatusNotifier icons expect
    pub fn to_argb(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(4)
            .flat_map(|px| [px[3], px[0], px[1], px[2]])
            .collect()
    }
}

pub fn load_png(path: &Path) -> Result<RgbaImage> {
    let bytes = std::fs::read(path).context(format!("Failed to read image {}", path.display()))?;
    decode_png(&bytes).context(format!("Failed to decode image {}", path.display()))
}

pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let (color_type, _) = reader.output_color_type();
    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let mut buf = vec![0; width as usize * height as usize * color_type.samples()];
    let info = reader.next_frame(&mut buf)?;
    let raw = &buf[..info.buffer_size()];

    let pixels = match info.color_type {
        png::ColorType::Rgba => raw.to_vec(),
        png::ColorType::Rgb => raw
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 0xFF])
            .collect(),
        png::ColorType::GrayscaleAlpha => raw
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0], px[1]])
            .collect(),
        png::ColorType::Grayscale => raw.iter().flat_map(|g| [*g, *g, *g, 0xFF]).collect(),
        other => {
            return Err(anyhow!(
                "Unsupported PNG color type {:?} (expected RGB, RGBA or grayscale)",
                other
            ));
        }
    };

    Ok(RgbaImage {
        width: info.width,
        height: info.height,
        pixels,
    })
}
