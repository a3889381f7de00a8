//! A crate for turning a single source image into a multi-size favicon.
//! The source is resampled to every requested size and the frames are
//! packed into one ICO file.
//!
//! ## Examples
//! ### Basic
//! Reads `public/icon.png` and writes `public/favicon.ico` with 16px, 32px,
//! 48px, 64px, 128px and 256px frames.
//!
//! ```no_run
//! # use favicon_builder::FaviconGenerator;
//! FaviconGenerator::default().generate()?;
//! # Ok::<(), favicon_builder::Error>(())
//! ```
//!
//! ### Custom Icon Sizes
//! ```no_run
//! # use favicon_builder::FaviconGenerator;
//! FaviconGenerator::new("assets/logo.png", "dist/favicon.ico")
//!     .sizes(&[16, 32])
//!     .generate()?;
//! # Ok::<(), favicon_builder::Error>(())
//! ```

mod error;

pub use error::{Error, Result};
pub use image::imageops::FilterType;

use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::codecs::png::PngEncoder;
use image::imageops::resize;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader};
use std::borrow::Cow;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Where the favicon source is read from when no other path is given.
pub const SOURCE_PATH: &str = "public/icon.png";

/// Where the favicon is written when no other path is given.
pub const DESTINATION_PATH: &str = "public/favicon.ico";

/// The largest frame an ICO directory entry can describe.
const MAX_ICO_SIZE: u32 = 256;

/// Builds a favicon from one source image.
/// Every size is resampled from the same source, upscaling where the source is smaller.
#[derive(Debug)]
pub struct FaviconGenerator {
    source: PathBuf,
    destination: PathBuf,
    sizes: IconSizes,
    filter: FilterType,
}

impl Default for FaviconGenerator {
    fn default() -> Self {
        FaviconGenerator::new(SOURCE_PATH, DESTINATION_PATH)
    }
}

impl FaviconGenerator {
    pub fn new(source: impl AsRef<Path>, destination: impl AsRef<Path>) -> FaviconGenerator {
        FaviconGenerator {
            source: source.as_ref().to_owned(),
            destination: destination.as_ref().to_owned(),
            sizes: IconSizes::default(),
            filter: FilterType::Lanczos3,
        }
    }

    /// Customizes the sizes included in the ICO file. Defaults to [`IconSizes::FAVICON`].
    pub fn sizes(&mut self, sizes: impl Into<IconSizes>) -> &mut FaviconGenerator {
        self.sizes = sizes.into();
        self
    }

    /// Customizes the resampling filter. Defaults to [`FilterType::Lanczos3`].
    pub fn filter(&mut self, filter: FilterType) -> &mut FaviconGenerator {
        self.filter = filter;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Decodes the source, encodes the favicon and writes it to the destination,
    /// replacing whatever was there.
    ///
    /// Nothing is written unless decoding and encoding both succeed.
    pub fn generate(&self) -> Result<PathBuf> {
        self.sizes.validate()?;

        if !self.source.exists() {
            return Err(Error::SourceNotFound(self.source.clone()));
        }

        let image = decode_source(&self.source)?;
        let encoded = self.encode(&image)?;

        fs::write(&self.destination, encoded).map_err(|source| Error::Write {
            path: self.destination.clone(),
            source,
        })?;
        log::info!("wrote {}", self.destination.display());

        Ok(self.destination.clone())
    }

    /// Encodes `image` as an ICO container holding one frame per configured size.
    pub fn encode(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        self.sizes.validate()?;

        let frames: Vec<_> = self
            .sizes
            .0
            .iter()
            .copied()
            .map(|size| create_ico_frame(image, size, self.filter))
            .collect::<Result<_>>()?;

        let mut encoded = Vec::new();
        IcoEncoder::new(&mut encoded).encode_images(&frames)?;
        Ok(encoded)
    }
}

/// A list of square icon sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSizes(Cow<'static, [u32]>);

impl IconSizes {
    /// The usual favicon sizes: 16x16, 32x32, 48x48, 64x64, 128x128, and 256x256.
    pub const FAVICON: Self = Self::new(&[16, 32, 48, 64, 128, 256]);

    pub const fn new(sizes: &'static [u32]) -> IconSizes {
        Self(Cow::Borrowed(sizes))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(Error::NoSizes);
        }
        match self.0.iter().find(|&&size| size == 0 || size > MAX_ICO_SIZE) {
            Some(&size) => Err(Error::InvalidSize(size)),
            None => Ok(()),
        }
    }
}

impl Default for IconSizes {
    fn default() -> Self {
        IconSizes::FAVICON
    }
}

impl<'a, I> From<I> for IconSizes
where
    I: IntoIterator<Item = &'a u32>,
{
    fn from(value: I) -> Self {
        IconSizes(value.into_iter().copied().collect::<Vec<_>>().into())
    }
}

fn decode_source(path: &Path) -> Result<DynamicImage> {
    let decode_error = |source: image::ImageError| Error::Decode {
        path: path.to_owned(),
        source,
    };
    let image = ImageReader::open(path)
        .map_err(|e| decode_error(e.into()))?
        .with_guessed_format()
        .map_err(|e| decode_error(e.into()))?
        .decode()
        .map_err(decode_error)?;
    log::debug!(
        "decoded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

fn create_ico_frame(
    image: &DynamicImage,
    size: u32,
    filter: FilterType,
) -> Result<IcoFrame<'static>> {
    let resized = resize(image, size, size, filter);
    let frame = encode_ico_frame(resized.as_raw(), size)?;
    log::debug!("encoded {size}x{size} frame");
    Ok(frame)
}

fn encode_ico_frame(buf: &[u8], size: u32) -> Result<IcoFrame<'static>> {
    let color_type = ExtendedColorType::Rgba8;
    let mut encoded = Vec::new();
    PngEncoder::new(Cursor::new(&mut encoded)).write_image(buf, size, size, color_type)?;
    Ok(IcoFrame::with_encoded(encoded, size, size, color_type)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        }))
    }

    /// Reads `(width, height)` for every entry in an ICO directory.
    fn directory_sizes(ico: &[u8]) -> Vec<(u32, u32)> {
        let count = u16::from_le_bytes([ico[4], ico[5]]) as usize;
        (0..count)
            .map(|i| {
                let entry = &ico[6 + i * 16..];
                let dim = |b: u8| if b == 0 { 256 } else { u32::from(b) };
                (dim(entry[0]), dim(entry[1]))
            })
            .collect()
    }

    #[test]
    fn default_sizes_are_favicon_sizes() {
        assert_eq!(IconSizes::default().as_slice(), &[16, 32, 48, 64, 128, 256]);
    }

    #[test]
    fn default_generator_uses_fixed_paths() {
        let generator = FaviconGenerator::default();
        assert_eq!(generator.source(), Path::new("public/icon.png"));
        assert_eq!(generator.destination(), Path::new("public/favicon.ico"));
    }

    #[test]
    fn encode_contains_every_size() {
        let ico = FaviconGenerator::default().encode(&gradient(64, 64)).unwrap();
        assert_eq!(
            directory_sizes(&ico),
            vec![(16, 16), (32, 32), (48, 48), (64, 64), (128, 128), (256, 256)]
        );
    }

    #[test]
    fn encode_upscales_small_sources() {
        let ico = FaviconGenerator::default()
            .sizes(&[256])
            .encode(&gradient(8, 8))
            .unwrap();
        assert_eq!(directory_sizes(&ico), vec![(256, 256)]);
    }

    #[test]
    fn encode_squares_non_square_sources() {
        let ico = FaviconGenerator::default()
            .sizes(&[32, 48])
            .encode(&gradient(100, 40))
            .unwrap();
        assert_eq!(directory_sizes(&ico), vec![(32, 32), (48, 48)]);
    }

    #[test]
    fn encode_is_deterministic() {
        let image = gradient(300, 300);
        let generator = FaviconGenerator::default();
        assert_eq!(
            generator.encode(&image).unwrap(),
            generator.encode(&image).unwrap()
        );
    }

    #[test]
    fn rejects_out_of_range_sizes() {
        let image = gradient(16, 16);
        assert!(matches!(
            FaviconGenerator::default().sizes(&[16, 0]).encode(&image),
            Err(Error::InvalidSize(0))
        ));
        assert!(matches!(
            FaviconGenerator::default().sizes(&[257]).encode(&image),
            Err(Error::InvalidSize(257))
        ));
    }

    #[test]
    fn rejects_empty_sizes() {
        let result = FaviconGenerator::default()
            .sizes(&[0u32; 0])
            .encode(&gradient(16, 16));
        assert!(matches!(result, Err(Error::NoSizes)));
    }
}
