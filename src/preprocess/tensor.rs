/// NHWC image batch fed to the classifier.
///
/// Always built through `from_gray_pixels`, so `data.len()` equals the
/// product of `shape`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    shape: [usize; 4],
    data: Vec<f64>,
}

impl ImageTensor {
    /// Wraps one grayscale image as a batch of one: shape `(1, height, width, 1)`.
    /// Pixels are divided by 255.
    pub fn from_gray_pixels(width: u32, height: u32, pixels: &[u8]) -> Option<ImageTensor> {
        let (w, h) = (width as usize, height as usize);
        if pixels.len() != w * h {
            return None;
        }
        Some(ImageTensor {
            shape: [1, h, w, 1],
            data: pixels.iter().map(|&p| p as f64 / 255.0).collect(),
        })
    }

    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    /// Values in row-major NHWC order.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
