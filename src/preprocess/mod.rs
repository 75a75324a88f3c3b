pub mod image;
pub mod tensor;

pub use self::image::{PreprocessedImage, Preprocessor, ResizeFilter};
pub use self::tensor::ImageTensor;
