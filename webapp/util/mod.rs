pub mod html;
pub mod multipart;
