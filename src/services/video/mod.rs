/// Video post-processing and object-store upload
pub mod processor;
pub mod s3;
