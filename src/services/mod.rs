pub mod lookup;
pub mod upload;

pub use lookup::LookupSource;
pub use upload::{UploadPolicy, UploadStore};
