pub(crate) mod decode;
pub(crate) mod fit;
pub(crate) mod loader;
pub(crate) mod media;
