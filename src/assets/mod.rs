pub(crate) mod decode;
pub(crate) mod elementary;
pub(crate) mod media;
pub(crate) mod opener;
pub(crate) mod video;
