pub(crate) mod chunk;
pub(crate) mod context;
pub(crate) mod engine;
pub(crate) mod gate;
pub(crate) mod integrity;
pub(crate) mod opts;
pub(crate) mod rejection;
pub(crate) mod result;
