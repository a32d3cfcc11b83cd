pub(crate) mod resolver;
pub(crate) mod single_source;
