pub(crate) mod particle;
pub(crate) mod store;
