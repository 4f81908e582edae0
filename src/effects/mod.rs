pub(crate) mod boot;
pub(crate) mod burst;
pub(crate) mod sequence;
pub(crate) mod starfield;
pub(crate) mod typist;
