pub(crate) mod frame;
pub(crate) mod lifecycle;
pub(crate) mod timers;
