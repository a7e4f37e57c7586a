pub(crate) mod composer;
pub(crate) mod shaper;
pub(crate) mod slide;
