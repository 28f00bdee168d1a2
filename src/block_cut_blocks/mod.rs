pub(crate) mod condense;
pub(crate) mod rooting;
