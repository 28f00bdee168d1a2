pub(crate) mod connect;
pub(crate) mod context;
pub(crate) mod labels;
pub(crate) mod matching;
pub(crate) mod reduce_chain;
